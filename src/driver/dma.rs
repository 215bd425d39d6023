//! DMA controller: the single owner of the hardware backend, the channel
//! pool and the interrupt multiplexer.

use super::channel::Channel;
use super::error::Result;
use super::interrupt::{BindingInfo, InterruptMultiplexer};
use super::pool::{ChannelId, ChannelPool};
use crate::hal::{DmaHardware, IrqLine};

/// DMA controller.
///
/// Create one per DMA block, usually as a static, and call
/// [`on_interrupt`](Self::on_interrupt) from the `DMA_IRQ_0` vector.
///
/// # Example
///
/// ```ignore
/// static DMA: Dma<Rp2040Dma, NvicLine> = Dma::new(Rp2040Dma::new(), NvicLine::dma_irq_0());
///
/// DMA.init();
///
/// let mut channel = DMA.claim()?;
/// channel.configure(
///     TransferConfig::new()
///         .with_read(&SOURCE)
///         .with_write(&mut dest)
///         .with_count(SOURCE.len())
///         .with_ctrl(channel.default_ctrl_word()?)
///         .with_trigger(true),
/// )?;
///
/// while channel.is_active()? {}
/// channel.close();
/// ```
///
/// The pool and the binding table are reachable only through [`Channel`],
/// so an id cannot be released while a channel still owns it:
///
/// ```compile_fail,E0624
/// use ph_rp2040_dma::{Dma, NvicLine, Rp2040Dma};
///
/// fn release_behind_owner(dma: &Dma<Rp2040Dma, NvicLine>) {
///     let channel = dma.claim().ok();
///     let id = channel.as_ref().and_then(|c| c.id());
///     if let Some(id) = id {
///         dma.pool().release(id);
///     }
/// }
/// ```
pub struct Dma<H, L> {
    hw: H,
    pool: ChannelPool,
    interrupts: InterruptMultiplexer<L>,
}

impl<H: DmaHardware, L: IrqLine> Dma<H, L> {
    /// Create a controller with every channel free and no bindings
    pub const fn new(hw: H, line: L) -> Self {
        Self {
            hw,
            pool: ChannelPool::new(),
            interrupts: InterruptMultiplexer::new(line),
        }
    }

    /// Clear the interrupt binding table. Call once at startup.
    pub fn init(&self) {
        self.interrupts.reset();

        #[cfg(feature = "defmt")]
        defmt::info!("DMA initialized, {} channels free", self.pool.free_count());
    }

    /// Mask the interrupt line and drop every binding. Call once at
    /// shutdown, before a soft reset.
    pub fn deinit(&self) {
        self.interrupts.shutdown(&self.hw);
    }

    /// Claim the lowest-numbered free channel.
    pub fn claim(&self) -> Result<Channel<'_, H, L>> {
        let id = self.pool.claim()?;
        Ok(Channel::open(self, id))
    }

    /// Claim a specific channel.
    pub fn claim_channel(&self, id: ChannelId) -> Result<Channel<'_, H, L>> {
        let id = self.pool.claim_channel(id)?;
        Ok(Channel::open(self, id))
    }

    /// Service the shared DMA interrupt.
    pub fn on_interrupt(&self) -> u32 {
        self.interrupts.on_interrupt(&self.hw)
    }

    /// Run soft interrupt handlers queued by [`on_interrupt`](Self::on_interrupt).
    pub fn run_scheduled(&self) -> usize {
        self.interrupts.run_scheduled()
    }

    /// Whether channel `id` is held by a [`Channel`]
    pub fn is_claimed(&self, id: ChannelId) -> bool {
        self.pool.is_claimed(id)
    }

    /// Number of unclaimed channels
    pub fn free_count(&self) -> usize {
        self.pool.free_count()
    }

    /// Bitmask of claimed channel ids
    pub fn claimed_mask(&self) -> u32 {
        self.pool.claimed_mask()
    }

    /// Snapshot of channel `id`'s interrupt binding
    pub fn binding(&self, id: ChannelId) -> Option<BindingInfo> {
        self.interrupts.binding(id)
    }

    /// Hardware backend
    pub fn hardware(&self) -> &H {
        &self.hw
    }

    /// Processor interrupt line serving the DMA block
    pub fn line(&self) -> &L {
        self.interrupts.line()
    }

    /// Claim state. Only [`Channel`] may release ids.
    pub(crate) fn pool(&self) -> &ChannelPool {
        &self.pool
    }

    pub(crate) fn interrupts(&self) -> &InterruptMultiplexer<L> {
        &self.interrupts
    }
}
