//! A claimed DMA channel.
//!
//! [`Channel`] owns one channel id from the pool until it is closed,
//! explicitly with [`Channel::close`] or implicitly on drop. After closing,
//! every operation except `close`, `id` and `is_closed` fails with
//! [`ChannelError::ClosedChannel`].

use super::config::TransferConfig;
use super::ctrl::ControlWord;
use super::dma::Dma;
use super::error::{ChannelError, Error, Result, ValueResult};
use super::interrupt::{Handler, IrqContext};
use super::pool::ChannelId;
use super::value::{RegisterKind, RegisterValue};
use crate::hal::{DmaHardware, IrqLine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChannelState {
    Open(ChannelId),
    Closed,
}

/// A DMA channel claimed from a [`Dma`] controller.
pub struct Channel<'a, H: DmaHardware, L: IrqLine> {
    dma: &'a Dma<H, L>,
    state: ChannelState,
}

impl<'a, H: DmaHardware, L: IrqLine> Channel<'a, H, L> {
    pub(crate) fn open(dma: &'a Dma<H, L>, id: ChannelId) -> Self {
        Self {
            dma,
            state: ChannelState::Open(id),
        }
    }

    /// Channel id, or `None` once closed
    pub fn id(&self) -> Option<ChannelId> {
        match self.state {
            ChannelState::Open(id) => Some(id),
            ChannelState::Closed => None,
        }
    }

    /// Whether the channel has been closed
    pub fn is_closed(&self) -> bool {
        self.state == ChannelState::Closed
    }

    fn open_id(&self) -> Result<ChannelId> {
        self.id().ok_or(Error::Channel(ChannelError::ClosedChannel))
    }

    // -------------------------------------------------------------------------
    // Configuration
    // -------------------------------------------------------------------------

    /// Load the registers given in `config`.
    ///
    /// Registers are written in the order read address, write address,
    /// transfer count, control word. With `trigger` set, the last register
    /// written goes through its triggering alias; with no registers given,
    /// `trigger` starts the channel on its current contents.
    ///
    /// Every value is converted before the first write, so a conversion
    /// error leaves the channel untouched.
    pub fn configure(&mut self, config: TransferConfig<'_>) -> Result<()> {
        let id = self.open_id()?;

        let writes = [
            convert(config.read, RegisterKind::ReadAddr)?,
            convert(config.write, RegisterKind::WriteAddr)?,
            convert(config.count, RegisterKind::TransferCount)?,
            convert(config.ctrl, RegisterKind::Ctrl)?,
        ];

        let last = writes.iter().rposition(Option::is_some);
        let hw = self.dma.hardware();

        for (index, (kind, raw)) in writes
            .into_iter()
            .enumerate()
            .filter_map(|(i, w)| w.map(|w| (i, w)))
        {
            let trigger = config.trigger && Some(index) == last;
            write_register(hw, id, kind, raw, trigger);
        }

        if config.trigger && last.is_none() {
            hw.start(id);
        }

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "DMA channel {} configured (trigger: {})",
            id.index(),
            config.trigger
        );

        Ok(())
    }

    /// Control word this channel would use by default: the baseline with
    /// `chain_to` set to itself.
    pub fn default_ctrl_word(&self) -> Result<ControlWord> {
        Ok(ControlWord::default_for(self.open_id()?))
    }

    // -------------------------------------------------------------------------
    // Activity
    // -------------------------------------------------------------------------

    /// Whether a transfer is in progress
    pub fn is_active(&self) -> Result<bool> {
        Ok(self.dma.hardware().is_busy(self.open_id()?))
    }

    /// Start the channel on its current register contents
    pub fn start(&mut self) -> Result<()> {
        self.dma.hardware().start(self.open_id()?);
        Ok(())
    }

    /// Abort any in-flight transfer. No effect on an idle channel.
    pub fn abort(&mut self) -> Result<()> {
        self.dma.hardware().abort(self.open_id()?);
        Ok(())
    }

    /// Start (`true`) or abort (`false`)
    pub fn set_active(&mut self, active: bool) -> Result<()> {
        if active { self.start() } else { self.abort() }
    }

    // -------------------------------------------------------------------------
    // Registers
    // -------------------------------------------------------------------------

    /// Current read address
    pub fn read_addr(&self) -> Result<u32> {
        Ok(self.dma.hardware().read_addr(self.open_id()?))
    }

    /// Set the read address without starting the channel
    pub fn set_read_addr<'v>(&mut self, value: impl Into<RegisterValue<'v>>) -> Result<()> {
        self.set_register(RegisterKind::ReadAddr, value.into())
    }

    /// Current write address
    pub fn write_addr(&self) -> Result<u32> {
        Ok(self.dma.hardware().write_addr(self.open_id()?))
    }

    /// Set the write address without starting the channel
    pub fn set_write_addr<'v>(&mut self, value: impl Into<RegisterValue<'v>>) -> Result<()> {
        self.set_register(RegisterKind::WriteAddr, value.into())
    }

    /// Transfers remaining
    pub fn transfer_count(&self) -> Result<u32> {
        Ok(self.dma.hardware().transfer_count(self.open_id()?))
    }

    /// Set the transfer count without starting the channel
    pub fn set_transfer_count<'v>(&mut self, value: impl Into<RegisterValue<'v>>) -> Result<()> {
        self.set_register(RegisterKind::TransferCount, value.into())
    }

    /// Current control register
    pub fn ctrl_word(&self) -> Result<ControlWord> {
        Ok(ControlWord::from_integer(
            self.dma.hardware().ctrl(self.open_id()?),
        ))
    }

    /// Set the control register without starting the channel
    pub fn set_ctrl_word<'v>(&mut self, value: impl Into<RegisterValue<'v>>) -> Result<()> {
        self.set_register(RegisterKind::Ctrl, value.into())
    }

    fn set_register(&mut self, kind: RegisterKind, value: RegisterValue<'_>) -> Result<()> {
        let id = self.open_id()?;
        let raw = value.convert(kind)?;
        write_register(self.dma.hardware(), id, kind, raw, false);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Interrupts
    // -------------------------------------------------------------------------

    /// Bind `handler` to this channel's completion interrupt.
    ///
    /// `None` keeps a binding but leaves the interrupt disabled.
    pub fn irq(&mut self, handler: Option<Handler>, context: IrqContext) -> Result<()> {
        let id = self.open_id()?;
        self.dma
            .interrupts()
            .bind(self.dma.hardware(), id, handler, context);
        Ok(())
    }

    /// Drop this channel's interrupt binding
    pub fn irq_disable(&mut self) -> Result<()> {
        let id = self.open_id()?;
        self.dma.interrupts().unbind(self.dma.hardware(), id);
        Ok(())
    }

    /// Re-arm or mute the bound interrupt, clearing the pending flag.
    ///
    /// Returns `false` if no binding exists.
    pub fn irq_trigger(&mut self, enabled: bool) -> Result<bool> {
        let id = self.open_id()?;
        Ok(self
            .dma
            .interrupts()
            .set_trigger(self.dma.hardware(), id, enabled))
    }

    /// Whether the interrupt has fired since the last bind or re-arm
    pub fn irq_flags(&self) -> Result<bool> {
        Ok(self.dma.interrupts().pending(self.open_id()?))
    }

    /// Whether the channel's status bit is currently asserted
    pub fn irq_triggers(&self) -> Result<bool> {
        let id = self.open_id()?;
        Ok(self
            .dma
            .interrupts()
            .currently_asserted(self.dma.hardware(), id))
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Release the channel. Calling this again has no effect.
    pub fn close(&mut self) {
        if let ChannelState::Open(id) = self.state {
            self.dma.interrupts().unbind(self.dma.hardware(), id);
            self.state = ChannelState::Closed;
            self.dma.pool().release(id);
        }
    }
}

fn convert(
    value: Option<RegisterValue<'_>>,
    kind: RegisterKind,
) -> ValueResult<Option<(RegisterKind, u32)>> {
    value
        .map(|v| v.convert(kind).map(|raw| (kind, raw)))
        .transpose()
}

fn write_register<H: DmaHardware>(
    hw: &H,
    id: ChannelId,
    kind: RegisterKind,
    raw: u32,
    trigger: bool,
) {
    match kind {
        RegisterKind::ReadAddr => hw.set_read_addr(id, raw, trigger),
        RegisterKind::WriteAddr => hw.set_write_addr(id, raw, trigger),
        RegisterKind::TransferCount => hw.set_transfer_count(id, raw, trigger),
        RegisterKind::Ctrl => hw.set_ctrl(id, raw, trigger),
    }
}

impl<H: DmaHardware, L: IrqLine> Drop for Channel<'_, H, L> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<H: DmaHardware, L: IrqLine> core::fmt::Display for Channel<'_, H, L> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.state {
            ChannelState::Open(id) => write!(f, "DMA({id})"),
            ChannelState::Closed => f.write_str("DMA(closed)"),
        }
    }
}

impl<H: DmaHardware, L: IrqLine> core::fmt::Debug for Channel<'_, H, L> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Channel")
            .field("state", &self.state)
            .finish()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
