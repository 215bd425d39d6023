//! RP2040 register backend
//!
//! [`Rp2040Dma`] drives the real DMA block through volatile register
//! access. [`NvicLine`] masks and unmasks one of the two DMA interrupt
//! lines in the NVIC.
//!
//! Both are zero-sized (or nearly so) and can live in statics:
//!
//! ```ignore
//! static DMA: Dma<Rp2040Dma, NvicLine> = Dma::new(Rp2040Dma::new(), NvicLine::dma_irq_0());
//!
//! #[interrupt]
//! fn DMA_IRQ_0() {
//!     DMA.on_interrupt();
//! }
//! ```

use super::{DmaHardware, IrqLine};
use crate::driver::pool::ChannelId;
use crate::internal::register::dma::{CTRL_BUSY, DmaRegs};
use crate::internal::register::nvic::{DMA_IRQ_0, DMA_IRQ_1, NvicRegs};

// =============================================================================
// DMA Block
// =============================================================================

/// The RP2040 DMA block at its fixed address.
#[derive(Debug, Default, Clone, Copy)]
pub struct Rp2040Dma {
    _private: (),
}

impl Rp2040Dma {
    /// Handle to the DMA block.
    ///
    /// Several handles may exist. Channel ownership is enforced by the
    /// channel pool, not by this type.
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

impl DmaHardware for Rp2040Dma {
    fn read_addr(&self, ch: ChannelId) -> u32 {
        DmaRegs::read_addr(ch.index())
    }

    fn write_addr(&self, ch: ChannelId) -> u32 {
        DmaRegs::write_addr(ch.index())
    }

    fn transfer_count(&self, ch: ChannelId) -> u32 {
        DmaRegs::trans_count(ch.index())
    }

    fn ctrl(&self, ch: ChannelId) -> u32 {
        DmaRegs::ctrl(ch.index())
    }

    fn set_read_addr(&self, ch: ChannelId, addr: u32, trigger: bool) {
        if trigger {
            DmaRegs::set_read_addr_trig(ch.index(), addr);
        } else {
            DmaRegs::set_read_addr(ch.index(), addr);
        }
    }

    fn set_write_addr(&self, ch: ChannelId, addr: u32, trigger: bool) {
        if trigger {
            DmaRegs::set_write_addr_trig(ch.index(), addr);
        } else {
            DmaRegs::set_write_addr(ch.index(), addr);
        }
    }

    fn set_transfer_count(&self, ch: ChannelId, count: u32, trigger: bool) {
        if trigger {
            DmaRegs::set_trans_count_trig(ch.index(), count);
        } else {
            DmaRegs::set_trans_count(ch.index(), count);
        }
    }

    fn set_ctrl(&self, ch: ChannelId, ctrl: u32, trigger: bool) {
        if trigger {
            DmaRegs::set_ctrl_trig(ch.index(), ctrl);
        } else {
            DmaRegs::set_ctrl(ch.index(), ctrl);
        }
    }

    fn is_busy(&self, ch: ChannelId) -> bool {
        DmaRegs::ctrl(ch.index()) & CTRL_BUSY != 0
    }

    fn start(&self, ch: ChannelId) {
        DmaRegs::multi_chan_trigger(ch.mask());
    }

    fn abort(&self, ch: ChannelId) {
        DmaRegs::set_chan_abort(ch.mask());
        // The abort bit reads back as set until in-flight bus transfers drain
        while DmaRegs::chan_abort() & ch.mask() != 0 {
            core::hint::spin_loop();
        }
    }

    fn set_irq0_enabled(&self, ch: ChannelId, enabled: bool) {
        if enabled {
            DmaRegs::enable_irq0(ch.mask());
        } else {
            DmaRegs::disable_irq0(ch.mask());
        }
    }

    fn irq0_status(&self) -> u32 {
        DmaRegs::ints0()
    }

    fn clear_irq0_status(&self, mask: u32) {
        DmaRegs::clear_ints0(mask);
    }
}

// =============================================================================
// NVIC Line
// =============================================================================

/// One DMA interrupt line in the NVIC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NvicLine {
    irq: u8,
}

impl NvicLine {
    /// `DMA_IRQ_0`, the line fed by the `INTE0`/`INTS0` pair
    pub const fn dma_irq_0() -> Self {
        Self { irq: DMA_IRQ_0 }
    }

    /// `DMA_IRQ_1`
    pub const fn dma_irq_1() -> Self {
        Self { irq: DMA_IRQ_1 }
    }

    /// NVIC interrupt number
    pub const fn number(&self) -> u8 {
        self.irq
    }
}

impl IrqLine for NvicLine {
    fn enable(&self) {
        NvicRegs::enable(self.irq);
    }

    fn disable(&self) {
        NvicRegs::disable(self.irq);
    }

    fn is_enabled(&self) -> bool {
        NvicRegs::is_enabled(self.irq)
    }
}
