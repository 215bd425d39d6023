//! DMA Controller Register Definitions
//!
//! Twelve identical channel register blocks at a 0x40 stride, followed by
//! the shared interrupt, trigger and abort registers at 0x400.

use super::{DMA_BASE, chan_reg_rw, chan_reg_wo, clear_bits, reg_ro, set_bits, write_reg};

// =============================================================================
// Channel Register Offsets
// =============================================================================

/// Distance between consecutive channel register blocks
pub const CHANNEL_STRIDE: usize = 0x40;

/// Read address register offset
pub const READ_ADDR_OFFSET: usize = 0x00;
/// Write address register offset
pub const WRITE_ADDR_OFFSET: usize = 0x04;
/// Transfer count register offset
pub const TRANS_COUNT_OFFSET: usize = 0x08;
/// Control register offset (writing here triggers the channel)
pub const CTRL_TRIG_OFFSET: usize = 0x0C;
/// Alias 1 control register offset (non-triggering)
pub const AL1_CTRL_OFFSET: usize = 0x10;
/// Alias 1 transfer count trigger offset
pub const AL1_TRANS_COUNT_TRIG_OFFSET: usize = 0x1C;
/// Alias 2 write address trigger offset
pub const AL2_WRITE_ADDR_TRIG_OFFSET: usize = 0x2C;
/// Alias 3 read address trigger offset
pub const AL3_READ_ADDR_TRIG_OFFSET: usize = 0x3C;

// =============================================================================
// Shared Register Offsets
// =============================================================================

/// Raw interrupt status register offset
pub const INTR_OFFSET: usize = 0x400;
/// Interrupt enable for IRQ 0 offset
pub const INTE0_OFFSET: usize = 0x404;
/// Interrupt status for IRQ 0 offset (write 1 to clear)
pub const INTS0_OFFSET: usize = 0x40C;
/// Multi-channel trigger register offset
pub const MULTI_CHAN_TRIGGER_OFFSET: usize = 0x430;
/// Channel abort register offset
pub const CHAN_ABORT_OFFSET: usize = 0x444;

// =============================================================================
// Control Register Bits
// =============================================================================

/// Busy flag in the control register
pub const CTRL_BUSY: u32 = 1 << 24;

// =============================================================================
// Register Access
// =============================================================================

/// DMA register block accessor
pub struct DmaRegs;

impl DmaRegs {
    /// Get the base address
    #[inline(always)]
    pub const fn base() -> usize {
        DMA_BASE
    }

    /// Address of a per-channel register
    #[inline(always)]
    pub const fn channel_addr(ch: u8, offset: usize) -> usize {
        DMA_BASE + (ch as usize) * CHANNEL_STRIDE + offset
    }

    // -------------------------------------------------------------------------
    // Per-channel accessors (generated by macros)
    // -------------------------------------------------------------------------

    chan_reg_rw!(read_addr, set_read_addr, READ_ADDR_OFFSET, "read address register");
    chan_reg_rw!(write_addr, set_write_addr, WRITE_ADDR_OFFSET, "write address register");
    chan_reg_rw!(trans_count, set_trans_count, TRANS_COUNT_OFFSET, "transfer count register");
    chan_reg_rw!(ctrl, set_ctrl_trig, CTRL_TRIG_OFFSET, "control register (trigger alias)");

    chan_reg_wo!(set_ctrl, AL1_CTRL_OFFSET, "control register (non-triggering alias)");
    chan_reg_wo!(set_read_addr_trig, AL3_READ_ADDR_TRIG_OFFSET, "read address and trigger");
    chan_reg_wo!(set_write_addr_trig, AL2_WRITE_ADDR_TRIG_OFFSET, "write address and trigger");
    chan_reg_wo!(set_trans_count_trig, AL1_TRANS_COUNT_TRIG_OFFSET, "transfer count and trigger");

    // -------------------------------------------------------------------------
    // Shared register accessors
    // -------------------------------------------------------------------------

    reg_ro!(intr, DMA_BASE, INTR_OFFSET, "raw interrupt status");
    reg_ro!(ints0, DMA_BASE, INTS0_OFFSET, "IRQ 0 masked status");
    reg_ro!(chan_abort, DMA_BASE, CHAN_ABORT_OFFSET, "channel abort register");

    // -------------------------------------------------------------------------
    // Special operations
    // -------------------------------------------------------------------------

    /// Clear IRQ 0 status bits (write 1 to clear)
    #[inline(always)]
    pub fn clear_ints0(mask: u32) {
        unsafe { write_reg(DMA_BASE + INTS0_OFFSET, mask) }
    }

    /// Atomically enable IRQ 0 for the channels in `mask`
    #[inline(always)]
    pub fn enable_irq0(mask: u32) {
        unsafe { set_bits(DMA_BASE + INTE0_OFFSET, mask) }
    }

    /// Atomically disable IRQ 0 for the channels in `mask`
    #[inline(always)]
    pub fn disable_irq0(mask: u32) {
        unsafe { clear_bits(DMA_BASE + INTE0_OFFSET, mask) }
    }

    /// Start the channels in `mask` with their current configuration
    #[inline(always)]
    pub fn multi_chan_trigger(mask: u32) {
        unsafe { write_reg(DMA_BASE + MULTI_CHAN_TRIGGER_OFFSET, mask) }
    }

    /// Request an abort for the channels in `mask`
    #[inline(always)]
    pub fn set_chan_abort(mask: u32) {
        unsafe { write_reg(DMA_BASE + CHAN_ABORT_OFFSET, mask) }
    }
}
