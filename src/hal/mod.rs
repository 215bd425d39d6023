//! Hardware Abstraction Layer
//!
//! The DMA core never touches registers directly. Everything it needs from
//! the silicon goes through two traits:
//!
//! - [`DmaHardware`]: per-channel registers plus the shared interrupt
//!   status and enable registers of the DMA block
//! - [`IrqLine`]: the processor-level interrupt line the DMA block raises
//!
//! [`rp2040`] provides volatile-register implementations for the RP2040.
//! Host tests use the mocks in the crate's `testing` module.

pub mod rp2040;

pub use rp2040::{NvicLine, Rp2040Dma};

use crate::driver::pool::ChannelId;

// =============================================================================
// DMA Hardware Trait
// =============================================================================

/// Register-level operations of a DMA block.
///
/// The setters take a `trigger` flag: when set, the write goes through the
/// register alias that starts the channel, so the transfer may begin as
/// soon as the write lands.
pub trait DmaHardware {
    /// Read the channel's read address register
    fn read_addr(&self, ch: ChannelId) -> u32;

    /// Read the channel's write address register
    fn write_addr(&self, ch: ChannelId) -> u32;

    /// Read the channel's remaining transfer count
    fn transfer_count(&self, ch: ChannelId) -> u32;

    /// Read the channel's control register
    fn ctrl(&self, ch: ChannelId) -> u32;

    /// Write the read address, optionally starting the channel
    fn set_read_addr(&self, ch: ChannelId, addr: u32, trigger: bool);

    /// Write the write address, optionally starting the channel
    fn set_write_addr(&self, ch: ChannelId, addr: u32, trigger: bool);

    /// Write the transfer count, optionally starting the channel
    fn set_transfer_count(&self, ch: ChannelId, count: u32, trigger: bool);

    /// Write the control register, optionally starting the channel
    fn set_ctrl(&self, ch: ChannelId, ctrl: u32, trigger: bool);

    /// Whether a transfer is in progress
    fn is_busy(&self, ch: ChannelId) -> bool;

    /// Start the channel with its current register contents
    fn start(&self, ch: ChannelId);

    /// Cancel any in-flight transfer; no effect on an idle channel
    fn abort(&self, ch: ChannelId);

    /// Enable or disable the channel's contribution to interrupt line 0
    fn set_irq0_enabled(&self, ch: ChannelId, enabled: bool);

    /// Masked interrupt status for line 0 (bit `n` = channel `n`)
    fn irq0_status(&self) -> u32;

    /// Clear interrupt status bits (write-1-to-clear)
    fn clear_irq0_status(&self, mask: u32);
}

// =============================================================================
// Interrupt Line Trait
// =============================================================================

/// The single processor interrupt line shared by every DMA channel.
pub trait IrqLine {
    /// Unmask the line
    fn enable(&self);

    /// Mask the line
    fn disable(&self);

    /// Whether the line is unmasked
    fn is_enabled(&self) -> bool;
}
