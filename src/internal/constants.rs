//! Internal constants for the RP2040 DMA core.

// =============================================================================
// Channels
// =============================================================================

/// Number of hardware DMA channels on the RP2040
pub const NUM_DMA_CHANNELS: usize = 12;

/// Bit mask covering every hardware channel in the shared status registers
pub const ALL_CHANNELS_MASK: u32 = (1 << NUM_DMA_CHANNELS) - 1;

// =============================================================================
// Control Word
// =============================================================================

/// Transfer request value for an unpaced (as fast as possible) transfer
pub const TREQ_UNPACED: u8 = 0x3f;

/// Baseline control word: quiet IRQ, unpaced, read and write incrementing,
/// word transfers, enabled. `chain_to` is zero (see `default_for`).
pub const DEFAULT_CTRL_WORD: u32 =
    (1 << 21) | ((TREQ_UNPACED as u32) << 15) | (1 << 5) | (1 << 4) | (2 << 2) | (1 << 0);

/// Number of named fields in the control word
pub const CTRL_FIELD_COUNT: usize = 16;

/// Largest width of any control-word field
pub const MAX_FIELD_WIDTH: u8 = 8;
