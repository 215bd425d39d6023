//! Memory-mapped register definitions for the RP2040 DMA block
//!
//! All register access is volatile. The RP2040 maps every peripheral
//! register four times: the normal address, an XOR alias, a set alias and
//! a clear alias. The set and clear aliases give single-write atomic bit
//! updates, which the shared enable registers rely on so that the two
//! cores never race on a read-modify-write.

pub mod dma;
pub mod nvic;

/// DMA register block base address
pub const DMA_BASE: usize = 0x5000_0000;

/// Cortex-M0+ NVIC base address (private peripheral bus)
pub const NVIC_BASE: usize = 0xE000_E100;

/// Offset of the atomic bitmask-set alias
pub const ALIAS_SET_OFFSET: usize = 0x2000;

/// Offset of the atomic bitmask-clear alias
pub const ALIAS_CLR_OFFSET: usize = 0x3000;

/// Read a 32-bit register at the given address
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
pub unsafe fn read_reg(addr: usize) -> u32 {
    unsafe { core::ptr::read_volatile(addr as *const u32) }
}

/// Write a 32-bit value to a register at the given address
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
pub unsafe fn write_reg(addr: usize, value: u32) {
    unsafe { core::ptr::write_volatile(addr as *mut u32, value) }
}

/// Atomically set bits through the register's set alias
///
/// # Safety
/// The caller must ensure `addr` is a valid peripheral register that has
/// RP2040 atomic aliases (not a PPB register such as the NVIC).
#[inline(always)]
pub unsafe fn set_bits(addr: usize, bits: u32) {
    unsafe { write_reg(addr + ALIAS_SET_OFFSET, bits) }
}

/// Atomically clear bits through the register's clear alias
///
/// # Safety
/// Same requirements as [`set_bits`].
#[inline(always)]
pub unsafe fn clear_bits(addr: usize, bits: u32) {
    unsafe { write_reg(addr + ALIAS_CLR_OFFSET, bits) }
}

// =============================================================================
// Register Access Macros
// =============================================================================

/// Generate a read-only accessor method for a shared register.
///
/// # Example
/// ```ignore
/// impl DmaRegs {
///     reg_ro!(ints0, DMA_BASE, INTS0_OFFSET, "IRQ 0 masked status");
/// }
/// ```
macro_rules! reg_ro {
    ($read_fn:ident, $base:expr, $offset:expr, $doc:expr) => {
        #[doc = concat!("Read ", $doc)]
        #[inline(always)]
        pub fn $read_fn() -> u32 {
            unsafe { $crate::internal::register::read_reg($base + $offset) }
        }
    };
}

/// Generate read/write accessor methods for a per-channel register.
///
/// The generated functions take the channel number and resolve the
/// address with `DmaRegs::channel_addr`.
macro_rules! chan_reg_rw {
    ($read_fn:ident, $write_fn:ident, $offset:expr, $doc:expr) => {
        #[doc = concat!("Read ", $doc)]
        #[inline(always)]
        pub fn $read_fn(ch: u8) -> u32 {
            unsafe { $crate::internal::register::read_reg(Self::channel_addr(ch, $offset)) }
        }

        #[doc = concat!("Write ", $doc)]
        #[inline(always)]
        pub fn $write_fn(ch: u8, value: u32) {
            unsafe {
                $crate::internal::register::write_reg(Self::channel_addr(ch, $offset), value)
            }
        }
    };
}

/// Generate a write-only accessor for a per-channel trigger alias.
macro_rules! chan_reg_wo {
    ($write_fn:ident, $offset:expr, $doc:expr) => {
        #[doc = concat!("Write ", $doc)]
        #[inline(always)]
        pub fn $write_fn(ch: u8, value: u32) {
            unsafe {
                $crate::internal::register::write_reg(Self::channel_addr(ch, $offset), value)
            }
        }
    };
}

// Export macros for use in submodules
pub(crate) use chan_reg_rw;
pub(crate) use chan_reg_wo;
pub(crate) use reg_ro;
