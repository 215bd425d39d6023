//! NVIC Register Definitions
//!
//! Only the enable and disable banks are used. NVIC
//! registers live on the private peripheral bus and have no atomic
//! aliases, but each bank is already write-1-to-act.

use super::{NVIC_BASE, read_reg, write_reg};

/// Interrupt set-enable register
pub const ISER_OFFSET: usize = 0x000;
/// Interrupt clear-enable register
pub const ICER_OFFSET: usize = 0x080;

/// DMA_IRQ_0 interrupt number on the RP2040
pub const DMA_IRQ_0: u8 = 11;
/// DMA_IRQ_1 interrupt number on the RP2040
pub const DMA_IRQ_1: u8 = 12;

/// NVIC register accessor
pub struct NvicRegs;

impl NvicRegs {
    /// Bit for interrupt `irq` in any NVIC bank
    #[inline(always)]
    pub const fn irq_bit(irq: u8) -> u32 {
        1 << (irq & 0x1f)
    }

    /// Unmask interrupt `irq`
    #[inline(always)]
    pub fn enable(irq: u8) {
        unsafe { write_reg(NVIC_BASE + ISER_OFFSET, Self::irq_bit(irq)) }
    }

    /// Mask interrupt `irq`
    #[inline(always)]
    pub fn disable(irq: u8) {
        unsafe { write_reg(NVIC_BASE + ICER_OFFSET, Self::irq_bit(irq)) }
    }

    /// Whether interrupt `irq` is unmasked
    #[inline(always)]
    pub fn is_enabled(irq: u8) -> bool {
        unsafe { read_reg(NVIC_BASE + ISER_OFFSET) & Self::irq_bit(irq) != 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bank_addresses() {
        assert_eq!(NVIC_BASE + ISER_OFFSET, 0xE000_E100);
        assert_eq!(NVIC_BASE + ICER_OFFSET, 0xE000_E180);
    }

    #[test]
    fn irq_bits() {
        assert_eq!(NvicRegs::irq_bit(DMA_IRQ_0), 1 << 11);
        assert_eq!(NvicRegs::irq_bit(DMA_IRQ_1), 1 << 12);
    }
}
