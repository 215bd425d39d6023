//! Synchronization Support
//!
//! - [`CriticalSectionCell`] - ISR-safe, cross-core interior mutability
//!
//! Every piece of state shared between foreground code and the DMA
//! interrupt (the claimed-channel mask, the binding table) lives in one of
//! these cells.

mod primitives;

pub use primitives::CriticalSectionCell;
