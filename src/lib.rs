//! RP2040 DMA Core
//!
//! A `no_std`, `no_alloc` core for the RP2040 DMA controller: control-word
//! packing, exclusive ownership of the twelve hardware channels, and
//! multiplexing of the shared DMA interrupt line across per-channel
//! handlers.
//!
//! # Architecture
//!
//! 1. **Driver Layer** ([`driver`]): [`Dma`] controller, [`Channel`],
//!    [`ControlWord`], [`ChannelPool`] and [`InterruptMultiplexer`]
//! 2. **HAL Layer** ([`hal`]): the [`DmaHardware`] and [`IrqLine`] traits
//!    plus the RP2040 register backend
//!
//! All state shared with the interrupt handler lives behind
//! `critical-section`. On the RP2040 the critical-section implementation
//! takes a hardware spinlock, so the pool and the binding table are safe
//! to use from both cores.
//!
//! # Features
//!
//! - `defmt`: Enable defmt formatting for public types and driver logging
//!
//! # Example
//!
//! ```ignore
//! use ph_rp2040_dma::{ChannelId, Dma, IrqContext, NvicLine, Rp2040Dma, TransferConfig};
//!
//! static DMA: Dma<Rp2040Dma, NvicLine> = Dma::new(Rp2040Dma::new(), NvicLine::dma_irq_0());
//!
//! #[interrupt]
//! fn DMA_IRQ_0() {
//!     DMA.on_interrupt();
//! }
//!
//! fn done(channel: ChannelId) {
//!     // transfer on `channel` finished
//! }
//!
//! DMA.init();
//!
//! let mut channel = DMA.claim()?;
//! channel.irq(Some(done), IrqContext::Hard)?;
//! channel.configure(
//!     TransferConfig::new()
//!         .with_read(&SOURCE)
//!         .with_write(&mut dest)
//!         .with_count(SOURCE.len())
//!         .with_ctrl(channel.default_ctrl_word()?.with_irq_quiet(false))
//!         .with_trigger(true),
//! )?;
//! ```

#![no_std]
#![deny(missing_docs)]
#![allow(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]
// Clippy lint levels live here; thresholds and config are in Cargo.toml.
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::mod_module_files,
    clippy::self_named_module_files,
    clippy::similar_names,
    clippy::must_use_candidate,
    clippy::assertions_on_constants,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_lossless,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::items_after_statements
)]

// =============================================================================
// Modules
// =============================================================================

pub mod driver;
pub mod hal;
pub mod sync;

// Internal implementation details (pub(crate) only)
mod internal;

// Test utilities (only available during testing)
#[cfg(test)]
pub mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use driver::channel::Channel;
pub use driver::config::TransferConfig;
pub use driver::ctrl::{CTRL_FIELDS, ControlWord, Field, FieldSpec, TransferSize, treq};
pub use driver::dma::Dma;
pub use driver::error::{
    ChannelError, ChannelResult, Error, FieldError, FieldResult, Result, ValueError, ValueResult,
};
pub use driver::interrupt::{BindingInfo, Handler, InterruptMultiplexer, IrqContext};
pub use driver::pool::{ChannelId, ChannelPool};
pub use driver::value::{RegisterKind, RegisterValue, ToRegister};
pub use hal::{DmaHardware, IrqLine, NvicLine, Rp2040Dma};

/// Low-level register accessors for advanced use.
///
/// Most users should prefer [`Channel`] over touching registers directly.
///
/// # Safety
///
/// Direct register access bypasses the channel pool and the interrupt
/// binding protocol. Use only if you accept responsibility for channel
/// ownership and sequencing.
pub mod unsafe_registers {
    pub use crate::internal::register::dma::DmaRegs;
    pub use crate::internal::register::nvic::NvicRegs;
}

/// Shared driver constants.
pub mod constants {
    pub use crate::internal::constants::{
        ALL_CHANNELS_MASK, CTRL_FIELD_COUNT, DEFAULT_CTRL_WORD, NUM_DMA_CHANNELS, TREQ_UNPACED,
    };
}

// =============================================================================
// Macro Helpers
// =============================================================================

/// Declare a static RP2040 DMA controller and its `DMA_IRQ_0` vector.
///
/// The vector is emitted through the HAL's `#[interrupt]` attribute, so the
/// `interrupt` macro must be in scope at the call site.
///
/// # Examples
///
/// ```ignore
/// use rp2040_hal::pac::interrupt;
///
/// ph_rp2040_dma::dma_static!(DMA);
///
/// DMA.init();
/// let channel = DMA.claim()?;
/// ```
#[macro_export]
macro_rules! dma_static {
    ($name:ident) => {
        static $name: $crate::Dma<$crate::Rp2040Dma, $crate::NvicLine> =
            $crate::Dma::new($crate::Rp2040Dma::new(), $crate::NvicLine::dma_irq_0());

        #[interrupt]
        fn DMA_IRQ_0() {
            $name.on_interrupt();
        }
    };
}
