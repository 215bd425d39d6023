//! Core driver components for the RP2040 DMA controller.
//!
//! - [`ctrl`] - Control word field table and [`ControlWord`]
//! - [`pool`] - Channel ids and the [`ChannelPool`]
//! - [`channel`] - A claimed [`Channel`] and its register operations
//! - [`interrupt`] - The shared-line [`InterruptMultiplexer`]
//! - [`dma`] - The [`Dma`] controller tying the above together
//! - [`config`] - [`TransferConfig`] builder
//! - [`value`] - Register value conversion
//! - [`error`] - Error types and result aliases
//!
//! # Example
//!
//! ```ignore
//! use ph_rp2040_dma::driver::{ControlWord, TransferConfig, TransferSize};
//!
//! let ctrl = channel.default_ctrl_word()?.with_size(TransferSize::Byte);
//! channel.configure(TransferConfig::new().with_ctrl(ctrl).with_trigger(true))?;
//! ```

// Submodules
pub mod channel;
pub mod config;
pub mod ctrl;
pub mod dma;
pub mod error;
pub mod interrupt;
pub mod pool;
pub mod value;

// Re-exports for convenience
pub use channel::Channel;
pub use config::TransferConfig;
pub use ctrl::{CTRL_FIELDS, ControlWord, Field, FieldSpec, TransferSize, treq};
pub use dma::Dma;
pub use error::{
    ChannelError, ChannelResult, Error, FieldError, FieldResult, Result, ValueError, ValueResult,
};
pub use interrupt::{BindingInfo, Handler, InterruptMultiplexer, IrqContext};
pub use pool::{ChannelId, ChannelPool};
pub use value::{RegisterKind, RegisterValue, ToRegister};
