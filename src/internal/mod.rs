//! Internal Implementation Details
//!
//! This module contains implementation details that are not part of the public API.
//! Types in this module may change without notice between minor versions.
//!
//! # Contents
//!
//! - [`register`]: Raw memory-mapped DMA and NVIC register definitions
//! - [`constants`]: Channel count and control-word constants

pub(crate) mod constants;
pub(crate) mod register;
