//! Error types for the RP2040 DMA core
//!
//! Errors are organized by domain:
//! - [`ChannelError`]: channel allocation and channel state failures
//! - [`FieldError`]: bad control-word field access
//! - [`ValueError`]: values that cannot become a register value
//!
//! The unified [`Error`] enum wraps all domain errors and is returned
//! by the channel operations.
//!
//! Releasing a channel id that is already free is not represented here.
//! It indicates a double-close bug and panics instead.

// =============================================================================
// Channel Errors
// =============================================================================

/// Channel allocation and state errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelError {
    /// Every DMA channel is already claimed
    ResourceExhausted,
    /// Operation on a channel that has been closed
    ClosedChannel,
    /// The requested channel id is claimed by someone else
    AlreadyClaimed,
    /// Channel number outside the hardware channel range
    InvalidChannel,
}

impl core::fmt::Display for ChannelError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ChannelError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ChannelError::ResourceExhausted => "no free DMA channel",
            ChannelError::ClosedChannel => "channel closed",
            ChannelError::AlreadyClaimed => "channel already claimed",
            ChannelError::InvalidChannel => "invalid channel number",
        }
    }
}

// =============================================================================
// Field Errors
// =============================================================================

/// Control-word field access errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FieldError {
    /// The field is read-only (`busy`, `ahb_error`)
    ReadOnlyField,
    /// No field with that name exists
    UnknownField,
}

impl core::fmt::Display for FieldError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FieldError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            FieldError::ReadOnlyField => "field is read-only",
            FieldError::UnknownField => "no such control field",
        }
    }
}

// =============================================================================
// Value Errors
// =============================================================================

/// Register value conversion errors
///
/// All of these mean the supplied value has no valid representation for
/// the register it was aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ValueError {
    /// Value cannot be converted to an integer
    NotConvertible,
    /// A control word was given for an address or count register
    ControlWordNotAllowed,
    /// A buffer was given for the count or control register
    BufferNotAllowed,
    /// A read-only buffer was given as a write address
    ReadOnlyBuffer,
}

impl core::fmt::Display for ValueError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ValueError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ValueError::NotConvertible => "value can't be converted to integer",
            ValueError::ControlWordNotAllowed => "control word only allowed for ctrl",
            ValueError::BufferNotAllowed => "buffer only allowed for addresses",
            ValueError::ReadOnlyBuffer => "read-only buffer used as write address",
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// This enum wraps all domain-specific errors for unified error handling.
///
/// ```ignore
/// match channel.set_transfer_count(word) {
///     Err(Error::Channel(ChannelError::ClosedChannel)) => { /* ... */ }
///     Err(Error::Value(ValueError::ControlWordNotAllowed)) => { /* ... */ }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Channel error
    Channel(ChannelError),
    /// Field error
    Field(FieldError),
    /// Value error
    Value(ValueError),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Channel(e) => write!(f, "channel: {}", e.as_str()),
            Error::Field(e) => write!(f, "field: {}", e.as_str()),
            Error::Value(e) => write!(f, "value: {}", e.as_str()),
        }
    }
}

impl From<ChannelError> for Error {
    fn from(e: ChannelError) -> Self {
        Error::Channel(e)
    }
}

impl From<FieldError> for Error {
    fn from(e: FieldError) -> Self {
        Error::Field(e)
    }
}

impl From<ValueError> for Error {
    fn from(e: ValueError) -> Self {
        Error::Value(e)
    }
}

/// Result type alias for DMA operations
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for channel allocation
pub type ChannelResult<T> = core::result::Result<T, ChannelError>;

/// Result type alias for control-word field access
pub type FieldResult<T> = core::result::Result<T, FieldError>;

/// Result type alias for register value conversion
pub type ValueResult<T> = core::result::Result<T, ValueError>;

// =============================================================================
// Unit Tests
// =============================================================================
