//! Transfer configuration for [`Channel::configure`](super::channel::Channel::configure).

use super::value::RegisterValue;

/// Register values to load into a channel, plus an optional start.
///
/// Every register is optional. Unset registers keep their current
/// contents.
///
/// # Example
///
/// ```ignore
/// let config = TransferConfig::new()
///     .with_read(&SOURCE)
///     .with_write(&mut dest)
///     .with_count(SOURCE.len())
///     .with_ctrl(channel.default_ctrl_word()?)
///     .with_trigger(true);
///
/// channel.configure(config)?;
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TransferConfig<'a> {
    /// Source address
    pub read: Option<RegisterValue<'a>>,
    /// Destination address
    pub write: Option<RegisterValue<'a>>,
    /// Transfer count
    pub count: Option<RegisterValue<'a>>,
    /// Control word
    pub ctrl: Option<RegisterValue<'a>>,
    /// Start the channel once the registers are loaded
    pub trigger: bool,
}

impl<'a> TransferConfig<'a> {
    /// Empty configuration: nothing written, no trigger
    pub const fn new() -> Self {
        Self {
            read: None,
            write: None,
            count: None,
            ctrl: None,
            trigger: false,
        }
    }

    /// Set the read address
    #[must_use]
    pub fn with_read(mut self, value: impl Into<RegisterValue<'a>>) -> Self {
        self.read = Some(value.into());
        self
    }

    /// Set the write address
    #[must_use]
    pub fn with_write(mut self, value: impl Into<RegisterValue<'a>>) -> Self {
        self.write = Some(value.into());
        self
    }

    /// Set the transfer count
    #[must_use]
    pub fn with_count(mut self, value: impl Into<RegisterValue<'a>>) -> Self {
        self.count = Some(value.into());
        self
    }

    /// Set the control word
    #[must_use]
    pub fn with_ctrl(mut self, value: impl Into<RegisterValue<'a>>) -> Self {
        self.ctrl = Some(value.into());
        self
    }

    /// Start the channel after loading
    #[must_use]
    pub const fn with_trigger(mut self, trigger: bool) -> Self {
        self.trigger = trigger;
        self
    }

    /// Whether no register is set and no trigger is requested
    pub const fn is_empty(&self) -> bool {
        self.read.is_none()
            && self.write.is_none()
            && self.count.is_none()
            && self.ctrl.is_none()
            && !self.trigger
    }
}
