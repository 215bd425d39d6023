//! Register value conversion.
//!
//! Every value headed for a channel register goes through
//! [`RegisterValue::convert`], which applies the same acceptance rules for
//! all four registers:
//!
//! | input              | read addr | write addr       | count | ctrl |
//! |--------------------|-----------|------------------|-------|------|
//! | integer            | yes       | yes              | yes   | yes  |
//! | read-only buffer   | address   | `ReadOnlyBuffer` | no    | no   |
//! | writable buffer    | address   | address          | no    | no   |
//! | [`ControlWord`]    | no        | no               | no    | yes  |
//! | [`ToRegister`]     | integer or `NotConvertible` for every register |
//!
//! Integers are reduced to their low 32 bits (two's complement), so
//! `-1` becomes `0xFFFF_FFFF`.

use embedded_dma::{ReadBuffer, WriteBuffer};

use super::ctrl::ControlWord;
use super::error::{ValueError, ValueResult};

// =============================================================================
// Register Kind
// =============================================================================

/// The four writable registers of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegisterKind {
    /// Source address
    ReadAddr,
    /// Destination address
    WriteAddr,
    /// Number of transfers
    TransferCount,
    /// Control word
    Ctrl,
}

impl RegisterKind {
    const fn accepts_address(self) -> bool {
        matches!(self, RegisterKind::ReadAddr | RegisterKind::WriteAddr)
    }
}

// =============================================================================
// Custom Conversion
// =============================================================================

/// Conversion hook for user types that stand for an integer register value.
///
/// Returning `None` rejects the value with [`ValueError::NotConvertible`].
pub trait ToRegister {
    /// Integer value of `self`, if it has one
    fn to_register(&self) -> Option<i128>;
}

// =============================================================================
// Register Value
// =============================================================================

/// A value supplied for a channel register.
#[derive(Clone, Copy)]
pub enum RegisterValue<'a> {
    /// Plain integer
    Int(i128),
    /// Base address of a buffer the DMA may only read
    ReadOnlyBuffer(u32),
    /// Base address of a buffer the DMA may write
    WritableBuffer(u32),
    /// Control word
    Control(ControlWord),
    /// User conversion
    Custom(&'a dyn ToRegister),
}

impl RegisterValue<'_> {
    /// Address of an `embedded-dma` read buffer.
    ///
    /// The buffer must stay valid for as long as the channel may access it.
    pub fn from_read_buffer<B: ReadBuffer>(buffer: &B) -> Self {
        // SAFETY: only the base pointer is captured, nothing is read through it
        let (ptr, _len) = unsafe { buffer.read_buffer() };
        RegisterValue::ReadOnlyBuffer(ptr as usize as u32)
    }

    /// Address of an `embedded-dma` write buffer.
    ///
    /// The buffer must stay valid for as long as the channel may access it.
    pub fn from_write_buffer<B: WriteBuffer>(buffer: &mut B) -> Self {
        // SAFETY: only the base pointer is captured, nothing is written through it
        let (ptr, _len) = unsafe { buffer.write_buffer() };
        RegisterValue::WritableBuffer(ptr as usize as u32)
    }

    /// Convert to the 32-bit value for register `kind`.
    pub fn convert(&self, kind: RegisterKind) -> ValueResult<u32> {
        match *self {
            RegisterValue::Int(value) => Ok(truncate(value)),
            RegisterValue::ReadOnlyBuffer(addr) => match kind {
                RegisterKind::ReadAddr => Ok(addr),
                RegisterKind::WriteAddr => Err(ValueError::ReadOnlyBuffer),
                RegisterKind::TransferCount | RegisterKind::Ctrl => {
                    Err(ValueError::BufferNotAllowed)
                }
            },
            RegisterValue::WritableBuffer(addr) if kind.accepts_address() => Ok(addr),
            RegisterValue::WritableBuffer(_) => Err(ValueError::BufferNotAllowed),
            RegisterValue::Control(word) if kind == RegisterKind::Ctrl => Ok(word.as_integer()),
            RegisterValue::Control(_) => Err(ValueError::ControlWordNotAllowed),
            RegisterValue::Custom(value) => value
                .to_register()
                .map(truncate)
                .ok_or(ValueError::NotConvertible),
        }
    }
}

/// Low 32 bits of `value`
#[inline]
const fn truncate(value: i128) -> u32 {
    value as u32
}

impl core::fmt::Debug for RegisterValue<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RegisterValue::Int(v) => f.debug_tuple("Int").field(v).finish(),
            RegisterValue::ReadOnlyBuffer(a) => write!(f, "ReadOnlyBuffer({a:#010x})"),
            RegisterValue::WritableBuffer(a) => write!(f, "WritableBuffer({a:#010x})"),
            RegisterValue::Control(w) => f.debug_tuple("Control").field(w).finish(),
            RegisterValue::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for RegisterValue<'_> {
                fn from(value: $t) -> Self {
                    RegisterValue::Int(value as i128)
                }
            }
        )*
    };
}

impl_from_int!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

impl<T> From<&[T]> for RegisterValue<'_> {
    fn from(buffer: &[T]) -> Self {
        RegisterValue::ReadOnlyBuffer(buffer.as_ptr() as usize as u32)
    }
}

impl<T, const N: usize> From<&[T; N]> for RegisterValue<'_> {
    fn from(buffer: &[T; N]) -> Self {
        RegisterValue::ReadOnlyBuffer(buffer.as_ptr() as usize as u32)
    }
}

impl<T> From<&mut [T]> for RegisterValue<'_> {
    fn from(buffer: &mut [T]) -> Self {
        RegisterValue::WritableBuffer(buffer.as_mut_ptr() as usize as u32)
    }
}

impl<T, const N: usize> From<&mut [T; N]> for RegisterValue<'_> {
    fn from(buffer: &mut [T; N]) -> Self {
        RegisterValue::WritableBuffer(buffer.as_mut_ptr() as usize as u32)
    }
}

impl From<ControlWord> for RegisterValue<'_> {
    fn from(word: ControlWord) -> Self {
        RegisterValue::Control(word)
    }
}

impl<'a> From<&'a dyn ToRegister> for RegisterValue<'a> {
    fn from(value: &'a dyn ToRegister) -> Self {
        RegisterValue::Custom(value)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
