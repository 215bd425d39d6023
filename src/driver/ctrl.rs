//! DMA channel control word.
//!
//! The 32-bit `CHx_CTRL_TRIG` register is described by a static, ordered
//! table of named bit-fields ([`CTRL_FIELDS`]). [`ControlWord`] packs and
//! unpacks values against that table, either by name (for code that
//! works from strings) or through the typed [`Field`] enum.
//!
//! ```text
//!  31  30  29  28..25  24  23  22  21  20....15  14..11  10  9..6  5  4  3..2  1  0
//! ┌───┬───┬───┬──────┬───┬───┬───┬───┬─────────┬───────┬───┬─────┬──┬──┬────┬──┬──┐
//! │AHB│RD │WR │ rsvd │BSY│SNF│BSW│IRQ│ TREQ_SEL│CHAIN  │RS │RING │IW│IR│SIZE│HP│EN│
//! └───┴───┴───┴──────┴───┴───┴───┴───┴─────────┴───────┴───┴─────┴──┴──┴────┴──┴──┘
//! ```

use super::error::{FieldError, FieldResult};
use super::pool::ChannelId;
use crate::internal::constants::{
    CTRL_FIELD_COUNT, DEFAULT_CTRL_WORD, MAX_FIELD_WIDTH, TREQ_UNPACED,
};

// =============================================================================
// Field Table
// =============================================================================

/// One entry of the control-word field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FieldSpec {
    /// Field name
    pub name: &'static str,
    /// Bit offset of the least significant bit
    pub shift: u8,
    /// Width in bits (1..=8)
    pub width: u8,
    /// Hardware status bit; writes are rejected
    pub read_only: bool,
}

impl FieldSpec {
    const fn new(name: &'static str, shift: u8, width: u8, read_only: bool) -> Self {
        Self {
            name,
            shift,
            width,
            read_only,
        }
    }

    /// Mask of the field's value before shifting
    #[inline]
    pub const fn value_mask(&self) -> u32 {
        (1 << self.width) - 1
    }

    /// Mask of the field's bits within the word
    #[inline]
    pub const fn mask(&self) -> u32 {
        self.value_mask() << self.shift
    }

    /// Extract this field from a raw word
    #[inline]
    pub const fn extract(&self, word: u32) -> u32 {
        (word >> self.shift) & self.value_mask()
    }

    /// Merge `value` into `word`, truncating it to the field width
    #[inline]
    pub const fn insert(&self, word: u32, value: u32) -> u32 {
        (word & !self.mask()) | ((value << self.shift) & self.mask())
    }
}

const FIELD_TABLE: [FieldSpec; CTRL_FIELD_COUNT] = [
    FieldSpec::new("enable", 0, 1, false),
    FieldSpec::new("high_priority", 1, 1, false),
    FieldSpec::new("size", 2, 2, false),
    FieldSpec::new("inc_read", 4, 1, false),
    FieldSpec::new("inc_write", 5, 1, false),
    FieldSpec::new("ring_size", 6, 4, false),
    FieldSpec::new("ring_sel", 10, 1, false),
    FieldSpec::new("chain_to", 11, 4, false),
    FieldSpec::new("treq_sel", 15, 6, false),
    FieldSpec::new("IRQ_quiet", 21, 1, false),
    FieldSpec::new("bswap", 22, 1, false),
    FieldSpec::new("sniff_en", 23, 1, false),
    FieldSpec::new("busy", 24, 1, true),
    FieldSpec::new("write_error", 29, 1, false),
    FieldSpec::new("read_error", 30, 1, false),
    FieldSpec::new("ahb_error", 31, 1, true),
];

/// Control-word field table, in bit order.
///
/// Bits 25 through 28 are reserved and have no entry.
pub static CTRL_FIELDS: [FieldSpec; CTRL_FIELD_COUNT] = FIELD_TABLE;

/// Typed handle on a [`CTRL_FIELDS`] entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Field {
    /// Channel enable
    Enable = 0,
    /// Preferential arbitration
    HighPriority,
    /// Transfer data size, see [`TransferSize`]
    Size,
    /// Increment the read address after each transfer
    IncRead,
    /// Increment the write address after each transfer
    IncWrite,
    /// Address wrap size as a power of two (0 = off)
    RingSize,
    /// Apply the ring to the write address instead of the read address
    RingSel,
    /// Channel triggered on completion (self = no chaining)
    ChainTo,
    /// Transfer request signal (0x3f = unpaced)
    TreqSel,
    /// Suppress the completion interrupt
    IrqQuiet,
    /// Byte-swap data
    Bswap,
    /// Route data to the sniffer
    SniffEn,
    /// Transfer in progress (read-only)
    Busy,
    /// Write bus error (write 1 to clear)
    WriteError,
    /// Read bus error (write 1 to clear)
    ReadError,
    /// Logical OR of the error bits (read-only)
    AhbError,
}

impl Field {
    /// Every field, in table order
    pub const ALL: [Field; CTRL_FIELD_COUNT] = [
        Field::Enable,
        Field::HighPriority,
        Field::Size,
        Field::IncRead,
        Field::IncWrite,
        Field::RingSize,
        Field::RingSel,
        Field::ChainTo,
        Field::TreqSel,
        Field::IrqQuiet,
        Field::Bswap,
        Field::SniffEn,
        Field::Busy,
        Field::WriteError,
        Field::ReadError,
        Field::AhbError,
    ];

    /// Table entry for this field
    #[inline]
    pub fn spec(self) -> &'static FieldSpec {
        &CTRL_FIELDS[self as usize]
    }

    /// Look a field up by name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.spec().name == name)
    }

    /// Field name
    #[inline]
    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// Bit offset
    #[inline]
    pub fn shift(self) -> u8 {
        self.spec().shift
    }

    /// Width in bits
    #[inline]
    pub fn width(self) -> u8 {
        self.spec().width
    }

    /// Mask of the field's bits within the word
    #[inline]
    pub fn mask(self) -> u32 {
        self.spec().mask()
    }

    /// Whether writes to this field are rejected
    #[inline]
    pub fn is_read_only(self) -> bool {
        self.spec().read_only
    }
}

// =============================================================================
// Field Values
// =============================================================================

/// Transfer data size (`size` field)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum TransferSize {
    /// 8-bit transfers
    Byte = 0,
    /// 16-bit transfers
    HalfWord = 1,
    /// 32-bit transfers
    #[default]
    Word = 2,
}

impl TransferSize {
    /// Decode the `size` field; the reserved value 3 yields `None`
    pub const fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            0 => Some(TransferSize::Byte),
            1 => Some(TransferSize::HalfWord),
            2 => Some(TransferSize::Word),
            _ => None,
        }
    }

    /// Bytes moved per transfer
    pub const fn bytes(self) -> u32 {
        1 << (self as u32)
    }
}

/// Well-known `treq_sel` values
pub mod treq {
    /// Pace with timer 0
    pub const TIMER0: u8 = 0x3b;
    /// Pace with timer 1
    pub const TIMER1: u8 = 0x3c;
    /// Pace with timer 2
    pub const TIMER2: u8 = 0x3d;
    /// Pace with timer 3
    pub const TIMER3: u8 = 0x3e;
    /// No pacing
    pub const UNPACED: u8 = super::TREQ_UNPACED;
}

// =============================================================================
// Control Word
// =============================================================================

/// A DMA channel control word.
///
/// A plain `u32` underneath; conversion to and from raw register values is
/// lossless.
///
/// # Example
///
/// ```ignore
/// let ctrl = ControlWord::default_for(channel_id)
///     .with_size(TransferSize::Byte)
///     .with_inc_write(false)
///     .with_treq(treq::TIMER0);
///
/// assert_eq!(ctrl.get_field("size"), Ok(0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlWord(u32);

impl ControlWord {
    /// Baseline value, chaining to channel 0
    pub const BASELINE: Self = Self(DEFAULT_CTRL_WORD);

    /// Baseline control word for `channel`.
    ///
    /// `chain_to` is set to the channel itself, so an unconfigured channel
    /// never triggers another channel on completion.
    pub const fn default_for(channel: ChannelId) -> Self {
        Self(DEFAULT_CTRL_WORD | (((channel.index() as u32) & 0xf) << 11))
    }

    /// Wrap a raw register value
    #[inline]
    pub const fn from_integer(word: u32) -> Self {
        Self(word)
    }

    /// Raw register value
    #[inline]
    pub const fn as_integer(self) -> u32 {
        self.0
    }

    /// Build from an optional base word plus named field overrides.
    ///
    /// The baseline is used when `base` is `None`. Fails on the first
    /// unknown or read-only name.
    pub fn from_fields(base: Option<u32>, fields: &[(&str, u32)]) -> FieldResult<Self> {
        let mut word = Self(base.unwrap_or(DEFAULT_CTRL_WORD));
        for &(name, value) in fields {
            word.set_field(name, value)?;
        }
        Ok(word)
    }

    /// Read a field by name
    pub fn get_field(&self, name: &str) -> FieldResult<u32> {
        Field::from_name(name)
            .map(|f| self.field(f))
            .ok_or(FieldError::UnknownField)
    }

    /// Write a field by name.
    ///
    /// `value` is truncated to the field width. On error the word is left
    /// unchanged.
    pub fn set_field(&mut self, name: &str, value: u32) -> FieldResult<()> {
        let field = Field::from_name(name).ok_or(FieldError::UnknownField)?;
        self.set(field, value)
    }

    /// Read a typed field
    #[inline]
    pub fn field(&self, field: Field) -> u32 {
        field.spec().extract(self.0)
    }

    /// Write a typed field, truncating `value` to its width
    pub fn set(&mut self, field: Field, value: u32) -> FieldResult<()> {
        let spec = field.spec();
        if spec.read_only {
            return Err(FieldError::ReadOnlyField);
        }
        self.0 = spec.insert(self.0, value);
        Ok(())
    }

    /// Iterate `(spec, value)` over every field in table order
    pub fn fields(&self) -> impl Iterator<Item = (&'static FieldSpec, u32)> + '_ {
        CTRL_FIELDS
            .iter()
            .map(move |spec| (spec, spec.extract(self.0)))
    }

    // -------------------------------------------------------------------------
    // Builder helpers
    // -------------------------------------------------------------------------

    // Only writable fields have builders, so `set` cannot fail here.
    #[inline]
    fn with(mut self, field: Field, value: u32) -> Self {
        let spec = field.spec();
        self.0 = spec.insert(self.0, value);
        self
    }

    /// Set the channel enable bit
    #[must_use]
    pub fn with_enable(self, enable: bool) -> Self {
        self.with(Field::Enable, enable as u32)
    }

    /// Set the high priority bit
    #[must_use]
    pub fn with_high_priority(self, high: bool) -> Self {
        self.with(Field::HighPriority, high as u32)
    }

    /// Set the transfer size
    #[must_use]
    pub fn with_size(self, size: TransferSize) -> Self {
        self.with(Field::Size, size as u32)
    }

    /// Set read address increment
    #[must_use]
    pub fn with_inc_read(self, inc: bool) -> Self {
        self.with(Field::IncRead, inc as u32)
    }

    /// Set write address increment
    #[must_use]
    pub fn with_inc_write(self, inc: bool) -> Self {
        self.with(Field::IncWrite, inc as u32)
    }

    /// Set the address ring: `size_bits` = log2 of the ring size in bytes
    /// (0 disables), `on_write` selects the write address
    #[must_use]
    pub fn with_ring(self, size_bits: u8, on_write: bool) -> Self {
        self.with(Field::RingSize, size_bits as u32)
            .with(Field::RingSel, on_write as u32)
    }

    /// Chain to `channel` on completion
    #[must_use]
    pub fn with_chain_to(self, channel: ChannelId) -> Self {
        self.with(Field::ChainTo, channel.index() as u32)
    }

    /// Select the transfer request signal
    #[must_use]
    pub fn with_treq(self, treq: u8) -> Self {
        self.with(Field::TreqSel, treq as u32)
    }

    /// Set the quiet-IRQ bit
    #[must_use]
    pub fn with_irq_quiet(self, quiet: bool) -> Self {
        self.with(Field::IrqQuiet, quiet as u32)
    }

    // -------------------------------------------------------------------------
    // Typed getters
    // -------------------------------------------------------------------------

    /// Transfer size, `None` for the reserved encoding
    pub fn size(&self) -> Option<TransferSize> {
        TransferSize::from_bits(self.field(Field::Size))
    }

    /// Channel chained to on completion
    pub fn chain_to(&self) -> u8 {
        self.field(Field::ChainTo) as u8
    }

    /// Whether the busy status bit is set
    pub fn is_busy(&self) -> bool {
        self.field(Field::Busy) != 0
    }

    /// Whether the AHB error summary bit is set
    pub fn has_error(&self) -> bool {
        self.field(Field::AhbError) != 0
    }
}

impl From<u32> for ControlWord {
    fn from(word: u32) -> Self {
        Self(word)
    }
}

impl From<ControlWord> for u32 {
    fn from(word: ControlWord) -> Self {
        word.0
    }
}

impl core::fmt::Display for ControlWord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("ControlWord(")?;
        for (i, (spec, value)) in self.fields().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", spec.name, value)?;
        }
        f.write_str(")")
    }
}

// Table invariants, checked at compile time
const _: () = {
    let mut used = 0u32;
    let mut i = 0;
    while i < CTRL_FIELD_COUNT {
        let spec = &FIELD_TABLE[i];
        assert!(spec.width >= 1 && spec.width <= MAX_FIELD_WIDTH);
        assert!(spec.shift as u32 + spec.width as u32 <= 32);
        assert!(used & spec.mask() == 0);
        used |= spec.mask();
        i += 1;
    }
};

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    extern crate std;
    use std::format;

    use super::*;

    fn ch(n: u8) -> ChannelId {
        ChannelId::new(n).unwrap()
    }

    #[test]
    fn table_matches_field_enum_order() {
        for (i, field) in Field::ALL.into_iter().enumerate() {
            assert_eq!(field as usize, i);
            assert_eq!(field.spec(), &CTRL_FIELDS[i]);
            assert_eq!(Field::from_name(field.name()), Some(field));
        }
    }

    #[test]
    fn only_status_bits_are_read_only() {
        let read_only: std::vec::Vec<_> = Field::ALL
            .into_iter()
            .filter(|f| f.is_read_only())
            .collect();
        assert_eq!(read_only, [Field::Busy, Field::AhbError]);
    }

    #[test]
    fn reserved_bits_have_no_field() {
        let used = CTRL_FIELDS.iter().fold(0u32, |acc, s| acc | s.mask());
        assert_eq!(!used, 0xF << 25);
    }

    #[test]
    fn baseline_value() {
        let word = ControlWord::BASELINE;
        assert_eq!(word.field(Field::Enable), 1);
        assert_eq!(word.field(Field::HighPriority), 0);
        assert_eq!(word.size(), Some(TransferSize::Word));
        assert_eq!(word.field(Field::IncRead), 1);
        assert_eq!(word.field(Field::IncWrite), 1);
        assert_eq!(word.field(Field::TreqSel), treq::UNPACED as u32);
        assert_eq!(word.field(Field::IrqQuiet), 1);
        assert_eq!(word.chain_to(), 0);
        assert_eq!(word.as_integer(), 0x003F_8039);
    }

    #[test]
    fn irq_quiet_uses_table_name() {
        let mut word = ControlWord::BASELINE;
        assert_eq!(Field::from_name("IRQ_quiet"), Some(Field::IrqQuiet));
        assert_eq!(Field::IrqQuiet.name(), "IRQ_quiet");
        assert_eq!(word.get_field("IRQ_quiet"), Ok(1));

        word.set_field("IRQ_quiet", 0).unwrap();
        assert_eq!(word.field(Field::IrqQuiet), 0);
        assert_eq!(word.as_integer(), 0x001F_8039);
    }

    #[test]
    fn default_for_chains_to_itself() {
        assert_eq!(ControlWord::default_for(ch(3)).chain_to(), 3);
        assert_eq!(ControlWord::default_for(ch(3)).get_field("chain_to"), Ok(3));
        for n in 0..12 {
            let word = ControlWord::default_for(ch(n));
            assert_eq!(word.chain_to(), n);
            assert_eq!(
                word.as_integer() & !Field::ChainTo.mask(),
                DEFAULT_CTRL_WORD
            );
        }
    }

    #[test]
    fn set_then_get_round_trips_truncated_value() {
        for field in Field::ALL.into_iter().filter(|f| !f.is_read_only()) {
            let width = field.width() as u32;
            for value in [0u32, 1, (1 << width) - 1, 1 << width, 0xFFFF_FFFF, 0x1234_5678] {
                let mut word = ControlWord::from_integer(0);
                word.set_field(field.name(), value).unwrap();
                let expected = value & ((1 << width) - 1);
                let name = field.name();
                assert_eq!(word.get_field(name), Ok(expected), "{name}");
                assert_eq!(word.as_integer() & !field.mask(), 0, "{name} leaked");
            }
        }
    }

    #[test]
    fn set_field_preserves_other_bits() {
        let mut word = ControlWord::from_integer(0xFFFF_FFFF);
        word.set_field("treq_sel", 0).unwrap();
        assert_eq!(word.as_integer(), !Field::TreqSel.mask());
    }

    #[test]
    fn read_only_field_rejected_and_unchanged() {
        let mut word = ControlWord::BASELINE;
        assert_eq!(word.set_field("busy", 1), Err(FieldError::ReadOnlyField));
        assert_eq!(word.set(Field::AhbError, 1), Err(FieldError::ReadOnlyField));
        assert_eq!(word, ControlWord::BASELINE);
        assert_eq!(word.get_field("busy"), Ok(0));
    }

    #[test]
    fn unknown_field_rejected() {
        let mut word = ControlWord::BASELINE;
        assert_eq!(word.get_field("nope"), Err(FieldError::UnknownField));
        assert_eq!(word.set_field("nope", 1), Err(FieldError::UnknownField));
        // Names are case sensitive
        assert_eq!(word.get_field("irq_quiet"), Err(FieldError::UnknownField));
        assert_eq!(word.get_field("Enable"), Err(FieldError::UnknownField));
        assert_eq!(word, ControlWord::BASELINE);
    }

    #[test]
    fn status_bits_readable_from_raw() {
        let word = ControlWord::from_integer((1 << 24) | (1 << 31) | (1 << 30));
        assert!(word.is_busy());
        assert!(word.has_error());
        assert_eq!(word.get_field("read_error"), Ok(1));
        assert_eq!(word.get_field("write_error"), Ok(0));
    }

    #[test]
    fn from_fields_applies_overrides() {
        let word = ControlWord::from_fields(None, &[("size", 0), ("inc_write", 0)]).unwrap();
        assert_eq!(word.size(), Some(TransferSize::Byte));
        assert_eq!(word.field(Field::IncWrite), 0);
        assert_eq!(word.field(Field::Enable), 1);

        let word = ControlWord::from_fields(Some(0), &[("enable", 1)]).unwrap();
        assert_eq!(word.as_integer(), 1);

        assert_eq!(
            ControlWord::from_fields(None, &[("enable", 1), ("bogus", 1)]),
            Err(FieldError::UnknownField)
        );
        assert_eq!(
            ControlWord::from_fields(None, &[("busy", 1)]),
            Err(FieldError::ReadOnlyField)
        );
    }

    #[test]
    fn builders_set_expected_fields() {
        let word = ControlWord::default_for(ch(2))
            .with_size(TransferSize::HalfWord)
            .with_inc_read(false)
            .with_ring(4, true)
            .with_chain_to(ch(7))
            .with_treq(treq::TIMER1)
            .with_irq_quiet(false)
            .with_high_priority(true)
            .with_enable(false);

        assert_eq!(word.size(), Some(TransferSize::HalfWord));
        assert_eq!(word.field(Field::IncRead), 0);
        assert_eq!(word.field(Field::IncWrite), 1);
        assert_eq!(word.field(Field::RingSize), 4);
        assert_eq!(word.field(Field::RingSel), 1);
        assert_eq!(word.chain_to(), 7);
        assert_eq!(word.field(Field::TreqSel), 0x3c);
        assert_eq!(word.field(Field::IrqQuiet), 0);
        assert_eq!(word.field(Field::HighPriority), 1);
        assert_eq!(word.field(Field::Enable), 0);
    }

    #[test]
    fn transfer_size_decoding() {
        assert_eq!(TransferSize::from_bits(3), None);
        assert_eq!(TransferSize::Byte.bytes(), 1);
        assert_eq!(TransferSize::HalfWord.bytes(), 2);
        assert_eq!(TransferSize::Word.bytes(), 4);
        assert_eq!(ControlWord::from_integer(3 << 2).size(), None);
    }

    #[test]
    fn integer_round_trip() {
        for raw in [0u32, 1, 0xDEAD_BEEF, u32::MAX] {
            assert_eq!(ControlWord::from_integer(raw).as_integer(), raw);
            assert_eq!(u32::from(ControlWord::from(raw)), raw);
        }
    }

    #[test]
    fn display_lists_every_field() {
        let text = format!("{}", ControlWord::default_for(ch(5)));
        assert!(text.starts_with("ControlWord(enable=1, high_priority=0, size=2"));
        assert!(text.contains("chain_to=5"));
        assert!(text.contains("treq_sel=63"));
        assert!(text.ends_with("ahb_error=0)"));
        assert_eq!(text.matches('=').count(), CTRL_FIELD_COUNT);
    }
}
