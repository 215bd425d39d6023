//! DMA channel identifiers and the channel pool.
//!
//! [`ChannelPool`] hands out the fixed set of hardware channel ids. Claim
//! and release run inside a critical section, which on the RP2040 also
//! holds a hardware spinlock, so two cores racing for the last free
//! channel cannot both win it.

use super::error::{ChannelError, ChannelResult};
use crate::internal::constants::{ALL_CHANNELS_MASK, NUM_DMA_CHANNELS};
use crate::sync::CriticalSectionCell;

// =============================================================================
// Channel Id
// =============================================================================

/// Hardware DMA channel number, always `< NUM_DMA_CHANNELS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelId(u8);

impl ChannelId {
    /// Validate a raw channel number
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < NUM_DMA_CHANNELS {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Channel number
    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// This channel's bit in the shared status and enable registers
    #[inline]
    pub const fn mask(self) -> u32 {
        1 << self.0
    }

    /// Every channel id in ascending order
    pub fn all() -> impl Iterator<Item = ChannelId> {
        (0..NUM_DMA_CHANNELS as u8).map(ChannelId)
    }
}

impl TryFrom<u8> for ChannelId {
    type Error = ChannelError;

    fn try_from(index: u8) -> ChannelResult<Self> {
        Self::new(index).ok_or(ChannelError::InvalidChannel)
    }
}

impl From<ChannelId> for u8 {
    fn from(id: ChannelId) -> Self {
        id.0
    }
}

impl core::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Channel Pool
// =============================================================================

/// Fixed-size allocator of DMA channel ids.
///
/// # Example
///
/// ```ignore
/// static POOL: ChannelPool = ChannelPool::new();
///
/// let id = POOL.claim()?;
/// // ...
/// POOL.release(id);
/// ```
pub struct ChannelPool {
    /// Bit `n` set = channel `n` claimed
    claimed: CriticalSectionCell<u32>,
}

impl ChannelPool {
    /// Create a pool with every channel free (const, suitable for statics)
    pub const fn new() -> Self {
        Self {
            claimed: CriticalSectionCell::new(0),
        }
    }

    /// Claim the lowest-numbered free channel.
    pub fn claim(&self) -> ChannelResult<ChannelId> {
        let id = self.claimed.with(|claimed| {
            let free = !*claimed & ALL_CHANNELS_MASK;
            if free == 0 {
                return None;
            }
            let index = free.trailing_zeros() as u8;
            *claimed |= 1 << index;
            Some(ChannelId(index))
        });

        match id {
            Some(id) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("DMA channel {} claimed", id.index());
                Ok(id)
            }
            None => {
                #[cfg(feature = "defmt")]
                defmt::warn!("DMA channel pool exhausted");
                Err(ChannelError::ResourceExhausted)
            }
        }
    }

    /// Claim a specific channel.
    pub fn claim_channel(&self, id: ChannelId) -> ChannelResult<ChannelId> {
        self.claimed.with(|claimed| {
            if *claimed & id.mask() != 0 {
                return Err(ChannelError::AlreadyClaimed);
            }
            *claimed |= id.mask();
            Ok(id)
        })
    }

    /// Return a channel to the pool.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not currently claimed. That can only happen when a
    /// channel is released twice, which is a bug in the caller.
    pub fn release(&self, id: ChannelId) {
        let was_claimed = self.claimed.with(|claimed| {
            let was_claimed = *claimed & id.mask() != 0;
            *claimed &= !id.mask();
            was_claimed
        });

        assert!(was_claimed, "DMA channel {} released twice", id.index());

        #[cfg(feature = "defmt")]
        defmt::debug!("DMA channel {} released", id.index());
    }

    /// Whether `id` is currently claimed
    pub fn is_claimed(&self, id: ChannelId) -> bool {
        self.claimed.with_ref(|claimed| claimed & id.mask() != 0)
    }

    /// Number of free channels
    pub fn free_count(&self) -> usize {
        self.claimed
            .with_ref(|claimed| (!claimed & ALL_CHANNELS_MASK).count_ones() as usize)
    }

    /// Raw claimed mask (bit `n` = channel `n`)
    pub fn claimed_mask(&self) -> u32 {
        self.claimed.with_ref(|claimed| *claimed)
    }
}

impl Default for ChannelPool {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
