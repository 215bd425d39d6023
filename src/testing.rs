//! Testing utilities and mock implementations
//!
//! Mock DMA block and interrupt line for exercising the driver on the host
//! without hardware access.
//!
//! Only available when running `cargo test`.

// Note: The #[cfg(test)] attribute is applied in lib.rs where this module is declared
#![allow(missing_docs)]
#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

extern crate std;

use core::cell::RefCell;
use std::thread_local;
use std::vec::Vec;

use crate::driver::pool::ChannelId;
use crate::driver::value::RegisterKind;
use crate::hal::{DmaHardware, IrqLine};
use crate::internal::constants::NUM_DMA_CHANNELS;

// =============================================================================
// Mock DMA Block
// =============================================================================

/// One recorded register write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterWrite {
    pub channel: ChannelId,
    pub register: RegisterKind,
    pub value: u32,
    pub trigger: bool,
}

#[derive(Debug, Default, Clone, Copy)]
struct MockChannel {
    read_addr: u32,
    write_addr: u32,
    transfer_count: u32,
    ctrl: u32,
    busy: bool,
}

#[derive(Debug, Default)]
struct MockState {
    channels: [MockChannel; NUM_DMA_CHANNELS],
    irq0_enable: u32,
    irq0_status: u32,
    writes: Vec<RegisterWrite>,
    starts: Vec<ChannelId>,
    aborts: Vec<ChannelId>,
    status_clears: Vec<u32>,
}

/// Mock DMA block
///
/// Stores register contents, records every register write with its
/// trigger flag, and lets tests raise channel interrupts.
///
/// A triggered write or a start marks the channel busy. An abort clears
/// it.
///
/// # Example
///
/// ```ignore
/// let hw = MockDma::new();
/// hw.raise(ChannelId::new(2).unwrap());
/// mux.on_interrupt(&hw);
/// assert_eq!(hw.status_clears(), vec![1 << 2]);
/// ```
#[derive(Debug, Default)]
pub struct MockDma {
    state: RefCell<MockState>,
}

impl MockDma {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assert channel `ch`'s status bit, as a finished transfer would
    pub fn raise(&self, ch: ChannelId) {
        self.state.borrow_mut().irq0_status |= ch.mask();
    }

    /// Force the busy flag of a channel
    pub fn set_busy(&self, ch: ChannelId, busy: bool) {
        self.state.borrow_mut().channels[ch.index() as usize].busy = busy;
    }

    /// Whether channel `ch` contributes to interrupt line 0
    pub fn irq0_enabled(&self, ch: ChannelId) -> bool {
        self.state.borrow().irq0_enable & ch.mask() != 0
    }

    /// Every register write so far, oldest first
    pub fn writes(&self) -> Vec<RegisterWrite> {
        self.state.borrow().writes.clone()
    }

    /// Register writes for one channel
    pub fn writes_for(&self, ch: ChannelId) -> Vec<RegisterWrite> {
        self.state
            .borrow()
            .writes
            .iter()
            .filter(|w| w.channel == ch)
            .copied()
            .collect()
    }

    /// Clear the write log
    pub fn clear_writes(&self) {
        self.state.borrow_mut().writes.clear();
    }

    /// Channels started through `start`
    pub fn starts(&self) -> Vec<ChannelId> {
        self.state.borrow().starts.clone()
    }

    /// Channels aborted through `abort`
    pub fn aborts(&self) -> Vec<ChannelId> {
        self.state.borrow().aborts.clone()
    }

    /// Masks written to the status register
    pub fn status_clears(&self) -> Vec<u32> {
        self.state.borrow().status_clears.clone()
    }

    fn record(&self, ch: ChannelId, register: RegisterKind, value: u32, trigger: bool) {
        let mut state = self.state.borrow_mut();
        let channel = &mut state.channels[ch.index() as usize];
        match register {
            RegisterKind::ReadAddr => channel.read_addr = value,
            RegisterKind::WriteAddr => channel.write_addr = value,
            RegisterKind::TransferCount => channel.transfer_count = value,
            RegisterKind::Ctrl => channel.ctrl = value,
        }
        if trigger {
            channel.busy = true;
        }
        state.writes.push(RegisterWrite {
            channel: ch,
            register,
            value,
            trigger,
        });
    }

    fn channel(&self, ch: ChannelId) -> MockChannel {
        self.state.borrow().channels[ch.index() as usize]
    }
}

impl DmaHardware for MockDma {
    fn read_addr(&self, ch: ChannelId) -> u32 {
        self.channel(ch).read_addr
    }

    fn write_addr(&self, ch: ChannelId) -> u32 {
        self.channel(ch).write_addr
    }

    fn transfer_count(&self, ch: ChannelId) -> u32 {
        self.channel(ch).transfer_count
    }

    fn ctrl(&self, ch: ChannelId) -> u32 {
        self.channel(ch).ctrl
    }

    fn set_read_addr(&self, ch: ChannelId, addr: u32, trigger: bool) {
        self.record(ch, RegisterKind::ReadAddr, addr, trigger);
    }

    fn set_write_addr(&self, ch: ChannelId, addr: u32, trigger: bool) {
        self.record(ch, RegisterKind::WriteAddr, addr, trigger);
    }

    fn set_transfer_count(&self, ch: ChannelId, count: u32, trigger: bool) {
        self.record(ch, RegisterKind::TransferCount, count, trigger);
    }

    fn set_ctrl(&self, ch: ChannelId, ctrl: u32, trigger: bool) {
        self.record(ch, RegisterKind::Ctrl, ctrl, trigger);
    }

    fn is_busy(&self, ch: ChannelId) -> bool {
        self.channel(ch).busy
    }

    fn start(&self, ch: ChannelId) {
        let mut state = self.state.borrow_mut();
        state.channels[ch.index() as usize].busy = true;
        state.starts.push(ch);
    }

    fn abort(&self, ch: ChannelId) {
        let mut state = self.state.borrow_mut();
        state.channels[ch.index() as usize].busy = false;
        state.aborts.push(ch);
    }

    fn set_irq0_enabled(&self, ch: ChannelId, enabled: bool) {
        let mut state = self.state.borrow_mut();
        if enabled {
            state.irq0_enable |= ch.mask();
        } else {
            state.irq0_enable &= !ch.mask();
        }
    }

    fn irq0_status(&self) -> u32 {
        self.state.borrow().irq0_status
    }

    fn clear_irq0_status(&self, mask: u32) {
        let mut state = self.state.borrow_mut();
        state.irq0_status &= !mask;
        state.status_clears.push(mask);
    }
}

// =============================================================================
// Mock Interrupt Line
// =============================================================================

/// Recorded interrupt line operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEvent {
    Enable,
    Disable,
}

/// Mock processor interrupt line
#[derive(Debug, Default)]
pub struct MockLine {
    enabled: RefCell<bool>,
    events: RefCell<Vec<LineEvent>>,
}

impl MockLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every enable and disable so far, oldest first
    pub fn events(&self) -> Vec<LineEvent> {
        self.events.borrow().clone()
    }

    /// Clear the event log
    pub fn clear_events(&self) {
        self.events.borrow_mut().clear();
    }
}

impl IrqLine for MockLine {
    fn enable(&self) {
        *self.enabled.borrow_mut() = true;
        self.events.borrow_mut().push(LineEvent::Enable);
    }

    fn disable(&self) {
        *self.enabled.borrow_mut() = false;
        self.events.borrow_mut().push(LineEvent::Disable);
    }

    fn is_enabled(&self) -> bool {
        *self.enabled.borrow()
    }
}

// =============================================================================
// Handler Recording
// =============================================================================

thread_local! {
    static HANDLER_CALLS: RefCell<Vec<ChannelId>> = const { RefCell::new(Vec::new()) };
}

/// Interrupt handler that records the channel it was called for.
///
/// The log is per test thread, so parallel tests do not see each other's
/// calls.
pub fn recording_handler(ch: ChannelId) {
    HANDLER_CALLS.with(|calls| calls.borrow_mut().push(ch));
}

/// Drain the calls recorded by [`recording_handler`] on this thread
pub fn take_handler_calls() -> Vec<ChannelId> {
    HANDLER_CALLS.with(|calls| core::mem::take(&mut *calls.borrow_mut()))
}
