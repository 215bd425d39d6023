//! Shared DMA interrupt multiplexing.
//!
//! All twelve channels report completion through one processor
//! interrupt (`DMA_IRQ_0`). [`InterruptMultiplexer`] keeps a per-channel
//! binding table and demultiplexes the shared status register to the
//! bound handlers.
//!
//! # Protocol
//!
//! - Binding updates run with the physical line masked and inside a
//!   critical section, then the line is unmasked again.
//! - [`InterruptMultiplexer::on_interrupt`] snapshots the status register
//!   once and clears exactly the snapshot bits with a single
//!   write-1-to-clear, so an interrupt arriving mid-handler is never lost.
//! - An asserted channel with no binding has its interrupt disabled.
//! - Handlers run after the table borrow is released and may call back
//!   into the multiplexer.

use super::pool::ChannelId;
use crate::hal::{DmaHardware, IrqLine};
use crate::internal::constants::NUM_DMA_CHANNELS;
use crate::sync::CriticalSectionCell;

// =============================================================================
// Handler Types
// =============================================================================

/// Interrupt handler, called with the channel that fired
pub type Handler = fn(ChannelId);

/// Where a bound handler runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IrqContext {
    /// Directly inside [`InterruptMultiplexer::on_interrupt`]
    #[default]
    Hard,
    /// Deferred to the next [`InterruptMultiplexer::run_scheduled`]
    Soft,
}

/// Snapshot of one channel's binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BindingInfo {
    /// A handler is attached
    pub has_handler: bool,
    /// Execution context of the handler
    pub context: IrqContext,
    /// The channel has fired since the last bind or trigger change
    pub pending: bool,
}

#[derive(Clone, Copy)]
struct InterruptBinding {
    handler: Option<Handler>,
    context: IrqContext,
    pending: bool,
}

impl InterruptBinding {
    fn info(&self) -> BindingInfo {
        BindingInfo {
            has_handler: self.handler.is_some(),
            context: self.context,
            pending: self.pending,
        }
    }
}

struct BindingTable {
    bindings: [Option<InterruptBinding>; NUM_DMA_CHANNELS],
    /// Soft handlers waiting for `run_scheduled` (bit `n` = channel `n`)
    scheduled: u32,
}

impl BindingTable {
    const fn new() -> Self {
        Self {
            bindings: [None; NUM_DMA_CHANNELS],
            scheduled: 0,
        }
    }

    fn slot(&mut self, id: ChannelId) -> &mut Option<InterruptBinding> {
        &mut self.bindings[id.index() as usize]
    }

    fn get(&self, id: ChannelId) -> Option<&InterruptBinding> {
        self.bindings[id.index() as usize].as_ref()
    }
}

/// Handlers collected under the lock, called once it is released.
struct Dispatch([Option<Handler>; NUM_DMA_CHANNELS]);

impl Dispatch {
    const fn new() -> Self {
        Self([None; NUM_DMA_CHANNELS])
    }

    fn push(&mut self, id: ChannelId, handler: Handler) {
        self.0[id.index() as usize] = Some(handler);
    }

    /// Call every collected handler in channel order
    fn run(self) -> usize {
        let mut ran = 0;
        for (id, handler) in ChannelId::all().zip(self.0) {
            if let Some(handler) = handler {
                handler(id);
                ran += 1;
            }
        }
        ran
    }
}

// =============================================================================
// Interrupt Multiplexer
// =============================================================================

/// Per-channel handler table for the shared DMA interrupt line.
pub struct InterruptMultiplexer<L> {
    line: L,
    table: CriticalSectionCell<BindingTable>,
}

impl<L: IrqLine> InterruptMultiplexer<L> {
    /// Create a multiplexer with an empty table (const, suitable for statics)
    pub const fn new(line: L) -> Self {
        Self {
            line,
            table: CriticalSectionCell::new(BindingTable::new()),
        }
    }

    /// The physical interrupt line
    pub fn line(&self) -> &L {
        &self.line
    }

    /// Bind `handler` to channel `id`, replacing any previous binding.
    ///
    /// The pending flag is cleared. The channel's hardware interrupt is
    /// enabled only when `handler` is `Some`.
    pub fn bind<H: DmaHardware>(
        &self,
        hw: &H,
        id: ChannelId,
        handler: Option<Handler>,
        context: IrqContext,
    ) {
        self.line.disable();
        self.table.with(|table| {
            *table.slot(id) = Some(InterruptBinding {
                handler,
                context,
                pending: false,
            });
            table.scheduled &= !id.mask();
            hw.set_irq0_enabled(id, handler.is_some());
        });
        self.line.enable();

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "DMA channel {} irq bound (handler: {})",
            id.index(),
            handler.is_some()
        );
    }

    /// Disable channel `id`'s interrupt and drop its binding.
    pub fn unbind<H: DmaHardware>(&self, hw: &H, id: ChannelId) {
        let _was_bound = self.table.with(|table| {
            hw.set_irq0_enabled(id, false);
            table.scheduled &= !id.mask();
            table.slot(id).take().is_some()
        });

        #[cfg(feature = "defmt")]
        if _was_bound {
            defmt::debug!("DMA channel {} irq unbound", id.index());
        }
    }

    /// Re-arm (`true`) or mute (`false`) a bound channel's interrupt.
    ///
    /// Clears the pending flag. Returns `false` if the channel is not bound.
    /// Arming a binding without a handler leaves the interrupt disabled.
    pub fn set_trigger<H: DmaHardware>(&self, hw: &H, id: ChannelId, enabled: bool) -> bool {
        self.line.disable();
        let bound = self.table.with(|table| match table.slot(id) {
            Some(binding) => {
                binding.pending = false;
                hw.set_irq0_enabled(id, enabled && binding.handler.is_some());
                true
            }
            None => false,
        });
        self.line.enable();
        bound
    }

    /// Service the shared interrupt. Call this from the `DMA_IRQ_0` vector.
    ///
    /// Returns the status snapshot that was handled.
    ///
    /// Hard handlers are called after the binding table lock is released.
    /// On a dual-core system the other core can close a channel in that
    /// window, and its id can be claimed again before the handler runs. The
    /// handler then sees the new owner's id. Handlers that care should check
    /// their own state for the id they receive.
    pub fn on_interrupt<H: DmaHardware>(&self, hw: &H) -> u32 {
        let mut dispatch = Dispatch::new();

        let status = self.table.with(|table| {
            let status = hw.irq0_status();
            hw.clear_irq0_status(status);

            for id in ChannelId::all().filter(|id| status & id.mask() != 0) {
                match table.slot(id) {
                    Some(binding) => {
                        binding.pending = true;
                        match (binding.handler, binding.context) {
                            (Some(handler), IrqContext::Hard) => dispatch.push(id, handler),
                            (Some(_), IrqContext::Soft) => table.scheduled |= id.mask(),
                            (None, _) => {}
                        }
                    }
                    None => {
                        hw.set_irq0_enabled(id, false);

                        #[cfg(feature = "defmt")]
                        defmt::warn!(
                            "DMA channel {} raised an unbound interrupt, disabled",
                            id.index()
                        );
                    }
                }
            }
            status
        });

        dispatch.run();
        status
    }

    /// Run the soft handlers queued by [`on_interrupt`](Self::on_interrupt).
    ///
    /// Returns the number of handlers run.
    pub fn run_scheduled(&self) -> usize {
        let mut dispatch = Dispatch::new();
        self.table.with(|table| {
            let scheduled = core::mem::take(&mut table.scheduled);
            for id in ChannelId::all().filter(|id| scheduled & id.mask() != 0) {
                if let Some(handler) = table.get(id).and_then(|binding| binding.handler) {
                    dispatch.push(id, handler);
                }
            }
        });
        dispatch.run()
    }

    /// Whether channel `id` has fired since it was last bound or re-armed
    pub fn pending(&self, id: ChannelId) -> bool {
        self.table
            .with_ref(|table| table.get(id).is_some_and(|binding| binding.pending))
    }

    /// Raw status bit for channel `id`
    pub fn currently_asserted<H: DmaHardware>(&self, hw: &H, id: ChannelId) -> bool {
        hw.irq0_status() & id.mask() != 0
    }

    /// Channel `id`'s binding, if any
    pub fn binding(&self, id: ChannelId) -> Option<BindingInfo> {
        self.table
            .with_ref(|table| table.get(id).map(InterruptBinding::info))
    }

    /// Mask of channels with a soft handler waiting to run
    pub fn scheduled_mask(&self) -> u32 {
        self.table.with_ref(|table| table.scheduled)
    }

    /// Clear the whole table without touching the hardware
    pub fn reset(&self) {
        self.table.with(|table| *table = BindingTable::new());
    }

    /// Mask the line, disable every bound channel's interrupt and clear
    /// the table.
    pub fn shutdown<H: DmaHardware>(&self, hw: &H) {
        self.line.disable();
        self.table.with(|table| {
            for id in ChannelId::all() {
                if table.slot(id).take().is_some() {
                    hw.set_irq0_enabled(id, false);
                }
            }
            table.scheduled = 0;
        });

        #[cfg(feature = "defmt")]
        defmt::info!("DMA interrupt multiplexer shut down");
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    extern crate std;
    use std::vec;

    use super::*;
    use crate::testing::{LineEvent, MockDma, MockLine, recording_handler, take_handler_calls};

    fn ch(index: u8) -> ChannelId {
        ChannelId::new(index).unwrap()
    }

    fn setup() -> (MockDma, InterruptMultiplexer<MockLine>) {
        take_handler_calls();
        (MockDma::new(), InterruptMultiplexer::new(MockLine::new()))
    }

    #[test]
    fn bind_masks_line_around_update() {
        let (hw, mux) = setup();

        mux.bind(&hw, ch(2), Some(recording_handler), IrqContext::Hard);

        assert_eq!(
            mux.line().events(),
            vec![LineEvent::Disable, LineEvent::Enable]
        );
        assert!(mux.line().is_enabled());
        assert!(hw.irq0_enabled(ch(2)));
        assert_eq!(
            mux.binding(ch(2)),
            Some(BindingInfo {
                has_handler: true,
                context: IrqContext::Hard,
                pending: false,
            })
        );
    }

    #[test]
    fn bind_without_handler_leaves_interrupt_disabled() {
        let (hw, mux) = setup();

        mux.bind(&hw, ch(3), None, IrqContext::Hard);

        assert!(!hw.irq0_enabled(ch(3)));
        assert_eq!(mux.binding(ch(3)).map(|b| b.has_handler), Some(false));
    }

    #[test]
    fn assertion_invokes_only_bound_handler() {
        let (hw, mux) = setup();
        mux.bind(&hw, ch(1), Some(recording_handler), IrqContext::Hard);
        mux.bind(&hw, ch(4), Some(recording_handler), IrqContext::Hard);

        hw.raise(ch(1));
        let status = mux.on_interrupt(&hw);

        assert_eq!(status, ch(1).mask());
        assert_eq!(take_handler_calls(), vec![ch(1)]);
        assert!(mux.pending(ch(1)));
        assert!(!mux.pending(ch(4)));
    }

    #[test]
    fn status_cleared_with_exact_snapshot() {
        let (hw, mux) = setup();
        mux.bind(&hw, ch(0), Some(recording_handler), IrqContext::Hard);
        mux.bind(&hw, ch(7), Some(recording_handler), IrqContext::Hard);

        hw.raise(ch(0));
        hw.raise(ch(7));
        mux.on_interrupt(&hw);

        assert_eq!(hw.status_clears(), vec![ch(0).mask() | ch(7).mask()]);
        assert_eq!(hw.irq0_status(), 0);
        assert_eq!(take_handler_calls(), vec![ch(0), ch(7)]);
    }

    #[test]
    fn unbound_assertion_disables_channel_interrupt() {
        let (hw, mux) = setup();
        mux.bind(&hw, ch(5), Some(recording_handler), IrqContext::Hard);
        mux.unbind(&hw, ch(5));
        assert!(mux.binding(ch(5)).is_none());

        // Force the enable back on to watch the storm guard act
        hw.set_irq0_enabled(ch(5), true);
        hw.raise(ch(5));
        mux.on_interrupt(&hw);

        assert!(take_handler_calls().is_empty());
        assert!(!hw.irq0_enabled(ch(5)));
        assert!(!mux.pending(ch(5)));
    }

    #[test]
    fn rebind_replaces_handler_and_clears_pending() {
        fn other(_: ChannelId) {}

        let (hw, mux) = setup();
        mux.bind(&hw, ch(6), Some(recording_handler), IrqContext::Hard);
        hw.raise(ch(6));
        mux.on_interrupt(&hw);
        assert!(mux.pending(ch(6)));
        take_handler_calls();

        mux.bind(&hw, ch(6), Some(other), IrqContext::Hard);
        assert!(!mux.pending(ch(6)));

        hw.raise(ch(6));
        mux.on_interrupt(&hw);
        assert!(take_handler_calls().is_empty());
    }

    #[test]
    fn soft_handlers_deferred_to_run_scheduled() {
        let (hw, mux) = setup();
        mux.bind(&hw, ch(9), Some(recording_handler), IrqContext::Soft);

        hw.raise(ch(9));
        mux.on_interrupt(&hw);

        assert!(take_handler_calls().is_empty());
        assert!(mux.pending(ch(9)));
        assert_eq!(mux.scheduled_mask(), ch(9).mask());

        assert_eq!(mux.run_scheduled(), 1);
        assert_eq!(take_handler_calls(), vec![ch(9)]);
        assert_eq!(mux.run_scheduled(), 0);
    }

    #[test]
    fn unbind_drops_scheduled_soft_handler() {
        let (hw, mux) = setup();
        mux.bind(&hw, ch(9), Some(recording_handler), IrqContext::Soft);
        hw.raise(ch(9));
        mux.on_interrupt(&hw);

        mux.unbind(&hw, ch(9));

        assert_eq!(mux.run_scheduled(), 0);
        assert!(take_handler_calls().is_empty());
    }

    #[test]
    fn set_trigger_rearms_and_clears_pending() {
        let (hw, mux) = setup();
        mux.bind(&hw, ch(2), Some(recording_handler), IrqContext::Hard);
        hw.raise(ch(2));
        mux.on_interrupt(&hw);
        assert!(mux.pending(ch(2)));

        mux.line().clear_events();
        assert!(mux.set_trigger(&hw, ch(2), false));
        assert_eq!(
            mux.line().events(),
            vec![LineEvent::Disable, LineEvent::Enable]
        );
        assert!(!mux.pending(ch(2)));
        assert!(!hw.irq0_enabled(ch(2)));

        assert!(mux.set_trigger(&hw, ch(2), true));
        assert!(hw.irq0_enabled(ch(2)));

        assert!(!mux.set_trigger(&hw, ch(3), true));
        assert!(!hw.irq0_enabled(ch(3)));
    }

    #[test]
    fn currently_asserted_reads_raw_status() {
        let (hw, mux) = setup();
        assert!(!mux.currently_asserted(&hw, ch(8)));
        hw.raise(ch(8));
        assert!(mux.currently_asserted(&hw, ch(8)));
        assert!(!mux.currently_asserted(&hw, ch(0)));
    }

    #[test]
    fn shutdown_masks_line_and_clears_table() {
        let (hw, mux) = setup();
        mux.bind(&hw, ch(0), Some(recording_handler), IrqContext::Hard);
        mux.bind(&hw, ch(11), Some(recording_handler), IrqContext::Soft);

        mux.shutdown(&hw);

        assert!(!mux.line().is_enabled());
        assert!(!hw.irq0_enabled(ch(0)));
        assert!(!hw.irq0_enabled(ch(11)));
        assert!(ChannelId::all().all(|id| mux.binding(id).is_none()));
    }

    #[test]
    fn reset_clears_table() {
        let (hw, mux) = setup();
        mux.bind(&hw, ch(4), None, IrqContext::Soft);
        mux.reset();
        assert!(mux.binding(ch(4)).is_none());
    }
}
