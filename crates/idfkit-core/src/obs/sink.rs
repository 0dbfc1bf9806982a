//! Change-notification sink boundary.
//!
//! Record logic MUST NOT depend on obs::metrics directly.
//! All notifications flow through ChangeEvent and ChangeSink.
//!
//! This module is the only allowed bridge between record mutation
//! and the global metrics state.
use crate::{obs::metrics, types::Handle};
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn ChangeSink>>> = RefCell::new(None);
}

///
/// ChangeEvent
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ChangeEvent {
    /// The record's name field changed.
    NameChanged {
        handle: Handle,
        object_type: String,
        name: String,
    },

    /// Field data changed; `indices` lists every touched absolute index once.
    DataChanged {
        handle: Handle,
        object_type: String,
        indices: Vec<usize>,
    },

    /// Extensible groups were added, removed, or reordered.
    StructureChanged {
        handle: Handle,
        object_type: String,
        groups: usize,
    },

    /// A checked write was refused and the field left as it was.
    WriteRejected {
        handle: Handle,
        object_type: String,
        index: usize,
    },
}

impl ChangeEvent {
    #[must_use]
    pub const fn handle(&self) -> Handle {
        match self {
            Self::NameChanged { handle, .. }
            | Self::DataChanged { handle, .. }
            | Self::StructureChanged { handle, .. }
            | Self::WriteRejected { handle, .. } => *handle,
        }
    }

    #[must_use]
    pub fn object_type(&self) -> &str {
        match self {
            Self::NameChanged { object_type, .. }
            | Self::DataChanged { object_type, .. }
            | Self::StructureChanged { object_type, .. }
            | Self::WriteRejected { object_type, .. } => object_type,
        }
    }
}

///
/// ChangeSink
///

pub trait ChangeSink {
    fn record(&self, event: ChangeEvent);
}

/// GlobalChangeSink
/// Default sink that folds events into the thread-local counters.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalChangeSink;

impl ChangeSink for GlobalChangeSink {
    fn record(&self, event: ChangeEvent) {
        metrics::with_state_mut(|m| {
            let entry = m
                .object_types
                .entry(event.object_type().to_string())
                .or_default();

            match &event {
                ChangeEvent::NameChanged { .. } => {
                    m.ops.name_changes = m.ops.name_changes.saturating_add(1);
                    entry.name_changes = entry.name_changes.saturating_add(1);
                }
                ChangeEvent::DataChanged { indices, .. } => {
                    let touched = u64::try_from(indices.len()).unwrap_or(u64::MAX);

                    m.ops.data_changes = m.ops.data_changes.saturating_add(1);
                    m.ops.fields_touched = m.ops.fields_touched.saturating_add(touched);
                    entry.data_changes = entry.data_changes.saturating_add(1);
                    entry.fields_touched = entry.fields_touched.saturating_add(touched);
                }
                ChangeEvent::StructureChanged { .. } => {
                    m.ops.structure_changes = m.ops.structure_changes.saturating_add(1);
                    entry.structure_changes = entry.structure_changes.saturating_add(1);
                }
                ChangeEvent::WriteRejected { .. } => {
                    m.ops.rejected_writes = m.ops.rejected_writes.saturating_add(1);
                    entry.rejected_writes = entry.rejected_writes.saturating_add(1);
                }
            }
        });
    }
}

pub(crate) const GLOBAL_CHANGE_SINK: GlobalChangeSink = GlobalChangeSink;

pub(crate) fn record(event: ChangeEvent) {
    let sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());

    match sink {
        Some(sink) => sink.record(event),
        None => GLOBAL_CHANGE_SINK.record(event),
    }
}

/// Snapshot the current counters.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset all counters.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary change sink override.
/// The previous sink is restored on every exit, unwinding included.
pub fn with_change_sink<T>(sink: Rc<dyn ChangeSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn ChangeSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = prev;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}

///
/// CapturingSink
/// Collects events in order; used for scoped inspection.
///

#[derive(Debug, Default)]
pub struct CapturingSink {
    events: RefCell<Vec<ChangeEvent>>,
}

impl CapturingSink {
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Drain captured events.
    pub fn take(&self) -> Vec<ChangeEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl ChangeSink for CapturingSink {
    fn record(&self, event: ChangeEvent) {
        self.events.borrow_mut().push(event);
    }
}

///
/// TESTS
///
