use serde::{Deserialize, Serialize};
use std::{
    cell::RefCell,
    collections::BTreeMap,
    time::{SystemTime, UNIX_EPOCH},
};

///
/// EventState
/// Ephemeral, in-memory change counters.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub object_types: BTreeMap<String, TypeCounters>,
    pub since_ms: u64,
}

impl Default for EventState {
    fn default() -> Self {
        Self {
            ops: EventOps::default(),
            object_types: BTreeMap::new(),
            since_ms: now_millis(),
        }
    }
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventOps {
    pub name_changes: u64,
    pub data_changes: u64,
    pub fields_touched: u64,
    pub structure_changes: u64,
    pub rejected_writes: u64,
}

///
/// TypeCounters
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct TypeCounters {
    pub name_changes: u64,
    pub data_changes: u64,
    pub fields_touched: u64,
    pub structure_changes: u64,
    pub rejected_writes: u64,
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
        })
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

///
/// EventReport
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventReport {
    pub counters: EventState,
    pub object_types: Vec<TypeSummary>,
}

///
/// TypeSummary
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct TypeSummary {
    pub object_type: String,
    pub name_changes: u64,
    pub data_changes: u64,
    pub fields_touched: u64,
    pub structure_changes: u64,
    pub rejected_writes: u64,
    pub avg_fields_per_change: f64,
}

/// Build a report from the in-memory counters, busiest types first.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub(crate) fn report() -> EventReport {
    let snap = with_state(Clone::clone);

    let mut object_types: Vec<TypeSummary> = snap
        .object_types
        .iter()
        .map(|(object_type, c)| TypeSummary {
            object_type: object_type.clone(),
            name_changes: c.name_changes,
            data_changes: c.data_changes,
            fields_touched: c.fields_touched,
            structure_changes: c.structure_changes,
            rejected_writes: c.rejected_writes,
            avg_fields_per_change: if c.data_changes > 0 {
                c.fields_touched as f64 / c.data_changes as f64
            } else {
                0.0
            },
        })
        .collect();

    object_types.sort_by(|a, b| {
        b.data_changes
            .cmp(&a.data_changes)
            .then_with(|| a.object_type.cmp(&b.object_type))
    });

    EventReport {
        counters: snap,
        object_types,
    }
}
