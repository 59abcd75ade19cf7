//! Event types for workbench change notifications.
//!
//! A front end subscribes to these instead of diffing state after every
//! action. The test harness also uses them to check that revisions advance
//! exactly once per accepted action.

use tabstep_core::Pivot;

use crate::snapshot::SnapshotId;

/// Events emitted by `Workbench::apply`.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkbenchEvent {
    /// The current tableau was replaced by an edit.
    CurrentChanged(CurrentChangedEvent),

    /// The current tableau was frozen into history.
    StepFrozen(StepFrozenEvent),

    /// A different history step is shown as "previous".
    PreviousSelected { revision: u64, step: usize },

    /// A cell draft failed the draft grammar and was dropped.
    DraftRejected(DraftRejectedEvent),

    /// Everything was discarded and the session restarted.
    Reset { revision: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentChangedEvent {
    /// Revision that produced this tableau.
    pub revision: u64,
    pub rows: usize,
    pub cols: usize,
    pub pivot: Option<Pivot>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepFrozenEvent {
    pub revision: u64,
    pub step: usize,
    pub id: SnapshotId,
}

/// Rejected edits do not advance the revision.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftRejectedEvent {
    pub row: usize,
    pub col: usize,
    pub text: String,
}

/// Callback type for receiving workbench events.
pub type EventCallback = Box<dyn FnMut(&WorkbenchEvent)>;

/// Simple event collector for testing.
#[derive(Debug, Default)]
pub struct EventCollector {
    events: Vec<WorkbenchEvent>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: WorkbenchEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[WorkbenchEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Filter to only StepFrozen events.
    pub fn frozen(&self) -> Vec<&StepFrozenEvent> {
        self.events
            .iter()
            .filter_map(|e| match e {
                WorkbenchEvent::StepFrozen(f) => Some(f),
                _ => None,
            })
            .collect()
    }

    /// Filter to only DraftRejected events.
    pub fn rejected(&self) -> Vec<&DraftRejectedEvent> {
        self.events
            .iter()
            .filter_map(|e| match e {
                WorkbenchEvent::DraftRejected(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    /// Revisions in emission order, skipping events that carry none.
    pub fn revisions(&self) -> Vec<u64> {
        self.events
            .iter()
            .filter_map(|e| match e {
                WorkbenchEvent::CurrentChanged(c) => Some(c.revision),
                WorkbenchEvent::StepFrozen(f) => Some(f.revision),
                WorkbenchEvent::PreviousSelected { revision, .. } => Some(*revision),
                WorkbenchEvent::Reset { revision } => Some(*revision),
                WorkbenchEvent::DraftRejected(_) => None,
            })
            .collect()
    }
}
