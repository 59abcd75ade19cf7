//! Test harness for workbench sessions with event tracking.
//!
//! `WorkbenchHarness` wraps a `Workbench` and, after every action, checks:
//! - the shape invariant of the current tableau
//! - the pivot (if any) lies inside the grid
//! - history steps are `1..=n` with non-blank labels
//! - the revision advances by exactly one per applied action
//!
//! Use it to script sessions without any front end.

use std::cell::RefCell;
use std::rc::Rc;

use crate::events::{EventCollector, WorkbenchEvent};
use crate::tableau::Tableau;
use crate::workbench::{Action, Outcome, Workbench, WorkbenchState};

pub struct WorkbenchHarness {
    workbench: Workbench,
    events: Rc<RefCell<EventCollector>>,
}

impl WorkbenchHarness {
    pub fn new() -> Self {
        Self::with_workbench(Workbench::new())
    }

    pub fn with_template(template: Tableau) -> Self {
        Self::with_workbench(Workbench::with_template(template))
    }

    fn with_workbench(mut workbench: Workbench) -> Self {
        let events = Rc::new(RefCell::new(EventCollector::new()));
        let sink = Rc::clone(&events);
        workbench.set_event_callback(Box::new(move |event: &WorkbenchEvent| {
            sink.borrow_mut().push(event.clone());
        }));
        Self { workbench, events }
    }

    /// Apply one action and check every invariant afterwards.
    pub fn apply(&mut self, action: Action) -> Outcome {
        let before = self.workbench.revision();
        let events_before = self.events.borrow().len();
        let outcome = self.workbench.apply(action);

        let expected = match outcome {
            Outcome::Applied => before + 1,
            Outcome::Unchanged | Outcome::Rejected => before,
        };
        assert_eq!(self.workbench.revision(), expected, "revision after {:?}", outcome);

        let new_events = self.events.borrow().len() - events_before;
        match outcome {
            Outcome::Unchanged => assert_eq!(new_events, 0, "no-op emitted events"),
            Outcome::Applied | Outcome::Rejected => assert_eq!(new_events, 1),
        }

        check_invariants(self.workbench.state());
        outcome
    }

    pub fn apply_all(&mut self, actions: impl IntoIterator<Item = Action>) -> Vec<Outcome> {
        actions.into_iter().map(|a| self.apply(a)).collect()
    }

    pub fn state(&self) -> &WorkbenchState {
        self.workbench.state()
    }

    pub fn revision(&self) -> u64 {
        self.workbench.revision()
    }

    pub fn events(&self) -> std::cell::Ref<'_, EventCollector> {
        self.events.borrow()
    }
}

/// Panics if `state` breaks any workbench invariant.
pub fn check_invariants(state: &WorkbenchState) {
    let t = state.current();
    assert!(t.cols() >= 1 && t.rows() >= 1, "empty axis");
    assert_eq!(t.cells().len(), t.rows(), "row count");
    for (r, row) in t.cells().iter().enumerate() {
        assert_eq!(row.len(), t.cols(), "width of row {r}");
    }
    if let Some(p) = t.pivot() {
        assert!(p.in_bounds(t.rows(), t.cols()), "pivot {p} outside {}x{}", t.rows(), t.cols());
    }

    for (i, frozen) in state.history().iter().enumerate() {
        assert_eq!(frozen.step(), i + 1, "step of history entry {i}");
        assert!(frozen.col_vars().iter().all(|l| !l.trim().is_empty()));
        assert!(frozen.row_vars().iter().all(|l| !l.trim().is_empty()));
        assert_eq!(frozen.cells().len(), frozen.rows());
        assert!(frozen.cells().iter().all(|row| row.len() == frozen.cols()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::reconstruct_view_only;
    use tabstep_core::Pivot;

    #[test]
    fn test_end_to_end_scenario() {
        let mut h = WorkbenchHarness::new();
        assert_eq!(h.state().current().rows(), 3);
        assert_eq!(h.state().current().cols(), 3);

        h.apply(Action::AddColumn { label: Some("x3".into()) });
        assert_eq!((h.state().current().rows(), h.state().current().cols()), (3, 4));
        assert!((0..3).all(|r| h.state().current().cell(r, 3) == Some("")));

        h.apply(Action::RemoveRow { index: 0 });
        assert_eq!(h.state().current().row_vars(), ["c1", "c2"]);
        assert_eq!(h.state().current().cols(), 4);
    }

    #[test]
    fn test_advance_on_default_grid() {
        let mut h = WorkbenchHarness::new();
        h.apply(Action::Advance);

        let state = h.state();
        assert_eq!(state.history().len(), 1);
        assert_eq!(state.history()[0].step(), 1);
        assert_eq!(state.current(), &Tableau::create_initial());
        assert_eq!(h.events().frozen()[0].step, 1);
    }

    #[test]
    fn test_simplex_style_session() {
        let mut h = WorkbenchHarness::new();
        h.apply_all([
            Action::SetCell { row: 0, col: 0, text: "-3".into() },
            Action::SetCell { row: 0, col: 1, text: "-5".into() },
            Action::SetCell { row: 1, col: 0, text: "1".into() },
            Action::SetCell { row: 1, col: 2, text: "4".into() },
            Action::SetCell { row: 2, col: 1, text: "2".into() },
            Action::SetCell { row: 2, col: 2, text: "12".into() },
            Action::SetCell { row: 2, col: 2, text: "12a".into() },
            Action::TogglePivot { row: 2, col: 1 },
            Action::Advance,
            Action::SetRowVar { index: 2, text: "x2".into() },
            Action::SetCell { row: 2, col: 1, text: "1".into() },
            Action::SetCell { row: 2, col: 2, text: "6".into() },
            Action::SetCell { row: 0, col: 2, text: "30 / 1".into() },
            Action::Advance,
            Action::SelectHistoryStep { step: 1 },
        ]);

        let state = h.state();
        assert_eq!(state.history().len(), 2);
        assert_eq!(state.history()[0].pivot(), Some(Pivot::new(2, 1)));
        assert_eq!(state.history()[0].cells()[2][2], "12");
        assert_eq!(state.history()[1].row_vars(), ["z", "c1", "x2"]);
        assert_eq!(state.history()[1].pivot(), None);

        let previous = state.selected_previous().unwrap();
        assert_eq!(previous.step(), 1);
        assert_eq!(reconstruct_view_only(previous).cell(0, 1), Some("-5"));

        assert_eq!(h.events().rejected().len(), 1);
        assert_eq!(h.events().frozen().len(), 2);
        let revisions = h.events().revisions();
        assert!(revisions.windows(2).all(|w| w[1] == w[0] + 1));
    }

    #[test]
    fn test_structural_churn_keeps_pivot_in_grid() {
        let mut h = WorkbenchHarness::new();
        h.apply(Action::TogglePivot { row: 2, col: 2 });
        h.apply(Action::RemoveColumn { index: 0 });
        assert_eq!(h.state().current().pivot(), Some(Pivot::new(2, 1)));
        h.apply(Action::RemoveRow { index: 2 });
        assert_eq!(h.state().current().pivot(), None);

        for _ in 0..5 {
            h.apply(Action::RemoveColumn { index: 0 });
            h.apply(Action::RemoveRow { index: 0 });
        }
        assert_eq!(h.state().current().cols(), 1);
        assert_eq!(h.state().current().rows(), 1);
    }
}
