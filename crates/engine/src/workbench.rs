//! Workbench session: the current tableau, the frozen history, and which
//! history step is shown as "previous".
//!
//! `WorkbenchState` transitions are pure: each takes `&self` and returns the
//! next state. `Workbench` owns one state, applies user `Action`s to it,
//! replaces it wholesale on every accepted action, and reports what happened
//! through `WorkbenchEvent`s.
//!
//! History is append-only. Only `advance` grows it, and step numbers are
//! always `1..=history.len()` in order.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tabstep_core::{is_valid_draft, Pivot};

use crate::error::ShapeError;
use crate::events::{
    CurrentChangedEvent, DraftRejectedEvent, EventCallback, StepFrozenEvent, WorkbenchEvent,
};
use crate::snapshot::{freeze, reconstruct_empty_like, FrozenTableau};
use crate::tableau::Tableau;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWorkbenchState")]
pub struct WorkbenchState {
    current: Tableau,
    history: Vec<FrozenTableau>,
    previous_step: Option<usize>,
}

#[derive(Deserialize)]
struct RawWorkbenchState {
    current: Tableau,
    #[serde(default)]
    history: Vec<FrozenTableau>,
    #[serde(default)]
    previous_step: Option<usize>,
}

impl TryFrom<RawWorkbenchState> for WorkbenchState {
    type Error = ShapeError;

    fn try_from(raw: RawWorkbenchState) -> Result<Self, Self::Error> {
        let mut seen = HashSet::with_capacity(raw.history.len());
        for (index, frozen) in raw.history.iter().enumerate() {
            if frozen.step() != index + 1 {
                return Err(ShapeError::StepSequence {
                    index,
                    expected: index + 1,
                    found: frozen.step(),
                });
            }
            if !seen.insert(frozen.id()) {
                return Err(ShapeError::DuplicateSnapshot {
                    index,
                    id: frozen.id().to_string(),
                });
            }
        }
        Ok(Self {
            current: raw.current,
            history: raw.history,
            previous_step: raw.previous_step,
        })
    }
}

/// One entry of the history gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepSummary {
    pub step: usize,
    pub rows: usize,
    pub cols: usize,
    /// This step is the one resolved as "previous".
    pub selected: bool,
}

impl Default for WorkbenchState {
    fn default() -> Self {
        Self::initial()
    }
}

impl WorkbenchState {
    /// Fresh session on the starter tableau.
    pub fn initial() -> Self {
        Self::with_current(Tableau::create_initial())
    }

    /// Fresh session on a caller-chosen starter tableau.
    pub fn with_current(current: Tableau) -> Self {
        Self { current, history: Vec::new(), previous_step: None }
    }

    pub fn current(&self) -> &Tableau {
        &self.current
    }

    pub fn history(&self) -> &[FrozenTableau] {
        &self.history
    }

    pub fn previous_step(&self) -> Option<usize> {
        self.previous_step
    }

    /// True until the first `advance`.
    pub fn is_initial_step(&self) -> bool {
        self.history.is_empty()
    }

    pub fn find_step(&self, step: usize) -> Option<&FrozenTableau> {
        self.history.iter().find(|f| f.step() == step)
    }

    /// The frozen step shown as read-only context. Unknown or unset steps
    /// resolve to the latest one; `None` only while history is empty.
    pub fn selected_previous(&self) -> Option<&FrozenTableau> {
        self.previous_step
            .and_then(|step| self.find_step(step))
            .or_else(|| self.history.last())
    }

    /// Summaries for the step gallery.
    pub fn history_gallery(&self, newest_first: bool) -> Vec<StepSummary> {
        let selected = self.selected_previous().map(|f| f.step());
        let mut gallery: Vec<StepSummary> = self
            .history
            .iter()
            .map(|f| StepSummary {
                step: f.step(),
                rows: f.rows(),
                cols: f.cols(),
                selected: Some(f.step()) == selected,
            })
            .collect();
        if newest_first {
            gallery.reverse();
        }
        gallery
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Apply a tableau edit to `current`. History is never touched.
    #[must_use]
    pub fn edit_current(&self, edit: impl FnOnce(&Tableau) -> Tableau) -> Self {
        Self {
            current: edit(&self.current),
            history: self.history.clone(),
            previous_step: self.previous_step,
        }
    }

    /// Freeze `current` as the next step and start an empty grid with the
    /// same labels.
    #[must_use]
    pub fn advance(&self) -> Self {
        let step = self.history.len() + 1;
        let frozen = freeze(&self.current, step);
        let current = reconstruct_empty_like(&frozen);

        let mut history = self.history.clone();
        history.push(frozen);

        Self { current, history, previous_step: Some(step) }
    }

    /// Show `step` as previous. Nothing else changes.
    #[must_use]
    pub fn select_history_step(&self, step: usize) -> Self {
        Self { previous_step: Some(step), ..self.clone() }
    }

    /// Discard everything and start over from `initial()`, the built-in
    /// starter grid. A `Workbench` built with a custom template resets to
    /// that template instead; see `Action::Reset`.
    #[must_use]
    pub fn reset(&self) -> Self {
        Self::initial()
    }
}

// ============================================================================
// Session owner
// ============================================================================

/// A user action against the workbench. Indices are 0-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Blank or missing labels fall back to `Tableau::column_hint`.
    AddColumn { label: Option<String> },
    RemoveColumn { index: usize },
    /// Blank or missing labels fall back to `Tableau::row_hint`.
    AddRow { label: Option<String> },
    RemoveRow { index: usize },
    SetColVar { index: usize, text: String },
    SetRowVar { index: usize, text: String },
    /// Gated by the draft grammar.
    SetCell { row: usize, col: usize, text: String },
    TogglePivot { row: usize, col: usize },
    ClearPivot,
    Advance,
    SelectHistoryStep { step: usize },
    Reset,
}

/// What `Workbench::apply` did with an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// State replaced, revision bumped.
    Applied,
    /// The action was a no-op (floor, out of range, same value).
    Unchanged,
    /// The cell draft failed the grammar; the cell kept its old text.
    Rejected,
}

pub struct Workbench {
    state: WorkbenchState,
    /// What `Reset` returns to.
    template: Tableau,
    revision: u64,
    on_event: Option<EventCallback>,
}

impl Default for Workbench {
    fn default() -> Self {
        Self::new()
    }
}

impl Workbench {
    pub fn new() -> Self {
        Self::with_template(Tableau::create_initial())
    }

    /// Start (and reset) on `template` instead of the built-in starter grid.
    pub fn with_template(template: Tableau) -> Self {
        Self {
            state: WorkbenchState::with_current(template.clone()),
            template,
            revision: 0,
            on_event: None,
        }
    }

    /// Resume a saved session.
    pub fn resume(state: WorkbenchState, template: Tableau) -> Self {
        Self { state, template, revision: 0, on_event: None }
    }

    pub fn set_event_callback(&mut self, callback: EventCallback) {
        self.on_event = Some(callback);
    }

    pub fn state(&self) -> &WorkbenchState {
        &self.state
    }

    pub fn into_state(self) -> WorkbenchState {
        self.state
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn apply(&mut self, action: Action) -> Outcome {
        let next = match &action {
            Action::SetCell { row, col, text } if !is_valid_draft(text) => {
                log::debug!("rejected draft {:?} at ({row}, {col})", text);
                self.emit(WorkbenchEvent::DraftRejected(DraftRejectedEvent {
                    row: *row,
                    col: *col,
                    text: text.clone(),
                }));
                return Outcome::Rejected;
            }
            Action::TogglePivot { row, col }
                if !Pivot::new(*row, *col)
                    .in_bounds(self.current().rows(), self.current().cols()) =>
            {
                log::debug!("pivot ({row}, {col}) outside the grid");
                return Outcome::Unchanged;
            }
            Action::Advance => self.state.advance(),
            Action::SelectHistoryStep { step } => self.state.select_history_step(*step),
            Action::Reset => WorkbenchState::with_current(self.template.clone()),
            edit => {
                let edit = edit.clone();
                self.state.edit_current(|t| apply_edit(t, edit))
            }
        };

        if next == self.state {
            return Outcome::Unchanged;
        }

        self.revision += 1;
        self.state = next;
        let event = self.event_for(&action);
        self.emit(event);
        Outcome::Applied
    }

    fn current(&self) -> &Tableau {
        self.state.current()
    }

    fn event_for(&self, action: &Action) -> WorkbenchEvent {
        let revision = self.revision;
        match action {
            Action::Advance => {
                let frozen = self
                    .state
                    .history()
                    .last()
                    .map(|f| (f.step(), f.id()));
                match frozen {
                    Some((step, id)) => {
                        log::info!("froze step {step} ({id})");
                        WorkbenchEvent::StepFrozen(StepFrozenEvent { revision, step, id })
                    }
                    None => self.current_changed(),
                }
            }
            Action::SelectHistoryStep { step } => {
                WorkbenchEvent::PreviousSelected { revision, step: *step }
            }
            Action::Reset => {
                log::info!("workbench reset");
                WorkbenchEvent::Reset { revision }
            }
            _ => self.current_changed(),
        }
    }

    fn current_changed(&self) -> WorkbenchEvent {
        let current = self.current();
        WorkbenchEvent::CurrentChanged(CurrentChangedEvent {
            revision: self.revision,
            rows: current.rows(),
            cols: current.cols(),
            pivot: current.pivot(),
        })
    }

    fn emit(&mut self, event: WorkbenchEvent) {
        if let Some(callback) = self.on_event.as_mut() {
            callback(&event);
        }
    }
}

fn apply_edit(t: &Tableau, action: Action) -> Tableau {
    match action {
        Action::AddColumn { label } => {
            let label = label.filter(|l| !l.trim().is_empty()).unwrap_or_else(|| t.column_hint());
            t.add_column(label.trim())
        }
        Action::RemoveColumn { index } => t.remove_column(index),
        Action::AddRow { label } => {
            let label = label.filter(|l| !l.trim().is_empty()).unwrap_or_else(|| t.row_hint());
            t.add_row(label.trim())
        }
        Action::RemoveRow { index } => t.remove_row(index),
        Action::SetColVar { index, text } => t.set_col_var(index, text),
        Action::SetRowVar { index, text } => t.set_row_var(index, text),
        Action::SetCell { row, col, text } => t.set_cell(row, col, text),
        Action::TogglePivot { row, col } => t.toggle_pivot(Pivot::new(row, col)),
        Action::ClearPivot => t.clear_pivot(),
        Action::Advance | Action::SelectHistoryStep { .. } | Action::Reset => t.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let s = WorkbenchState::initial();
        assert_eq!(s.current(), &Tableau::create_initial());
        assert!(s.history().is_empty());
        assert_eq!(s.previous_step(), None);
        assert!(s.selected_previous().is_none());
        assert!(s.is_initial_step());
    }

    #[test]
    fn test_advance_freezes_and_seeds_next_step() {
        let s = WorkbenchState::initial()
            .edit_current(|t| t.set_cell(0, 0, " 2 ").set_col_var(1, ""))
            .advance();

        assert_eq!(s.history().len(), 1);
        assert_eq!(s.history()[0].step(), 1);
        assert_eq!(s.history()[0].cells()[0][0], "2");
        assert_eq!(s.previous_step(), Some(1));
        assert_eq!(s.current().col_vars(), ["x1", "x2", "b"]);
        assert!(s.current().cells().iter().flatten().all(|c| c.is_empty()));
        assert!(!s.is_initial_step());
    }

    #[test]
    fn test_steps_are_sequential() {
        let mut s = WorkbenchState::initial();
        for _ in 0..5 {
            s = s.advance();
        }
        let steps: Vec<usize> = s.history().iter().map(|f| f.step()).collect();
        assert_eq!(steps, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_select_and_fallback_to_latest() {
        let s = WorkbenchState::initial().advance().advance().advance();
        assert_eq!(s.selected_previous().map(|f| f.step()), Some(3));

        let s = s.select_history_step(1);
        assert_eq!(s.selected_previous().map(|f| f.step()), Some(1));
        assert_eq!(s.history().len(), 3);

        let s = s.select_history_step(42);
        assert_eq!(s.previous_step(), Some(42));
        assert_eq!(s.selected_previous().map(|f| f.step()), Some(3));
    }

    #[test]
    fn test_select_does_not_touch_current() {
        let s = WorkbenchState::initial().advance().edit_current(|t| t.set_cell(1, 1, "4"));
        let selected = s.select_history_step(1);
        assert_eq!(selected.current(), s.current());
        assert_eq!(selected.history(), s.history());
    }

    #[test]
    fn test_edits_never_reach_history() {
        let s = WorkbenchState::initial().edit_current(|t| t.set_cell(0, 0, "1")).advance();
        let edited = s.edit_current(|t| t.set_cell(0, 0, "9").set_row_var(0, "w"));
        assert_eq!(edited.history(), s.history());
        assert_eq!(edited.history()[0].cells()[0][0], "1");
    }

    #[test]
    fn test_reset() {
        let s = WorkbenchState::initial().advance().select_history_step(1).reset();
        assert_eq!(s, WorkbenchState::initial());
    }

    #[test]
    fn test_history_gallery() {
        let s = WorkbenchState::initial()
            .advance()
            .edit_current(|t| t.add_column("s1"))
            .advance()
            .select_history_step(1);

        let gallery = s.history_gallery(true);
        assert_eq!(gallery.len(), 2);
        assert_eq!(gallery[0], StepSummary { step: 2, rows: 3, cols: 4, selected: false });
        assert_eq!(gallery[1], StepSummary { step: 1, rows: 3, cols: 3, selected: true });
        assert_eq!(s.history_gallery(false)[0].step, 1);
    }

    #[test]
    fn test_deserialize_checks_step_sequence() {
        let s = WorkbenchState::initial().advance().advance();
        let mut json = serde_json::to_value(&s).unwrap();
        json["history"][1]["step"] = serde_json::json!(7);

        let err = serde_json::from_value::<WorkbenchState>(json).unwrap_err();
        assert!(err.to_string().contains("expected step 2, found 7"));
    }

    #[test]
    fn test_workbench_add_column_uses_hint_for_blank_label() {
        let mut wb = Workbench::new();
        assert_eq!(wb.apply(Action::AddColumn { label: Some("  ".into()) }), Outcome::Applied);
        assert_eq!(wb.apply(Action::AddRow { label: None }), Outcome::Applied);
        assert_eq!(wb.apply(Action::AddColumn { label: Some(" s1 ".into()) }), Outcome::Applied);

        let t = wb.state().current();
        assert_eq!(t.col_vars(), ["x1", "x2", "b", "x4", "s1"]);
        assert_eq!(t.row_vars(), ["z", "c1", "c2", "r4"]);
        assert_eq!(wb.revision(), 3);
    }

    #[test]
    fn test_workbench_rejects_bad_draft() {
        let mut wb = Workbench::new();
        assert_eq!(
            wb.apply(Action::SetCell { row: 0, col: 0, text: "3.".into() }),
            Outcome::Applied
        );
        assert_eq!(
            wb.apply(Action::SetCell { row: 0, col: 0, text: "3.4.5".into() }),
            Outcome::Rejected
        );
        assert_eq!(wb.state().current().cell(0, 0), Some("3."));
        assert_eq!(wb.revision(), 1);
    }

    #[test]
    fn test_workbench_noops_do_not_bump_revision() {
        let mut wb = Workbench::with_template(
            Tableau::from_labels(vec!["x1".into()], vec!["z".into()]).unwrap(),
        );
        assert_eq!(wb.apply(Action::RemoveColumn { index: 0 }), Outcome::Unchanged);
        assert_eq!(wb.apply(Action::RemoveRow { index: 0 }), Outcome::Unchanged);
        assert_eq!(wb.apply(Action::TogglePivot { row: 4, col: 0 }), Outcome::Unchanged);
        assert_eq!(wb.apply(Action::ClearPivot), Outcome::Unchanged);
        assert_eq!(wb.revision(), 0);
    }

    #[test]
    fn test_workbench_reset_returns_to_template() {
        let template =
            Tableau::from_labels(vec!["a".into(), "b".into()], vec!["r".into()]).unwrap();
        let mut wb = Workbench::with_template(template.clone());
        wb.apply(Action::SetCell { row: 0, col: 1, text: "1".into() });
        wb.apply(Action::Advance);
        assert_eq!(wb.apply(Action::Reset), Outcome::Applied);

        assert_eq!(wb.state(), &WorkbenchState::with_current(template));
        // the pure transition knows nothing of the template
        assert_eq!(wb.state().reset(), WorkbenchState::initial());
    }

    #[test]
    fn test_deserialize_rejects_duplicate_snapshot_id() {
        let s = WorkbenchState::initial().advance().advance();
        let mut json = serde_json::to_value(&s).unwrap();
        json["history"][1]["id"] = json["history"][0]["id"].clone();

        let err = serde_json::from_value::<WorkbenchState>(json).unwrap_err();
        assert!(err.to_string().contains("history entry 1: snapshot id"));
        assert!(err.to_string().contains("is already used"));
    }

    #[test]
    fn test_deserialize_rejects_stray_pivot_before_advance() {
        let mut json = serde_json::to_value(WorkbenchState::initial()).unwrap();
        json["current"]["pivot"] = serde_json::json!({ "row": 9, "col": 9 });

        let err = serde_json::from_value::<WorkbenchState>(json).unwrap_err();
        assert!(err.to_string().contains("outside the 3x3 grid"));
    }
}
