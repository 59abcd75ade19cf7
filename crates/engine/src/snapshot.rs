//! Frozen history records.
//!
//! `freeze` turns the working grid into an immutable `FrozenTableau`: labels
//! are trimmed and blank ones get a positional fallback (`x{i+1}` for
//! columns, `r{i+1}` for rows), cells are trimmed, and the record gets a fresh
//! id. Step numbers come from the caller so that a single owner keeps them
//! sequential.
//!
//! A frozen record has no mutable accessors. The reconstructions copy it back
//! into an editable `Tableau` or borrow it as a `TableauView`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tabstep_core::Pivot;
use uuid::Uuid;

use crate::error::{Axis, ShapeError};
use crate::tableau::{check_pivot, check_shape, empty_cells, Tableau, TableauView};

/// Unique id of a frozen record. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotId(Uuid);

impl SnapshotId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SnapshotId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFrozen")]
pub struct FrozenTableau {
    id: SnapshotId,
    step: usize,
    frozen_at: DateTime<Utc>,
    col_vars: Vec<String>,
    row_vars: Vec<String>,
    cells: Vec<Vec<String>>,
    pivot: Option<Pivot>,
}

#[derive(Deserialize)]
struct RawFrozen {
    id: SnapshotId,
    step: usize,
    frozen_at: DateTime<Utc>,
    col_vars: Vec<String>,
    row_vars: Vec<String>,
    cells: Vec<Vec<String>>,
    #[serde(default)]
    pivot: Option<Pivot>,
}

impl TryFrom<RawFrozen> for FrozenTableau {
    type Error = ShapeError;

    fn try_from(raw: RawFrozen) -> Result<Self, Self::Error> {
        check_shape(&raw.col_vars, &raw.row_vars, &raw.cells)?;
        check_pivot(raw.pivot, raw.row_vars.len(), raw.col_vars.len())?;
        if let Some(index) = raw.col_vars.iter().position(|l| l.trim().is_empty()) {
            return Err(ShapeError::BlankLabel { axis: Axis::Column, index });
        }
        if let Some(index) = raw.row_vars.iter().position(|l| l.trim().is_empty()) {
            return Err(ShapeError::BlankLabel { axis: Axis::Row, index });
        }
        Ok(Self {
            id: raw.id,
            step: raw.step,
            frozen_at: raw.frozen_at,
            col_vars: raw.col_vars,
            row_vars: raw.row_vars,
            cells: raw.cells,
            pivot: raw.pivot,
        })
    }
}

impl FrozenTableau {
    pub fn id(&self) -> SnapshotId {
        self.id
    }

    /// 1-based position in history.
    pub fn step(&self) -> usize {
        self.step
    }

    pub fn frozen_at(&self) -> DateTime<Utc> {
        self.frozen_at
    }

    pub fn col_vars(&self) -> &[String] {
        &self.col_vars
    }

    pub fn row_vars(&self) -> &[String] {
        &self.row_vars
    }

    pub fn cells(&self) -> &[Vec<String>] {
        &self.cells
    }

    pub fn pivot(&self) -> Option<Pivot> {
        self.pivot
    }

    pub fn rows(&self) -> usize {
        self.row_vars.len()
    }

    pub fn cols(&self) -> usize {
        self.col_vars.len()
    }
}

/// `label.trim()`, or `fallback` when that is empty.
pub fn clamp_non_empty_label(label: &str, fallback: &str) -> String {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Freeze the working grid as history step `step`.
pub fn freeze(t: &Tableau, step: usize) -> FrozenTableau {
    let col_vars = t
        .col_vars()
        .iter()
        .enumerate()
        .map(|(i, label)| clamp_non_empty_label(label, &format!("x{}", i + 1)))
        .collect();
    let row_vars = t
        .row_vars()
        .iter()
        .enumerate()
        .map(|(i, label)| clamp_non_empty_label(label, &format!("r{}", i + 1)))
        .collect();
    let cells = t
        .cells()
        .iter()
        .map(|row| row.iter().map(|cell| cell.trim().to_string()).collect())
        .collect();

    FrozenTableau {
        id: SnapshotId::new(),
        step,
        frozen_at: Utc::now(),
        col_vars,
        row_vars,
        cells,
        pivot: t.pivot(),
    }
}

/// Copy a frozen record back into an editable grid, pivot included.
pub fn reconstruct_editable(f: &FrozenTableau) -> Tableau {
    Tableau::assemble(f.col_vars.clone(), f.row_vars.clone(), f.cells.clone(), f.pivot)
}

/// Same labels, every cell empty, no pivot: the seed for the next step.
pub fn reconstruct_empty_like(f: &FrozenTableau) -> Tableau {
    let cells = empty_cells(f.rows(), f.cols());
    Tableau::assemble(f.col_vars.clone(), f.row_vars.clone(), cells, None)
}

/// Borrow a frozen record for display. Nothing is copied.
pub fn reconstruct_view_only(f: &FrozenTableau) -> TableauView<'_> {
    TableauView {
        col_vars: &f.col_vars,
        row_vars: &f.row_vars,
        cells: &f.cells,
        pivot: f.pivot,
    }
}
