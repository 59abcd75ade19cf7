//! The editable tableau grid.
//!
//! Every operation takes `&self` and returns a new `Tableau`; nothing edits in
//! place. The shape invariant holds after every call:
//! `cells.len() == row_vars.len()`, every row is `col_vars.len()` wide, and
//! there is at least one row and one column.
//!
//! Cells are draft strings. The model never validates them; callers run
//! `tabstep_core::is_valid_draft` first. Labels are free text and may be
//! blank while the user types; blanks are resolved at freeze time.

use serde::{Deserialize, Serialize};
use tabstep_core::Pivot;

use crate::error::ShapeError;

/// Starter column labels: two structural variables and the bound column.
pub const DEFAULT_COLUMNS: [&str; 3] = ["x1", "x2", "b"];
/// Starter row labels: the objective row and two constraints.
pub const DEFAULT_ROWS: [&str; 3] = ["z", "c1", "c2"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTableau")]
pub struct Tableau {
    col_vars: Vec<String>,
    row_vars: Vec<String>,
    cells: Vec<Vec<String>>,
    pivot: Option<Pivot>,
}

/// Unchecked wire form; converted through the shape check.
#[derive(Deserialize)]
struct RawTableau {
    col_vars: Vec<String>,
    row_vars: Vec<String>,
    cells: Vec<Vec<String>>,
    #[serde(default)]
    pivot: Option<Pivot>,
}

impl TryFrom<RawTableau> for Tableau {
    type Error = ShapeError;

    fn try_from(raw: RawTableau) -> Result<Self, Self::Error> {
        check_shape(&raw.col_vars, &raw.row_vars, &raw.cells)?;
        check_pivot(raw.pivot, raw.row_vars.len(), raw.col_vars.len())?;
        Ok(Self {
            col_vars: raw.col_vars,
            row_vars: raw.row_vars,
            cells: raw.cells,
            pivot: raw.pivot,
        })
    }
}

pub(crate) fn check_shape(
    col_vars: &[String],
    row_vars: &[String],
    cells: &[Vec<String>],
) -> Result<(), ShapeError> {
    if col_vars.is_empty() {
        return Err(ShapeError::NoColumns);
    }
    if row_vars.is_empty() {
        return Err(ShapeError::NoRows);
    }
    if cells.len() != row_vars.len() {
        return Err(ShapeError::RowCount { labels: row_vars.len(), cells: cells.len() });
    }
    for (row, values) in cells.iter().enumerate() {
        if values.len() != col_vars.len() {
            return Err(ShapeError::RowWidth {
                row,
                expected: col_vars.len(),
                found: values.len(),
            });
        }
    }
    Ok(())
}

pub(crate) fn check_pivot(
    pivot: Option<Pivot>,
    rows: usize,
    cols: usize,
) -> Result<(), ShapeError> {
    match pivot {
        Some(p) if !p.in_bounds(rows, cols) => {
            Err(ShapeError::PivotOutOfRange { row: p.row, col: p.col, rows, cols })
        }
        _ => Ok(()),
    }
}

pub(crate) fn empty_cells(rows: usize, cols: usize) -> Vec<Vec<String>> {
    vec![vec![String::new(); cols]; rows]
}

/// Borrowed, read-only projection of a grid. Used for rendering current,
/// previous and history thumbnails alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableauView<'a> {
    pub col_vars: &'a [String],
    pub row_vars: &'a [String],
    pub cells: &'a [Vec<String>],
    pub pivot: Option<Pivot>,
}

impl<'a> TableauView<'a> {
    pub fn rows(&self) -> usize {
        self.row_vars.len()
    }

    pub fn cols(&self) -> usize {
        self.col_vars.len()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&'a str> {
        self.cells.get(row).and_then(|r| r.get(col)).map(String::as_str)
    }

    pub fn is_pivot(&self, row: usize, col: usize) -> bool {
        self.pivot == Some(Pivot::new(row, col))
    }
}

impl Default for Tableau {
    fn default() -> Self {
        Self::create_initial()
    }
}

impl Tableau {
    /// The starter grid: `DEFAULT_COLUMNS` x `DEFAULT_ROWS`, all cells empty.
    pub fn create_initial() -> Self {
        let col_vars: Vec<String> = DEFAULT_COLUMNS.iter().map(|s| s.to_string()).collect();
        let row_vars: Vec<String> = DEFAULT_ROWS.iter().map(|s| s.to_string()).collect();
        let cells = empty_cells(row_vars.len(), col_vars.len());
        Self {
            col_vars,
            row_vars,
            cells,
            pivot: None,
        }
    }

    /// An all-empty grid with the given labels.
    pub fn from_labels(col_vars: Vec<String>, row_vars: Vec<String>) -> Result<Self, ShapeError> {
        let cells = empty_cells(row_vars.len(), col_vars.len());
        Self::from_parts(col_vars, row_vars, cells, None)
    }

    /// Assemble a grid, checking the shape invariant.
    pub fn from_parts(
        col_vars: Vec<String>,
        row_vars: Vec<String>,
        cells: Vec<Vec<String>>,
        pivot: Option<Pivot>,
    ) -> Result<Self, ShapeError> {
        check_shape(&col_vars, &row_vars, &cells)?;
        check_pivot(pivot, row_vars.len(), col_vars.len())?;
        Ok(Self {
            col_vars,
            row_vars,
            cells,
            pivot,
        })
    }

    /// Assemble from parts already known to be well shaped.
    pub(crate) fn assemble(
        col_vars: Vec<String>,
        row_vars: Vec<String>,
        cells: Vec<Vec<String>>,
        pivot: Option<Pivot>,
    ) -> Self {
        debug_assert!(check_shape(&col_vars, &row_vars, &cells).is_ok());
        debug_assert!(check_pivot(pivot, row_vars.len(), col_vars.len()).is_ok());
        Self {
            col_vars,
            row_vars,
            cells,
            pivot,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn col_vars(&self) -> &[String] {
        &self.col_vars
    }

    pub fn row_vars(&self) -> &[String] {
        &self.row_vars
    }

    pub fn cells(&self) -> &[Vec<String>] {
        &self.cells
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.cells.get(row).and_then(|r| r.get(col)).map(String::as_str)
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

    pub fn view(&self) -> TableauView<'_> {
        TableauView {
            col_vars: &self.col_vars,
            row_vars: &self.row_vars,
            cells: &self.cells,
            pivot: self.pivot,
        }
    }

    /// Label offered when a column is added without one: `x{C+1}`.
    pub fn column_hint(&self) -> String {
        format!("x{}", self.cols() + 1)
    }

    /// Label offered when a row is added without one: `r{R+1}`.
    pub fn row_hint(&self) -> String {
        format!("r{}", self.rows() + 1)
    }

    // =========================================================================
    // Structure
    // =========================================================================

    #[must_use]
    pub fn add_column(&self, label: impl Into<String>) -> Self {
        let mut col_vars = self.col_vars.clone();
        col_vars.push(label.into());
        let cells = self
            .cells
            .iter()
            .map(|row| {
                let mut row = row.clone();
                row.push(String::new());
                row
            })
            .collect();
        Self { col_vars, cells, ..self.clone() }
    }

    /// Remove a column. The last remaining column is never removed.
    #[must_use]
    pub fn remove_column(&self, index: usize) -> Self {
        if self.cols() <= 1 || index >= self.cols() {
            log::debug!("remove_column({index}) ignored on {} column(s)", self.cols());
            return self.clone();
        }
        let col_vars = without(&self.col_vars, index);
        let cells = self.cells.iter().map(|row| without(row, index)).collect();
        let pivot = self.pivot.and_then(|p| p.after_col_removed(index));
        Self { col_vars, row_vars: self.row_vars.clone(), cells, pivot }
    }

    #[must_use]
    pub fn add_row(&self, label: impl Into<String>) -> Self {
        let mut row_vars = self.row_vars.clone();
        row_vars.push(label.into());
        let mut cells = self.cells.clone();
        cells.push(vec![String::new(); self.cols()]);
        Self { row_vars, cells, ..self.clone() }
    }

    /// Remove a row. The last remaining row is never removed.
    #[must_use]
    pub fn remove_row(&self, index: usize) -> Self {
        if self.rows() <= 1 || index >= self.rows() {
            log::debug!("remove_row({index}) ignored on {} row(s)", self.rows());
            return self.clone();
        }
        let row_vars = without(&self.row_vars, index);
        let cells = without(&self.cells, index);
        let pivot = self.pivot.and_then(|p| p.after_row_removed(index));
        Self { col_vars: self.col_vars.clone(), row_vars, cells, pivot }
    }

    // =========================================================================
    // Labels and cells
    // =========================================================================

    #[must_use]
    pub fn set_col_var(&self, index: usize, next: impl Into<String>) -> Self {
        let mut out = self.clone();
        match out.col_vars.get_mut(index) {
            Some(label) => *label = next.into(),
            None => log::debug!("set_col_var({index}) out of range"),
        }
        out
    }

    #[must_use]
    pub fn set_row_var(&self, index: usize, next: impl Into<String>) -> Self {
        let mut out = self.clone();
        match out.row_vars.get_mut(index) {
            Some(label) => *label = next.into(),
            None => log::debug!("set_row_var({index}) out of range"),
        }
        out
    }

    /// Replace a cell verbatim. The draft is not re-validated here.
    #[must_use]
    pub fn set_cell(&self, row: usize, col: usize, next: impl Into<String>) -> Self {
        let mut out = self.clone();
        match out.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(cell) => *cell = next.into(),
            None => log::debug!("set_cell({row}, {col}) out of range"),
        }
        out
    }

    // =========================================================================
    // Pivot
    // =========================================================================

    /// Replace the pivot. A pivot outside the grid is ignored.
    #[must_use]
    pub fn set_pivot(&self, pivot: Option<Pivot>) -> Self {
        if let Err(e) = check_pivot(pivot, self.rows(), self.cols()) {
            log::debug!("set_pivot: {e}");
            return self.clone();
        }
        Self {
            pivot,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn clear_pivot(&self) -> Self {
        self.set_pivot(None)
    }

    /// Select `picked`, or clear it if it is already the pivot.
    #[must_use]
    pub fn toggle_pivot(&self, picked: Pivot) -> Self {
        self.set_pivot(Pivot::toggle(self.pivot, picked))
    }
}

fn without<T: Clone>(items: &[T], index: usize) -> Vec<T> {
    items
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, item)| item.clone())
        .collect()
}
