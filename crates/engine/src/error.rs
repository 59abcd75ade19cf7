use std::fmt;

/// A grid whose labels and cells disagree about its shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// No column labels.
    NoColumns,
    /// No row labels.
    NoRows,
    /// Cell row count differs from the row labels.
    RowCount { labels: usize, cells: usize },
    /// A cell row has the wrong width.
    RowWidth { row: usize, expected: usize, found: usize },
    /// A frozen label is blank.
    BlankLabel { axis: Axis, index: usize },
    /// The pivot lies outside the grid.
    PivotOutOfRange { row: usize, col: usize, rows: usize, cols: usize },
    /// History steps are not 1, 2, 3, ... in order.
    StepSequence { index: usize, expected: usize, found: usize },
    /// Two history entries share a snapshot id.
    DuplicateSnapshot { index: usize, id: String },
}

/// Which header a label belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Column,
    Row,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Column => write!(f, "column"),
            Axis::Row => write!(f, "row"),
        }
    }
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoColumns => write!(f, "tableau needs at least one column"),
            Self::NoRows => write!(f, "tableau needs at least one row"),
            Self::RowCount { labels, cells } => {
                write!(f, "{labels} row label(s) but {cells} cell row(s)")
            }
            Self::RowWidth { row, expected, found } => {
                write!(f, "row {row}: expected {expected} cell(s), found {found}")
            }
            Self::BlankLabel { axis, index } => {
                write!(f, "frozen {axis} label {index} is blank")
            }
            Self::PivotOutOfRange { row, col, rows, cols } => {
                write!(f, "pivot ({row}, {col}) is outside the {rows}x{cols} grid")
            }
            Self::StepSequence { index, expected, found } => {
                write!(f, "history entry {index}: expected step {expected}, found {found}")
            }
            Self::DuplicateSnapshot { index, id } => {
                write!(f, "history entry {index}: snapshot id {id} is already used")
            }
        }
    }
}

impl std::error::Error for ShapeError {}
