use serde::{Deserialize, Serialize};

/// The selected pivot cell of a tableau, 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pivot {
    pub row: usize,
    pub col: usize,
}

impl Pivot {
    #[inline]
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Check if the pivot lies inside a `rows` x `cols` grid.
    pub fn in_bounds(&self, rows: usize, cols: usize) -> bool {
        self.row < rows && self.col < cols
    }

    /// Toggle semantics: picking the current pivot again clears it.
    pub fn toggle(current: Option<Pivot>, picked: Pivot) -> Option<Pivot> {
        if current == Some(picked) {
            None
        } else {
            Some(picked)
        }
    }

    /// Where this pivot lands after row `removed` is deleted.
    /// `None` when the pivot was on the removed row.
    pub fn after_row_removed(self, removed: usize) -> Option<Pivot> {
        match self.row.cmp(&removed) {
            std::cmp::Ordering::Less => Some(self),
            std::cmp::Ordering::Equal => None,
            std::cmp::Ordering::Greater => Some(Pivot::new(self.row - 1, self.col)),
        }
    }

    /// Where this pivot lands after column `removed` is deleted.
    pub fn after_col_removed(self, removed: usize) -> Option<Pivot> {
        match self.col.cmp(&removed) {
            std::cmp::Ordering::Less => Some(self),
            std::cmp::Ordering::Equal => None,
            std::cmp::Ordering::Greater => Some(Pivot::new(self.row, self.col - 1)),
        }
    }
}

impl std::fmt::Display for Pivot {
    /// 1-based, the way users count rows and columns.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "R{}C{}", self.row + 1, self.col + 1)
    }
}
