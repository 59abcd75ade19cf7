//! `tabstep-engine`: tableau model, frozen snapshots, workbench session.
//!
//! Pure engine crate: every operation is an in-memory, synchronous
//! transformation. No file or terminal I/O.

pub mod error;
pub mod events;
pub mod snapshot;
pub mod tableau;
pub mod workbench;

#[cfg(test)]
pub mod harness;

pub use error::ShapeError;
pub use snapshot::{
    clamp_non_empty_label, freeze, reconstruct_editable, reconstruct_empty_like,
    reconstruct_view_only, FrozenTableau, SnapshotId,
};
pub use tableau::{Tableau, TableauView};
pub use workbench::{Action, Outcome, StepSummary, Workbench, WorkbenchState};
