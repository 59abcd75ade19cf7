pub mod draft;
pub mod pivot;

pub use draft::{classify_draft, is_valid_draft, DraftKind};
pub use pivot::Pivot;
