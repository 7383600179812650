//! The permission transaction engine.
//!
//! Capture a tree's ownership and mode bits, apply recursive changes, and
//! roll back to the captured state when a multi-step change fails partway.

pub mod apply;
pub mod snapshot;
pub mod transaction;
pub mod walk;

pub use apply::{apply_mode, apply_ownership};
pub use snapshot::{MODE_MASK, PathEntry, RestoreReport, Snapshot};
pub use transaction::{Operation, Transaction};
pub use walk::{TreeNode, collect_tree};
