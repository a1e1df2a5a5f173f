pub mod reorder;
pub mod sort;
pub mod synchronizer;

pub use reorder::ReorderController;
pub use synchronizer::{CollectionState, Synchronizer};
