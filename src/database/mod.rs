pub mod ledger;
pub mod storage;
pub mod theme;

pub use storage::{StorageError, StorageResult};
pub use theme::Theme;
