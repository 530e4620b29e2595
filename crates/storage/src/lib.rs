pub mod constraints;
pub mod error;
pub mod session;

pub use constraints::{ConstraintStore, FileConstraintStore, MemoryConstraintStore};
pub use error::StoreError;
pub use session::SessionConstraints;
