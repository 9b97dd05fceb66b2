//! Command implementations.

pub mod batch;
pub mod extract;
pub mod score;

pub use self::batch::execute_batch;
pub use self::extract::execute_extract;
pub use self::score::execute_score;
