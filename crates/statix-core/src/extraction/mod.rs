//! Batch extraction and the progress state carried between batches.

pub mod batch;
pub mod context;

pub use batch::extract_batch;
pub use batch::extract_batch_with_progress;
pub use batch::extract_whole;
pub use context::ExtractionContext;
