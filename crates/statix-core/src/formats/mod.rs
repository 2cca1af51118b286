//! Archive format implementations.

pub mod traits;
pub mod zip;

pub use self::traits::ArchiveReader;
pub use self::zip::ZipReader;
