//! Validated wrappers used during extraction.
//!
//! Types here can only be constructed through validation, so code that
//! receives one never has to re-check it.

pub mod member_path;

pub use member_path::MemberPath;
