//! Shiplog Git - version control readers for changelog generation
//!
//! This crate wraps git tag enumeration and commit-history walks behind
//! the `TagReader` and `CommitReader` ports the changelog merger consumes.

mod commits;
mod reader;
mod repository;
mod tags;
pub mod types;

#[cfg(test)]
pub(crate) mod testutil;

pub use reader::{sorted_release_tags, CommitReader, MemoryReader, TagReader};
pub use repository::{GitRepo, Result};
pub use types::{parse_version, CommitInfo, TagInfo};
