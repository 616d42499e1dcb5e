//! Shiplog Changelog - commit classification and the changelog document
//!
//! This crate holds the core of shiplog: the classifier strategies that
//! map commit messages to change categories, the changelog document
//! model with its parser and renderer, and the merger that folds fresh
//! history into an existing document without disturbing released
//! sections.

pub mod classifier;
pub mod formatter;
pub mod generator;
pub mod merger;
pub mod parser;
pub mod types;

pub use classifier::{Classification, Classifier, LocalClassifier, RemoteClassifier};
pub use formatter::render;
pub use generator::ChangelogGenerator;
pub use merger::merge;
pub use parser::parse;
pub use types::{ChangeCategory, ChangelogDocument, ChangelogEntry, Release, ReleaseId};
