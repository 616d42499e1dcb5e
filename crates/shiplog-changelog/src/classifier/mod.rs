//! Commit classification strategies

mod local;
mod remote;

pub use local::LocalClassifier;
pub use remote::{ClassifyClient, RemoteClassifier};

use crate::types::ChangeCategory;

/// Result of classifying one commit message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// The inferred change category
    pub category: ChangeCategory,
    /// The cleaned description used as the changelog bullet
    pub description: String,
}

/// Strategy for mapping commit messages to change categories.
///
/// A `None` result drops the commit; it contributes nothing to the
/// changelog. Implementations must never fail the run: any internal
/// error degrades to a local decision or to `None`.
pub trait Classifier: Send + Sync {
    /// Classify one commit message
    fn classify(&self, message: &str) -> Option<Classification>;

    /// Classify a batch of messages, one result per input.
    ///
    /// The default just maps [`Classifier::classify`]; the remote
    /// strategy overrides this to cut round-trips.
    fn classify_all(&self, messages: &[String]) -> Vec<Option<Classification>> {
        messages.iter().map(|m| self.classify(m)).collect()
    }
}
