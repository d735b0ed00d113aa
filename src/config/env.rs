//! Environment lookup used by the defaulting pass
use std::collections::{BTreeMap, HashMap};

/// Environment variable bound to `user_id`
pub const USER_ID: &str = "USER_ID";
/// Environment variable bound to `embedding_model`
pub const EMBEDDING_MODEL: &str = "EMBEDDING_MODEL";
/// Environment variable bound to `retriever_provider`
pub const RETRIEVER_PROVIDER: &str = "RETRIEVER_PROVIDER";
/// Environment variable bound to `response_model`
pub const RESPONSE_MODEL: &str = "RESPONSE_MODEL";
/// Environment variable bound to `query_model`
pub const QUERY_MODEL: &str = "QUERY_MODEL";

/// Every environment variable the configuration reads, in resolution order
pub const BOUND_VARS: [&str; 5] = [
    USER_ID,
    EMBEDDING_MODEL,
    RETRIEVER_PROVIDER,
    RESPONSE_MODEL,
    QUERY_MODEL,
];

/// Source of environment variables
///
/// The process environment is the usual source; maps act as fixed snapshots
/// so configurations can be resolved without touching process state.
pub trait EnvProvider {
    /// Look up a variable, `None` if it is not set
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads from the real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvProvider for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        match std::env::var(key) {
            Ok(value) => Some(value),
            Err(std::env::VarError::NotPresent) => None,
            Err(std::env::VarError::NotUnicode(_)) => {
                tracing::warn!("Ignoring non-unicode value for {}", key);
                None
            }
        }
    }
}

impl EnvProvider for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl EnvProvider for BTreeMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl<E: EnvProvider + ?Sized> EnvProvider for &E {
    fn var(&self, key: &str) -> Option<String> {
        (**self).var(key)
    }
}
