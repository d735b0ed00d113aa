//! Retrieval Graph - configuration for a retrieval-augmented agent
//!
//! Typed parameter bundles for indexing documents and answering questions
//! over them. Values come from the caller, a run context, a TOML file, or the
//! process environment, with explicit values taking precedence.

pub mod cli;
pub mod config;
pub mod error;
pub mod prompts;

pub use config::{Configuration, IndexConfiguration};
pub use error::{Error, Result};
