//! Configuration for the retrieval agent
//!
//! Two bundles are defined here: [`IndexConfiguration`] carries what indexing
//! and retrieval need, and [`Configuration`] embeds it and adds the prompts and
//! models used by the agent. Both resolve every field in the same order:
//! explicit value, then environment variable, then built-in default.
//!
//! A field counts as explicit only when its value differs from the built-in
//! default. Passing the default literal explicitly therefore still lets the
//! environment override it.

use crate::error::{Error, Result};
use crate::prompts;
use serde_json::{Map, Value};
use std::ops::Deref;
use std::path::{Path, PathBuf};

mod context;
pub mod env;
mod overrides;
mod provider;
mod validator;

pub use env::{EnvProvider, ProcessEnv};
pub use overrides::ConfigOverrides;
pub use provider::{ModelName, RetrieverProvider};
pub use validator::ConfigValidator;

/// Built-in embedding model
pub const DEFAULT_EMBEDDING_MODEL: &str = "openai/text-embedding-3-small";
/// Built-in vector store provider
pub const DEFAULT_RETRIEVER_PROVIDER: &str = "elastic";
/// Built-in model for answer generation
pub const DEFAULT_RESPONSE_MODEL: &str = "anthropic/claude-3-5-sonnet-20240620";
/// Built-in model for query refinement
pub const DEFAULT_QUERY_MODEL: &str = "anthropic/claude-3-haiku-20240307";

/// Parameters for indexing and retrieval
#[derive(Debug, Clone, PartialEq)]
pub struct IndexConfiguration {
    user_id: String,
    embedding_model: String,
    retriever_provider: String,
    search_kwargs: Map<String, Value>,
}

impl IndexConfiguration {
    /// Start building an index configuration from built-in defaults
    pub fn builder() -> IndexConfigurationBuilder {
        IndexConfigurationBuilder::default()
    }

    /// User whose documents are indexed and whose queries are scoped
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Embedding model in `provider/model-name` form
    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    /// Vector store provider name, passed through as given
    pub fn retriever_provider(&self) -> &str {
        &self.retriever_provider
    }

    /// Provider name as a known backend, `None` if it is not one
    pub fn retriever(&self) -> Option<RetrieverProvider> {
        self.retriever_provider.parse().ok()
    }

    /// Extra arguments forwarded to the retriever's search call
    pub fn search_kwargs(&self) -> &Map<String, Value> {
        &self.search_kwargs
    }

    fn defaults() -> Self {
        Self {
            user_id: String::new(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            retriever_provider: DEFAULT_RETRIEVER_PROVIDER.to_string(),
            search_kwargs: Map::new(),
        }
    }

    fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(user_id) = &overrides.user_id {
            self.user_id = user_id.clone();
        }
        if let Some(model) = &overrides.embedding_model {
            self.embedding_model = model.clone();
        }
        if let Some(provider) = &overrides.retriever_provider {
            self.retriever_provider = provider.clone();
        }
        if let Some(kwargs) = &overrides.search_kwargs {
            self.search_kwargs = kwargs.clone();
        }
    }

    /// Fill default-valued fields from the environment
    fn resolve_env<E: EnvProvider + ?Sized>(&mut self, env: &E) {
        if self.user_id.is_empty() {
            if let Some(user_id) = env.var(env::USER_ID) {
                tracing::debug!("Using {} from environment", env::USER_ID);
                self.user_id = user_id;
            }
        }

        resolve_field(
            &mut self.embedding_model,
            DEFAULT_EMBEDDING_MODEL,
            env::EMBEDDING_MODEL,
            env,
        );
        resolve_field(
            &mut self.retriever_provider,
            DEFAULT_RETRIEVER_PROVIDER,
            env::RETRIEVER_PROVIDER,
            env,
        );
    }
}

impl Default for IndexConfiguration {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`IndexConfiguration`]
#[derive(Debug, Clone)]
pub struct IndexConfigurationBuilder {
    config: IndexConfiguration,
}

impl Default for IndexConfigurationBuilder {
    fn default() -> Self {
        Self {
            config: IndexConfiguration::defaults(),
        }
    }
}

impl IndexConfigurationBuilder {
    /// Set the user whose documents and queries are scoped
    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.config.user_id = user_id.into();
        self
    }

    /// Set the embedding model, `provider/model-name`
    pub fn embedding_model(mut self, model: impl Into<String>) -> Self {
        self.config.embedding_model = model.into();
        self
    }

    /// Set the vector store provider name
    pub fn retriever_provider(mut self, provider: impl Into<String>) -> Self {
        self.config.retriever_provider = provider.into();
        self
    }

    /// Replace all search arguments
    pub fn search_kwargs(mut self, kwargs: Map<String, Value>) -> Self {
        self.config.search_kwargs = kwargs;
        self
    }

    /// Add a single search argument
    pub fn search_kwarg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.config.search_kwargs.insert(key.into(), value.into());
        self
    }

    /// Apply any fields present in `overrides`; agent-only fields are ignored
    pub fn overrides(mut self, overrides: &ConfigOverrides) -> Self {
        self.config.apply_overrides(overrides);
        self
    }

    /// Resolve against the process environment
    pub fn build(self) -> IndexConfiguration {
        self.build_with(&ProcessEnv)
    }

    /// Resolve against the given environment
    pub fn build_with<E: EnvProvider + ?Sized>(mut self, env: &E) -> IndexConfiguration {
        self.config.resolve_env(env);
        self.config
    }
}

/// Agent configuration: index parameters plus prompts and models
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    index: IndexConfiguration,
    response_system_prompt: String,
    response_model: String,
    query_system_prompt: String,
    query_model: String,
}

impl Configuration {
    /// Start building a configuration from built-in defaults
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::default()
    }

    /// The embedded index parameters
    pub fn index(&self) -> &IndexConfiguration {
        &self.index
    }

    /// Drop the agent fields, keeping the index parameters
    pub fn into_index(self) -> IndexConfiguration {
        self.index
    }

    /// System prompt used for generating responses
    pub fn response_system_prompt(&self) -> &str {
        &self.response_system_prompt
    }

    /// Model used for generating responses, `provider/model-name`
    pub fn response_model(&self) -> &str {
        &self.response_model
    }

    /// System prompt used for refining queries
    pub fn query_system_prompt(&self) -> &str {
        &self.query_system_prompt
    }

    /// Model used for refining queries, `provider/model-name`
    pub fn query_model(&self) -> &str {
        &self.query_model
    }

    fn defaults() -> Self {
        Self {
            index: IndexConfiguration::defaults(),
            response_system_prompt: prompts::RESPONSE_SYSTEM_PROMPT.to_string(),
            response_model: DEFAULT_RESPONSE_MODEL.to_string(),
            query_system_prompt: prompts::QUERY_SYSTEM_PROMPT.to_string(),
            query_model: DEFAULT_QUERY_MODEL.to_string(),
        }
    }

    fn resolve_env<E: EnvProvider + ?Sized>(&mut self, env: &E) {
        self.index.resolve_env(env);

        resolve_field(
            &mut self.response_model,
            DEFAULT_RESPONSE_MODEL,
            env::RESPONSE_MODEL,
            env,
        );
        resolve_field(
            &mut self.query_model,
            DEFAULT_QUERY_MODEL,
            env::QUERY_MODEL,
            env,
        );
    }

    /// Load configuration from a TOML file, resolving against the process
    /// environment
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with(path, &ProcessEnv)
    }

    /// Load configuration from a TOML file
    ///
    /// Keys present in the file are treated as explicit values; everything
    /// else goes through the usual environment/default resolution.
    pub fn load_with<E: EnvProvider + ?Sized>(path: &Path, env: &E) -> Result<Self> {
        let overrides = ConfigOverrides::from_file(path)?;
        Ok(Self::builder().overrides(&overrides).build_with(env))
    }

    /// Save the resolved configuration to a TOML file
    ///
    /// Null entries in `search_kwargs` are not written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = ConfigOverrides::from(self).to_toml()?;
        std::fs::write(path, content).map_err(|e| Error::Io {
            source: e,
            context: format!("Failed to write config file: {:?}", path),
        })?;
        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Cannot determine config directory".to_string()))?;

        Ok(config_dir.join("retrieval-graph").join("config.toml"))
    }
}

impl Deref for Configuration {
    type Target = IndexConfiguration;

    fn deref(&self) -> &Self::Target {
        &self.index
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`Configuration`]
#[derive(Debug, Clone)]
pub struct ConfigurationBuilder {
    config: Configuration,
}

impl Default for ConfigurationBuilder {
    fn default() -> Self {
        Self {
            config: Configuration::defaults(),
        }
    }
}

impl ConfigurationBuilder {
    /// Set the user whose documents and queries are scoped
    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.config.index.user_id = user_id.into();
        self
    }

    /// Set the embedding model, `provider/model-name`
    pub fn embedding_model(mut self, model: impl Into<String>) -> Self {
        self.config.index.embedding_model = model.into();
        self
    }

    /// Set the vector store provider name
    pub fn retriever_provider(mut self, provider: impl Into<String>) -> Self {
        self.config.index.retriever_provider = provider.into();
        self
    }

    /// Replace all search arguments
    pub fn search_kwargs(mut self, kwargs: Map<String, Value>) -> Self {
        self.config.index.search_kwargs = kwargs;
        self
    }

    /// Add a single search argument
    pub fn search_kwarg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.config
            .index
            .search_kwargs
            .insert(key.into(), value.into());
        self
    }

    /// Set the system prompt used for generating responses
    pub fn response_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.response_system_prompt = prompt.into();
        self
    }

    /// Set the response model, `provider/model-name`
    pub fn response_model(mut self, model: impl Into<String>) -> Self {
        self.config.response_model = model.into();
        self
    }

    /// Set the system prompt used for refining queries
    pub fn query_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.query_system_prompt = prompt.into();
        self
    }

    /// Set the query model, `provider/model-name`
    pub fn query_model(mut self, model: impl Into<String>) -> Self {
        self.config.query_model = model.into();
        self
    }

    /// Apply any fields present in `overrides`
    pub fn overrides(mut self, overrides: &ConfigOverrides) -> Self {
        self.config.index.apply_overrides(overrides);

        if let Some(prompt) = &overrides.response_system_prompt {
            self = self.response_system_prompt(prompt.clone());
        }
        if let Some(model) = &overrides.response_model {
            self = self.response_model(model.clone());
        }
        if let Some(prompt) = &overrides.query_system_prompt {
            self = self.query_system_prompt(prompt.clone());
        }
        if let Some(model) = &overrides.query_model {
            self = self.query_model(model.clone());
        }
        self
    }

    /// Resolve against the process environment
    pub fn build(self) -> Configuration {
        self.build_with(&ProcessEnv)
    }

    /// Resolve against the given environment
    pub fn build_with<E: EnvProvider + ?Sized>(mut self, env: &E) -> Configuration {
        self.config.resolve_env(env);
        self.config
    }
}

/// Replace `value` with the environment variable `key` if it still holds
/// `default`
fn resolve_field<E: EnvProvider + ?Sized>(value: &mut String, default: &str, key: &str, env: &E) {
    if value != default {
        return;
    }

    if let Some(from_env) = env.var(key) {
        tracing::debug!("Using {} from environment", key);
        *value = from_env;
    }
}
