use super::{Configuration, IndexConfiguration};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Explicitly supplied configuration values
///
/// This is the on-disk shape of the configuration file and the intermediate
/// form of a run context. Absent fields fall through to environment and
/// default resolution when applied to a builder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retriever_provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_system_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_system_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_model: Option<String>,
    // Kept last so TOML output puts the table after plain keys
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_kwargs: Option<Map<String, Value>>,
}

impl ConfigOverrides {
    /// Read explicit values from a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| Error::Io {
            source: e,
            context: format!("Failed to read config file: {:?}", path),
        })?;
        let overrides: ConfigOverrides = toml::from_str(&content)?;

        tracing::debug!("Loaded configuration file {:?}", path);

        Ok(overrides)
    }

    /// Render as TOML
    ///
    /// TOML has no null, so null entries in `search_kwargs` are dropped at
    /// every depth, including array elements.
    pub fn to_toml(&self) -> Result<String> {
        let mut fields = self.clone();
        if let Some(kwargs) = &mut fields.search_kwargs {
            strip_nulls_in_map(kwargs);
        }
        Ok(toml::to_string_pretty(&fields)?)
    }

    /// Layer `other` on top, keeping fields `other` leaves unset
    pub fn merge(self, other: ConfigOverrides) -> Self {
        Self {
            user_id: other.user_id.or(self.user_id),
            embedding_model: other.embedding_model.or(self.embedding_model),
            retriever_provider: other.retriever_provider.or(self.retriever_provider),
            response_system_prompt: other
                .response_system_prompt
                .or(self.response_system_prompt),
            response_model: other.response_model.or(self.response_model),
            query_system_prompt: other.query_system_prompt.or(self.query_system_prompt),
            query_model: other.query_model.or(self.query_model),
            search_kwargs: other.search_kwargs.or(self.search_kwargs),
        }
    }
}

fn strip_nulls_in_map(map: &mut Map<String, Value>) {
    map.retain(|_, value| !value.is_null());
    map.values_mut().for_each(strip_nulls);
}

fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => strip_nulls_in_map(map),
        Value::Array(items) => {
            items.retain(|item| !item.is_null());
            items.iter_mut().for_each(strip_nulls);
        }
        _ => {}
    }
}

impl From<&IndexConfiguration> for ConfigOverrides {
    fn from(config: &IndexConfiguration) -> Self {
        Self {
            user_id: Some(config.user_id.clone()),
            embedding_model: Some(config.embedding_model.clone()),
            retriever_provider: Some(config.retriever_provider.clone()),
            search_kwargs: Some(config.search_kwargs.clone()),
            ..Self::default()
        }
    }
}

impl From<&Configuration> for ConfigOverrides {
    fn from(config: &Configuration) -> Self {
        Self {
            response_system_prompt: Some(config.response_system_prompt.clone()),
            response_model: Some(config.response_model.clone()),
            query_system_prompt: Some(config.query_system_prompt.clone()),
            query_model: Some(config.query_model.clone()),
            ..Self::from(&config.index)
        }
    }
}
