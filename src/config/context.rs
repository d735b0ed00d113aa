//! Building configurations from a graph run context
//!
//! A run context is either a flat JSON object of field values, or an object
//! carrying those values under `configurable`.

use super::{ConfigOverrides, Configuration, EnvProvider, IndexConfiguration, ProcessEnv};
use crate::error::{Error, Result};
use serde_json::{json, Map, Value};

const CONFIGURABLE_KEY: &str = "configurable";

const KNOWN_KEYS: [&str; 8] = [
    "user_id",
    "embedding_model",
    "retriever_provider",
    "search_kwargs",
    "response_system_prompt",
    "response_model",
    "query_system_prompt",
    "query_model",
];

impl ConfigOverrides {
    /// Extract explicit values from a run context
    pub fn from_context(context: &Value) -> Result<Self> {
        let fields = context_fields(context)?;

        for key in fields.keys() {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                tracing::trace!("Ignoring unknown context key: {}", key);
            }
        }

        Ok(Self {
            user_id: string_field(fields, "user_id")?,
            embedding_model: string_field(fields, "embedding_model")?,
            retriever_provider: string_field(fields, "retriever_provider")?,
            response_system_prompt: string_field(fields, "response_system_prompt")?,
            response_model: string_field(fields, "response_model")?,
            query_system_prompt: string_field(fields, "query_system_prompt")?,
            query_model: string_field(fields, "query_model")?,
            search_kwargs: object_field(fields, "search_kwargs")?,
        })
    }
}

impl IndexConfiguration {
    /// Build from a run context, resolving against the process environment
    pub fn from_context(context: &Value) -> Result<Self> {
        Self::from_context_with(context, &ProcessEnv)
    }

    /// Build from a run context, resolving against the given environment
    pub fn from_context_with<E: EnvProvider + ?Sized>(context: &Value, env: &E) -> Result<Self> {
        let overrides = ConfigOverrides::from_context(context)?;
        Ok(Self::builder().overrides(&overrides).build_with(env))
    }

    /// Flat run context holding every index field
    pub fn to_context(&self) -> Value {
        json!({
            "user_id": self.user_id,
            "embedding_model": self.embedding_model,
            "retriever_provider": self.retriever_provider,
            "search_kwargs": self.search_kwargs,
        })
    }
}

impl Configuration {
    /// Build from a run context, resolving against the process environment
    pub fn from_context(context: &Value) -> Result<Self> {
        Self::from_context_with(context, &ProcessEnv)
    }

    /// Build from a run context, resolving against the given environment
    pub fn from_context_with<E: EnvProvider + ?Sized>(context: &Value, env: &E) -> Result<Self> {
        let overrides = ConfigOverrides::from_context(context)?;
        Ok(Self::builder().overrides(&overrides).build_with(env))
    }

    /// Flat run context holding every field
    pub fn to_context(&self) -> Value {
        let mut context = self.index.to_context();
        if let Value::Object(fields) = &mut context {
            fields.insert(
                "response_system_prompt".to_string(),
                Value::from(self.response_system_prompt.as_str()),
            );
            fields.insert(
                "response_model".to_string(),
                Value::from(self.response_model.as_str()),
            );
            fields.insert(
                "query_system_prompt".to_string(),
                Value::from(self.query_system_prompt.as_str()),
            );
            fields.insert(
                "query_model".to_string(),
                Value::from(self.query_model.as_str()),
            );
        }
        context
    }
}

fn context_fields(context: &Value) -> Result<&Map<String, Value>> {
    let object = context
        .as_object()
        .ok_or_else(|| Error::InvalidConfigValue {
            path: "context".to_string(),
            message: format!("expected an object, got {}", json_kind(context)),
        })?;

    match object.get(CONFIGURABLE_KEY) {
        Some(Value::Object(configurable)) => Ok(configurable),
        Some(other) => Err(Error::InvalidConfigValue {
            path: CONFIGURABLE_KEY.to_string(),
            message: format!("expected an object, got {}", json_kind(other)),
        }),
        None => Ok(object),
    }
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Result<Option<String>> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(other) => Err(Error::InvalidConfigValue {
            path: key.to_string(),
            message: format!("expected a string, got {}", json_kind(other)),
        }),
    }
}

fn object_field(fields: &Map<String, Value>, key: &str) -> Result<Option<Map<String, Value>>> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(value)) => Ok(Some(value.clone())),
        Some(other) => Err(Error::InvalidConfigValue {
            path: key.to_string(),
            message: format!("expected an object, got {}", json_kind(other)),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_flat_context() {
        let context = json!({"user_id": "alice", "retriever_provider": "elastic-local"});
        let overrides = ConfigOverrides::from_context(&context).unwrap();

        assert_eq!(overrides.user_id.as_deref(), Some("alice"));
        assert_eq!(overrides.retriever_provider.as_deref(), Some("elastic-local"));
        assert_eq!(overrides.embedding_model, None);
    }

    #[test]
    fn test_configurable_context() {
        let context = json!({
            "configurable": {"user_id": "bob"},
            "user_id": "ignored",
        });
        let overrides = ConfigOverrides::from_context(&context).unwrap();
        assert_eq!(overrides.user_id.as_deref(), Some("bob"));
    }

    #[test]
    fn test_null_is_absent() {
        let context = json!({"query_model": null});
        let overrides = ConfigOverrides::from_context(&context).unwrap();
        assert_eq!(overrides.query_model, None);
    }

    #[test]
    fn test_wrong_type_reports_field() {
        let context = json!({"user_id": 42});
        match ConfigOverrides::from_context(&context) {
            Err(Error::InvalidConfigValue { path, message }) => {
                assert_eq!(path, "user_id");
                assert!(message.contains("number"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_search_kwargs_must_be_object() {
        let context = json!({"search_kwargs": [1, 2]});
        assert!(ConfigOverrides::from_context(&context).is_err());
    }

    #[test]
    fn test_non_object_context() {
        assert!(ConfigOverrides::from_context(&json!("user")).is_err());
        assert!(ConfigOverrides::from_context(&json!({"configurable": 1})).is_err());
    }

    #[test]
    fn test_to_context_round_trip() {
        let env: HashMap<String, String> = HashMap::new();
        let config = Configuration::builder()
            .user_id("alice")
            .search_kwarg("k", 3)
            .build_with(&env);

        let rebuilt = Configuration::from_context_with(&config.to_context(), &env).unwrap();
        assert_eq!(rebuilt, config);
    }
}
