use crate::config::{Configuration, ModelName, RetrieverProvider};
use crate::error::{Error, Result, ValidationError};

/// Configuration validator
///
/// Building a configuration never validates; unknown providers and malformed
/// model names are passed through to whatever consumes them. Call this when
/// failing early is preferable.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration
    pub fn validate(config: &Configuration) -> Result<()> {
        let mut errors = Vec::new();

        Self::validate_retriever(config, &mut errors);

        Self::validate_model("embedding_model", config.embedding_model(), &mut errors);
        Self::validate_model("response_model", config.response_model(), &mut errors);
        Self::validate_model("query_model", config.query_model(), &mut errors);

        Self::validate_prompt(
            "response_system_prompt",
            config.response_system_prompt(),
            &mut errors,
        );
        Self::validate_prompt(
            "query_system_prompt",
            config.query_system_prompt(),
            &mut errors,
        );

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::ConfigValidation { errors })
        }
    }

    fn validate_retriever(config: &Configuration, errors: &mut Vec<ValidationError>) {
        if let Err(Error::InvalidConfigValue { path, message }) =
            config.retriever_provider().parse::<RetrieverProvider>()
        {
            errors.push(ValidationError::new(path, message));
        }
    }

    fn validate_model(path: &str, name: &str, errors: &mut Vec<ValidationError>) {
        if ModelName::parse(name).is_none() {
            errors.push(ValidationError::new(
                path,
                format!("Model must be in the form provider/model-name, got '{}'", name),
            ));
        }
    }

    fn validate_prompt(path: &str, prompt: &str, errors: &mut Vec<ValidationError>) {
        if prompt.trim().is_empty() {
            errors.push(ValidationError::new(path, "Prompt cannot be empty"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn build(builder: crate::config::ConfigurationBuilder) -> Configuration {
        builder.build_with(&HashMap::<String, String>::new())
    }

    #[test]
    fn test_valid_config() {
        let config = build(Configuration::builder());
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_unknown_provider() {
        let config = build(Configuration::builder().retriever_provider("weaviate"));
        match ConfigValidator::validate(&config) {
            Err(Error::ConfigValidation { errors }) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].path, "retriever_provider");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_collects_all_errors() {
        let config = build(
            Configuration::builder()
                .response_model("gpt-4")
                .query_model("haiku")
                .query_system_prompt("  "),
        );
        match ConfigValidator::validate(&config) {
            Err(Error::ConfigValidation { errors }) => {
                let paths: Vec<&str> = errors.iter().map(|e| e.path.as_str()).collect();
                assert_eq!(
                    paths,
                    vec!["response_model", "query_model", "query_system_prompt"]
                );
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
