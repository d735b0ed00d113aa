//! Precedence tests for explicit values, environment variables and defaults

use retrieval_graph::config::{ConfigurationBuilder, EnvProvider, RetrieverProvider};
use retrieval_graph::{Configuration, IndexConfiguration};
use std::collections::HashMap;

fn env(vars: &[(&str, &str)]) -> HashMap<String, String> {
    vars.iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn full_env() -> HashMap<String, String> {
    env(&[
        ("USER_ID", "env_user"),
        ("EMBEDDING_MODEL", "cohere/embed-english-v3.0"),
        ("RETRIEVER_PROVIDER", "mongodb"),
        ("RESPONSE_MODEL", "openai/gpt-4"),
        ("QUERY_MODEL", "openai/gpt-3.5-turbo"),
    ])
}

fn explicit(builder: ConfigurationBuilder) -> ConfigurationBuilder {
    builder
        .user_id("test_user")
        .embedding_model("openai/text-embedding-ada-002")
        .retriever_provider("pinecone")
        .response_model("anthropic/claude-3-opus-20240229")
        .query_model("anthropic/claude-3-sonnet-20240229")
}

#[test]
fn test_configuration_defaults() {
    let config = Configuration::builder().build_with(&env(&[]));

    assert_eq!(config.user_id(), "");
    assert_eq!(config.embedding_model(), "openai/text-embedding-3-small");
    assert_eq!(config.retriever_provider(), "elastic");
    assert_eq!(
        config.response_model(),
        "anthropic/claude-3-5-sonnet-20240620"
    );
    assert_eq!(config.query_model(), "anthropic/claude-3-haiku-20240307");
}

#[test]
fn test_configuration_with_values() {
    let config = explicit(Configuration::builder()).build_with(&env(&[]));

    assert_eq!(config.user_id(), "test_user");
    assert_eq!(config.embedding_model(), "openai/text-embedding-ada-002");
    assert_eq!(config.retriever_provider(), "pinecone");
    assert_eq!(config.response_model(), "anthropic/claude-3-opus-20240229");
    assert_eq!(config.query_model(), "anthropic/claude-3-sonnet-20240229");
}

#[test]
fn test_env_populates_defaults() {
    let config = Configuration::builder().build_with(&full_env());

    assert_eq!(config.user_id(), "env_user");
    assert_eq!(config.embedding_model(), "cohere/embed-english-v3.0");
    assert_eq!(config.retriever_provider(), "mongodb");
    assert_eq!(config.response_model(), "openai/gpt-4");
    assert_eq!(config.query_model(), "openai/gpt-3.5-turbo");
}

#[test]
fn test_explicit_values_override_env() {
    let config = explicit(Configuration::builder()).build_with(&full_env());

    assert_eq!(config.user_id(), "test_user");
    assert_eq!(config.embedding_model(), "openai/text-embedding-ada-002");
    assert_eq!(config.retriever_provider(), "pinecone");
    assert_eq!(config.response_model(), "anthropic/claude-3-opus-20240229");
    assert_eq!(config.query_model(), "anthropic/claude-3-sonnet-20240229");
}

#[test]
fn test_index_configuration_reads_env() {
    let vars = env(&[
        ("USER_ID", "index_user"),
        ("EMBEDDING_MODEL", "cohere/embed-english-v3.0"),
        ("RETRIEVER_PROVIDER", "mongodb"),
    ]);
    let config = IndexConfiguration::builder().build_with(&vars);

    assert_eq!(config.user_id(), "index_user");
    assert_eq!(config.embedding_model(), "cohere/embed-english-v3.0");
    assert_eq!(config.retriever_provider(), "mongodb");
    assert_eq!(config.retriever(), Some(RetrieverProvider::MongoDb));
}

#[test]
fn test_index_configuration_ignores_agent_vars() {
    // Only the three index variables matter here; the agent ones are unused
    let config = IndexConfiguration::builder().build_with(&full_env());
    let agent = Configuration::builder().build_with(&full_env());

    assert_eq!(&config, agent.index());
}

#[test]
fn test_construction_is_deterministic() {
    let vars = full_env();
    let first = Configuration::builder()
        .user_id("alice")
        .search_kwarg("k", 6)
        .build_with(&vars);
    let second = Configuration::builder()
        .user_id("alice")
        .search_kwarg("k", 6)
        .build_with(&vars);

    assert_eq!(first, second);
}

#[test]
fn test_explicit_default_literal_loses_to_env() {
    // A value equal to the built-in default counts as unset
    let config = Configuration::builder()
        .embedding_model("openai/text-embedding-3-small")
        .retriever_provider("elastic")
        .response_model("anthropic/claude-3-5-sonnet-20240620")
        .query_model("anthropic/claude-3-haiku-20240307")
        .build_with(&full_env());

    assert_eq!(config.embedding_model(), "cohere/embed-english-v3.0");
    assert_eq!(config.retriever_provider(), "mongodb");
    assert_eq!(config.response_model(), "openai/gpt-4");
    assert_eq!(config.query_model(), "openai/gpt-3.5-turbo");
}

#[test]
fn test_unknown_provider_passes_through() {
    let config = IndexConfiguration::builder()
        .build_with(&env(&[("RETRIEVER_PROVIDER", "weaviate")]));

    assert_eq!(config.retriever_provider(), "weaviate");
    assert_eq!(config.retriever(), None);
}

#[test]
fn test_custom_env_provider() {
    struct QueryModelOnly;

    impl EnvProvider for QueryModelOnly {
        fn var(&self, key: &str) -> Option<String> {
            (key == "QUERY_MODEL").then(|| "groq/llama-3.1-8b".to_string())
        }
    }

    let config = Configuration::builder().build_with(&QueryModelOnly);
    assert_eq!(config.query_model(), "groq/llama-3.1-8b");
    assert_eq!(
        config.response_model(),
        "anthropic/claude-3-5-sonnet-20240620"
    );
}
