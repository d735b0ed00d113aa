use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Vector store backends the retrieval graph knows how to select
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RetrieverProvider {
    /// Elastic Cloud
    Elastic,
    /// Self-hosted Elasticsearch
    ElasticLocal,
    /// Pinecone managed index
    Pinecone,
    /// MongoDB Atlas vector search
    #[serde(rename = "mongodb")]
    MongoDb,
}

impl RetrieverProvider {
    pub const ALL: [RetrieverProvider; 4] = [
        RetrieverProvider::Elastic,
        RetrieverProvider::ElasticLocal,
        RetrieverProvider::Pinecone,
        RetrieverProvider::MongoDb,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Elastic => "elastic",
            Self::ElasticLocal => "elastic-local",
            Self::Pinecone => "pinecone",
            Self::MongoDb => "mongodb",
        }
    }
}

impl fmt::Display for RetrieverProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RetrieverProvider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|provider| provider.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|p| p.as_str()).collect();
                Error::InvalidConfigValue {
                    path: "retriever_provider".to_string(),
                    message: format!("Provider must be one of {:?}, got '{}'", valid, s),
                }
            })
    }
}

/// A model identifier of the form `provider/model-name`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelName<'a> {
    provider: &'a str,
    model: &'a str,
}

impl<'a> ModelName<'a> {
    /// Split on the first `/`; `None` if either side is missing
    pub fn parse(name: &'a str) -> Option<Self> {
        let (provider, model) = name.split_once('/')?;
        if provider.is_empty() || model.is_empty() {
            return None;
        }
        Some(Self { provider, model })
    }

    pub fn provider(&self) -> &'a str {
        self.provider
    }

    pub fn model(&self) -> &'a str {
        self.model
    }
}
