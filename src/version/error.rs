use thiserror::Error;

use crate::platform::UnsupportedCombination;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VersionError {
    #[error("Invalid version input: {0}")]
    InvalidInput(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Unsupported(#[from] UnsupportedCombination),

    #[error("Store file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Prompt failed: {0}")]
    Terminal(String),

    #[error("Prompt task failed: {0}")]
    Task(String),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Prompt(#[from] PromptError),
}
