//! Error types for the video extension.

use mdx_video_config::ConfigError;

/// Error while building the extension.
#[derive(Debug, thiserror::Error)]
pub enum EmbedError {
    /// Invalid configuration.
    #[error("configuration error")]
    Config(#[from] ConfigError),

    /// A rule with this name is already in the chain.
    #[error("inline rule already registered: {0}")]
    DuplicateRule(String),
}
