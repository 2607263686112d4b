use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal configuration problems, detected before any sample is produced.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("dictionary file not found: {0}")]
    DictionaryNotFound(PathBuf),

    #[error("dictionary file is not valid UTF-8: {0}")]
    DictionaryEncoding(PathBuf),

    #[error("failed to read dictionary {path}: {source}")]
    DictionaryIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("label set is empty, nothing to generate")]
    NoLabels,
}

/// Failure reported by the renderer collaborator for a single sample.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("renderer reported failure: {0}")]
    Failed(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("sample {index} ({label:?}): {source}")]
    Render {
        index: u32,
        label: String,
        #[source]
        source: RenderError,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("failed to encode manifest record: {0}")]
    Manifest(#[from] serde_json::Error),
}
