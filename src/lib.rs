pub mod config;
pub mod dict;
pub mod error;
pub mod fonts;
pub mod geometry;
pub mod pipeline;
pub mod placement;
pub mod preview;
pub mod record;
pub mod render;
pub mod scene;

pub use config::GenConfig;
pub use error::{ConfigError, PipelineError, RenderError};
pub use pipeline::{BatchOptions, BatchSummary, run_batch};
pub use render::{RenderSettings, Renderer};
