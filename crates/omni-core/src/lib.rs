//! Omni Core - label-to-text engine for image understanding.
//!
//! Omni turns a ranked list of image-classification labels into a
//! natural-language description of the image, or an answer to a free-text
//! question about it, each with a confidence score. Today the answers come
//! from a rule-based backend; a trained vision-language model can take its
//! place behind the same [`InferenceBackend`] trait without changing callers.
//!
//! # Architecture
//!
//! ```text
//! Request → validate (api) → Engine → [answer cache] → backend → text + confidence
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use omni_core::{Config, Engine, Label};
//!
//! #[tokio::main]
//! async fn main() -> omni_core::Result<()> {
//!     let config = Config::load()?;
//!     let engine = Engine::new(&config);
//!
//!     let labels = vec![Label::new("cat", 0.95), Label::new("furniture", 0.3)];
//!     let answer = engine.answer(&labels, "What animal is in the image?").await?;
//!     println!("{} ({:.2})", answer.text, answer.confidence);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod intent;
pub mod output;
pub mod templates;
pub mod types;

// Re-exports for convenient access
pub use api::{
    AskRequest, AskResponse, BatchRequest, BatchResponse, DescribeRequest, DescribeResponse,
    HealthResponse, Service,
};
pub use config::Config;
pub use engine::{Engine, EngineMode, EngineStatus, InferenceBackend};
pub use error::{ConfigError, EngineError, EngineResult, OmniError, Result};
pub use intent::Intent;
pub use output::{OutputFormat, OutputWriter};
pub use types::{Answer, Description, Label};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
