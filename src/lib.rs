// Public modules
pub mod client;
pub mod config;
pub mod error;
pub mod menu;
pub mod observability;
pub mod platform;
pub mod render;
pub mod sse;
pub mod types;

// Re-exports
pub use client::{ChatClient, FragmentStream, ReplySummary};
pub use config::{Configuration, LoadOutcome, RawDocument};
pub use error::{Error, Result};
pub use observability::register_biometrics;
pub use render::{PlainTextRenderer, Renderer};
pub use sse::{StreamEvent, decode_stream};
pub use types::*;
