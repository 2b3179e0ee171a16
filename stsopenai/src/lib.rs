//! OpenAI song suggestions for Spotistats
//!
//! Asks a chat model for three songs close to the one playing, taking its
//! key and tempo into account when they are known. The model is constrained
//! to answer `{"suggestions": [..]}` and the answer is checked field by
//! field.
//!
//! [`OpenAiClient`] implements [`stswatcher::SuggestionProvider`].

pub mod client;
pub mod error;
pub mod models;
pub mod prompt;
pub mod provider;

#[cfg(feature = "stsconfig")]
pub mod config_ext;

pub use client::{ClientBuilder, OpenAiClient, DEFAULT_MODEL};
pub use error::{Error, Result};
pub use prompt::SUGGESTION_COUNT;

#[cfg(feature = "stsconfig")]
pub use config_ext::OpenAiConfigExt;
