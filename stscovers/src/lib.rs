//! Album art for Spotistats
//!
//! Downloads the cover of the playing track and makes sure the bytes are an
//! image before handing them to the display. Only the header is read, to
//! learn the format and the dimensions; decoding and scaling belong to the
//! display.

pub mod client;
pub mod error;
pub mod provider;

pub use client::{probe_image, ClientBuilder, CoverClient, ImageInfo};
pub use error::{Error, Result};
