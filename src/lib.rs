//! Prompt-to-image client for the Pollinations endpoint.
//!
//! A [`GenerationSession`] ties together the form inputs, a cosmetic
//! [`ProgressSimulator`], the HTTP [`ImageClient`] and the fixed 10% border crop,
//! and saves the result as `generated-image-<millis>.png`.

pub mod config;
pub mod crop;
pub mod download;
pub mod error;
pub mod form;
pub mod logger;
pub mod models;
pub mod pollinations;
pub mod progress;
pub mod session;

pub use config::{Config, PollinationsConfig, ProgressConfig};
pub use crop::{crop_and_stretch, CropRect};
pub use download::{download_filename, DownloadAction};
pub use error::{GenerationError, Result};
pub use form::FormController;
pub use models::{
    AspectCategory, CroppedImage, GenerationRequest, RenderedImage, SessionState, StyleCategory,
};
pub use pollinations::{request_url, ImageClient, ImageSource};
pub use progress::{ProgressSimulator, ProgressSnapshot};
pub use session::GenerationSession;
