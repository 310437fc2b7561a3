//! Core library for the photobooth share server.
//! This crate defines the shared data structures, the QR encoder seam,
//! the photo directory helpers and the axum web server that ties them together.

pub mod config;
pub mod encoder;
pub mod photos;
pub mod structs;
pub mod traits;
pub mod web_server;

// Define a shared Error and Result type for the entire crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("QR encoding error: {0}")]
    QrEncoding(#[from] qrcode::types::QrError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Malformed data URL: {0}")]
    DataUrl(String),

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Config error: {0}")]
    Config(String),
}

/// A specialized `Result` type for this crate's operations.
pub type Result<T> = std::result::Result<T, Error>;
