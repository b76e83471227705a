//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid feeding interval: {0}")]
    InvalidInterval(String),

    #[error("Invalid pet data: {0}")]
    InvalidPet(String),

    // ---------------------------
    // Logic errors
    // ---------------------------
    #[error("Pet #{0} not found")]
    PetNotFound(i64),

    #[error("Feed dated {feed} lies after {today}")]
    FutureFeed { feed: String, today: String },

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // ---------------------------
    // Import / export errors
    // ---------------------------
    #[error("Malformed JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Import rejected: {0}")]
    Import(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
