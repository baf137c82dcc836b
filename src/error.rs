use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Spotify API error: {0}")]
    SpotifyApi(#[from] rspotify::ClientError),

    #[error("Invalid Spotify ID: {0}")]
    InvalidId(#[from] rspotify::model::IdError),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Input file '{}' not found", .0.display())]
    FileNotFound(PathBuf),

    #[error("Error reading input: {0}")]
    Read(String),

    #[error("Failed to create playlist: {0}")]
    PlaylistCreate(String),

    #[error("Failed to add tracks ({appended}/{total} added before the error): {message}")]
    Append {
        appended: usize,
        total: usize,
        playlist_url: Option<String>,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
