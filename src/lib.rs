pub mod config;
pub mod error;
pub mod input;
pub mod matcher;
pub mod playlist;
pub mod spotify;

pub use config::{Config, RunSettings};
pub use error::{AppError, Result};
pub use playlist::{ArtistOutcome, PlaylistMaker, RunReport};
pub use spotify::{CatalogApi, SpotifyClient};
