pub mod catalog;
pub mod client;
pub mod models;

pub use catalog::CatalogApi;
pub use client::SpotifyClient;
pub use models::{AuthenticatedUser, CreatedPlaylist, NewPlaylist, ResolvedArtist, TrackUri};
