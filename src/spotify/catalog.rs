use rspotify::model::Country;

use crate::error::Result;
use crate::spotify::models::{
    AuthenticatedUser, CreatedPlaylist, NewPlaylist, ResolvedArtist, TrackUri,
};

/// The remote calls a playlist run makes, in the order it makes them.
///
/// [`SpotifyClient`](crate::spotify::SpotifyClient) talks to the Web API;
/// tests substitute an in-memory catalog.
#[allow(async_fn_in_trait)]
pub trait CatalogApi {
    /// Profile of the user the session was authorized for.
    async fn current_user(&self) -> Result<AuthenticatedUser>;

    /// Top search hit for an artist name, if any.
    async fn search_artist(&self, name: &str) -> Result<Option<ResolvedArtist>>;

    /// The artist's top tracks in `market`, in Spotify's ranking order.
    async fn top_tracks(&self, artist: &ResolvedArtist, market: Country) -> Result<Vec<TrackUri>>;

    async fn create_playlist(
        &self,
        owner: &AuthenticatedUser,
        playlist: &NewPlaylist,
    ) -> Result<CreatedPlaylist>;

    /// Appends one batch. Callers keep batches within the API's per-call limit.
    async fn add_tracks(&self, playlist_id: &str, tracks: &[TrackUri]) -> Result<()>;
}
