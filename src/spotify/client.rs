use rspotify::{
    model::{ArtistId, Country, Market, PlayableId, PlaylistId, SearchResult, SearchType, TrackId, UserId},
    prelude::*,
    scopes, AuthCodeSpotify, Credentials, OAuth,
};
use std::io::{self, Write};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::spotify::catalog::CatalogApi;
use crate::spotify::models::{
    AuthenticatedUser, CreatedPlaylist, NewPlaylist, ResolvedArtist, TrackUri,
};

pub struct SpotifyClient {
    client: AuthCodeSpotify,
}

impl SpotifyClient {
    /// Runs the authorization-code flow interactively: the authorize URL is
    /// opened in a browser (and printed), and the user pastes back the URL
    /// they were redirected to.
    pub async fn authorize(config: &Config) -> Result<Self> {
        let creds = Credentials::new(&config.spotify_client_id, &config.spotify_client_secret);

        let oauth = OAuth {
            redirect_uri: config.spotify_redirect_uri.clone(),
            scopes: scopes!("playlist-modify-public", "playlist-modify-private"),
            ..Default::default()
        };

        let client = AuthCodeSpotify::new(creds, oauth);

        let auth_url = client
            .get_authorize_url(false)
            .map_err(|e| AppError::Auth(format!("Failed to build authorization URL: {}", e)))?;

        if let Err(e) = webbrowser::open(&auth_url) {
            debug!("Could not open a browser: {}", e);
        }
        println!("\nOpen this URL in your browser to authorize Spotify:");
        println!("{}\n", auth_url);

        print!("Enter the URL you were redirected to: ");
        io::stdout().flush()?;

        let mut redirect_url = String::new();
        io::stdin().read_line(&mut redirect_url)?;

        let code = client
            .parse_response_code(redirect_url.trim())
            .ok_or_else(|| AppError::Auth("Failed to parse authorization code".into()))?;

        client
            .request_token(&code)
            .await
            .map_err(|e| AppError::Auth(format!("Token exchange rejected: {}", e)))?;

        info!("Obtained Spotify access token");

        Ok(Self { client })
    }
}

impl CatalogApi for SpotifyClient {
    async fn current_user(&self) -> Result<AuthenticatedUser> {
        let user = self.client.current_user().await?;
        let authenticated = AuthenticatedUser {
            id: user.id.id().to_string(),
            display_name: user.display_name,
        };

        info!(
            "Successfully authenticated as Spotify user: {}",
            authenticated.label()
        );
        Ok(authenticated)
    }

    async fn search_artist(&self, name: &str) -> Result<Option<ResolvedArtist>> {
        let query = format!("artist:{}", name);
        let result = self
            .client
            .search(&query, SearchType::Artist, None, None, Some(1), None)
            .await?;

        match result {
            SearchResult::Artists(page) => Ok(page.items.into_iter().next().map(|artist| {
                debug!("Search '{}' resolved to {} ({})", name, artist.name, artist.id.id());
                ResolvedArtist {
                    id: artist.id.id().to_string(),
                    name: artist.name,
                }
            })),
            _ => {
                warn!("Artist search for '{}' returned a non-artist result", name);
                Ok(None)
            }
        }
    }

    async fn top_tracks(&self, artist: &ResolvedArtist, market: Country) -> Result<Vec<TrackUri>> {
        let artist_id = ArtistId::from_id(&artist.id)?;
        let tracks = self
            .client
            .artist_top_tracks(artist_id, Some(Market::Country(market)))
            .await?;

        Ok(tracks
            .into_iter()
            .filter_map(|track| match track.id {
                Some(id) => Some(TrackUri(id.uri())),
                None => {
                    // Local tracks have no catalog ID
                    debug!("Skipping local track: {}", track.name);
                    None
                }
            })
            .collect())
    }

    async fn create_playlist(
        &self,
        owner: &AuthenticatedUser,
        playlist: &NewPlaylist,
    ) -> Result<CreatedPlaylist> {
        let user_id = UserId::from_id(&owner.id)?;
        let created = self
            .client
            .user_playlist_create(
                user_id,
                &playlist.name,
                Some(playlist.public),
                Some(false),
                Some(&playlist.description),
            )
            .await?;

        info!("Created Spotify playlist: {}", created.name);

        Ok(CreatedPlaylist {
            id: created.id.id().to_string(),
            name: created.name,
            url: created.external_urls.get("spotify").cloned(),
        })
    }

    async fn add_tracks(&self, playlist_id: &str, tracks: &[TrackUri]) -> Result<()> {
        if tracks.is_empty() {
            return Ok(());
        }

        let playlist_id = PlaylistId::from_id(playlist_id)?;
        let items = tracks
            .iter()
            .map(|uri| TrackId::from_uri(uri.as_str()).map(|id| PlayableId::Track(id.into_static())))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        self.client
            .playlist_add_items(playlist_id, items, None)
            .await?;

        debug!("Added {} tracks to playlist", tracks.len());
        Ok(())
    }
}
