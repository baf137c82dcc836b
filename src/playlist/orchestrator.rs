use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::config::RunSettings;
use crate::error::{AppError, Result};
use crate::input;
use crate::matcher::is_suspicious_match;
use crate::playlist::report::{ArtistOutcome, ArtistReport, RunReport};
use crate::spotify::{AuthenticatedUser, CatalogApi, NewPlaylist, TrackUri};

/// Most items the Web API accepts in one add-items call.
pub const MAX_TRACKS_PER_REQUEST: usize = 100;
pub const MAX_DESCRIPTION_CHARS: usize = 300;
const TRUNCATION_MARKER: &str = "...";

/// Resolution of a single artist row.
#[derive(Debug, Clone)]
pub struct ArtistTracks {
    pub report: ArtistReport,
    pub tracks: Vec<TrackUri>,
}

pub struct PlaylistMaker<A> {
    api: A,
    settings: RunSettings,
}

impl<A: CatalogApi> PlaylistMaker<A> {
    pub fn new(api: A, settings: RunSettings) -> Self {
        Self { api, settings }
    }

    #[cfg(test)]
    pub(crate) fn api(&self) -> &A {
        &self.api
    }

    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    /// Authenticate, load artists, collect their top tracks, then create and
    /// fill the playlist. Setup and playlist failures end the run; per-artist
    /// failures are recorded in the report.
    pub async fn run(&self) -> Result<RunReport> {
        println!("\nAuthenticating with Spotify...");
        let user = self
            .api
            .current_user()
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;
        println!(
            "{} Authenticated as: {} ({})",
            "✓".green(),
            user.label(),
            user.id
        );

        println!("\nReading artists from {}...", self.settings.input.display());
        let artists = input::load_artists(&self.settings.input)?;
        println!("{} Found {} artists", "✓".green(), artists.len());

        println!("\nFetching top tracks from Spotify...");
        let collected = self.collect_tracks(&artists).await;

        let mut report = RunReport::new(self.settings.playlist_name.clone(), self.settings.dry_run);
        let mut track_uris = Vec::new();
        for artist in collected {
            track_uris.extend(artist.tracks);
            report.artists.push(artist.report);
        }
        report.tracks_collected = track_uris.len();

        if self.settings.dry_run {
            info!(
                "Dry run: skipping playlist creation ({} tracks found)",
                track_uris.len()
            );
            return Ok(report);
        }

        self.build_playlist(&user, &track_uris, &mut report).await?;
        Ok(report)
    }

    /// Resolve every artist in input order, pausing between artists.
    pub async fn collect_tracks(&self, artists: &[String]) -> Vec<ArtistTracks> {
        let pb = ProgressBar::new(artists.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        let mut results = Vec::with_capacity(artists.len());
        for (i, name) in artists.iter().enumerate() {
            pb.set_message(name.clone());
            pb.suspend(|| println!("  Processing {}/{}: {}", i + 1, artists.len(), name));

            let result = self.process_artist(name).await;
            pb.suspend(|| println!("    {}", describe_outcome(&result)));
            results.push(result);
            pb.inc(1);

            if !self.settings.delay.is_zero() {
                tokio::time::sleep(self.settings.delay).await;
            }
        }

        pb.finish_and_clear();
        results
    }

    /// Search for the artist, take the first hit, and keep its top tracks.
    pub async fn process_artist(&self, name: &str) -> ArtistTracks {
        let mut report = ArtistReport {
            query: name.to_string(),
            resolved_name: None,
            outcome: ArtistOutcome::NotFound,
            suspicious: false,
        };

        let artist = match self.api.search_artist(name).await {
            Ok(Some(artist)) => artist,
            Ok(None) => {
                debug!("No search results for {}", name);
                return ArtistTracks {
                    report,
                    tracks: Vec::new(),
                };
            }
            Err(e) => {
                warn!("Artist search failed for {}: {}", name, e);
                report.outcome = ArtistOutcome::Error(e.to_string());
                return ArtistTracks {
                    report,
                    tracks: Vec::new(),
                };
            }
        };

        report.suspicious = is_suspicious_match(name, &artist.name);
        report.resolved_name = Some(artist.name.clone());

        let tracks = match self.api.top_tracks(&artist, self.settings.market).await {
            Ok(tracks) => select_top(tracks, self.settings.tracks_per_artist),
            Err(e) => {
                warn!("Top tracks lookup failed for {}: {}", artist.name, e);
                report.outcome = ArtistOutcome::Error(e.to_string());
                return ArtistTracks {
                    report,
                    tracks: Vec::new(),
                };
            }
        };

        report.outcome = if tracks.is_empty() {
            ArtistOutcome::NoTracks
        } else {
            ArtistOutcome::Added(tracks.len())
        };

        ArtistTracks { report, tracks }
    }

    async fn build_playlist(
        &self,
        user: &AuthenticatedUser,
        track_uris: &[TrackUri],
        report: &mut RunReport,
    ) -> Result<()> {
        println!("\nCreating playlist '{}'...", self.settings.playlist_name);
        println!("Expected to add {} tracks", track_uris.len());

        let request = NewPlaylist {
            name: self.settings.playlist_name.clone(),
            description: truncate_description(&self.settings.description),
            public: self.settings.public,
        };

        let playlist = self
            .api
            .create_playlist(user, &request)
            .await
            .map_err(|e| AppError::PlaylistCreate(e.to_string()))?;
        println!("{} Playlist created successfully!", "✓".green());

        report.playlist_id = Some(playlist.id.clone());
        report.playlist_url = playlist.url.clone();

        println!("Adding tracks...");
        let appended = self
            .append_tracks(&playlist.id, track_uris)
            .await
            .map_err(|(appended, e)| AppError::Append {
                appended,
                total: track_uris.len(),
                playlist_url: playlist.url.clone(),
                message: e.to_string(),
            })?;
        report.tracks_added = appended;

        info!(
            "Playlist {} populated with {} tracks",
            playlist.name, appended
        );
        Ok(())
    }

    /// Append in order, one call per batch. On failure, returns how many tracks
    /// were appended before the failing batch; earlier batches stay applied.
    pub async fn append_tracks(
        &self,
        playlist_id: &str,
        track_uris: &[TrackUri],
    ) -> std::result::Result<usize, (usize, AppError)> {
        let mut appended = 0;
        for (i, batch) in track_uris.chunks(MAX_TRACKS_PER_REQUEST).enumerate() {
            if let Err(e) = self.api.add_tracks(playlist_id, batch).await {
                warn!("Failed to add batch {} to playlist: {}", i + 1, e);
                return Err((appended, e));
            }
            appended += batch.len();
            println!("  Added {} tracks", batch.len());
        }
        Ok(appended)
    }
}

/// First `limit` tracks, keeping the ranking order.
pub fn select_top(mut tracks: Vec<TrackUri>, limit: usize) -> Vec<TrackUri> {
    tracks.truncate(limit);
    tracks
}

/// Cut descriptions longer than the API allows to exactly
/// [`MAX_DESCRIPTION_CHARS`] characters, ending with a marker.
pub fn truncate_description(description: &str) -> String {
    if description.chars().count() <= MAX_DESCRIPTION_CHARS {
        return description.to_string();
    }

    let keep = MAX_DESCRIPTION_CHARS - TRUNCATION_MARKER.chars().count();
    let mut truncated: String = description.chars().take(keep).collect();
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}

fn describe_outcome(result: &ArtistTracks) -> String {
    let report = &result.report;
    match &report.outcome {
        ArtistOutcome::Added(count) => format!(
            "{} Added {} tracks from {}",
            "✓".green(),
            count,
            report.resolved_name.as_deref().unwrap_or(&report.query)
        ),
        ArtistOutcome::NotFound => format!("{} Artist not found on Spotify", "✗".red()),
        ArtistOutcome::NoTracks => format!("{} No tracks found", "✗".red()),
        ArtistOutcome::Error(message) => format!("{} Error: {}", "✗".red(), message),
    }
}
