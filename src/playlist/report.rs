use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;

pub const FAILURE_PREVIEW_LIMIT: usize = 5;

/// What happened to one row of the input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ArtistOutcome {
    Added(usize),
    NotFound,
    NoTracks,
    Error(String),
}

impl ArtistOutcome {
    pub fn is_failure(&self) -> bool {
        !matches!(self, ArtistOutcome::Added(_))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistReport {
    pub query: String,
    pub resolved_name: Option<String>,
    pub outcome: ArtistOutcome,
    /// Set when the top search hit does not look like the name searched for.
    pub suspicious: bool,
}

impl ArtistReport {
    /// How the artist is shown in the failure list.
    pub fn failure_label(&self) -> String {
        match &self.outcome {
            ArtistOutcome::NoTracks => format!("{} (no tracks found)", self.query),
            _ => self.query.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub playlist_name: String,
    pub playlist_id: Option<String>,
    pub playlist_url: Option<String>,
    pub dry_run: bool,
    pub tracks_collected: usize,
    pub tracks_added: usize,
    pub artists: Vec<ArtistReport>,
}

impl RunReport {
    pub fn new(playlist_name: String, dry_run: bool) -> Self {
        Self {
            playlist_name,
            playlist_id: None,
            playlist_url: None,
            dry_run,
            tracks_collected: 0,
            tracks_added: 0,
            artists: Vec::new(),
        }
    }

    pub fn artists_processed(&self) -> usize {
        self.artists.len()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ArtistReport> {
        self.artists.iter().filter(|a| a.outcome.is_failure())
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    /// First `limit` failure labels plus how many were left out.
    pub fn failure_preview(&self, limit: usize) -> (Vec<String>, usize) {
        let labels: Vec<String> = self.failures().map(ArtistReport::failure_label).collect();
        let remaining = labels.len().saturating_sub(limit);
        (labels.into_iter().take(limit).collect(), remaining)
    }

    pub fn suspicious_matches(&self) -> impl Iterator<Item = &ArtistReport> {
        self.artists
            .iter()
            .filter(|a| a.suspicious && !a.outcome.is_failure())
    }

    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        fs::create_dir_all(dir)?;

        let filename = dir.join(format!("playlist_run_{}.json", timestamp));
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&filename, json)?;

        info!("Run report saved to: {}", filename.display());
        Ok(filename)
    }

    pub fn print_summary(&self) {
        println!();
        println!("{}", "=".repeat(50));
        if self.dry_run {
            println!("{}", "DRY RUN COMPLETE - no playlist created".yellow().bold());
        } else {
            println!("{}", "✓ PLAYLIST CREATED SUCCESSFULLY!".green().bold());
        }
        println!("  Name: {}", self.playlist_name);
        if self.dry_run {
            println!("  Tracks found: {}", self.tracks_collected);
        } else {
            println!("  Total tracks: {}", self.tracks_added);
        }
        if let Some(url) = &self.playlist_url {
            println!("  Spotify URL: {}", url.cyan());
        }
        println!("  Artists processed: {}", self.artists_processed());

        let (preview, remaining) = self.failure_preview(FAILURE_PREVIEW_LIMIT);
        if !preview.is_empty() {
            println!(
                "  Artists not found/skipped: {}",
                self.failure_count().to_string().red()
            );
            println!("  These artists could not be found on Spotify:");
            for label in &preview {
                println!("    - {}", label);
            }
            if remaining > 0 {
                println!("    ... and {} more", remaining);
            }
        }

        let suspicious: Vec<_> = self.suspicious_matches().collect();
        if !suspicious.is_empty() {
            println!("  {}", "Check these matches:".yellow());
            for artist in suspicious {
                println!(
                    "    - {} -> {}",
                    artist.query,
                    artist.resolved_name.as_deref().unwrap_or("?")
                );
            }
        }
        println!("{}", "=".repeat(50));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artist(query: &str, outcome: ArtistOutcome) -> ArtistReport {
        ArtistReport {
            query: query.to_string(),
            resolved_name: None,
            outcome,
            suspicious: false,
        }
    }

    #[test]
    fn test_failure_preview_caps_at_limit() {
        let mut report = RunReport::new("Test".into(), false);
        report.artists.push(artist("Found", ArtistOutcome::Added(5)));
        for i in 0..7 {
            report.artists.push(artist(&format!("Missing {}", i), ArtistOutcome::NotFound));
        }

        let (preview, remaining) = report.failure_preview(FAILURE_PREVIEW_LIMIT);
        assert_eq!(preview.len(), 5);
        assert_eq!(preview[0], "Missing 0");
        assert_eq!(remaining, 2);
        assert_eq!(report.failure_count(), 7);
        assert_eq!(report.artists_processed(), 8);
    }

    #[test]
    fn test_failure_labels() {
        let mut report = RunReport::new("Test".into(), false);
        report.artists.push(artist("A", ArtistOutcome::NoTracks));
        report.artists.push(artist("B", ArtistOutcome::Error("timeout".into())));
        report.artists.push(artist("C", ArtistOutcome::NotFound));

        let (preview, remaining) = report.failure_preview(FAILURE_PREVIEW_LIMIT);
        assert_eq!(preview, vec!["A (no tracks found)", "B", "C"]);
        assert_eq!(remaining, 0);
    }

    #[test]
    fn test_suspicious_matches_exclude_failures() {
        let mut report = RunReport::new("Test".into(), false);
        let mut flagged = artist("The Band", ArtistOutcome::Added(3));
        flagged.suspicious = true;
        flagged.resolved_name = Some("Someone Else".into());
        report.artists.push(flagged);
        let mut failed = artist("Other", ArtistOutcome::NoTracks);
        failed.suspicious = true;
        report.artists.push(failed);

        let names: Vec<_> = report.suspicious_matches().map(|a| a.query.as_str()).collect();
        assert_eq!(names, vec!["The Band"]);
    }

    #[test]
    fn test_save_writes_json() {
        let dir = tempfile::tempdir().unwrap();
        let mut report = RunReport::new("Lineup".into(), true);
        report.artists.push(artist("A", ArtistOutcome::Added(2)));
        report.tracks_collected = 2;

        let path = report.save(&dir.path().join("reports")).unwrap();
        let contents = std::fs::read_to_string(path).unwrap();
        let parsed: RunReport = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed.playlist_name, "Lineup");
        assert_eq!(parsed.artists[0].outcome, ArtistOutcome::Added(2));
        assert!(contents.contains("\"status\": \"added\""));
    }
}
