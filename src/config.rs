use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Local;
use rspotify::model::Country;
use tracing::debug;
use url::Url;

use crate::error::{AppError, Result};

pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8080/callback";
pub const DEFAULT_TRACKS_PER_ARTIST: usize = 5;
pub const DEFAULT_DELAY_MS: u64 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl AppCredentials {
    fn from_parts(client_id: Option<String>, client_secret: Option<String>) -> Option<Self> {
        let client_id = client_id.map(|s| s.trim().to_string()).unwrap_or_default();
        let client_secret = client_secret
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        if client_id.is_empty() || client_secret.is_empty() {
            None
        } else {
            Some(Self {
                client_id,
                client_secret,
            })
        }
    }
}

/// Source of Spotify application credentials.
///
/// Providers return `Ok(None)` when they have nothing to offer so the next one
/// in the chain gets a chance.
pub trait CredentialProvider {
    fn name(&self) -> &'static str;
    fn credentials(&self) -> Result<Option<AppCredentials>>;
}

/// Reads `SPOTIFY_CLIENT_ID` and `SPOTIFY_CLIENT_SECRET` from the environment.
pub struct EnvCredentials;

impl EnvCredentials {
    pub fn from_lookup<F>(lookup: F) -> Option<AppCredentials>
    where
        F: Fn(&str) -> Option<String>,
    {
        AppCredentials::from_parts(lookup("SPOTIFY_CLIENT_ID"), lookup("SPOTIFY_CLIENT_SECRET"))
    }
}

impl CredentialProvider for EnvCredentials {
    fn name(&self) -> &'static str {
        "environment"
    }

    fn credentials(&self) -> Result<Option<AppCredentials>> {
        Ok(Self::from_lookup(|key| std::env::var(key).ok()))
    }
}

/// Asks for the credentials on the console.
pub struct PromptCredentials;

impl CredentialProvider for PromptCredentials {
    fn name(&self) -> &'static str {
        "console prompt"
    }

    fn credentials(&self) -> Result<Option<AppCredentials>> {
        let stdin = io::stdin();
        read_credentials(&mut stdin.lock(), &mut io::stdout())
    }
}

pub fn read_credentials<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<Option<AppCredentials>> {
    let client_id = prompt_line(input, output, "Enter your Spotify Client ID: ")?;
    let client_secret = prompt_line(input, output, "Enter your Spotify Client Secret: ")?;
    Ok(AppCredentials::from_parts(client_id, client_secret))
}

fn prompt_line<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> Result<Option<String>> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

#[derive(Debug, Clone)]
pub struct Config {
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
    pub spotify_redirect_uri: String,
}

impl Config {
    /// Takes credentials from the first provider that supplies a complete set.
    pub fn resolve(providers: &[&dyn CredentialProvider], redirect_uri: &str) -> Result<Self> {
        validate_redirect_uri(redirect_uri)?;

        for provider in providers {
            if let Some(creds) = provider.credentials()? {
                debug!("Using Spotify credentials from {}", provider.name());
                return Ok(Self {
                    spotify_client_id: creds.client_id,
                    spotify_client_secret: creds.client_secret,
                    spotify_redirect_uri: redirect_uri.to_string(),
                });
            }
        }

        Err(AppError::Config(
            "SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET not provided".into(),
        ))
    }
}

/// The authorization code is delivered to a fixed local endpoint, so only
/// loopback http(s) URLs with an explicit port are accepted.
pub fn validate_redirect_uri(redirect_uri: &str) -> Result<Url> {
    let url = Url::parse(redirect_uri)
        .map_err(|e| AppError::Config(format!("Invalid redirect URI: {}", e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::Config(format!(
            "Redirect URI must use http or https, got '{}'",
            url.scheme()
        )));
    }

    let loopback = matches!(url.host_str(), Some("127.0.0.1" | "localhost" | "[::1]"));
    if !loopback {
        return Err(AppError::Config(
            "Redirect URI must point at a loopback address".into(),
        ));
    }

    if url.port().is_none() {
        return Err(AppError::Config("Redirect URI must include a port".into()));
    }

    Ok(url)
}

pub fn parse_market(code: &str) -> Result<Country> {
    let code = code.trim().to_uppercase();
    serde_json::from_value(serde_json::Value::String(code.clone()))
        .map_err(|_| AppError::Config(format!("Unknown market code: {}", code)))
}

/// Everything a single run needs besides the API client.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub input: PathBuf,
    pub playlist_name: String,
    pub description: String,
    pub public: bool,
    pub market: Country,
    pub tracks_per_artist: usize,
    pub delay: Duration,
    pub dry_run: bool,
    pub report_dir: Option<PathBuf>,
}

impl RunSettings {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        let input = input.into();
        Self {
            playlist_name: default_playlist_name(&input),
            description: default_description(),
            input,
            public: true,
            market: Country::UnitedStates,
            tracks_per_artist: DEFAULT_TRACKS_PER_ARTIST,
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
            dry_run: false,
            report_dir: None,
        }
    }
}

impl RunSettings {
    pub fn validate(&self) -> Result<()> {
        if self.tracks_per_artist == 0 {
            return Err(AppError::Config(
                "Tracks per artist must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

pub fn default_playlist_name(input: &Path) -> String {
    match input.file_stem().and_then(|s| s.to_str()) {
        Some(stem) if !stem.trim().is_empty() => format!("{} Artist Playlist", stem.trim()),
        _ => "Artist Playlist".to_string(),
    }
}

pub fn default_description() -> String {
    format!("Created on {} from artist CSV", Local::now().format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Cursor;

    struct Fixed(Option<AppCredentials>);

    impl CredentialProvider for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn credentials(&self) -> Result<Option<AppCredentials>> {
            Ok(self.0.clone())
        }
    }

    fn creds(id: &str, secret: &str) -> AppCredentials {
        AppCredentials {
            client_id: id.to_string(),
            client_secret: secret.to_string(),
        }
    }

    #[test]
    fn test_env_lookup_requires_both_values() {
        let mut env = HashMap::new();
        env.insert("SPOTIFY_CLIENT_ID", "abc".to_string());
        assert_eq!(EnvCredentials::from_lookup(|k| env.get(k).cloned()), None);

        env.insert("SPOTIFY_CLIENT_SECRET", " xyz ".to_string());
        assert_eq!(
            EnvCredentials::from_lookup(|k| env.get(k).cloned()),
            Some(creds("abc", "xyz"))
        );
    }

    #[test]
    fn test_resolve_uses_first_complete_provider() {
        let empty = Fixed(None);
        let first = Fixed(Some(creds("id-1", "secret-1")));
        let second = Fixed(Some(creds("id-2", "secret-2")));

        let config = Config::resolve(&[&empty, &first, &second], DEFAULT_REDIRECT_URI).unwrap();
        assert_eq!(config.spotify_client_id, "id-1");
        assert_eq!(config.spotify_client_secret, "secret-1");
        assert_eq!(config.spotify_redirect_uri, DEFAULT_REDIRECT_URI);
    }

    #[test]
    fn test_resolve_without_credentials_fails() {
        let empty = Fixed(None);
        let err = Config::resolve(&[&empty], DEFAULT_REDIRECT_URI).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_read_credentials_from_console() {
        let mut input = Cursor::new("  my-id \nmy-secret\n");
        let mut output = Vec::new();

        let result = read_credentials(&mut input, &mut output).unwrap();
        assert_eq!(result, Some(creds("my-id", "my-secret")));

        let prompts = String::from_utf8(output).unwrap();
        assert!(prompts.contains("Client ID"));
        assert!(prompts.contains("Client Secret"));
    }

    #[test]
    fn test_read_credentials_eof() {
        let mut input = Cursor::new("only-id\n");
        let mut output = Vec::new();
        assert_eq!(read_credentials(&mut input, &mut output).unwrap(), None);
    }

    #[test]
    fn test_redirect_uri_validation() {
        assert!(validate_redirect_uri("http://127.0.0.1:8080/callback").is_ok());
        assert!(validate_redirect_uri("http://localhost:8080").is_ok());
        assert!(validate_redirect_uri("http://127.0.0.1/callback").is_err());
        assert!(validate_redirect_uri("https://example.com:8080/callback").is_err());
        assert!(validate_redirect_uri("ftp://127.0.0.1:21").is_err());
        assert!(validate_redirect_uri("not a url").is_err());
    }

    #[test]
    fn test_parse_market() {
        assert_eq!(parse_market("us").unwrap(), Country::UnitedStates);
        assert_eq!(parse_market(" de ").unwrap(), Country::Germany);
        assert!(parse_market("XX").is_err());
    }

    #[test]
    fn test_default_playlist_name() {
        assert_eq!(
            default_playlist_name(Path::new("data/LIB 2026 lineup.csv")),
            "LIB 2026 lineup Artist Playlist"
        );
        assert_eq!(default_playlist_name(Path::new("")), "Artist Playlist");
    }

    #[test]
    fn test_run_settings_defaults() {
        let settings = RunSettings::new("artists.csv");
        assert!(settings.public);
        assert!(!settings.dry_run);
        assert_eq!(settings.tracks_per_artist, 5);
        assert_eq!(settings.delay, Duration::from_millis(100));
        assert!(settings.description.starts_with("Created on "));
    }

    #[test]
    fn test_zero_tracks_per_artist_is_rejected() {
        let mut settings = RunSettings::new("artists.csv");
        assert!(settings.validate().is_ok());

        settings.tracks_per_artist = 0;
        assert!(matches!(settings.validate(), Err(AppError::Config(_))));
    }
}
