use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use artists2playlist::config::{
    parse_market, CredentialProvider, EnvCredentials, PromptCredentials, DEFAULT_DELAY_MS,
    DEFAULT_REDIRECT_URI, DEFAULT_TRACKS_PER_ARTIST,
};
use artists2playlist::{input, AppError, Config, PlaylistMaker, RunSettings, SpotifyClient};

#[derive(Parser)]
#[command(name = "artists2playlist")]
#[command(about = "Build a Spotify playlist from the top tracks of artists in a CSV file")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a playlist from an artist CSV
    Create(CreateArgs),

    /// List the artists that would be read from a CSV
    Artists {
        /// CSV file with a header row and artist names in the first column
        input: PathBuf,
    },

    /// Show setup guide
    Setup,
}

#[derive(Args)]
struct CreateArgs {
    /// CSV file with a header row and artist names in the first column
    input: PathBuf,

    /// Playlist name (defaults to "<file name> Artist Playlist")
    #[arg(long)]
    name: Option<String>,

    /// Playlist description (defaults to the creation date)
    #[arg(long)]
    description: Option<String>,

    /// Create a private playlist
    #[arg(long)]
    private: bool,

    /// Market used to rank top tracks
    #[arg(long, default_value = "US")]
    market: String,

    /// Number of top tracks to take from each artist
    #[arg(long, default_value_t = DEFAULT_TRACKS_PER_ARTIST)]
    tracks_per_artist: usize,

    /// Pause after each artist, in milliseconds
    #[arg(long, default_value_t = DEFAULT_DELAY_MS)]
    delay_ms: u64,

    /// Resolve artists and tracks without creating a playlist
    #[arg(long)]
    dry_run: bool,

    /// Write a JSON run report into this directory
    #[arg(long)]
    report_dir: Option<PathBuf>,

    /// OAuth redirect URI registered for your Spotify app
    #[arg(long, env = "SPOTIFY_REDIRECT_URI", default_value = DEFAULT_REDIRECT_URI)]
    redirect_uri: String,
}

impl CreateArgs {
    fn into_settings(self) -> Result<RunSettings> {
        let mut settings = RunSettings::new(self.input);
        if let Some(name) = self.name {
            settings.playlist_name = name;
        }
        if let Some(description) = self.description {
            settings.description = description;
        }
        settings.public = !self.private;
        settings.market = parse_market(&self.market)?;
        settings.tracks_per_artist = self.tracks_per_artist;
        settings.delay = Duration::from_millis(self.delay_ms);
        settings.dry_run = self.dry_run;
        settings.report_dir = self.report_dir;
        settings.validate()?;
        Ok(settings)
    }
}

fn setup_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    setup_tracing(cli.verbose);

    match cli.command {
        Commands::Create(args) => {
            create(args).await?;
        }
        Commands::Artists { input } => {
            list_artists(&input)?;
        }
        Commands::Setup => {
            show_setup_guide();
        }
    }

    Ok(())
}

async fn create(args: CreateArgs) -> Result<()> {
    println!("{}", "Spotify Playlist Maker".cyan().bold());
    println!("{}", "=".repeat(50));

    let redirect_uri = args.redirect_uri.clone();
    let settings = args.into_settings().context("Invalid options")?;

    if settings.dry_run {
        println!("{}", "DRY RUN MODE - No playlist will be created".yellow());
    }

    let providers: [&dyn CredentialProvider; 2] = [&EnvCredentials, &PromptCredentials];
    let config = match Config::resolve(&providers, &redirect_uri) {
        Ok(config) => config,
        Err(e) => fail(&e),
    };

    let client = match SpotifyClient::authorize(&config).await {
        Ok(client) => client,
        Err(e) => fail(&e),
    };

    let maker = PlaylistMaker::new(client, settings);
    let report = match maker.run().await {
        Ok(report) => report,
        Err(e) => fail(&e),
    };

    report.print_summary();

    if let Some(dir) = &maker.settings().report_dir {
        report
            .save(dir)
            .context("Failed to save run report")?;
    }

    Ok(())
}

fn fail(error: &AppError) -> ! {
    println!("{} {}", "✗".red(), error);
    match error {
        AppError::Auth(_) => {
            println!("{}", "Check your credentials and try again.".yellow());
        }
        AppError::Append {
            playlist_url: Some(url),
            ..
        } => {
            println!("The playlist was left partially filled: {}", url);
        }
        _ => {}
    }
    std::process::exit(1);
}

fn list_artists(path: &Path) -> Result<()> {
    let artists = input::load_artists(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    if artists.is_empty() {
        println!("{}", "No artists found".yellow());
        return Ok(());
    }

    for (i, artist) in artists.iter().enumerate() {
        println!("{:3}. {}", i + 1, artist.green());
    }

    println!("\n{}", format!("Total: {} artists", artists.len()).cyan());

    Ok(())
}

fn show_setup_guide() {
    println!("{}", "Spotify Playlist Maker Setup Guide".cyan().bold());
    println!("{}", "=".repeat(50));

    println!("\n{}", "1. Spotify API Setup".yellow());
    println!("   - Go to https://developer.spotify.com/dashboard/");
    println!("   - Create a new app");
    println!("   - Copy your Client ID and Client Secret");
    println!("   - Add '{}' as a redirect URI", DEFAULT_REDIRECT_URI);

    println!("\n{}", "2. Configuration".yellow());
    println!("   - Create a .env file with:");
    println!("     SPOTIFY_CLIENT_ID=your_spotify_client_id");
    println!("     SPOTIFY_CLIENT_SECRET=your_spotify_client_secret");
    println!("     SPOTIFY_REDIRECT_URI={}", DEFAULT_REDIRECT_URI);
    println!("   - Without these you will be asked for the ID and secret on start");

    println!("\n{}", "3. Input".yellow());
    println!("   - A CSV file whose first row is a header");
    println!("   - Artist names in the first column, one per row");

    println!("\n{}", "4. Usage".yellow());
    println!("   - artists2playlist artists lineup.csv            (check what will be read)");
    println!("   - artists2playlist create lineup.csv --dry-run   (resolve without creating)");
    println!("   - artists2playlist create lineup.csv --name \"My Lineup\"");

    println!("\n{}", "Ready to build playlists!".green());
}
