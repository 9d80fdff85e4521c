use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use listenbrainz_dl::sync::print_summary;
use listenbrainz_dl::{Config, PlaylistStatus, PlaylistSync};

#[derive(Parser)]
#[command(name = "lbdl")]
#[command(about = "Download ListenBrainz playlists into a local music library")]
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
    /// Sync playlists created for you (all of them when no names are given)
    Sync {
        /// Names of playlists to sync
        playlists: Vec<String>,
    },

    /// List the playlists ListenBrainz created for you
    ListPlaylists,

    /// Show setup guide
    Setup,
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

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Setup = cli.command {
        show_setup_guide();
        return Ok(());
    }

    let config = Config::from_env();
    setup_tracing(cli.verbose || config.as_ref().is_ok_and(|c| c.debug));
    let config = config.context("Failed to load configuration")?;

    let missing = config.get_missing_config();
    if !missing.is_empty() {
        println!("{}", "Missing configuration:".red());
        for item in &missing {
            println!("   - {}", item);
        }
        println!(
            "\n{}",
            "Please copy .env.example to .env and fill in your username.".yellow()
        );
        std::process::exit(1);
    }

    match cli.command {
        Commands::Sync { playlists } => sync(&config, &playlists).await?,
        Commands::ListPlaylists => list_playlists(&config).await?,
        Commands::Setup => {}
    }

    Ok(())
}

async fn sync(config: &Config, playlist_names: &[String]) -> Result<()> {
    println!("{}", "ListenBrainz Playlist Downloader".cyan().bold());
    println!("{}", "=".repeat(50));

    if !playlist_names.is_empty() {
        println!("Target playlists: {}", playlist_names.join(", "));
    }

    config.validate().context("Invalid configuration")?;

    let sync = PlaylistSync::new(config).context("Failed to initialize sync")?;

    let reports = if playlist_names.is_empty() {
        sync.sync_all().await?
    } else {
        sync.sync_named(playlist_names).await?
    };

    print_summary(&reports);

    if reports.iter().any(|r| r.status == PlaylistStatus::Failed) {
        println!("\n{}", "Sync finished with errors".yellow());
    } else {
        println!("\n{}", "Sync completed!".green());
    }

    Ok(())
}

async fn list_playlists(config: &Config) -> Result<()> {
    println!(
        "{}",
        format!("Playlists created for {}", config.listenbrainz_username)
            .cyan()
            .bold()
    );
    println!("{}", "=".repeat(50));

    let sync = PlaylistSync::new(config).context("Failed to initialize client")?;

    let playlists = sync
        .list_playlists()
        .await
        .context("Failed to fetch playlists")?;

    if playlists.is_empty() {
        println!("{}", "No playlists found".yellow());
        return Ok(());
    }

    for (i, playlist) in playlists.iter().enumerate() {
        let synced = config
            .destination_path
            .join(listenbrainz_dl::sanitize::sanitize_filename(&playlist.name))
            .exists();
        println!(
            "{:2}. {} ({}){}",
            i + 1,
            playlist.name.green(),
            playlist.created_at.format("%Y-%m-%d"),
            if synced { " [synced]".dimmed().to_string() } else { String::new() }
        );
        if let Some(patch) = &playlist.source_patch {
            println!("     {}", patch.cyan());
        }
    }

    println!("\n{}", format!("Total: {} playlists", playlists.len()).cyan());

    Ok(())
}

fn show_setup_guide() {
    println!("{}", "ListenBrainz Playlist Downloader Setup Guide".cyan().bold());
    println!("{}", "=".repeat(50));

    println!("\n{}", "1. Requirements".yellow());
    println!("   - Install yt-dlp and ffmpeg and make sure they are on your PATH");
    println!("   - Create the directory your music should be downloaded into");

    println!("\n{}", "2. Configuration".yellow());
    println!("   - Create a .env file with:");
    println!("     LISTENBRAINZ_USERNAME=your_listenbrainz_username");
    println!("     DESTINATION_PATH=/music");
    println!("   - Optional settings:");
    println!("     YTDLP_MAX_SLEEP_SECONDS=5   (random pause before each download)");
    println!("     TRY_SONGS=5                 (search results checked per track)");
    println!("     YTDLP_PATH=yt-dlp");
    println!("     SYNC_REPORT_DIR=sync_reports");
    println!("     DEBUG=false");

    println!("\n{}", "3. Usage".yellow());
    println!("   - lbdl list-playlists           (to see your playlists)");
    println!("   - lbdl sync                     (to download every playlist)");
    println!("   - lbdl sync \"Weekly Jams\"       (to download a specific playlist)");

    println!(
        "\n{}",
        "Playlists already present in the destination are skipped.".green()
    );
}
