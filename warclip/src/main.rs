//! warclip - browse and tag combat recordings
//!
//! This tool provides commands for:
//! - Listing recordings with result, pull number and raid composition
//! - Tagging and clearing tags on local or cloud recordings
//! - Checking configuration and tag storage
//!
//! Uses XDG Base Directory specification for file locations:
//! - Database: $XDG_DATA_HOME/warclip/tags.db (~/.local/share/warclip/tags.db)
//! - Config: $XDG_CONFIG_HOME/warclip/config.toml (~/.config/warclip/config.toml)

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use warclip_core::analytics::SessionView;
use warclip_core::companion::CompanionChannel;
use warclip_core::library::load_sidecar;
use warclip_core::{
    format, BackgroundTagWriter, BuiltinCatalog, Config, ContentCategory, Database,
    HttpCompanion, Library, NullCompanion, SessionKey, StandardResultResolver, TagManager,
    VideoSession,
};

/// How long to wait for companion delivery before exiting
const COMPANION_GRACE: Duration = Duration::from_secs(3);

#[derive(Parser)]
#[command(name = "warclip")]
#[command(about = "Browse and tag combat recordings")]
#[command(version)]
struct Args {
    /// Write logs to the state directory
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List recordings by category
    List {
        /// Only this category (e.g. "Raids", "Mythic+", "3v3")
        #[arg(short, long)]
        category: Option<ContentCategory>,

        /// Video directory (default: library.video_dir from config)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Set the tag on a recording
    Tag {
        /// Video path, or object name with --cloud
        video: String,

        /// Tag text
        text: String,

        /// The recording lives in cloud storage
        #[arg(long)]
        cloud: bool,
    },

    /// Remove the tag from a recording
    ClearTag {
        /// Video path, or object name with --cloud
        video: String,

        /// The recording lives in cloud storage
        #[arg(long)]
        cloud: bool,
    },

    /// Show configuration and storage status
    Status,
}

fn main() -> Result<()> {
    let args = Args::parse();

    Config::ensure_xdg_env();

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    let _log_guard = if args.verbose {
        Some(warclip_core::logging::init(&config.logging).context("failed to initialize logging")?)
    } else {
        None
    };

    match args.command {
        Command::List { category, dir } => cmd_list(&config, category, dir.as_deref()),
        Command::Tag { video, text, cloud } => cmd_tag(&config, &video, text, cloud),
        Command::ClearTag { video, cloud } => cmd_tag(&config, &video, String::new(), cloud),
        Command::Status => cmd_status(&config),
    }
}

fn open_database() -> Result<Arc<Database>> {
    let db_path = Config::database_path();
    let db = Database::open(&db_path)
        .with_context(|| format!("failed to open database at {}", db_path.display()))?;
    db.migrate().context("failed to run database migrations")?;
    Ok(Arc::new(db))
}

fn cmd_list(config: &Config, category: Option<ContentCategory>, dir: Option<&Path>) -> Result<()> {
    let dir = config.library.resolve_dir(dir)?;
    let dir = dir
        .canonicalize()
        .with_context(|| format!("video directory not found: {}", dir.display()))?;

    let mut library = Library::scan(&dir, &config.library.video_extension)
        .context("failed to scan video directory")?;
    let db = open_database()?;
    library.apply_tags(&db).context("failed to load tags")?;

    if library.is_empty() {
        println!("No recordings found in {}", dir.display());
        return Ok(());
    }

    let catalog = BuiltinCatalog::new();
    let resolver = StandardResultResolver;
    let categories: Vec<ContentCategory> = match category {
        Some(c) => vec![c],
        None => ContentCategory::ALL.to_vec(),
    };

    let mut first = true;
    for category in categories {
        let sessions = library.category(category);
        if sessions.is_empty() {
            continue;
        }

        if !first {
            println!();
        }
        first = false;

        println!("{} ({})", category, sessions.len());
        println!("{}", "=".repeat(category.as_str().len() + 4));

        let views = library.views(category, &catalog, &resolver);
        for (session, view) in sessions.iter().zip(&views) {
            println!("{}", list_row(session, view));
        }
    }

    Ok(())
}

fn list_row(session: &VideoSession, view: &SessionView) -> String {
    let when = session
        .captured_at()
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M");

    let title = match &view.dungeon {
        Some(dungeon) => {
            let name = dungeon.name.as_deref().unwrap_or("Unknown dungeon");
            match dungeon.level_label() {
                Some(level) => format!("{} {}", level, name),
                None => name.to_string(),
            }
        }
        None => session
            .encounter_name
            .clone()
            .unwrap_or_else(|| file_name(&view.key)),
    };

    let roles = view
        .roles
        .as_ref()
        .map(format::role_summary)
        .unwrap_or_else(|| "-".to_string());

    format!(
        "{}  {:<28}  {:<16}  {:<12}  {}",
        when,
        title,
        view.caption(),
        roles,
        format::tag_label(view.tag.as_deref())
    )
}

fn file_name(key: &SessionKey) -> String {
    Path::new(&key.id)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| key.id.clone())
}

/// Load the session a tag command refers to
fn target_session(config: &Config, video: &str, cloud: bool) -> Result<VideoSession> {
    if cloud {
        // Cloud metadata is not available locally; only the key is needed to tag.
        return Ok(VideoSession::new(
            SessionKey::cloud(video),
            chrono::Utc::now(),
            ContentCategory::Clips,
        ));
    }

    let sidecar = Path::new(video).with_extension("json");
    if !sidecar.exists() {
        bail!("no recording metadata found for {}", video);
    }
    let sidecar = sidecar
        .canonicalize()
        .with_context(|| format!("failed to resolve {}", sidecar.display()))?;

    load_sidecar(&sidecar, &config.library.video_extension)
        .with_context(|| format!("failed to read {}", sidecar.display()))
}

fn cmd_tag(config: &Config, video: &str, text: String, cloud: bool) -> Result<()> {
    let mut session = target_session(config, video, cloud)?;
    let db = open_database()?;

    let writer = Arc::new(BackgroundTagWriter::spawn(db).context("failed to start tag writer")?);
    let http = HttpCompanion::new(&config.companion)
        .context("failed to set up companion client")?
        .map(Arc::new);
    let companion: Arc<dyn CompanionChannel> = match &http {
        Some(http) => http.clone() as Arc<dyn CompanionChannel>,
        None => Arc::new(NullCompanion),
    };

    let tags = TagManager::new(writer.clone(), companion);
    tags.set_tag(&mut session, text);

    writer.flush().context("failed to persist tag")?;
    if let Some(http) = &http {
        if !http.wait_idle(COMPANION_GRACE) {
            tracing::warn!(endpoint = http.endpoint(), "Companion did not respond in time");
        }
    }

    if session.has_tag() {
        println!(
            "Tagged {}: {}",
            session.key().id,
            format::tag_label(session.tag())
        );
    } else {
        println!("Cleared tag on {}", session.key().id);
    }

    Ok(())
}

fn cmd_status(config: &Config) -> Result<()> {
    println!("warclip Configuration");
    println!("=====================");
    println!();

    println!("Config:          {}", Config::config_path().display());
    println!("Database:        {}", Config::database_path().display());
    println!("Log Dir:         {}", Config::state_dir().display());
    match warclip_core::logging::latest_log_file(&Config::state_dir()) {
        Some(path) => println!("Latest Log:      {}", path.display()),
        None => println!("Latest Log:      <none yet>"),
    }
    println!();

    println!(
        "Video Dir:       {}",
        config
            .library
            .video_dir
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<not set>".to_string())
    );
    println!("Video Extension: {}", config.library.video_extension);
    println!();

    let companion = &config.companion;
    println!("Companion:       {}", if companion.enabled { "enabled" } else { "disabled" });
    if companion.enabled {
        println!(
            "Endpoint:        {}",
            companion.endpoint.as_deref().unwrap_or("<not set>")
        );
        println!("Timeout:         {}s", companion.timeout_secs);
    }
    println!();

    let db_path = Config::database_path();
    if db_path.exists() {
        let db = open_database()?;
        println!("Stored Tags:     {}", db.count_tags()?);
        if let Some(latest) = db.latest_tag()? {
            println!(
                "Last Tagged:     {} ({})",
                file_name(&latest.key),
                format::format_relative_time(latest.updated_at)
            );
        }
    } else {
        println!("Stored Tags:     0 (no database yet)");
    }

    Ok(())
}
