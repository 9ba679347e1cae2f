use clap::{Parser, Subcommand};
use party_finder::{
    config::Settings,
    models::{find_world, ClassBucket, FinderError, WORLDS},
    report,
    roster::{compute_range, describe_range, parse_level},
    session::{DetailView, MemorySelectionStore, PartyFinder, SelectionStore, SqliteSelectionStore},
    TibiaDataClient,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod tui_main;

#[derive(Parser)]
#[clap(name = "party-finder")]
#[clap(about = "Find online players in your level range on a Tibia world", long_about = None)]
struct Cli {
    /// Settings file to load instead of config/default and config/local
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the known worlds
    Worlds,

    /// Show the party level range for a level
    Range {
        #[clap(allow_hyphen_values = true)]
        level: String,
    },

    /// Show who is online on a world, grouped by class
    Roster {
        /// World name; defaults to the last selected world
        world: Option<String>,

        /// Your level; only players in your party range are listed
        #[clap(short, long, default_value = "0")]
        level: String,
    },

    /// Look up a single character
    Character {
        name: String,
    },

    /// Forget the saved world
    Clear,

    /// Launch interactive TUI
    Tui,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::new().unwrap_or_else(|e| {
            eprintln!("Using default settings: {}", e);
            Settings::default()
        }),
    };

    // Logging would corrupt the TUI screen
    if !matches!(cli.command, Commands::Tui) {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new(&settings.app.log_level)),
            )
            .init();
    }

    if let Err(e) = settings.validate() {
        error!("Invalid settings: {}", e);
        return Err(anyhow::anyhow!(e));
    }

    match cli.command {
        Commands::Worlds => {
            for world in WORLDS {
                println!("{}", world);
            }
        }

        Commands::Range { level } => {
            let level = parse_level(&level);
            if level > 0 {
                let range = compute_range(level);
                println!("Level {} can party with levels {} to {}", level, range.min, range.max);
            } else {
                println!("Range: {} (no level filter)", describe_range(level));
            }
        }

        Commands::Roster { world, level } => {
            let finder = build_finder(&settings).await?;
            finder.restore_selection().await?;
            finder.set_reference_level(parse_level(&level)).await;

            let result = match world {
                Some(world) => {
                    if find_world(&world).is_none() {
                        warn!("{} is not in the known world list, trying anyway", world);
                    }
                    finder.load_world(&world.trim().to_lowercase()).await
                }
                None => finder.update_results().await,
            };

            match result {
                Ok(view) => {
                    let session = finder.snapshot().await;
                    let world = session.loaded_world.as_deref().unwrap_or("-");
                    println!("\n=== {} ===", find_world(world).unwrap_or(world));
                    println!("{}", report::summary_line(&view));

                    for class in ClassBucket::DISPLAY_ORDER {
                        println!("\n{}", report::bucket_title(&view, class));
                        let players = view.bucket(class);
                        if players.is_empty() && view.is_filtered() {
                            println!("  No players in range");
                        }
                        for player in players {
                            println!("  {}", report::player_line(player));
                        }
                    }

                    if view.roster.unclassified > 0 {
                        info!("{} players without a class were left out", view.roster.unclassified);
                    }
                }
                Err(FinderError::ValidationError(message)) => {
                    println!("{}", message);
                }
                Err(e) => {
                    error!("Failed to load world: {}", e);
                    if let party_finder::session::Phase::Failed(message) = finder.snapshot().await.phase {
                        println!("\n❌ {}", message);
                    }
                }
            }
        }

        Commands::Character { name } => {
            let finder = build_finder(&settings).await?;
            match finder.lookup_character(&name).await {
                DetailView::Ready(sheet) => {
                    for section in report::character_sections(&sheet) {
                        println!("\n{}", section.title);
                        for (label, value) in section.rows {
                            println!("  {}: {}", label, value);
                        }
                    }
                }
                DetailView::Failed { name, message } => {
                    println!("\n❌ Could not load character \"{}\"", name);
                    println!("Details: {}", message);
                    println!("Check the name is spelled correctly and that the character exists.");
                }
                DetailView::Hidden | DetailView::Loading { .. } => {}
            }
        }

        Commands::Clear => {
            let finder = build_finder(&settings).await?;
            finder.clear_filters().await?;
            println!("Saved world cleared");
        }

        Commands::Tui => {
            let finder = build_finder(&settings).await?;
            tui_main::run_tui(finder).await?;
        }
    }

    Ok(())
}

async fn build_finder(settings: &Settings) -> anyhow::Result<Arc<PartyFinder>> {
    let api = Arc::new(TibiaDataClient::new(settings.api_client_config())?);

    let store: Arc<dyn SelectionStore> = if settings.storage.enabled {
        match SqliteSelectionStore::connect(&settings.storage.database_url).await {
            Ok(store) => Arc::new(store),
            Err(e) => {
                warn!("Saved world unavailable, keeping it in memory: {}", e);
                Arc::new(MemorySelectionStore::new())
            }
        }
    } else {
        Arc::new(MemorySelectionStore::new())
    };

    Ok(Arc::new(PartyFinder::new(api, store).with_display(&settings.display)))
}
