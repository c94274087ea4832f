//! Binary entrypoint for the cauldron CLI.
//!
//! Commands:
//! - `init` - write a starter `cauldron.toml` and sample catalog files under `data/seeds/`
//! - `status` - load the catalog and discovery book and print a one-line summary
//! - `materials` - list selectable materials with their emoji and effects
//! - `brew --heat <level> <material>...` - attempt one brew; success unlocks the recipe
//! - `dex [--locked] [--search <kw>]` - show the discovery book
//!
//! See the library crate docs for module-level details: `cauldron::`.
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use std::path::Path;

use cauldron::alchemy::{load_catalog, DexFilter, HeatLevel, KeyValueStore, Selection, Session};
use cauldron::config::Config;

const SAMPLE_RECIPES: &str = include_str!("../data/seeds/recipes.json");
const SAMPLE_MATERIALS: &str = include_str!("../data/seeds/materials.json");

#[derive(Parser)]
#[command(name = "cauldron")]
#[command(about = "Alchemy brewing simulator with a persistent discovery book")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "cauldron.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration and sample catalog
    Init,
    /// Show catalog and discovery book summary
    Status,
    /// List selectable materials
    Materials,
    /// Attempt one brew
    Brew {
        /// Heat level: 小火/中火/大火/免用火 or low/medium/high/none
        #[arg(long)]
        heat: Option<HeatLevel>,
        /// Materials to put in the cauldron (order and repeats do not matter)
        materials: Vec<String>,
    },
    /// Show the discovery book
    Dex {
        /// Include recipes that have not been brewed yet
        #[arg(short, long)]
        locked: bool,
        /// Only show recipes whose name or materials contain this text
        #[arg(short, long)]
        search: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Init runs before any config exists; everything else needs it
    if let Commands::Init = cli.command {
        init_logging(&None, cli.verbose);
        return init_workspace(&cli.config).await;
    }

    let config = Config::load(&cli.config)
        .await
        .with_context(|| format!("run `cauldron init` to create {}", cli.config))?;
    init_logging(&Some(config.clone()), cli.verbose);
    info!("Starting cauldron v{}", env!("CARGO_PKG_VERSION"));

    let catalog = load_catalog(&config.catalog.paths()).await?;
    let store = config.storage.open_store_or_memory();
    let mut session = Session::start(catalog, store, &config.storage.key);

    match cli.command {
        Commands::Init => {}
        Commands::Status => {
            println!("{}", session.status_line());
        }
        Commands::Materials => {
            for material in session.catalog().materials() {
                if material.effects.is_empty() {
                    println!("{}", material.label());
                } else {
                    println!("{}  {}", material.label(), material.effects);
                }
            }
        }
        Commands::Brew { heat, materials } => {
            let mut selection = Selection::new().with_materials(&materials);
            selection.heat = heat;
            session.select(selection);
            let outcome = session.brew(&mut rand::thread_rng());
            println!("{}", outcome.message());
            if outcome.is_success() {
                println!("圖鑑 {}", session.progress());
            }
        }
        Commands::Dex { locked, search } => {
            let filter = DexFilter::new()
                .with_locked(locked)
                .with_keyword(search.as_deref().unwrap_or_default());
            print_dex(&session, &filter);
        }
    }

    Ok(())
}

fn print_dex<S: KeyValueStore>(session: &Session<S>, filter: &DexFilter) {
    let entries = session.dex(filter);
    if entries.is_empty() {
        println!("（無符合的配方）");
    }
    for entry in entries {
        println!("{}", entry.render(session.catalog()));
    }
    println!("已解鎖 {}", session.progress());
}

/// Create the config file and sample seeds, leaving existing files alone.
async fn init_workspace(config_path: &str) -> Result<()> {
    if Path::new(config_path).exists() {
        warn!("{} already exists; leaving it untouched", config_path);
    } else {
        Config::create_default(config_path).await?;
        info!("Wrote default configuration to {}", config_path);
    }

    let config = Config::load(config_path).await?;
    write_if_absent(&config.catalog.recipes, SAMPLE_RECIPES).await?;
    if let Some(materials) = &config.catalog.materials {
        write_if_absent(materials, SAMPLE_MATERIALS).await?;
    }
    println!("Initialized. Try: cauldron brew --heat 小火 人參 甘草");
    Ok(())
}

async fn write_if_absent(path: &str, contents: &str) -> Result<()> {
    let path = Path::new(path);
    if path.exists() {
        return Ok(());
    }
    if let Some(dir) = path.parent() {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("creating {}", dir.display()))?;
    }
    tokio::fs::write(path, contents)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    info!("Wrote sample catalog file {}", path.display());
    Ok(())
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .map(|cfg| cfg.logging.level_filter())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let log_file = config
        .as_ref()
        .and_then(|cfg| cfg.logging.file.as_ref())
        .and_then(|file| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(file)
                .ok()
        });

    if let Some(f) = log_file {
        let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
        // Echo to the console only when attached to a terminal
        let is_tty = atty::is(atty::Stream::Stderr);
        builder.format(move |fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            let line = format!("{} [{}] {}", ts, record.level(), record.args());
            if let Ok(mut guard) = write_mutex.lock() {
                let _ = writeln!(guard, "{}", line);
            }
            if is_tty {
                writeln!(fmt, "{}", line)
            } else {
                Ok(())
            }
        });
    } else {
        builder.format(|fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
        });
    }
    let _ = builder.try_init();
}
