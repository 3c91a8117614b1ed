//! Interactive command surface for the loot service.
//!
//! A small REPL that owns the persisted configuration, pushes updates into
//! the running service, and can replay JSON-lines event files through the
//! feed module.

mod feed;

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tracing_subscriber::filter::EnvFilter;

use autoloot_core::config;
use autoloot_core::service::LootService;
use autoloot_core::ServiceHandle;
use autoloot_types::LootConfig;

#[tokio::main]
async fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config_path = config::default_config_path().ok_or("cannot resolve config directory")?;
    let config = match config::load_or_create(&config_path) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(%err, "failed to load config, using defaults");
            LootConfig::default()
        }
    };

    let (request_tx, mut request_rx) = mpsc::channel(64);
    let (handle, service_task) = LootService::spawn(Some(config.clone()), request_tx);

    // Print outbound pickup requests as they are emitted.
    tokio::spawn(async move {
        while let Some(request) = request_rx.recv().await {
            println!("[loot] pickup requested for drop {}", request.drop_id);
        }
    });

    let mut state = CliState {
        config,
        config_path,
        handle: handle.clone(),
    };

    loop {
        let line = readline()?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &mut state).await {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                write!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    handle.shutdown().await?;
    service_task.await.map_err(|e| e.to_string())?;
    Ok(())
}

struct CliState {
    config: LootConfig,
    config_path: PathBuf,
    handle: ServiceHandle,
}

#[derive(Parser)]
#[command(version, about = "autoloot command surface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Toggle looting in both the overworld and instances
    Toggle,
    /// Toggle looting in the overworld (zones below 9000)
    Overworld,
    /// Toggle looting in instances (zones 9000 and above)
    Instance,
    /// List available loot templates
    Templates,
    /// Select the active loot template
    Use { name: String },
    /// Persist the current configuration
    Save,
    /// Reload the configuration from disk
    Load,
    /// Show current service state
    Status,
    /// Replay a JSON-lines event file into the service
    Feed {
        #[arg(short, long)]
        path: String,
        /// Keep tailing the file for appended events
        #[arg(short, long)]
        follow: bool,
    },
    Exit,
}

async fn respond(line: &str, state: &mut CliState) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "autoloot".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match &cli.command {
        Some(Commands::Toggle) => {
            state.config.enabled.overworld = !state.config.enabled.overworld;
            state.config.enabled.instance = !state.config.enabled.instance;
            push_config(state).await?;
            println!(
                "[loot] overworld: {} | instance: {}",
                state.config.enabled.overworld, state.config.enabled.instance
            );
        }
        Some(Commands::Overworld) => {
            state.config.enabled.overworld = !state.config.enabled.overworld;
            push_config(state).await?;
            println!("[loot] overworld: {}", state.config.enabled.overworld);
        }
        Some(Commands::Instance) => {
            state.config.enabled.instance = !state.config.enabled.instance;
            push_config(state).await?;
            println!("[loot] instance: {}", state.config.enabled.instance);
        }
        Some(Commands::Templates) => {
            println!(
                "[loot] available templates: {}",
                state.config.template_names().join(", ")
            );
        }
        Some(Commands::Use { name }) => {
            // Validate against the loaded config before it reaches the core.
            if !state.config.templates.contains_key(name) {
                println!("[loot] cannot find template: {name}");
                return Ok(false);
            }
            state.config.template = name.clone();
            state.handle.set_template(name.clone()).await?;
            println!("[loot] active template set to: {name}");
        }
        Some(Commands::Save) => {
            config::save_file(&state.config_path, &state.config).map_err(|e| e.to_string())?;
            println!("[loot] config saved");
        }
        Some(Commands::Load) => {
            state.config =
                config::load_or_create(&state.config_path).map_err(|e| e.to_string())?;
            push_config(state).await?;
            println!("[loot] config loaded");
        }
        Some(Commands::Status) => {
            let status = state.handle.status().await?;
            println!(
                "[loot] overworld: {} | instance: {} | template: {} | tracked drops: {} | zone: {}",
                status.overworld,
                status.instance,
                status.active_template,
                status.tracked_drops,
                status
                    .zone
                    .map(|z| z.to_string())
                    .unwrap_or_else(|| "unknown".to_string()),
            );
        }
        Some(Commands::Feed { path, follow }) => {
            let handle = state.handle.clone();
            let path = PathBuf::from(path);
            let follow = *follow;
            tokio::spawn(async move {
                match feed::feed_events(&path, follow, handle).await {
                    Ok(count) => println!("[loot] fed {count} events from {}", path.display()),
                    Err(err) => eprintln!("[loot] feed error: {err}"),
                }
            });
        }
        Some(Commands::Exit) => {
            write!(std::io::stdout(), "quitting...").map_err(|e| e.to_string())?;
            std::io::stdout().flush().map_err(|e| e.to_string())?;
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}

async fn push_config(state: &CliState) -> Result<(), String> {
    state.handle.update_config(state.config.clone()).await
}

fn readline() -> Result<String, String> {
    write!(std::io::stdout(), "> ").map_err(|e| e.to_string())?;
    std::io::stdout().flush().map_err(|e| e.to_string())?;
    let mut buffer = String::new();
    std::io::stdin()
        .read_line(&mut buffer)
        .map_err(|e| e.to_string())?;
    Ok(buffer)
}
