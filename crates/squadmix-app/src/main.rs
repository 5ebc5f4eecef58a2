// squadmix entry point.
//
// Startup sequence:
// 1. Parse the command line
// 2. Initialize tracing (log to file, stdout is for command output)
// 3. Load config
// 4. Open the store and restore state
// 5. Run the requested command

use squadmix::app::AppState;
use squadmix::config;
use squadmix::db::Store;
use squadmix::export::ExportFormat;
use squadmix::franchises;
use squadmix::render;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use squadmix_core::{GenerateError, Role, Source};
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "squadmix", version, about = "Mix two cricket squads into fantasy XIs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Add a player to a source team (roles: wk, bat, ar, bowl)
    Add {
        #[arg(value_parser = parse_side)]
        side: Source,
        name: String,
        #[arg(value_parser = parse_role)]
        role: Role,
    },
    /// Remove the player at a 1-based position
    Remove {
        #[arg(value_parser = parse_side)]
        side: Source,
        index: usize,
    },
    /// Label a source team with a franchise
    Franchise {
        #[arg(value_parser = parse_side)]
        side: Source,
        id: String,
    },
    /// List available franchises
    Franchises,
    /// Remove every player and the franchise from a source team
    Clear {
        #[arg(value_parser = parse_side)]
        side: Source,
    },
    /// Show both source teams and any generated teams
    Show,
    /// Generate 20 fantasy teams from the two source teams
    Generate {
        /// Seed for a reproducible batch
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Discard the generated teams
    ClearTeams,
    /// Write the generated teams to the export directory
    Export {
        #[arg(value_enum)]
        format: ExportFormat,
    },
}

fn parse_side(s: &str) -> Result<Source, String> {
    Source::from_str_source(s).ok_or_else(|| format!("unknown team `{s}`, expected a or b"))
}

fn parse_role(s: &str) -> Result<Role, String> {
    Role::from_str_role(s).ok_or_else(|| format!("unknown role `{s}`, expected wk, bat, ar or bowl"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing()?;
    info!("squadmix starting: {:?}", cli.command);

    let config = config::load_config().context("failed to load configuration")?;
    let store = Store::open(&config.storage.db_path).context("failed to open database")?;
    info!("Database opened at {}", config.storage.db_path);

    let mut state = AppState::load(config, store);

    if let Err(e) = run(cli.command, &mut state).await {
        error!("Command failed: {:#}", e);
        if let Some(gen_err) = e.downcast_ref::<GenerateError>() {
            eprintln!("Error: {gen_err}");
            if gen_err.is_insufficient_diversity() {
                eprintln!("Hint: mix more roles into each team, e.g. a second WK or more all-rounders.");
            }
            std::process::exit(1);
        }
        return Err(e);
    }

    Ok(())
}

async fn run(command: Commands, state: &mut AppState) -> anyhow::Result<()> {
    match command {
        Commands::Add { side, name, role } => {
            let player = state.add_player(side, &name, role)?;
            println!(
                "Added {} ({}) to {} [{}/11]",
                player.name,
                player.role,
                state.roster(side).display_name(side),
                state.roster(side).len()
            );
        }
        Commands::Remove { side, index } => {
            let zero_based = index
                .checked_sub(1)
                .ok_or_else(|| anyhow!("positions start at 1"))?;
            let player = state.remove_player(side, zero_based)?;
            println!("Removed {} from {}", player.name, state.roster(side).display_name(side));
        }
        Commands::Franchise { side, id } => {
            let info = state.select_franchise(side, &id)?;
            println!("{side} is now {}", info.name);
        }
        Commands::Franchises => {
            for team in franchises::all() {
                println!("  {:<5} {}", team.id, team.name);
            }
        }
        Commands::Clear { side } => {
            state.clear_roster(side)?;
            println!("Cleared {side}");
        }
        Commands::Show => {
            for side in Source::BOTH {
                println!("{}", render::render_source(state.roster(side), side));
            }
            if state.batch.is_empty() {
                println!("No generated teams.");
            } else {
                if let Some(at) = state.generated_at {
                    println!("Generated at {}\n", at.to_rfc3339());
                }
                print!(
                    "{}",
                    render::render_batch(&state.batch, &state.team_a, &state.team_b)
                );
            }
        }
        Commands::Generate { seed } => {
            state.generate(seed).await?;
            print!(
                "{}",
                render::render_batch(&state.batch, &state.team_a, &state.team_b)
            );
            println!("\nGenerated {} teams.", state.batch.len());
        }
        Commands::ClearTeams => {
            state.clear_batch()?;
            println!("Cleared generated teams");
        }
        Commands::Export { format } => {
            let path = state.export(format)?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

/// Initialize tracing to log to a file (stdout carries command output).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("squadmix.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("squadmix=info,squadmix_core=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
