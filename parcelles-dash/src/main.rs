//! Point d'entrée CLI pour parcelles-dash

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use parcelles_dash::Config;
use tracing::{debug, Level};
use tracing_subscriber::{fmt, EnvFilter};

// Charger .env au démarrage
fn load_env() {
    if dotenvy::dotenv().is_err() {
        // Essayer depuis le répertoire du binaire
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let _ = dotenvy::from_path(dir.join(".env"));
            }
        }
    }
}

mod cli;

use cli::Commands;

/// Tableau de bord des parcelles agricoles
#[derive(Parser)]
#[command(name = "parcelles-dash")]
#[command(author, version)]
#[command(about = "Statistiques, filtres et export d'un jeu de parcelles agricoles (GeoJSON RPG)")]
#[command(long_about = "Charge le jeu de parcelles depuis la source principale, puis les sources de repli dans l'ordre.\n\nSi toutes échouent, les données de démonstration sont utilisées.")]
struct Cli {
    /// Augmenter la verbosité (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Fichier de configuration JSON
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Source principale (URL ou chemin)
    #[arg(long, global = true)]
    source: Option<String>,

    /// Source de repli, répétable (remplace la liste configurée)
    #[arg(long = "fallback", global = true)]
    fallbacks: Vec<String>,

    /// Timeout par source, en secondes
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Sous-commande (défaut: summary)
    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Charger .env avant tout
    load_env();

    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    config.apply_env();
    config.apply_overrides(cli.source, cli.fallbacks, cli.timeout);
    debug!(?config, "Configuration resolved");

    let command = cli.command.unwrap_or(Commands::Summary {
        sort: None,
        ascending: false,
    });

    match command {
        Commands::Summary { sort, ascending } => {
            cli::cmd_summary(&config, sort, ascending).await?
        }
        Commands::Filter { code } => cli::cmd_filter(&config, &code).await?,
        Commands::Search { query, select } => cli::cmd_search(&config, &query, select).await?,
        Commands::Detail { fid } => cli::cmd_detail(&config, fid).await?,
        Commands::Export { output, report } => cli::cmd_export(&config, output, report).await?,
        Commands::Demo => cli::cmd_demo()?,
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();
}
