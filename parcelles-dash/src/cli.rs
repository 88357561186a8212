//! Définition et implémentation des commandes CLI
//!
//! - `summary`: synthèse complète (défaut)
//! - `filter`: couche et légende pour une culture
//! - `search`: recherche par identifiant
//! - `detail`: fiche d'une parcelle
//! - `export`: document JSON de synthèse
//! - `demo`: jeu de démonstration, sans réseau

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Subcommand, ValueEnum};
use parcellaire::view::TableColumn;
use parcellaire::CropFilter;
use parcelles_dash::{Config, Dashboard, InteractionHandler, Loader, TerminalSurface};
use tracing::{info, warn};

/// Colonnes triables du tableau de statistiques
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortColumn {
    Name,
    Count,
    Surface,
    Average,
}

impl From<SortColumn> for TableColumn {
    fn from(column: SortColumn) -> Self {
        match column {
            SortColumn::Name => TableColumn::Name,
            SortColumn::Count => TableColumn::Count,
            SortColumn::Surface => TableColumn::TotalSurface,
            SortColumn::Average => TableColumn::AverageSurface,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load the dataset and print KPIs, charts, table and legend
    Summary {
        /// Sort the statistics table on this column (descending)
        #[arg(long, value_enum)]
        sort: Option<SortColumn>,

        /// Sort ascending instead
        #[arg(long, requires = "sort")]
        ascending: bool,
    },

    /// Apply a crop filter (code such as AVH, or "all")
    Filter {
        /// Crop code or "all"
        code: String,
    },

    /// Search parcels by identifier (exact match first, then substring)
    Search {
        /// Identifier or part of it
        query: String,

        /// Focus on the listed result with this identifier instead of the first
        #[arg(long, value_name = "FID")]
        select: Option<i64>,
    },

    /// Show the detail card of a parcel
    Detail {
        /// Parcel identifier (fid)
        fid: i64,
    },

    /// Write the JSON export document
    Export {
        /// Output file or directory (default: dated file in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also save the load report next to the export
        #[arg(long)]
        report: bool,
    },

    /// Use the built-in demonstration dataset (no network)
    Demo,
}

fn new_dashboard(config: &Config) -> Dashboard<TerminalSurface> {
    Dashboard::new(TerminalSurface::new()).with_project_url(config.project_url.clone())
}

async fn load(config: &Config) -> Result<Dashboard<TerminalSurface>> {
    load_into(config, new_dashboard(config)).await
}

async fn load_into(
    config: &Config,
    mut dashboard: Dashboard<TerminalSurface>,
) -> Result<Dashboard<TerminalSurface>> {
    let loader = Loader::from_config(config).context("Failed to build data sources")?;
    info!(
        sources = ?loader.labels(),
        timeout_secs = loader.timeout().as_secs(),
        "Loading dataset"
    );

    let report = dashboard.load_from(&loader).await;
    info!("{}", report.summary());
    Ok(dashboard)
}

/// Exécute la commande summary
pub async fn cmd_summary(
    config: &Config,
    sort: Option<SortColumn>,
    ascending: bool,
) -> Result<()> {
    let mut dashboard = new_dashboard(config);
    if let Some(column) = sort {
        dashboard = dashboard.with_table_sort(column.into(), !ascending);
    }
    let dashboard = load_into(config, dashboard).await?;
    dashboard.report().display();
    Ok(())
}

/// Exécute la commande filter
pub async fn cmd_filter(config: &Config, code: &str) -> Result<()> {
    let mut dashboard = load(config).await?;

    let filter: CropFilter = code.parse().unwrap_or_default();
    if filter.is_active() && !dashboard.store().all().iter().any(|p| filter.matches(p)) {
        warn!(filter = %filter, "No parcel carries this crop code");
    }

    dashboard.on_filter_change(code);
    Ok(())
}

/// Exécute la commande search
pub async fn cmd_search(config: &Config, query: &str, select: Option<i64>) -> Result<()> {
    let mut dashboard = load(config).await?;
    dashboard.on_search_submit(query);

    if let Some(fid) = select {
        if dashboard.select_search_result(fid).is_none() {
            anyhow::bail!("Parcel {} is not among the listed results", fid);
        }
    }
    Ok(())
}

/// Exécute la commande detail
pub async fn cmd_detail(config: &Config, fid: i64) -> Result<()> {
    let mut dashboard = load(config).await?;
    let Some(position) = dashboard.store().position_of(fid) else {
        anyhow::bail!("Parcel {} not found in {}", fid, dashboard.source().unwrap_or("-"));
    };
    dashboard.on_parcel_click(position);
    Ok(())
}

/// Exécute la commande export
pub async fn cmd_export(config: &Config, output: Option<PathBuf>, save_report: bool) -> Result<()> {
    let mut dashboard = load(config).await?;
    let Some(path) = dashboard.export_to(output.as_deref(), chrono::Utc::now())? else {
        return Ok(());
    };
    println!("Export: {}", path.display());

    if save_report {
        let report_path = path.with_extension("report.json");
        dashboard
            .report()
            .save_to_file(&report_path)
            .context(format!("Failed to write report: {}", report_path.display()))?;
        println!("Report: {}", report_path.display());
    }
    Ok(())
}

/// Exécute la commande demo
pub fn cmd_demo() -> Result<()> {
    let mut dashboard = Dashboard::new(TerminalSurface::new());
    dashboard.load_demo();
    dashboard.report().display();
    Ok(())
}
