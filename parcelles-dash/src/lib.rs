//! # parcelles-dash
//!
//! Tableau de bord des parcelles agricoles (RPG) au-dessus du crate
//! `parcellaire`.
//!
//! ## Features
//!
//! - Chargement séquentiel: source principale puis sources de repli, avec
//!   timeout par source et données de démonstration en dernier recours
//! - `Dashboard`: état applicatif explicite (store, vues, recherche)
//! - `Surface`: capacité de rendu, implémentée ici pour le terminal
//! - Rapport de chargement et export JSON
//!
//! ## Usage CLI
//!
//! ```bash
//! # Synthèse (KPIs, graphiques, tableau, légende)
//! parcelles-dash summary
//!
//! # Filtre culture, recherche, fiche parcelle
//! parcelles-dash filter AVH
//! parcelles-dash search 2681
//! parcelles-dash detail 261
//!
//! # Export JSON, source locale
//! parcelles-dash --source ./parcellespac.geojson export --output ./export.json
//! ```

pub mod config;
pub mod dashboard;
pub mod loader;
pub mod report;
pub mod surface;

pub use config::Config;
pub use dashboard::{Dashboard, InteractionHandler};
pub use loader::{LoadError, LoadedDataset, Loader};
pub use report::{LoadReport, LoadStatus};
pub use surface::{Notice, NoticeLevel, Surface, TerminalSurface};
