//! Chargement du jeu de parcelles
//!
//! Les sources sont consultées l'une après l'autre, jamais en parallèle; la
//! première qui fournit une collection exploitable l'emporte.

pub mod source;

use std::time::{Duration, Instant};

use parcellaire::{ParcellaireError, Parcel};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::report::{LoadReport, SourceAttempt};

pub use source::{source_for, FileSource, HttpSource, Source};

/// Erreurs de chargement
#[derive(Debug, Error)]
pub enum LoadError {
    /// Connexion impossible, réponse interrompue
    #[error("{label}: transport error: {reason}")]
    Transport { label: String, reason: String },

    /// Réponse HTTP hors 2xx
    #[error("{label}: HTTP {status}")]
    Status { label: String, status: u16 },

    #[error("{label}: no response after {}s", .timeout.as_secs())]
    Timeout { label: String, timeout: Duration },

    #[error("{label}: {error}")]
    Io {
        label: String,
        #[source]
        error: std::io::Error,
    },

    /// Corps illisible ou collection malformée
    #[error("{label}: {error}")]
    Parse {
        label: String,
        #[source]
        error: ParcellaireError,
    },

    /// Aucune source n'a fourni de données
    #[error("all {} data sources failed", .attempts.len())]
    AllSourcesFailed { attempts: Vec<SourceAttempt> },
}

/// Jeu de données chargé
#[derive(Debug)]
pub struct LoadedDataset {
    pub parcels: Vec<Parcel>,
    /// Source retenue
    pub source: String,
    pub report: LoadReport,
}

/// Chaîne de sources avec timeout par source
pub struct Loader {
    sources: Vec<Box<dyn Source>>,
    timeout: Duration,
}

impl Loader {
    pub fn new(sources: Vec<Box<dyn Source>>, timeout: Duration) -> Self {
        Self { sources, timeout }
    }

    /// Construit la chaîne depuis la configuration
    pub fn from_config(config: &Config) -> Result<Self, LoadError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("parcelles-dash/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LoadError::Transport {
                label: "http client".to_string(),
                reason: e.to_string(),
            })?;

        let sources = config
            .sources()
            .into_iter()
            .map(|location| source_for(location, &client))
            .collect();

        Ok(Self::new(sources, config.timeout()))
    }

    pub fn labels(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.label()).collect()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Essaie chaque source dans l'ordre jusqu'au premier succès
    pub async fn load(&self) -> Result<LoadedDataset, LoadError> {
        let started = Instant::now();
        let mut report = LoadReport::new();

        for (i, source) in self.sources.iter().enumerate() {
            let label = source.label();
            info!(source = %label, attempt = i + 1, "Loading parcels");

            let attempt_started = Instant::now();
            match self.try_source(source.as_ref()).await {
                Ok(parsed) => {
                    report.record_success(label, parsed.parcels.len(), attempt_started.elapsed());
                    report.record_parse_errors(&parsed.errors);
                    report.set_duration(started.elapsed());
                    report.finalize();

                    info!(
                        source = %label,
                        parcels = parsed.parcels.len(),
                        warnings = parsed.errors.len(),
                        "Parcels loaded"
                    );

                    return Ok(LoadedDataset {
                        parcels: parsed.parcels,
                        source: label.to_string(),
                        report,
                    });
                }
                Err(e) => {
                    warn!(source = %label, error = %e, "Source failed, trying next");
                    report.record_failure(label, &e.to_string(), attempt_started.elapsed());
                }
            }
        }

        warn!(sources = self.sources.len(), "All data sources failed");
        Err(LoadError::AllSourcesFailed {
            attempts: report.attempts,
        })
    }

    async fn try_source(
        &self,
        source: &dyn Source,
    ) -> Result<parcellaire::ParsedCollection, LoadError> {
        let label = source.label();
        let bytes = tokio::time::timeout(self.timeout, source.fetch())
            .await
            .map_err(|_| LoadError::Timeout {
                label: label.to_string(),
                timeout: self.timeout,
            })??;

        debug!(source = %label, bytes = bytes.len(), "Decoding collection");
        parcellaire::parse(&bytes).map_err(|error| LoadError::Parse {
            label: label.to_string(),
            error,
        })
    }
}
