//! Rapport de chargement des données
//!
//! Collecte les tentatives par source, les features ignorées et la source
//! retenue, pour l'affichage console et la sauvegarde JSON.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use parcellaire::ParcellaireError;
use serde::Serialize;

/// Provenance des données affichées
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoadStatus {
    /// Rien n'a encore été chargé
    Pending,
    /// Source principale
    Primary,
    /// Une source de repli
    Fallback,
    /// Toutes les sources ont échoué: données de démonstration
    Demo,
}

/// Issue d'une tentative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttemptOutcome {
    Success,
    Failed,
}

/// Tentative sur une source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceAttempt {
    /// URL ou chemin de la source
    pub source: String,
    pub outcome: AttemptOutcome,
    /// Cause de l'échec
    pub message: Option<String>,
    pub duration_secs: f64,
}

/// Rapport complet de chargement
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub status: LoadStatus,
    /// Source retenue
    pub source: Option<String>,
    pub duration_secs: f64,
    pub parcels_loaded: usize,
    /// Features illisibles, ignorées
    pub features_skipped: usize,
    /// Parcelles conservées sans géométrie
    pub invalid_geometries: usize,
    pub attempts: Vec<SourceAttempt>,
    pub warnings: Vec<String>,
}

impl Default for LoadReport {
    fn default() -> Self {
        Self {
            status: LoadStatus::Pending,
            source: None,
            duration_secs: 0.0,
            parcels_loaded: 0,
            features_skipped: 0,
            invalid_geometries: 0,
            attempts: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

impl LoadReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reprend les tentatives d'un chargement échoué
    pub fn from_attempts(attempts: Vec<SourceAttempt>) -> Self {
        Self {
            attempts,
            ..Default::default()
        }
    }

    /// Enregistre une source en échec
    pub fn record_failure(&mut self, source: &str, message: &str, duration: Duration) {
        self.attempts.push(SourceAttempt {
            source: source.to_string(),
            outcome: AttemptOutcome::Failed,
            message: Some(message.to_string()),
            duration_secs: duration.as_secs_f64(),
        });
    }

    /// Enregistre la source retenue
    pub fn record_success(&mut self, source: &str, parcels: usize, duration: Duration) {
        self.attempts.push(SourceAttempt {
            source: source.to_string(),
            outcome: AttemptOutcome::Success,
            message: None,
            duration_secs: duration.as_secs_f64(),
        });
        self.source = Some(source.to_string());
        self.parcels_loaded = parcels;
    }

    /// Enregistre les erreurs non fatales du décodage
    pub fn record_parse_errors(&mut self, errors: &[ParcellaireError]) {
        // Les erreurs fatales invalident toute la source: elles vont dans
        // le message de la tentative, pas dans les avertissements
        for error in errors.iter().filter(|e| !e.is_fatal()) {
            match error {
                ParcellaireError::SkippedFeature { .. } => self.features_skipped += 1,
                ParcellaireError::InvalidGeometry { .. } => self.invalid_geometries += 1,
                _ => {}
            }
            self.warnings.push(error.to_string());
        }
    }

    /// Substitution des données de démonstration
    pub fn record_demo(&mut self, source: &str, parcels: usize) {
        self.source = Some(source.to_string());
        self.parcels_loaded = parcels;
        self.status = LoadStatus::Demo;
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration_secs = duration.as_secs_f64();
    }

    /// Détermine le statut final selon la tentative gagnante
    pub fn finalize(&mut self) {
        if self.status == LoadStatus::Demo {
            return;
        }
        self.status = match self
            .attempts
            .iter()
            .position(|a| a.outcome == AttemptOutcome::Success)
        {
            Some(0) => LoadStatus::Primary,
            Some(_) => LoadStatus::Fallback,
            None => LoadStatus::Pending,
        };
    }

    pub fn failed_attempts(&self) -> usize {
        self.attempts
            .iter()
            .filter(|a| a.outcome == AttemptOutcome::Failed)
            .count()
    }

    /// Affiche le rapport sur la console
    pub fn display(&self) {
        println!("\n{}", "=".repeat(60));
        println!("LOAD REPORT");
        println!("{}", "=".repeat(60));

        println!("\nStatus: {:?}", self.status);
        println!("Source: {}", self.source.as_deref().unwrap_or("-"));
        println!("Duration: {:.2}s", self.duration_secs);

        println!("\n--- SUMMARY ---");
        println!(
            "Parcels: {} loaded, {} features skipped, {} without geometry",
            self.parcels_loaded, self.features_skipped, self.invalid_geometries
        );

        if !self.attempts.is_empty() {
            println!("\n--- SOURCES ({}) ---", self.attempts.len());
            for (i, a) in self.attempts.iter().enumerate() {
                println!(
                    "  {}. {:?} {} ({:.2}s){}",
                    i + 1,
                    a.outcome,
                    a.source,
                    a.duration_secs,
                    a.message
                        .as_ref()
                        .map(|m| format!(": {}", m))
                        .unwrap_or_default()
                );
            }
        }

        if !self.warnings.is_empty() {
            println!("\n--- WARNINGS ({}) ---", self.warnings.len());
            for w in self.warnings.iter().take(10) {
                println!("  {}", w);
            }
            if self.warnings.len() > 10 {
                println!("  ... and {} more", self.warnings.len() - 10);
            }
        }

        println!("\n{}", "=".repeat(60));
    }

    /// Sauvegarde le rapport en JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Affichage compact pour le résumé
    pub fn summary(&self) -> String {
        format!(
            "{:?}: {} parcels from {}, {} failed sources, {} warnings",
            self.status,
            self.parcels_loaded,
            self.source.as_deref().unwrap_or("-"),
            self.failed_attempts(),
            self.warnings.len()
        )
    }
}
