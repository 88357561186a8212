//! Configuration des sources de données
//!
//! Ordre de priorité: valeurs par défaut, fichier JSON (`--config`),
//! variables d'environnement, options de la ligne de commande.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::warn;

/// Source principale par défaut
pub const DEFAULT_PRIMARY_SOURCE: &str = "https://raw.githubusercontent.com/marwanouftir45-ui/testdashbord/refs/heads/main/parcelles-agricoles-2026-01-23.json";

/// Dépôt du projet, cité dans les messages d'erreur
pub const DEFAULT_PROJECT_URL: &str = "https://gitlab.com/marwan.ouftir45/parcellespac";

/// Timeout par source, en secondes
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration principale
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// URL ou chemin de la source principale
    pub primary_source: String,

    /// Sources de repli, consultées dans l'ordre
    pub fallback_sources: Vec<String>,

    /// Timeout appliqué à chaque source
    pub timeout_secs: u64,

    /// Page du projet
    pub project_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            primary_source: DEFAULT_PRIMARY_SOURCE.to_string(),
            fallback_sources: vec![
                "https://gitlab.com/marwan.ouftir45/parcellespac/-/raw/main/parcellespac.geojson"
                    .to_string(),
                "parcellespac.geojson".to_string(),
            ],
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            project_url: DEFAULT_PROJECT_URL.to_string(),
        }
    }
}

impl Config {
    /// Charge une configuration depuis un fichier
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Surcharge depuis les variables d'environnement
    ///
    /// `PARCELLES_URL`, `PARCELLES_FALLBACK_URLS` (séparées par des virgules),
    /// `PARCELLES_TIMEOUT_SECS`.
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("PARCELLES_URL").filter(|u| !u.trim().is_empty()) {
            self.primary_source = url.trim().to_string();
        }

        if let Some(urls) = var("PARCELLES_FALLBACK_URLS") {
            self.fallback_sources = urls
                .split(',')
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .map(String::from)
                .collect();
        }

        if let Some(raw) = var("PARCELLES_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.timeout_secs = secs,
                _ => warn!(value = %raw, "Invalid PARCELLES_TIMEOUT_SECS, keeping {}s", self.timeout_secs),
            }
        }
    }

    /// Surcharge depuis la ligne de commande
    ///
    /// Des `--fallback` explicites remplacent la liste configurée.
    pub fn apply_overrides(
        &mut self,
        source: Option<String>,
        fallbacks: Vec<String>,
        timeout_secs: Option<u64>,
    ) {
        if let Some(source) = source {
            self.primary_source = source;
        }
        if !fallbacks.is_empty() {
            self.fallback_sources = fallbacks;
        }
        if let Some(secs) = timeout_secs.filter(|s| *s > 0) {
            self.timeout_secs = secs;
        }
    }

    /// Toutes les sources, principale en tête
    pub fn sources(&self) -> Vec<&str> {
        std::iter::once(self.primary_source.as_str())
            .chain(self.fallback_sources.iter().map(String::as_str))
            .collect()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.sources().len(), 3);
        assert_eq!(config.sources()[2], "parcellespac.geojson");
    }

    #[test]
    fn test_partial_json() {
        let config: Config = serde_json::from_str(r#"{"timeout_secs": 5}"#).unwrap();
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.primary_source, DEFAULT_PRIMARY_SOURCE);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_vars(vars(&[
            ("PARCELLES_URL", "https://example.org/p.json"),
            ("PARCELLES_FALLBACK_URLS", "a.geojson, ,b.geojson"),
            ("PARCELLES_TIMEOUT_SECS", "12"),
        ]));
        assert_eq!(config.primary_source, "https://example.org/p.json");
        assert_eq!(config.fallback_sources, vec!["a.geojson", "b.geojson"]);
        assert_eq!(config.timeout_secs, 12);
    }

    #[test]
    fn test_invalid_env_timeout_ignored() {
        let mut config = Config::default();
        config.apply_vars(vars(&[("PARCELLES_TIMEOUT_SECS", "soon")]));
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        config.apply_vars(vars(&[("PARCELLES_TIMEOUT_SECS", "0")]));
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_cli_overrides_win() {
        let mut config = Config::default();
        config.apply_vars(vars(&[("PARCELLES_URL", "env.json")]));
        config.apply_overrides(Some("cli.json".into()), vec!["fb.json".into()], Some(3));
        assert_eq!(config.sources(), vec!["cli.json", "fb.json"]);
        assert_eq!(config.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_empty_fallback_flags_keep_config() {
        let mut config = Config::default();
        config.apply_overrides(None, vec![], None);
        assert_eq!(config, Config::default());
    }
}
