//! Sources de données: HTTP(S) ou fichier local

use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use tracing::debug;

use super::LoadError;

/// Une source capable de fournir le document brut
#[async_trait]
pub trait Source: Send + Sync {
    /// URL ou chemin, pour les journaux et le rapport
    fn label(&self) -> &str;

    /// Récupère le corps du document
    async fn fetch(&self) -> Result<Vec<u8>, LoadError>;
}

/// Source HTTP(S)
pub struct HttpSource {
    url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }
}

#[async_trait]
impl Source for HttpSource {
    fn label(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<Vec<u8>, LoadError> {
        let transport = |e: reqwest::Error| LoadError::Transport {
            label: self.url.clone(),
            reason: e.to_string(),
        };

        let response = self
            .client
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                label: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        debug!(url = %self.url, bytes = body.len(), "Fetched");
        Ok(body.to_vec())
    }
}

/// Fichier local
pub struct FileSource {
    path: PathBuf,
    label: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let label = path.display().to_string();
        Self { path, label }
    }
}

#[async_trait]
impl Source for FileSource {
    fn label(&self) -> &str {
        &self.label
    }

    async fn fetch(&self) -> Result<Vec<u8>, LoadError> {
        tokio::fs::read(&self.path)
            .await
            .map_err(|error| LoadError::Io {
                label: self.label.clone(),
                error,
            })
    }
}

/// Construit une source depuis une URL (`http://`, `https://`) ou un chemin
/// (`file://` accepté)
pub fn source_for(location: &str, client: &reqwest::Client) -> Box<dyn Source> {
    let location = location.trim();
    if location.starts_with("http://") || location.starts_with("https://") {
        Box::new(HttpSource::new(location, client.clone()))
    } else {
        Box::new(FileSource::new(location.strip_prefix("file://").unwrap_or(location)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_kind_from_location() {
        let client = reqwest::Client::new();
        assert_eq!(
            source_for("https://example.org/a.json", &client).label(),
            "https://example.org/a.json"
        );
        assert_eq!(
            source_for("file:///tmp/a.geojson", &client).label(),
            "/tmp/a.geojson"
        );
        assert_eq!(
            source_for(" parcellespac.geojson ", &client).label(),
            "parcellespac.geojson"
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let source = FileSource::new("/nonexistent/parcelles.geojson");
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
