//! Types d'erreurs pour le crate parcellaire

use thiserror::Error;

/// Erreurs pouvant survenir lors du décodage d'une collection de parcelles
#[derive(Debug, Error)]
pub enum ParcellaireError {
    /// Document JSON illisible
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Collection sans `features` exploitables
    #[error("Malformed collection: {0}")]
    MalformedCollection(String),

    /// Géométrie d'une parcelle non convertible
    #[error("Invalid geometry for parcel {parcel_id}: {reason}")]
    InvalidGeometry { parcel_id: i64, reason: String },

    /// Feature ignorée (ni objet, ni propriétés lisibles)
    #[error("Skipped feature #{index}: {reason}")]
    SkippedFeature { index: usize, reason: String },
}

impl ParcellaireError {
    /// Crée une erreur de collection malformée
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedCollection(reason.into())
    }

    /// Crée une erreur de géométrie invalide
    pub fn invalid_geometry(parcel_id: i64, reason: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            parcel_id,
            reason: reason.into(),
        }
    }

    /// Vrai si l'erreur empêche d'utiliser la collection entière
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Json(_) | Self::MalformedCollection(_))
    }
}
