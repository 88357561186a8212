//! Document d'export JSON (métadonnées, synthèse par culture, top 10)

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::aggregate::{self, SurfaceBandCount};
use crate::types::Parcel;

/// Nombre de parcelles du classement exporté
pub const TOP_PARCELS: usize = 10;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub metadata: ExportMetadata,
    pub summary: ExportSummary,
    pub top10_parcelles: Vec<TopParcel>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    /// Horodatage ISO-8601 UTC, précision milliseconde
    pub export_date: String,
    pub total_parcelles: usize,
    pub source: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    pub cultures: BTreeMap<String, CultureSummary>,
    pub surfaces: Vec<SurfaceBandCount>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CultureSummary {
    pub count: usize,
    pub total_surface: f64,
    pub parcelles: Vec<ParcelRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParcelRef {
    pub fid: i64,
    pub surface: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopParcel {
    pub fid: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub culture: Option<String>,
    pub surface: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groupe: Option<String>,
}

impl ExportDocument {
    /// Construit le document pour les parcelles chargées
    pub fn build(parcels: &[Parcel], source: &str, exported_at: DateTime<Utc>) -> Self {
        let mut cultures: BTreeMap<String, CultureSummary> = BTreeMap::new();
        for parcel in parcels {
            let Some(code) = parcel.crop_code() else {
                continue;
            };
            let entry = cultures.entry(code.to_string()).or_default();
            entry.count += 1;
            entry.total_surface += parcel.surface_ha;
            entry.parcelles.push(ParcelRef {
                fid: parcel.id,
                surface: parcel.surface_ha,
            });
        }

        let top10_parcelles = aggregate::largest_parcels(parcels, TOP_PARCELS)
            .into_iter()
            .map(|p| TopParcel {
                fid: p.id,
                culture: p.crop_code.clone(),
                surface: p.surface_ha,
                groupe: p.group_code.clone(),
            })
            .collect();

        Self {
            metadata: ExportMetadata {
                export_date: exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
                total_parcelles: parcels.len(),
                source: source.to_string(),
            },
            summary: ExportSummary {
                cultures,
                surfaces: aggregate::surface_bands(parcels),
            },
            top10_parcelles,
        }
    }

    /// JSON indenté
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Nom de fichier par défaut: `parcelles-agricoles-export-YYYY-MM-DD.json`
pub fn export_file_name(exported_at: DateTime<Utc>) -> String {
    format!(
        "parcelles-agricoles-export-{}.json",
        exported_at.format("%Y-%m-%d")
    )
}
