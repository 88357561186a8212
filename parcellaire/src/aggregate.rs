//! Agrégations pures sur une séquence de parcelles
//!
//! Tous les classements par effectif utilisent le même ordre déterministe:
//! effectif décroissant, puis code culture croissant (ordre lexicographique).

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::crops;
use crate::types::Parcel;

/// Tranche de surface (intervalle semi-ouvert `[min, max)`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceBand {
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub color: &'static str,
}

impl SurfaceBand {
    pub fn contains(&self, surface: f64) -> bool {
        surface >= self.min && surface < self.max
    }
}

/// Les 5 tranches fixes, partition de `[0, ∞)`
pub const SURFACE_BANDS: [SurfaceBand; 5] = [
    SurfaceBand { label: "Très petite < 0.1 ha", min: 0.0, max: 0.1, color: "#a8e6cf" },
    SurfaceBand { label: "Petite 0.1 - 0.5 ha", min: 0.1, max: 0.5, color: "#dcedc1" },
    SurfaceBand { label: "Moyenne 0.5 - 1 ha", min: 0.5, max: 1.0, color: "#ffd3b6" },
    SurfaceBand { label: "Grande 1 - 5 ha", min: 1.0, max: 5.0, color: "#ffaaa5" },
    SurfaceBand { label: "Très grande > 5 ha", min: 5.0, max: f64::INFINITY, color: "#ff8b94" },
];

/// Index de la première tranche contenant la surface
pub fn band_index(surface: f64) -> Option<usize> {
    SURFACE_BANDS.iter().position(|b| b.contains(surface))
}

/// Effectif d'une tranche de surface
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfaceBandCount {
    pub label: &'static str,
    pub min: f64,
    /// `None` pour la dernière tranche (non bornée)
    pub max: Option<f64>,
    pub count: usize,
    pub color: &'static str,
}

/// Statistiques d'un groupe de culture
#[derive(Debug, Clone, PartialEq)]
pub struct CropStatistic {
    pub code: String,
    pub display_name: String,
    pub count: usize,
    pub total_surface: f64,
    pub average_surface: f64,
    pub min_surface: f64,
    pub max_surface: f64,
}

/// Indicateurs clés
#[derive(Debug, Clone, PartialEq)]
pub struct Kpis<'a> {
    pub total_count: usize,
    pub unique_crop_count: usize,
    pub total_surface: f64,
    pub average_surface: f64,
    pub largest_parcel: Option<&'a Parcel>,
}

/// Effectif par code culture, parcelles sans code ignorées
pub fn distribution_by_crop(parcels: &[Parcel]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for code in parcels.iter().filter_map(Parcel::crop_code) {
        *counts.entry(code).or_default() += 1;
    }

    let mut sorted: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(code, count)| (code.to_string(), count))
        .collect();
    // Tri stable: à effectif égal l'ordre du BTreeMap (code croissant) est conservé
    sorted.sort_by(|a, b| b.1.cmp(&a.1));
    sorted
}

/// Les `n` cultures les plus représentées
pub fn top_n(parcels: &[Parcel], n: usize) -> Vec<(String, usize)> {
    let mut sorted = distribution_by_crop(parcels);
    sorted.truncate(n);
    sorted
}

/// Histogramme des surfaces sur les 5 tranches fixes
///
/// Une surface négative ou non finie ne tombe dans aucune tranche et n'est
/// pas comptée.
pub fn surface_bands(parcels: &[Parcel]) -> Vec<SurfaceBandCount> {
    let mut counts = [0usize; SURFACE_BANDS.len()];
    for parcel in parcels {
        if let Some(idx) = band_index(parcel.surface_ha) {
            counts[idx] += 1;
        }
    }

    SURFACE_BANDS
        .iter()
        .zip(counts)
        .map(|(band, count)| SurfaceBandCount {
            label: band.label,
            min: band.min,
            max: band.max.is_finite().then_some(band.max),
            count,
            color: band.color,
        })
        .collect()
}

#[derive(Default)]
struct Accumulator {
    count: usize,
    total: f64,
    min: f64,
    max: f64,
}

/// Statistiques par culture, triées par effectif
///
/// Les parcelles sans code culture sont exclues de cette agrégation.
pub fn crop_statistics(parcels: &[Parcel]) -> Vec<CropStatistic> {
    let mut groups: BTreeMap<&str, Accumulator> = BTreeMap::new();

    for parcel in parcels {
        let Some(code) = parcel.crop_code() else {
            continue;
        };
        let surface = parcel.surface_ha;
        let acc = groups.entry(code).or_insert_with(|| Accumulator {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            ..Default::default()
        });
        acc.count += 1;
        acc.total += surface;
        acc.min = acc.min.min(surface);
        acc.max = acc.max.max(surface);
    }

    let mut stats: Vec<CropStatistic> = groups
        .into_iter()
        .map(|(code, acc)| {
            let empty = acc.count == 0;
            CropStatistic {
                code: code.to_string(),
                display_name: crops::display_name(code),
                count: acc.count,
                total_surface: acc.total,
                average_surface: if empty { 0.0 } else { acc.total / acc.count as f64 },
                min_surface: if empty { 0.0 } else { acc.min },
                max_surface: if empty { 0.0 } else { acc.max },
            }
        })
        .collect();

    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats
}

/// Indicateurs clés de la collection
pub fn kpis(parcels: &[Parcel]) -> Kpis<'_> {
    let total_count = parcels.len();

    let unique_crop_count = parcels
        .iter()
        .filter_map(Parcel::crop_code)
        .collect::<BTreeSet<_>>()
        .len();

    let total_surface: f64 = parcels.iter().map(|p| p.surface_ha).sum();

    let average_surface = if total_count > 0 {
        total_surface / total_count as f64
    } else {
        0.0
    };

    // Sentinelle -∞: une collection vide laisse `largest` à None
    let mut max_surface = f64::NEG_INFINITY;
    let mut largest = None;
    for parcel in parcels {
        if parcel.surface_ha > max_surface {
            max_surface = parcel.surface_ha;
            largest = Some(parcel);
        }
    }

    Kpis {
        total_count,
        unique_crop_count,
        total_surface,
        average_surface,
        largest_parcel: largest,
    }
}

/// Les `n` plus grandes parcelles, surface décroissante
///
/// À surface égale l'ordre de stockage est conservé.
pub fn largest_parcels(parcels: &[Parcel], n: usize) -> Vec<&Parcel> {
    let mut sorted: Vec<&Parcel> = parcels.iter().collect();
    sorted.sort_by(|a, b| b.surface_ha.total_cmp(&a.surface_ha));
    sorted.truncate(n);
    sorted
}
