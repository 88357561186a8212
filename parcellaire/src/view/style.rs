//! Styles de la couche carte et filtre culture

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::crops;
use crate::types::Parcel;

const OUTLINE_COLOR: &str = "#2c3e50";
const DIMMED_COLOR: &str = "#ccc";
const ACCENT_COLOR: &str = "#e74c3c";

/// Style d'un polygone tel que consommé par la bibliothèque carto
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapStyle {
    pub color: &'static str,
    pub fill_color: &'static str,
    pub weight: f64,
    pub opacity: f64,
    pub fill_opacity: f64,
}

impl MapStyle {
    /// Surcouche de survol
    pub fn hovered(self) -> Self {
        Self {
            color: ACCENT_COLOR,
            weight: 3.0,
            fill_opacity: 0.8,
            ..self
        }
    }

    /// Surcouche de mise en évidence (clic, recherche)
    pub fn highlighted(self) -> Self {
        Self {
            color: ACCENT_COLOR,
            weight: 4.0,
            fill_opacity: 0.9,
            ..self
        }
    }
}

/// Filtre culture actif
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CropFilter {
    /// Pas de filtre (`"all"`)
    #[default]
    All,
    /// Un code culture
    Crop(String),
}

impl CropFilter {
    /// Vrai si la parcelle est affichée en pleine intensité
    pub fn matches(&self, parcel: &Parcel) -> bool {
        match self {
            CropFilter::All => true,
            CropFilter::Crop(code) => parcel.crop_code() == Some(code.as_str()),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, CropFilter::Crop(_))
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            CropFilter::All => None,
            CropFilter::Crop(code) => Some(code),
        }
    }
}

impl FromStr for CropFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Ok(CropFilter::All)
        } else {
            Ok(CropFilter::Crop(s.to_string()))
        }
    }
}

impl fmt::Display for CropFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CropFilter::All => write!(f, "all"),
            CropFilter::Crop(code) => write!(f, "{}", code),
        }
    }
}

/// Style d'une parcelle pour un filtre donné
pub fn build_map_style(parcel: &Parcel, filter: &CropFilter) -> MapStyle {
    let crop_color = parcel.crop().color;

    match filter {
        CropFilter::All => MapStyle {
            color: OUTLINE_COLOR,
            fill_color: crop_color,
            weight: 1.5,
            opacity: 0.8,
            fill_opacity: 0.6,
        },
        CropFilter::Crop(code) if filter.matches(parcel) => {
            let color = crops::lookup(code).color;
            MapStyle {
                color,
                fill_color: color,
                weight: 3.0,
                opacity: 1.0,
                fill_opacity: 0.9,
            }
        }
        CropFilter::Crop(_) => MapStyle {
            color: DIMMED_COLOR,
            fill_color: crop_color,
            weight: 1.0,
            opacity: 0.2,
            fill_opacity: 0.1,
        },
    }
}
