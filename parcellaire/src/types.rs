//! Types de données pour le crate parcellaire

use geo::{BoundingRect, MultiPolygon, Point, Rect};

use crate::crops::{self, CropInfo};

/// Une parcelle agricole, immuable une fois chargée
#[derive(Debug, Clone, PartialEq)]
pub struct Parcel {
    /// Identifiant (`fid`), unique par convention seulement
    pub id: i64,

    /// Code culture (`code_cultu`), `None` = non catégorisée
    pub crop_code: Option<String>,

    /// Surface en hectares (`surf_parc`), 0 si absente
    pub surface_ha: f64,

    /// Culture dérobée 1 (`culture_d1`)
    pub secondary_crop_1: Option<String>,

    /// Culture dérobée 2 (`culture_d2`)
    pub secondary_crop_2: Option<String>,

    /// Groupe de culture (`code_group`)
    pub group_code: Option<String>,

    /// Catégorie (`cat_cult_p`)
    pub category: Option<String>,

    /// Géométrie, vide si absente de la source
    pub geometry: MultiPolygon<f64>,
}

impl Parcel {
    /// Crée une parcelle sans attributs secondaires
    pub fn new(id: i64, crop_code: Option<&str>, surface_ha: f64) -> Self {
        Self {
            id,
            crop_code: crop_code.map(str::to_string),
            surface_ha,
            secondary_crop_1: None,
            secondary_crop_2: None,
            group_code: None,
            category: None,
            geometry: MultiPolygon::new(vec![]),
        }
    }

    /// Remplace la géométrie
    pub fn with_geometry(mut self, geometry: MultiPolygon<f64>) -> Self {
        self.geometry = geometry;
        self
    }

    /// Remplace le groupe de culture
    pub fn with_group(mut self, group: &str) -> Self {
        self.group_code = Some(group.to_string());
        self
    }

    /// Code culture sous forme de `&str`
    pub fn crop_code(&self) -> Option<&str> {
        self.crop_code.as_deref()
    }

    /// Métadonnées d'affichage (jamais en échec)
    pub fn crop(&self) -> &'static CropInfo {
        crops::lookup_opt(self.crop_code())
    }

    /// Point représentatif: premier sommet du premier anneau du premier polygone
    pub fn representative_point(&self) -> Option<Point<f64>> {
        let polygon = self.geometry.0.first()?;
        polygon.exterior().0.first().map(|c| Point::from(*c))
    }

    /// Emprise de la géométrie
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.geometry.bounding_rect()
    }
}
