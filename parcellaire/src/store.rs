//! Collection de référence des parcelles chargées pour la session

use geo::{coord, Rect};

use crate::types::Parcel;

/// Source unique de vérité pour toutes les vues dérivées
///
/// Le contenu n'est jamais modifié en place: `load` remplace toute la
/// collection et les vues doivent être recalculées par l'appelant.
#[derive(Debug, Default, Clone)]
pub struct FeatureStore {
    parcels: Vec<Parcel>,
    generation: u64,
}

impl FeatureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remplace atomiquement la collection
    pub fn load(&mut self, parcels: Vec<Parcel>) {
        self.parcels = parcels;
        self.generation += 1;
    }

    /// Toutes les parcelles, dans l'ordre de stockage
    pub fn all(&self) -> &[Parcel] {
        &self.parcels
    }

    /// Parcelle à une position de stockage
    pub fn get(&self, position: usize) -> Option<&Parcel> {
        self.parcels.get(position)
    }

    /// Première parcelle portant cet identifiant
    ///
    /// Les identifiants n'étant pas garantis uniques, on retourne toujours
    /// la première occurrence dans l'ordre de stockage.
    pub fn find_by_id(&self, id: i64) -> Option<&Parcel> {
        self.parcels.iter().find(|p| p.id == id)
    }

    /// Position de la première parcelle portant cet identifiant
    pub fn position_of(&self, id: i64) -> Option<usize> {
        self.parcels.iter().position(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.parcels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parcels.is_empty()
    }

    /// Compteur incrémenté à chaque `load`
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Emprise de toutes les géométries
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.parcels
            .iter()
            .filter_map(Parcel::bounds)
            .reduce(|acc, r| {
                Rect::new(
                    coord! { x: acc.min().x.min(r.min().x), y: acc.min().y.min(r.min().y) },
                    coord! { x: acc.max().x.max(r.max().x), y: acc.max().y.max(r.max().y) },
                )
            })
    }
}
