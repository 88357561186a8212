//! Recherche de parcelles par identifiant

use crate::crops;
use crate::store::FeatureStore;
use crate::view::models::format_ha;

/// Nombre maximum de résultats listés
pub const MAX_RESULTS: usize = 10;

/// Entrée de la liste de résultats
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub position: usize,
    pub id: i64,
    pub crop_name: &'static str,
    pub color: &'static str,
    pub surface: String,
}

/// Issue d'une recherche
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Requête vide: résultats et focus effacés
    Cleared,
    /// Aucune parcelle ne correspond
    NoMatch,
    /// Résultats dans l'ordre d'affichage, le premier reçoit le focus
    Matches(Vec<SearchHit>),
}

/// Index de recherche sur les identifiants du store
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    results: Vec<usize>,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Positions correspondant à la requête
    ///
    /// Une correspondance exacte est retournée seule; sinon les identifiants
    /// contenant la requête, dans l'ordre de stockage, au plus `MAX_RESULTS`.
    pub fn search_by_id(&mut self, store: &FeatureStore, query: &str) -> &[usize] {
        self.results.clear();

        let term = query.trim().to_lowercase();
        if term.is_empty() {
            return &self.results;
        }

        if let Some(exact) = store.all().iter().position(|p| p.id.to_string() == term) {
            self.results.push(exact);
            return &self.results;
        }

        self.results.extend(
            store
                .all()
                .iter()
                .enumerate()
                .filter(|(_, p)| p.id.to_string().contains(&term))
                .map(|(i, _)| i)
                .take(MAX_RESULTS),
        );
        &self.results
    }

    /// Recherche et construit la liste affichable
    pub fn search(&mut self, store: &FeatureStore, query: &str) -> SearchOutcome {
        if query.trim().is_empty() {
            self.clear();
            return SearchOutcome::Cleared;
        }

        self.search_by_id(store, query);
        if self.results.is_empty() {
            return SearchOutcome::NoMatch;
        }

        SearchOutcome::Matches(self.hits(store))
    }

    /// Résultats courants
    pub fn results(&self) -> &[usize] {
        &self.results
    }

    /// Position du résultat qui reçoit le focus
    pub fn first(&self) -> Option<usize> {
        self.results.first().copied()
    }

    pub fn clear(&mut self) {
        self.results.clear();
    }

    fn hits(&self, store: &FeatureStore) -> Vec<SearchHit> {
        self.results
            .iter()
            .filter_map(|&position| {
                let parcel = store.get(position)?;
                let info = crops::lookup_opt(parcel.crop_code());
                Some(SearchHit {
                    position,
                    id: parcel.id,
                    crop_name: info.name,
                    color: info.color,
                    surface: format_ha(parcel.surface_ha),
                })
            })
            .collect()
    }
}
