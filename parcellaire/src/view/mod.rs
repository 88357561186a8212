//! Synchronisation des vues (carte, graphiques, tableau, légende)
//!
//! `ViewSync` porte l'état d'interaction (filtre, survol, mise en évidence,
//! focus, fiche ouverte) et dérive tous les modèles de vue du même
//! `FeatureStore`. Toute opération qui modifie l'état recalcule la couche
//! entière; il n'y a pas de mise à jour différentielle par parcelle.

pub mod layer;
pub mod models;
pub mod style;

use geo::{Point, Rect};
use tracing::{debug, warn};

use crate::store::FeatureStore;

pub use layer::{MapLayer, StyleUpdate};
pub use models::{
    ChartKind, ChartSeries, FilterOption, KpiCard, LegendEntry, LegendState, ParcelDetail,
    TableColumn, TableRow,
};
pub use style::{build_map_style, CropFilter, MapStyle};

/// Zoom appliqué lors d'un focus sur une parcelle
pub const FOCUS_ZOOM: u8 = 15;

/// Zoom maximum lors d'un recadrage sur l'emprise
pub const FIT_MAX_ZOOM: u8 = 12;

/// Marge (px) lors d'un recadrage sur l'emprise
pub const FIT_PADDING: u32 = 50;

/// Demande de centrage sur une parcelle
#[derive(Debug, Clone, PartialEq)]
pub struct Focus {
    pub position: usize,
    pub id: i64,
    pub center: Point<f64>,
    pub zoom: u8,
    /// Libellé du marqueur ("Parcelle 261")
    pub label: String,
}

/// Demande de recadrage sur une emprise
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitBounds {
    pub bounds: Rect<f64>,
    pub padding: u32,
    pub max_zoom: u8,
}

/// État d'interaction et dérivation des vues
#[derive(Debug, Clone, Default)]
pub struct ViewSync {
    filter: CropFilter,
    layer: MapLayer,
    focus: Option<Focus>,
    detail: Option<usize>,
    generation: u64,
}

impl ViewSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repart de zéro après un chargement du store
    pub fn rebuild(&mut self, store: &FeatureStore) {
        self.filter = CropFilter::All;
        self.layer.restyle(store.all(), &self.filter);
        self.focus = None;
        self.detail = None;
        self.generation = store.generation();
        debug!(
            parcels = store.len(),
            generation = self.generation,
            "Views rebuilt"
        );
    }

    /// Vrai si l'état correspond au contenu actuel du store
    pub fn is_current(&self, store: &FeatureStore) -> bool {
        self.generation == store.generation() && self.layer.len() == store.len()
    }

    fn ensure_current(&mut self, store: &FeatureStore) {
        if !self.is_current(store) {
            warn!(
                view_generation = self.generation,
                store_generation = store.generation(),
                "Store changed without rebuild, rebuilding views"
            );
            self.rebuild(store);
        }
    }

    pub fn active_filter(&self) -> &CropFilter {
        &self.filter
    }

    pub fn layer(&self) -> &MapLayer {
        &self.layer
    }

    /// Styles effectifs de toute la couche, dans l'ordre de stockage
    pub fn styles(&self) -> Vec<MapStyle> {
        self.layer.styles()
    }

    pub fn focus(&self) -> Option<&Focus> {
        self.focus.as_ref()
    }

    /// Position de la parcelle dont la fiche est ouverte
    pub fn detail(&self) -> Option<usize> {
        self.detail
    }

    /// Applique un filtre culture (`CropFilter::All` pour l'effacer)
    ///
    /// La couche entière est restylée; le focus de recherche, la mise en
    /// évidence et la fiche ouverte sont effacés.
    pub fn apply_filter(&mut self, store: &FeatureStore, filter: CropFilter) {
        self.ensure_current(store);
        debug!(filter = %filter, "Applying crop filter");
        self.filter = filter;
        self.layer.restyle(store.all(), &self.filter);
        self.focus = None;
        self.detail = None;
    }

    /// Survol d'une parcelle
    pub fn hover(&mut self, store: &FeatureStore, position: usize) -> Vec<StyleUpdate> {
        self.ensure_current(store);
        self.layer.hover(position)
    }

    /// Fin de survol
    pub fn unhover(&mut self, position: usize) -> Option<StyleUpdate> {
        self.layer.unhover(position)
    }

    /// Clic sur une parcelle: mise en évidence et ouverture de la fiche
    pub fn select(
        &mut self,
        store: &FeatureStore,
        position: usize,
    ) -> Option<(Vec<StyleUpdate>, ParcelDetail)> {
        self.ensure_current(store);
        let parcel = store.get(position)?;
        let updates = self.layer.highlight(position);
        self.detail = Some(position);
        Some((updates, models::parcel_detail(position, parcel)))
    }

    /// Centre sur une parcelle et la met en évidence
    ///
    /// Retourne `None` pour le focus si la parcelle n'a pas de géométrie; la
    /// mise en évidence est appliquée quand même.
    pub fn focus_on(
        &mut self,
        store: &FeatureStore,
        position: usize,
    ) -> (Vec<StyleUpdate>, Option<Focus>) {
        self.ensure_current(store);
        let Some(parcel) = store.get(position) else {
            return (Vec::new(), None);
        };

        let updates = self.layer.highlight(position);
        self.focus = parcel.representative_point().map(|center| Focus {
            position,
            id: parcel.id,
            center,
            zoom: FOCUS_ZOOM,
            label: format!("Parcelle {}", parcel.id),
        });
        if self.focus.is_none() {
            debug!(fid = parcel.id, "Parcel has no geometry, focus skipped");
        }
        (updates, self.focus.clone())
    }

    /// Efface le marqueur de focus et la mise en évidence
    pub fn clear_focus(&mut self) -> Option<StyleUpdate> {
        self.focus = None;
        self.layer.clear_highlight()
    }

    /// Ferme la fiche détaillée; vrai si elle était ouverte
    pub fn close_detail(&mut self) -> bool {
        self.detail.take().is_some()
    }

    /// Réinitialise la vue: filtre, focus, survol, fiche
    ///
    /// Retourne le recadrage sur l'emprise des données, s'il existe.
    pub fn reset(&mut self, store: &FeatureStore) -> Option<FitBounds> {
        self.apply_filter(store, CropFilter::All);
        self.fit_bounds(store)
    }

    /// Recadrage sur l'emprise de toutes les parcelles
    pub fn fit_bounds(&self, store: &FeatureStore) -> Option<FitBounds> {
        store.bounds().map(|bounds| FitBounds {
            bounds,
            padding: FIT_PADDING,
            max_zoom: FIT_MAX_ZOOM,
        })
    }

    pub fn crop_chart(&self, store: &FeatureStore) -> ChartSeries {
        models::crop_chart(store.all())
    }

    pub fn top_crops_chart(&self, store: &FeatureStore) -> ChartSeries {
        models::top_crops_chart(store.all())
    }

    pub fn surface_chart(&self, store: &FeatureStore) -> ChartSeries {
        models::surface_chart(store.all())
    }

    pub fn kpi_card(&self, store: &FeatureStore) -> KpiCard {
        models::kpi_card(store.all())
    }

    pub fn table_rows(&self, store: &FeatureStore) -> Vec<TableRow> {
        models::table_rows(store.all())
    }

    /// Légende, état des entrées selon le filtre actif
    pub fn legend(&self, store: &FeatureStore) -> Vec<LegendEntry> {
        models::legend(store.all(), &self.filter)
    }

    pub fn filter_options(&self, store: &FeatureStore) -> Vec<FilterOption> {
        models::filter_options(store.all())
    }
}
