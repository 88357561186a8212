//! Racine de composition: état applicatif explicite
//!
//! `Dashboard` possède le store, l'état des vues et la recherche, et pousse
//! chaque changement vers sa `Surface`. Toute recomputation est terminée au
//! retour de la méthode appelée.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use parcellaire::demo::{self, DEMO_SOURCE};
use parcellaire::export::{export_file_name, ExportDocument};
use parcellaire::view::{models, TableColumn};
use parcellaire::{CropFilter, FeatureStore, Parcel, SearchIndex, SearchOutcome, ViewSync};
use tracing::{debug, info, warn};

use crate::config::DEFAULT_PROJECT_URL;
use crate::loader::{LoadError, Loader};
use crate::report::LoadReport;
use crate::surface::{Notice, Surface};

/// Contrôles utilisateur
pub trait InteractionHandler {
    /// Sélecteur de culture: un code, ou `"all"`
    fn on_filter_change(&mut self, value: &str);

    fn on_search_submit(&mut self, query: &str);

    /// Clic sur l'entrée de la couche à cette position
    fn on_parcel_click(&mut self, position: usize);

    /// Entrée survolée, `None` quand le pointeur quitte la couche
    fn on_parcel_hover(&mut self, position: Option<usize>);
}

pub struct Dashboard<S: Surface> {
    store: FeatureStore,
    view: ViewSync,
    search: SearchIndex,
    surface: S,
    source: Option<String>,
    report: LoadReport,
    project_url: String,
    /// Tri du tableau: colonne, ordre décroissant
    table_sort: Option<(TableColumn, bool)>,
}

impl<S: Surface> Dashboard<S> {
    pub fn new(surface: S) -> Self {
        Self {
            store: FeatureStore::new(),
            view: ViewSync::new(),
            search: SearchIndex::new(),
            surface,
            source: None,
            report: LoadReport::new(),
            project_url: DEFAULT_PROJECT_URL.to_string(),
            table_sort: None,
        }
    }

    /// Tri du tableau appliqué à chaque rendu
    pub fn with_table_sort(mut self, column: TableColumn, descending: bool) -> Self {
        self.table_sort = Some((column, descending));
        self
    }

    pub fn with_project_url(mut self, url: impl Into<String>) -> Self {
        self.project_url = url.into();
        self
    }

    pub fn store(&self) -> &FeatureStore {
        &self.store
    }

    pub fn view(&self) -> &ViewSync {
        &self.view
    }

    pub fn search_results(&self) -> &[usize] {
        self.search.results()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Source des données affichées
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    /// Charge depuis la chaîne de sources, démo en dernier recours
    pub async fn load_from(&mut self, loader: &Loader) -> &LoadReport {
        match loader.load().await {
            Ok(dataset) => {
                let count = dataset.parcels.len();
                self.install(dataset.parcels, &dataset.source);
                self.report = dataset.report;
                self.surface.notify(&Notice::loaded(count));
            }
            Err(LoadError::AllSourcesFailed { attempts }) => {
                let failures: Vec<String> =
                    attempts.iter().filter_map(|a| a.message.clone()).collect();
                let primary = loader.labels().first().map(|s| s.to_string()).unwrap_or_default();
                self.surface.notify(&Notice::all_sources_failed(
                    &primary,
                    &failures,
                    &self.project_url,
                ));
                self.report = LoadReport::from_attempts(attempts);
                self.load_demo();
            }
            Err(e) => {
                warn!(error = %e, "Unexpected load error, using demo data");
                self.report = LoadReport::new();
                self.load_demo();
            }
        }
        &self.report
    }

    /// Remplace les données par le jeu de démonstration
    pub fn load_demo(&mut self) {
        let parcels = demo::parcels();
        let count = parcels.len();
        info!(parcels = count, "Loading demo data");
        self.install(parcels, DEMO_SOURCE);
        self.report.record_demo(DEMO_SOURCE, count);
        self.surface.notify(&Notice::demo_mode());
    }

    /// Installe un jeu de parcelles et reconstruit toutes les vues
    pub fn install(&mut self, parcels: Vec<Parcel>, source: &str) {
        self.store.load(parcels);
        self.view.rebuild(&self.store);
        self.search.clear();
        self.source = Some(source.to_string());
        debug!(source, parcels = self.store.len(), "Dataset installed");
        self.render_all();
    }

    fn render_all(&mut self) {
        let source = self.source.clone().unwrap_or_default();
        self.surface.render_header(&source, self.store.len());
        self.surface.render_kpis(&self.view.kpi_card(&self.store));
        self.surface.render_charts(&[
            self.view.crop_chart(&self.store),
            self.view.top_crops_chart(&self.store),
            self.view.surface_chart(&self.store),
        ]);
        self.render_table();
        self.render_map();
        if let Some(fit) = self.view.fit_bounds(&self.store) {
            self.surface.fit_bounds(&fit);
        }
    }

    /// Clic sur un en-tête de colonne du tableau
    pub fn sort_table(&mut self, column: TableColumn, descending: bool) {
        self.table_sort = Some((column, descending));
        self.render_table();
    }

    fn render_table(&mut self) {
        let mut rows = self.view.table_rows(&self.store);
        if let Some((column, descending)) = self.table_sort {
            models::sort_rows(&mut rows, column, descending);
        }
        self.surface.render_table(&rows);
    }

    /// Couche, légende et sélecteur: ce qui dépend du filtre actif
    fn render_map(&mut self) {
        self.surface.render_layer(&self.view.styles());
        self.surface.render_legend(&self.view.legend(&self.store));
        self.surface.render_filter_options(
            &self.view.filter_options(&self.store),
            self.view.active_filter(),
        );
    }

    /// Réinitialise filtre, recherche, focus, survol et fiche
    pub fn reset_view(&mut self) {
        self.search.clear();
        self.surface.render_search_results(&SearchOutcome::Cleared);
        self.surface.clear_focus();
        self.surface.close_detail();

        let fit = self.view.reset(&self.store);
        self.render_map();
        if let Some(fit) = fit {
            self.surface.fit_bounds(&fit);
        }
        self.surface.notify(&Notice::view_reset());
    }

    /// Sélection explicite d'un résultat de la liste courante, par identifiant
    ///
    /// Retourne la position sélectionnée; sans effet si aucun résultat listé
    /// ne porte cet identifiant.
    pub fn select_search_result(&mut self, id: i64) -> Option<usize> {
        let position = self
            .search
            .results()
            .iter()
            .copied()
            .find(|&p| self.store.get(p).map(|parcel| parcel.id) == Some(id))?;

        let (updates, focus) = self.view.focus_on(&self.store, position);
        self.surface.update_styles(&updates);
        self.search.clear();
        self.surface.render_search_results(&SearchOutcome::Cleared);
        if let Some(focus) = &focus {
            self.surface.show_focus(focus);
        }
        Some(position)
    }

    pub fn close_detail(&mut self) {
        if self.view.close_detail() {
            self.surface.close_detail();
        }
    }

    /// Document d'export; `None` si aucune donnée n'est chargée
    pub fn export_document(&mut self, now: DateTime<Utc>) -> Option<ExportDocument> {
        if self.store.is_empty() {
            self.surface.notify(&Notice::nothing_to_export());
            return None;
        }
        let source = self.source.as_deref().unwrap_or(DEMO_SOURCE);
        Some(ExportDocument::build(self.store.all(), source, now))
    }

    /// Écrit l'export JSON; chemin par défaut daté dans le répertoire courant
    pub fn export_to(&mut self, output: Option<&Path>, now: DateTime<Utc>) -> Result<Option<PathBuf>> {
        let Some(document) = self.export_document(now) else {
            return Ok(None);
        };

        let path = match output {
            Some(p) if p.is_dir() => p.join(export_file_name(now)),
            Some(p) => p.to_path_buf(),
            None => PathBuf::from(export_file_name(now)),
        };

        let json = document.to_json_pretty().context("Failed to serialize export")?;
        std::fs::write(&path, json)
            .context(format!("Failed to write export: {}", path.display()))?;

        info!(path = %path.display(), parcels = self.store.len(), "Export written");
        self.surface
            .notify(&Notice::export_done(&path.display().to_string()));
        Ok(Some(path))
    }
}

impl<S: Surface> InteractionHandler for Dashboard<S> {
    fn on_filter_change(&mut self, value: &str) {
        let filter: CropFilter = value.parse().unwrap_or_default();
        self.view.apply_filter(&self.store, filter);
        self.surface.clear_focus();
        self.surface.close_detail();
        self.render_map();
    }

    fn on_search_submit(&mut self, query: &str) {
        let outcome = self.search.search(&self.store, query);
        match (&outcome, self.search.first()) {
            (SearchOutcome::Matches(_), Some(first)) => {
                let (updates, focus) = self.view.focus_on(&self.store, first);
                self.surface.update_styles(&updates);
                if let Some(focus) = &focus {
                    self.surface.show_focus(focus);
                }
            }
            // Requête vide ou sans résultat: le marqueur précédent disparaît
            _ => {
                if let Some(update) = self.view.clear_focus() {
                    self.surface.update_styles(&[update]);
                }
                self.surface.clear_focus();
            }
        }
        self.surface.render_search_results(&outcome);
    }

    fn on_parcel_click(&mut self, position: usize) {
        if let Some((updates, detail)) = self.view.select(&self.store, position) {
            self.surface.update_styles(&updates);
            self.surface.show_detail(&detail);
        }
    }

    fn on_parcel_hover(&mut self, position: Option<usize>) {
        let updates = match position {
            Some(position) => self.view.hover(&self.store, position),
            None => self
                .view
                .layer()
                .hovered()
                .and_then(|hovered| self.view.unhover(hovered))
                .into_iter()
                .collect(),
        };
        if !updates.is_empty() {
            self.surface.update_styles(&updates);
        }
    }
}
