//! État stylé de la couche carte
//!
//! Les entrées de la couche sont adressées par position de stockage: deux
//! parcelles de même `fid` restent deux polygones distincts.

use crate::types::Parcel;
use crate::view::style::{build_map_style, CropFilter, MapStyle};

/// Nouveau style à appliquer à une entrée de la couche
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleUpdate {
    pub position: usize,
    pub style: MapStyle,
}

/// Styles de base (issus du filtre) plus survol et mise en évidence
#[derive(Debug, Clone, Default)]
pub struct MapLayer {
    base: Vec<MapStyle>,
    hovered: Option<usize>,
    highlighted: Option<usize>,
}

impl MapLayer {
    /// Recalcule le style de chaque parcelle et efface survol/mise en évidence
    pub fn restyle(&mut self, parcels: &[Parcel], filter: &CropFilter) {
        self.base = parcels
            .iter()
            .map(|p| build_map_style(p, filter))
            .collect();
        self.hovered = None;
        self.highlighted = None;
    }

    pub fn len(&self) -> usize {
        self.base.len()
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// Style effectif: base, puis mise en évidence, puis survol
    pub fn style(&self, position: usize) -> Option<MapStyle> {
        let mut style = *self.base.get(position)?;
        if self.highlighted == Some(position) {
            style = style.highlighted();
        }
        if self.hovered == Some(position) {
            style = style.hovered();
        }
        Some(style)
    }

    /// Styles effectifs de toute la couche
    pub fn styles(&self) -> Vec<MapStyle> {
        (0..self.base.len()).filter_map(|i| self.style(i)).collect()
    }

    /// Survol d'une entrée; l'entrée précédemment survolée est restaurée d'abord
    pub fn hover(&mut self, position: usize) -> Vec<StyleUpdate> {
        if position >= self.base.len() || self.hovered == Some(position) {
            return Vec::new();
        }

        let mut updates = Vec::with_capacity(2);
        if let Some(previous) = self.hovered.take() {
            updates.extend(self.update_for(previous));
        }
        self.hovered = Some(position);
        updates.extend(self.update_for(position));
        updates
    }

    /// Fin de survol; sans effet si l'entrée n'est pas celle survolée
    pub fn unhover(&mut self, position: usize) -> Option<StyleUpdate> {
        if self.hovered != Some(position) {
            return None;
        }
        self.hovered = None;
        self.update_for(position)
    }

    /// Met une entrée en évidence et restaure la précédente
    pub fn highlight(&mut self, position: usize) -> Vec<StyleUpdate> {
        if position >= self.base.len() {
            return Vec::new();
        }

        let mut updates = Vec::with_capacity(2);
        if let Some(previous) = self.highlighted.take() {
            if previous != position {
                updates.extend(self.update_for(previous));
            }
        }
        self.highlighted = Some(position);
        updates.extend(self.update_for(position));
        updates
    }

    pub fn clear_highlight(&mut self) -> Option<StyleUpdate> {
        let previous = self.highlighted.take()?;
        self.update_for(previous)
    }

    fn update_for(&self, position: usize) -> Option<StyleUpdate> {
        self.style(position)
            .map(|style| StyleUpdate { position, style })
    }
}
