//! Modèles de vue: séries de graphiques, tableau, légende, filtre, détail

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::aggregate::{self, CropStatistic};
use crate::crops;
use crate::types::Parcel;
use crate::view::style::CropFilter;

/// Nombre de cultures du graphique "top"
pub const TOP_CROPS: usize = 10;

/// Type de graphique attendu par la bibliothèque de rendu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Doughnut,
    HorizontalBar,
    Bar,
}

/// Série étiquetée consommée par la bibliothèque de graphiques
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub kind: ChartKind,
    pub title: &'static str,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub colors: Vec<&'static str>,
}

impl ChartSeries {
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Texte d'info-bulle pour un point de la série
    pub fn tooltip(&self, index: usize) -> Option<String> {
        let value = *self.values.get(index)?;
        match self.kind {
            ChartKind::Doughnut => {
                let label = self.labels.get(index).map(String::as_str).unwrap_or("");
                let total = self.total();
                let pct = if total > 0.0 { value / total * 100.0 } else { 0.0 };
                Some(format!("{}: {} parcelles ({:.1}%)", label, value, pct))
            }
            ChartKind::HorizontalBar | ChartKind::Bar => Some(format!("{} parcelles", value)),
        }
    }
}

fn crop_series(
    kind: ChartKind,
    title: &'static str,
    distribution: Vec<(String, usize)>,
) -> ChartSeries {
    let mut series = ChartSeries {
        kind,
        title,
        labels: Vec::with_capacity(distribution.len()),
        values: Vec::with_capacity(distribution.len()),
        colors: Vec::with_capacity(distribution.len()),
    };
    for (code, count) in distribution {
        series.labels.push(crops::display_name(&code));
        series.values.push(count as f64);
        series.colors.push(crops::lookup(&code).color);
    }
    series
}

/// Répartition des cultures (anneau)
pub fn crop_chart(parcels: &[Parcel]) -> ChartSeries {
    crop_series(
        ChartKind::Doughnut,
        "Répartition des cultures",
        aggregate::distribution_by_crop(parcels),
    )
}

/// Top 10 des cultures (barres horizontales)
pub fn top_crops_chart(parcels: &[Parcel]) -> ChartSeries {
    crop_series(
        ChartKind::HorizontalBar,
        "Nombre de parcelles",
        aggregate::top_n(parcels, TOP_CROPS),
    )
}

/// Distribution des surfaces par tranche
pub fn surface_chart(parcels: &[Parcel]) -> ChartSeries {
    let bands = aggregate::surface_bands(parcels);
    ChartSeries {
        kind: ChartKind::Bar,
        title: "Nombre de parcelles",
        labels: bands.iter().map(|b| b.label.to_string()).collect(),
        values: bands.iter().map(|b| b.count as f64).collect(),
        colors: bands.iter().map(|b| b.color).collect(),
    }
}

/// Indicateurs clés formatés
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KpiCard {
    pub total_count: String,
    pub unique_crops: String,
    pub total_surface: String,
    pub average_surface: String,
    /// "Plus grande parcelle: FID 261 (0.66 ha)"
    pub largest_hint: Option<String>,
}

pub fn kpi_card(parcels: &[Parcel]) -> KpiCard {
    let kpis = aggregate::kpis(parcels);
    KpiCard {
        total_count: format_count(kpis.total_count),
        unique_crops: kpis.unique_crop_count.to_string(),
        total_surface: format!("{:.1} ha", kpis.total_surface),
        average_surface: format_ha(kpis.average_surface),
        largest_hint: kpis.largest_parcel.map(|p| {
            format!("Plus grande parcelle: FID {} ({})", p.id, format_ha(p.surface_ha))
        }),
    }
}

/// Ligne du tableau de statistiques
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub stat: CropStatistic,
    pub color: &'static str,
}

impl TableRow {
    /// Cellules formatées: culture, effectif, surface totale, moyenne, min - max
    pub fn cells(&self) -> [String; 5] {
        [
            format!("{} ({})", self.stat.display_name, self.stat.code),
            self.stat.count.to_string(),
            format_ha(self.stat.total_surface),
            format_ha(self.stat.average_surface),
            format!(
                "{:.2} - {:.2} ha",
                self.stat.min_surface, self.stat.max_surface
            ),
        ]
    }
}

/// Colonnes triables du tableau
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableColumn {
    Name,
    Count,
    TotalSurface,
    AverageSurface,
}

/// Lignes du tableau, effectif décroissant
pub fn table_rows(parcels: &[Parcel]) -> Vec<TableRow> {
    aggregate::crop_statistics(parcels)
        .into_iter()
        .map(|stat| TableRow {
            color: crops::lookup(&stat.code).color,
            stat,
        })
        .collect()
}

/// Trie le tableau sur une colonne; à égalité, code croissant
pub fn sort_rows(rows: &mut [TableRow], column: TableColumn, descending: bool) {
    rows.sort_by(|a, b| {
        let primary = match column {
            TableColumn::Name => a.stat.display_name.cmp(&b.stat.display_name),
            TableColumn::Count => a.stat.count.cmp(&b.stat.count),
            TableColumn::TotalSurface => a.stat.total_surface.total_cmp(&b.stat.total_surface),
            TableColumn::AverageSurface => {
                a.stat.average_surface.total_cmp(&b.stat.average_surface)
            }
        };
        let primary = if descending { primary.reverse() } else { primary };
        match primary {
            Ordering::Equal => a.stat.code.cmp(&b.stat.code),
            other => other,
        }
    });
}

/// État visuel d'une entrée de légende
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendState {
    Normal,
    Active,
    Dimmed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub code: String,
    pub name: &'static str,
    pub color: &'static str,
    pub count: usize,
    /// Part de l'ensemble des parcelles chargées, en %
    pub percentage: f64,
    pub state: LegendState,
}

impl LegendEntry {
    /// "AVH • 3 parcelles (75.0%)"
    pub fn caption(&self) -> String {
        format!(
            "{} • {} parcelles ({:.1}%)",
            self.code, self.count, self.percentage
        )
    }
}

/// Légende triée par fréquence, état selon le filtre actif
pub fn legend(parcels: &[Parcel], filter: &CropFilter) -> Vec<LegendEntry> {
    let total = parcels.len();
    aggregate::distribution_by_crop(parcels)
        .into_iter()
        .map(|(code, count)| {
            let info = crops::lookup(&code);
            let state = match filter.code() {
                None => LegendState::Normal,
                Some(active) if active == code => LegendState::Active,
                Some(_) => LegendState::Dimmed,
            };
            LegendEntry {
                name: info.name,
                color: info.color,
                count,
                percentage: count as f64 / total as f64 * 100.0,
                state,
                code,
            }
        })
        .collect()
}

/// Option du sélecteur de culture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    /// Valeur transmise à `apply_filter`
    pub value: String,
    pub label: String,
    pub color: Option<&'static str>,
}

/// `"all"` puis les codes présents, triés
pub fn filter_options(parcels: &[Parcel]) -> Vec<FilterOption> {
    let codes: BTreeSet<&str> = parcels.iter().filter_map(Parcel::crop_code).collect();

    std::iter::once(FilterOption {
        value: CropFilter::All.to_string(),
        label: "Toutes les cultures".to_string(),
        color: None,
    })
    .chain(codes.into_iter().map(|code| {
        let info = crops::lookup(code);
        FilterOption {
            value: code.to_string(),
            label: format!("{} ({})", info.name, code),
            color: Some(info.color),
        }
    }))
    .collect()
}

/// Fiche détaillée d'une parcelle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParcelDetail {
    pub position: usize,
    pub id: i64,
    pub color: &'static str,
    pub rows: Vec<(&'static str, String)>,
}

impl ParcelDetail {
    pub fn value(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, v)| v.as_str())
    }
}

pub fn parcel_detail(position: usize, parcel: &Parcel) -> ParcelDetail {
    let info = parcel.crop();
    let unspecified = || "Non spécifié".to_string();
    let na = || "N/A".to_string();

    let coordinates = parcel
        .representative_point()
        .map(|p| format!("{:.6}, {:.6}", p.y(), p.x()))
        .unwrap_or_else(|| "Non disponible".to_string());

    ParcelDetail {
        position,
        id: parcel.id,
        color: info.color,
        rows: vec![
            ("FID", parcel.id.to_string()),
            (
                "Culture",
                format!("{} - {}", parcel.crop_code().unwrap_or("N/A"), info.name),
            ),
            ("Groupe", parcel.group_code.clone().unwrap_or_else(na)),
            ("Surface", format_ha(parcel.surface_ha)),
            (
                "Culture principale",
                parcel.secondary_crop_1.clone().unwrap_or_else(unspecified),
            ),
            (
                "Culture secondaire",
                parcel.secondary_crop_2.clone().unwrap_or_else(unspecified),
            ),
            ("Catégorie", parcel.category.clone().unwrap_or_else(na)),
            ("Coordonnées", coordinates),
        ],
    }
}

/// Surface en hectares, 2 décimales
pub fn format_ha(value: f64) -> String {
    format!("{:.2} ha", value)
}

/// Entier avec séparateur de milliers à la française
pub fn format_count(value: usize) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{LineString, MultiPolygon, Polygon};

    fn sample() -> Vec<Parcel> {
        vec![
            Parcel::new(1, Some("AVH"), 0.2),
            Parcel::new(2, Some("AVH"), 0.4),
            Parcel::new(3, Some("BFS"), 2.0),
            Parcel::new(4, None, 7.0),
        ]
    }

    #[test]
    fn test_crop_chart() {
        let chart = crop_chart(&sample());
        assert_eq!(chart.labels, vec!["Arboriculture Haute Tige", "Blé tendre"]);
        assert_eq!(chart.values, vec![2.0, 1.0]);
        assert_eq!(chart.colors, vec!["#2ecc71", "#f39c12"]);
        assert_eq!(
            chart.tooltip(0).unwrap(),
            "Arboriculture Haute Tige: 2 parcelles (66.7%)"
        );
        assert!(chart.tooltip(5).is_none());
    }

    #[test]
    fn test_surface_chart() {
        let chart = surface_chart(&sample());
        assert_eq!(chart.values, vec![0.0, 2.0, 0.0, 1.0, 1.0]);
        assert_eq!(chart.tooltip(1).unwrap(), "2 parcelles");
    }

    #[test]
    fn test_kpi_card() {
        let card = kpi_card(&sample());
        assert_eq!(card.total_count, "4");
        assert_eq!(card.unique_crops, "2");
        assert_eq!(card.total_surface, "9.6 ha");
        assert_eq!(card.average_surface, "2.40 ha");
        assert_eq!(
            card.largest_hint.as_deref(),
            Some("Plus grande parcelle: FID 4 (7.00 ha)")
        );
        assert!(kpi_card(&[]).largest_hint.is_none());
    }

    #[test]
    fn test_table_sorting() {
        let mut rows = table_rows(&sample());
        assert_eq!(rows[0].stat.code, "AVH");
        assert_eq!(rows[0].cells()[4], "0.20 - 0.40 ha");

        sort_rows(&mut rows, TableColumn::TotalSurface, true);
        assert_eq!(rows[0].stat.code, "BFS");

        sort_rows(&mut rows, TableColumn::Name, false);
        assert_eq!(rows[0].stat.code, "AVH");
    }

    #[test]
    fn test_legend_states() {
        let parcels = sample();
        let entries = legend(&parcels, &CropFilter::Crop("BFS".to_string()));
        assert_eq!(entries[0].state, LegendState::Dimmed);
        assert_eq!(entries[1].state, LegendState::Active);
        assert_eq!(entries[0].caption(), "AVH • 2 parcelles (50.0%)");

        let entries = legend(&parcels, &CropFilter::All);
        assert!(entries.iter().all(|e| e.state == LegendState::Normal));
    }

    #[test]
    fn test_filter_options_sorted() {
        let parcels = vec![
            Parcel::new(1, Some("BFS"), 0.0),
            Parcel::new(2, Some("AFG"), 0.0),
            Parcel::new(3, Some("BFS"), 0.0),
        ];
        let options = filter_options(&parcels);
        let values: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["all", "AFG", "BFS"]);
        assert_eq!(options[1].label, "Affouragement en vert (AFG)");
    }

    #[test]
    fn test_parcel_detail() {
        let geometry = MultiPolygon::new(vec![Polygon::new(
            LineString::from(vec![(-2.098221, 48.083437), (-2.0, 48.0), (-2.1, 48.1)]),
            vec![],
        )]);
        let parcel = Parcel::new(261, Some("AFG"), 0.66)
            .with_group("16")
            .with_geometry(geometry);

        let detail = parcel_detail(0, &parcel);
        assert_eq!(detail.value("Culture"), Some("AFG - Affouragement en vert"));
        assert_eq!(detail.value("Surface"), Some("0.66 ha"));
        assert_eq!(detail.value("Culture principale"), Some("Non spécifié"));
        assert_eq!(detail.value("Catégorie"), Some("N/A"));
        assert_eq!(detail.value("Coordonnées"), Some("48.083437, -2.098221"));

        let bare = parcel_detail(1, &Parcel::new(2, None, 0.0));
        assert_eq!(bare.value("Culture"), Some("N/A - Autre"));
        assert_eq!(bare.value("Coordonnées"), Some("Non disponible"));
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1234), "1 234");
        assert_eq!(format_count(1234567), "1 234 567");
    }
}
