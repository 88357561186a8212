//! Capacité de rendu du tableau de bord
//!
//! `Surface` reçoit des modèles de vue déjà formatés; aucune logique métier
//! ne vit derrière ce trait. `TerminalSurface` est le rendu utilisé par la CLI.

use parcellaire::search::SearchOutcome;
use parcellaire::view::{
    ChartSeries, FilterOption, FitBounds, Focus, KpiCard, LegendEntry, LegendState, MapStyle,
    ParcelDetail, StyleUpdate, TableRow,
};
use parcellaire::CropFilter;

/// Sévérité d'une notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// Notification affichée à l'utilisateur
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    /// Lignes complémentaires (URLs testées, pistes de résolution)
    pub details: Vec<String>,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }

    pub fn loaded(count: usize) -> Self {
        Self::new(
            NoticeLevel::Success,
            format!("{} parcelles chargées avec succès!", count),
        )
    }

    pub fn demo_mode() -> Self {
        Self::new(
            NoticeLevel::Warning,
            "Mode démo activé - Données limitées chargées",
        )
    }

    /// Échec de toutes les sources, avec pistes de résolution
    pub fn all_sources_failed(primary: &str, failures: &[String], project_url: &str) -> Self {
        let mut details = vec![format!("URL testée: {}", primary)];
        details.extend(failures.iter().map(|f| format!("Échec: {}", f)));
        details.push("Solutions:".to_string());
        details.push("1. Vérifiez que le fichier existe à cette URL".to_string());
        details.push(
            "2. Téléchargez le fichier et placez-le dans le répertoire courant".to_string(),
        );
        details.push("3. Utilisez le mode démo (commande `demo`)".to_string());
        details.push(format!("Projet: {}", project_url));

        Self::new(
            NoticeLevel::Error,
            "Impossible de charger les données depuis les sources configurées",
        )
        .with_details(details)
    }

    pub fn view_reset() -> Self {
        Self::new(NoticeLevel::Info, "Vue réinitialisée")
    }

    pub fn nothing_to_export() -> Self {
        Self::new(NoticeLevel::Warning, "Aucune donnée à exporter")
    }

    pub fn export_done(file: &str) -> Self {
        Self::new(NoticeLevel::Success, "Export terminé !").with_details(vec![file.to_string()])
    }
}

/// Capacité de rendu implémentée par la couche de présentation
pub trait Surface {
    /// En-tête: source des données et nombre de parcelles
    fn render_header(&mut self, source: &str, count: usize);

    /// Couche carte complète, dans l'ordre de stockage
    fn render_layer(&mut self, styles: &[MapStyle]);

    /// Mise à jour ponctuelle (survol, mise en évidence)
    fn update_styles(&mut self, updates: &[StyleUpdate]);

    fn render_charts(&mut self, charts: &[ChartSeries]);

    fn render_table(&mut self, rows: &[TableRow]);

    fn render_kpis(&mut self, card: &KpiCard);

    fn render_legend(&mut self, entries: &[LegendEntry]);

    fn render_filter_options(&mut self, options: &[FilterOption], selected: &CropFilter);

    fn render_search_results(&mut self, outcome: &SearchOutcome);

    fn show_focus(&mut self, focus: &Focus);

    fn clear_focus(&mut self);

    fn show_detail(&mut self, detail: &ParcelDetail);

    fn close_detail(&mut self);

    fn fit_bounds(&mut self, fit: &FitBounds);

    fn notify(&mut self, notice: &Notice);
}

/// Rendu texte sur la sortie standard
#[derive(Debug, Default)]
pub struct TerminalSurface {
    /// Affiche chaque mise à jour de style (verbeux)
    pub show_style_updates: bool,
}

const BAR_WIDTH: usize = 30;

impl TerminalSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn section(title: &str) {
        println!("\n--- {} ---", title.to_uppercase());
    }
}

/// Barre proportionnelle à `value / max`
fn bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 || !value.is_finite() || value <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * width as f64).round() as usize;
    "█".repeat(len.clamp(1, width))
}

impl Surface for TerminalSurface {
    fn render_header(&mut self, source: &str, count: usize) {
        println!("\n{}", "=".repeat(60));
        println!("Données: {} | Parcelles: {}", source, count);
        println!("{}", "=".repeat(60));
    }

    fn render_layer(&mut self, styles: &[MapStyle]) {
        let emphasized = styles.iter().filter(|s| s.opacity >= 1.0).count();
        let dimmed = styles.iter().filter(|s| s.opacity < 0.5).count();
        Self::section("Carte");
        println!(
            "  {} polygones ({} mis en avant, {} atténués)",
            styles.len(),
            emphasized,
            dimmed
        );
    }

    fn update_styles(&mut self, updates: &[StyleUpdate]) {
        if !self.show_style_updates {
            return;
        }
        for u in updates {
            println!(
                "  style #{}: {} / {} (épaisseur {})",
                u.position, u.style.color, u.style.fill_color, u.style.weight
            );
        }
    }

    fn render_charts(&mut self, charts: &[ChartSeries]) {
        for chart in charts {
            Self::section(chart.title);
            let max = chart.values.iter().cloned().fold(0.0, f64::max);
            let label_width = chart.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
            for (i, label) in chart.labels.iter().enumerate() {
                let value = chart.values.get(i).copied().unwrap_or(0.0);
                println!(
                    "  {:<width$} {:>6} {}",
                    label,
                    value,
                    bar(value, max, BAR_WIDTH),
                    width = label_width
                );
            }
        }
    }

    fn render_table(&mut self, rows: &[TableRow]) {
        Self::section("Statistiques par culture");
        println!(
            "  {:<32} {:>8} {:>12} {:>12} {:>22}",
            "Culture", "Parcelles", "Surface", "Moyenne", "Min - Max"
        );
        for row in rows {
            let [name, count, total, average, range] = row.cells();
            println!(
                "  {:<32} {:>8} {:>12} {:>12} {:>22}",
                name, count, total, average, range
            );
        }
    }

    fn render_kpis(&mut self, card: &KpiCard) {
        Self::section("Indicateurs");
        println!("  Parcelles: {}", card.total_count);
        println!("  Cultures: {}", card.unique_crops);
        println!("  Surface totale: {}", card.total_surface);
        println!("  Surface moyenne: {}", card.average_surface);
        if let Some(hint) = &card.largest_hint {
            println!("  {}", hint);
        }
    }

    fn render_legend(&mut self, entries: &[LegendEntry]) {
        Self::section("Légende");
        for entry in entries {
            let marker = match entry.state {
                LegendState::Normal => ' ',
                LegendState::Active => '*',
                LegendState::Dimmed => '.',
            };
            println!("  {} {} {} {}", marker, entry.color, entry.name, entry.caption());
        }
    }

    fn render_filter_options(&mut self, options: &[FilterOption], selected: &CropFilter) {
        Self::section("Filtre culture");
        let selected = selected.to_string();
        for option in options {
            let marker = if option.value == selected { '>' } else { ' ' };
            println!("  {} {:<6} {}", marker, option.value, option.label);
        }
    }

    fn render_search_results(&mut self, outcome: &SearchOutcome) {
        match outcome {
            SearchOutcome::Cleared => {}
            SearchOutcome::NoMatch => {
                Self::section("Recherche");
                println!("  Aucune parcelle trouvée");
            }
            SearchOutcome::Matches(hits) => {
                Self::section("Recherche");
                for hit in hits {
                    println!(
                        "  FID {:<8} {} - {} ({})",
                        hit.id, hit.crop_name, hit.surface, hit.color
                    );
                }
            }
        }
    }

    fn show_focus(&mut self, focus: &Focus) {
        println!(
            "\n{} @ {:.6}, {:.6} (zoom {})",
            focus.label,
            focus.center.y(),
            focus.center.x(),
            focus.zoom
        );
    }

    fn clear_focus(&mut self) {}

    fn show_detail(&mut self, detail: &ParcelDetail) {
        Self::section(&format!("Parcelle {}", detail.id));
        for (label, value) in &detail.rows {
            println!("  {:<20} {}", label, value);
        }
    }

    fn close_detail(&mut self) {}

    fn fit_bounds(&mut self, fit: &FitBounds) {
        let (min, max) = (fit.bounds.min(), fit.bounds.max());
        println!(
            "\nEmprise: [{:.6}, {:.6}] - [{:.6}, {:.6}] (zoom max {})",
            min.y, min.x, max.y, max.x, fit.max_zoom
        );
    }

    fn notify(&mut self, notice: &Notice) {
        let tag = match notice.level {
            NoticeLevel::Success => "OK",
            NoticeLevel::Info => "INFO",
            NoticeLevel::Warning => "ATTENTION",
            NoticeLevel::Error => "ERREUR",
        };
        println!("\n[{}] {}", tag, notice.message);
        for line in &notice.details {
            println!("    {}", line);
        }
    }
}
