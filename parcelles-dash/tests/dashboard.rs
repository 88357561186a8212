//! Tests du tableau de bord avec une surface d'enregistrement

use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parcellaire::search::SearchOutcome;
use parcellaire::view::{
    ChartSeries, FilterOption, FitBounds, Focus, KpiCard, LegendEntry, LegendState, MapStyle,
    ParcelDetail, StyleUpdate, TableColumn, TableRow,
};
use parcellaire::CropFilter;
use parcelles_dash::loader::{LoadError, Loader, Source};
use parcelles_dash::{Dashboard, InteractionHandler, LoadStatus, Notice, NoticeLevel, Surface};

#[derive(Debug, Default)]
struct RecordingSurface {
    header: Option<(String, usize)>,
    layer: Vec<MapStyle>,
    updates: Vec<StyleUpdate>,
    charts: usize,
    table: Vec<String>,
    kpis: Option<KpiCard>,
    legend: Vec<LegendEntry>,
    selected_filter: Option<String>,
    search: Option<SearchOutcome>,
    focus: Option<Focus>,
    detail: Option<ParcelDetail>,
    fit: Option<FitBounds>,
    notices: Vec<Notice>,
}

impl Surface for RecordingSurface {
    fn render_header(&mut self, source: &str, count: usize) {
        self.header = Some((source.to_string(), count));
    }
    fn render_layer(&mut self, styles: &[MapStyle]) {
        self.layer = styles.to_vec();
    }
    fn update_styles(&mut self, updates: &[StyleUpdate]) {
        self.updates.extend_from_slice(updates);
    }
    fn render_charts(&mut self, charts: &[ChartSeries]) {
        self.charts = charts.len();
    }
    fn render_table(&mut self, rows: &[TableRow]) {
        self.table = rows.iter().map(|r| r.stat.code.clone()).collect();
    }
    fn render_kpis(&mut self, card: &KpiCard) {
        self.kpis = Some(card.clone());
    }
    fn render_legend(&mut self, entries: &[LegendEntry]) {
        self.legend = entries.to_vec();
    }
    fn render_filter_options(&mut self, _options: &[FilterOption], selected: &CropFilter) {
        self.selected_filter = Some(selected.to_string());
    }
    fn render_search_results(&mut self, outcome: &SearchOutcome) {
        self.search = Some(outcome.clone());
    }
    fn show_focus(&mut self, focus: &Focus) {
        self.focus = Some(focus.clone());
    }
    fn clear_focus(&mut self) {
        self.focus = None;
    }
    fn show_detail(&mut self, detail: &ParcelDetail) {
        self.detail = Some(detail.clone());
    }
    fn close_detail(&mut self) {
        self.detail = None;
    }
    fn fit_bounds(&mut self, fit: &FitBounds) {
        self.fit = Some(*fit);
    }
    fn notify(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }
}

struct FailingSource;

#[async_trait]
impl Source for FailingSource {
    fn label(&self) -> &str {
        "https://example.org/missing.json"
    }

    async fn fetch(&self) -> Result<Vec<u8>, LoadError> {
        Err(LoadError::Status {
            label: self.label().to_string(),
            status: 404,
        })
    }
}

struct StaticSource(&'static str);

#[async_trait]
impl Source for StaticSource {
    fn label(&self) -> &str {
        "static"
    }

    async fn fetch(&self) -> Result<Vec<u8>, LoadError> {
        Ok(self.0.as_bytes().to_vec())
    }
}

fn demo_dashboard() -> Dashboard<RecordingSurface> {
    let mut dashboard = Dashboard::new(RecordingSurface::default());
    dashboard.load_demo();
    dashboard
}

#[test]
fn test_demo_load_renders_everything() {
    let dashboard = demo_dashboard();
    let surface = dashboard.surface();

    assert_eq!(surface.header, Some(("demo".to_string(), 4)));
    assert_eq!(surface.layer.len(), 4);
    assert_eq!(surface.charts, 3);
    assert_eq!(surface.table, vec!["AVH", "AFG"]);
    assert_eq!(surface.kpis.as_ref().unwrap().unique_crops, "2");
    assert_eq!(surface.legend[0].code, "AVH");
    assert!(surface.fit.is_some());
    assert_eq!(surface.notices.last().unwrap(), &Notice::demo_mode());
    assert_eq!(dashboard.report().status, LoadStatus::Demo);
}

#[test]
fn test_table_sorting() {
    let mut dashboard = demo_dashboard();

    dashboard.sort_table(TableColumn::TotalSurface, true);
    assert_eq!(dashboard.surface().table, vec!["AFG", "AVH"]);

    dashboard.sort_table(TableColumn::Count, false);
    assert_eq!(dashboard.surface().table, vec!["AFG", "AVH"]);

    // Tri alphabétique sur le libellé, pas sur le code
    dashboard.sort_table(TableColumn::Name, true);
    assert_eq!(dashboard.surface().table, vec!["AVH", "AFG"]);
}

#[test]
fn test_table_sort_applies_on_load() {
    let mut dashboard =
        Dashboard::new(RecordingSurface::default()).with_table_sort(TableColumn::Name, false);
    dashboard.load_demo();
    assert_eq!(dashboard.surface().table, vec!["AFG", "AVH"]);
}

#[tokio::test]
async fn test_failed_sources_fall_back_to_demo() {
    let loader = Loader::new(
        vec![Box::new(FailingSource), Box::new(FailingSource)],
        Duration::from_secs(1),
    );
    let mut dashboard = Dashboard::new(RecordingSurface::default());
    let report = dashboard.load_from(&loader).await;

    assert_eq!(report.status, LoadStatus::Demo);
    assert_eq!(report.failed_attempts(), 2);
    assert_eq!(dashboard.store().len(), 4);

    let notices = &dashboard.surface().notices;
    assert_eq!(notices.len(), 2);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert!(notices[0].details.iter().any(|d| d.contains("HTTP 404")));
    assert_eq!(notices[1], Notice::demo_mode());
}

#[tokio::test]
async fn test_successful_load_notifies_count() {
    let loader = Loader::new(
        vec![
            Box::new(FailingSource),
            Box::new(StaticSource(
                r#"{"features": [{"properties": {"fid": 1, "code_cultu": "BOR", "surf_parc": 3}}]}"#,
            )),
        ],
        Duration::from_secs(1),
    );
    let mut dashboard = Dashboard::new(RecordingSurface::default());
    dashboard.load_from(&loader).await;

    assert_eq!(dashboard.source(), Some("static"));
    assert_eq!(dashboard.report().status, LoadStatus::Fallback);
    assert_eq!(dashboard.surface().notices, vec![Notice::loaded(1)]);
}

#[test]
fn test_filter_then_all_restores_layer() {
    let mut dashboard = demo_dashboard();
    let initial = dashboard.surface().layer.clone();

    dashboard.on_filter_change("AVH");
    assert_ne!(dashboard.surface().layer, initial);
    assert_eq!(dashboard.surface().selected_filter.as_deref(), Some("AVH"));
    assert_eq!(dashboard.surface().legend[0].state, LegendState::Active);

    dashboard.on_filter_change("all");
    assert_eq!(dashboard.surface().layer, initial);
    assert_eq!(dashboard.surface().selected_filter.as_deref(), Some("all"));
}

#[test]
fn test_search_focuses_first_result() {
    let mut dashboard = demo_dashboard();

    dashboard.on_search_submit("268");
    assert_eq!(dashboard.search_results().len(), 2);
    let focus = dashboard.surface().focus.clone().unwrap();
    assert_eq!(focus.id, 2681);
    assert_eq!(dashboard.view().layer().highlighted(), Some(2));

    let position = dashboard.select_search_result(2683).unwrap();
    assert_eq!(position, 3);
    assert_eq!(dashboard.view().focus().map(|f| f.id), Some(2683));
    assert_eq!(dashboard.surface().focus.as_ref().map(|f| f.id), Some(2683));
    assert_eq!(dashboard.view().layer().highlighted(), Some(3));
    assert!(dashboard.search_results().is_empty());
    assert_eq!(dashboard.surface().search, Some(SearchOutcome::Cleared));
}

#[test]
fn test_select_only_among_listed_results() {
    let mut dashboard = demo_dashboard();
    dashboard.on_search_submit("268");

    assert_eq!(dashboard.select_search_result(261), None);
    assert_eq!(dashboard.search_results().len(), 2);
    assert_eq!(dashboard.view().focus().map(|f| f.id), Some(2681));

    let mut empty = demo_dashboard();
    assert_eq!(empty.select_search_result(2683), None);
    assert!(empty.view().focus().is_none());
}

#[test]
fn test_blank_search_clears_focus() {
    let mut dashboard = demo_dashboard();
    dashboard.on_search_submit("261");
    assert!(dashboard.surface().focus.is_some());

    dashboard.on_search_submit("  ");
    assert!(dashboard.surface().focus.is_none());
    assert!(dashboard.view().focus().is_none());
    assert_eq!(dashboard.view().layer().highlighted(), None);
}

#[test]
fn test_search_without_match() {
    let mut dashboard = demo_dashboard();
    dashboard.on_search_submit("999");
    assert_eq!(dashboard.surface().search, Some(SearchOutcome::NoMatch));
    assert!(dashboard.surface().focus.is_none());
}

#[test]
fn test_search_without_match_clears_previous_focus() {
    let mut dashboard = demo_dashboard();
    dashboard.on_search_submit("261");
    assert_eq!(dashboard.view().layer().highlighted(), Some(0));

    dashboard.on_search_submit("999");
    assert_eq!(dashboard.surface().search, Some(SearchOutcome::NoMatch));
    assert!(dashboard.surface().focus.is_none());
    assert!(dashboard.view().focus().is_none());
    assert_eq!(dashboard.view().layer().highlighted(), None);

    let restored = dashboard.surface().updates.last().unwrap();
    assert_eq!(restored.position, 0);
    assert_eq!(restored.style, dashboard.surface().layer[0]);
}

#[test]
fn test_click_opens_detail_and_filter_closes_it() {
    let mut dashboard = demo_dashboard();
    dashboard.on_parcel_click(0);

    let detail = dashboard.surface().detail.clone().unwrap();
    assert_eq!(detail.id, 261);
    assert_eq!(detail.value("Culture"), Some("AFG - Affouragement en vert"));
    assert_eq!(dashboard.surface().updates.last().unwrap().style.weight, 4.0);

    dashboard.on_filter_change("AVH");
    assert!(dashboard.surface().detail.is_none());
    assert_eq!(dashboard.view().detail(), None);
}

#[test]
fn test_hover_and_leave() {
    let mut dashboard = demo_dashboard();
    let base = dashboard.surface().layer[1];

    dashboard.on_parcel_hover(Some(1));
    assert_eq!(dashboard.view().layer().hovered(), Some(1));

    dashboard.on_parcel_hover(None);
    assert_eq!(dashboard.view().layer().hovered(), None);
    let restored = dashboard.surface().updates.last().unwrap();
    assert_eq!(restored.position, 1);
    assert_eq!(restored.style, base);
}

#[test]
fn test_reset_view() {
    let mut dashboard = demo_dashboard();
    dashboard.on_filter_change("AFG");
    dashboard.on_search_submit("2672");

    dashboard.reset_view();
    let surface = dashboard.surface();
    assert_eq!(surface.selected_filter.as_deref(), Some("all"));
    assert!(surface.focus.is_none());
    assert!(dashboard.search_results().is_empty());
    assert_eq!(surface.notices.last().unwrap(), &Notice::view_reset());
    assert_eq!(surface.fit.unwrap().padding, 50);
}

#[test]
fn test_export_empty_store_is_refused() {
    let mut dashboard = Dashboard::new(RecordingSurface::default());
    let now = Utc.with_ymd_and_hms(2026, 1, 23, 0, 0, 0).unwrap();
    assert!(dashboard.export_to(None, now).unwrap().is_none());
    assert_eq!(dashboard.surface().notices, vec![Notice::nothing_to_export()]);
}

#[test]
fn test_export_to_directory() {
    let mut dashboard = demo_dashboard();
    let dir = std::env::temp_dir().join("parcelles-dash-export-test");
    std::fs::create_dir_all(&dir).unwrap();
    let now = Utc.with_ymd_and_hms(2026, 1, 23, 12, 0, 0).unwrap();

    let path = dashboard.export_to(Some(&dir), now).unwrap().unwrap();
    assert_eq!(
        path.file_name().unwrap().to_str(),
        Some("parcelles-agricoles-export-2026-01-23.json")
    );

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["metadata"]["totalParcelles"], 4);
    assert_eq!(json["metadata"]["source"], "demo");
    assert_eq!(json["top10Parcelles"][0]["fid"], 261);
    assert_eq!(dashboard.surface().notices.last().unwrap().level, NoticeLevel::Success);

    let _ = std::fs::remove_dir_all(&dir);
}
