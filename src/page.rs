use crate::banner::{BannerStack, BannerView};
use crate::errors::LoadError;
use crate::models::SelectOption;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::time::{Duration, Instant};
use tracing::{debug, error};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Anchor {
    TotalRevenue,
    TodayRevenue,
    TotalBookings,
    TodayBookings,
    RevenueChart,
    MoviesChart,
    TheatersChart,
    BookingsTable,
    MovieFilter,
    PeriodFilter,
    TheaterFilter,
    DateRangeGroup,
    DateFrom,
    DateTo,
    ApplyFilters,
    ResetFilters,
    ActiveFiltersCount,
    MainContainer,
}

impl Anchor {
    pub const ALL: [Anchor; 18] = [
        Anchor::TotalRevenue,
        Anchor::TodayRevenue,
        Anchor::TotalBookings,
        Anchor::TodayBookings,
        Anchor::RevenueChart,
        Anchor::MoviesChart,
        Anchor::TheatersChart,
        Anchor::BookingsTable,
        Anchor::MovieFilter,
        Anchor::PeriodFilter,
        Anchor::TheaterFilter,
        Anchor::DateRangeGroup,
        Anchor::DateFrom,
        Anchor::DateTo,
        Anchor::ApplyFilters,
        Anchor::ResetFilters,
        Anchor::ActiveFiltersCount,
        Anchor::MainContainer,
    ];

    /// Element id in the rendered document.
    pub fn id(self) -> &'static str {
        match self {
            Anchor::TotalRevenue => "totalRevenue",
            Anchor::TodayRevenue => "todayRevenue",
            Anchor::TotalBookings => "totalBookings",
            Anchor::TodayBookings => "todayBookings",
            Anchor::RevenueChart => "revenueChart",
            Anchor::MoviesChart => "moviesChart",
            Anchor::TheatersChart => "theatersChart",
            Anchor::BookingsTable => "bookingsTable",
            Anchor::MovieFilter => "movieFilter",
            Anchor::PeriodFilter => "periodFilter",
            Anchor::TheaterFilter => "theaterFilter",
            Anchor::DateRangeGroup => "dateRangeGroup",
            Anchor::DateFrom => "dateFrom",
            Anchor::DateTo => "dateTo",
            Anchor::ApplyFilters => "applyFilters",
            Anchor::ResetFilters => "resetFilters",
            Anchor::ActiveFiltersCount => "activeFiltersCount",
            Anchor::MainContainer => "containerMain",
        }
    }
}

/// A chart attached to a canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartInstance {
    pub id: u64,
    pub config: Value,
}

/// Owned reference to a live chart. Giving it back to [`ChartHost::destroy`]
/// detaches the chart from its canvas.
#[derive(Debug, PartialEq, Eq)]
pub struct ChartHandle {
    id: u64,
    canvas: Anchor,
}

impl ChartHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn canvas(&self) -> Anchor {
        self.canvas
    }
}

/// Stand-in for the charting library: builds instances from Chart.js style
/// configs and keeps track of what is attached to each canvas.
#[derive(Debug, Clone, Default)]
pub struct ChartHost {
    next_id: u64,
    attached: BTreeMap<Anchor, Vec<ChartInstance>>,
}

impl ChartHost {
    pub fn construct(&mut self, canvas: Anchor, config: Value) -> Result<ChartHandle, LoadError> {
        check_config(&config).map_err(|reason| LoadError::render(canvas.id(), reason))?;

        self.next_id += 1;
        let id = self.next_id;
        self.attached
            .entry(canvas)
            .or_default()
            .push(ChartInstance { id, config });
        debug!("chart #{id} attached to {}", canvas.id());
        Ok(ChartHandle { id, canvas })
    }

    pub fn destroy(&mut self, handle: ChartHandle) {
        if let Some(instances) = self.attached.get_mut(&handle.canvas) {
            instances.retain(|instance| instance.id != handle.id);
            if instances.is_empty() {
                self.attached.remove(&handle.canvas);
            }
        }
    }

    pub fn attached(&self, canvas: Anchor) -> &[ChartInstance] {
        self.attached.get(&canvas).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn live_count(&self) -> usize {
        self.attached.values().map(Vec::len).sum()
    }
}

fn check_config(config: &Value) -> Result<(), String> {
    match config.get("type").and_then(Value::as_str) {
        Some("line" | "bar") => {}
        other => return Err(format!("unsupported chart type {other:?}")),
    }

    let labels = config
        .pointer("/data/labels")
        .and_then(Value::as_array)
        .ok_or("missing labels")?;
    let datasets = config
        .pointer("/data/datasets")
        .and_then(Value::as_array)
        .ok_or("missing datasets")?;

    for dataset in datasets {
        let points = dataset
            .get("data")
            .and_then(Value::as_array)
            .ok_or("dataset without data")?;
        if points.len() != labels.len() {
            return Err(format!("{} labels but {} points", labels.len(), points.len()));
        }
        if points.iter().any(|point| !point.is_number()) {
            return Err("non-numeric data point".to_string());
        }
    }
    Ok(())
}

/// The dashboard document. Writes to a missing anchor are skipped.
#[derive(Debug, Clone)]
pub struct Page {
    present: BTreeSet<Anchor>,
    text: BTreeMap<Anchor, String>,
    badge_visible: bool,
    date_range_visible: bool,
    movie_options: Vec<SelectOption>,
    theater_options: Vec<SelectOption>,
    charts: ChartHost,
    banners: BannerStack,
}

impl Page {
    pub fn full(banner_ttl: Duration) -> Self {
        Self::with_anchors(Anchor::ALL, banner_ttl)
    }

    pub fn with_anchors(anchors: impl IntoIterator<Item = Anchor>, banner_ttl: Duration) -> Self {
        Self {
            present: anchors.into_iter().collect(),
            text: BTreeMap::new(),
            badge_visible: false,
            date_range_visible: false,
            movie_options: Vec::new(),
            theater_options: Vec::new(),
            charts: ChartHost::default(),
            banners: BannerStack::new(banner_ttl),
        }
    }

    pub fn without(mut self, anchor: Anchor) -> Self {
        self.present.remove(&anchor);
        self
    }

    pub fn has(&self, anchor: Anchor) -> bool {
        self.present.contains(&anchor)
    }

    /// Returns false when the anchor does not exist.
    pub fn set_text(&mut self, anchor: Anchor, content: impl Into<String>) -> bool {
        if !self.has(anchor) {
            return false;
        }
        self.text.insert(anchor, content.into());
        true
    }

    pub fn text(&self, anchor: Anchor) -> Option<&str> {
        self.text.get(&anchor).map(String::as_str)
    }

    pub fn set_badge(&mut self, count: usize) {
        if !self.has(Anchor::ActiveFiltersCount) {
            return;
        }
        self.badge_visible = count > 0;
        if count > 0 {
            self.text.insert(Anchor::ActiveFiltersCount, format!("{count} active"));
        }
    }

    pub fn badge(&self) -> Option<&str> {
        if self.badge_visible {
            self.text(Anchor::ActiveFiltersCount)
        } else {
            None
        }
    }

    pub fn set_date_range_visible(&mut self, visible: bool) {
        if self.has(Anchor::DateRangeGroup) {
            self.date_range_visible = visible;
        }
    }

    pub fn date_range_visible(&self) -> bool {
        self.date_range_visible
    }

    pub fn append_movie_options(&mut self, options: Vec<SelectOption>) {
        if self.has(Anchor::MovieFilter) {
            self.movie_options.extend(options);
        }
    }

    pub fn append_theater_options(&mut self, options: Vec<SelectOption>) {
        if self.has(Anchor::TheaterFilter) {
            self.theater_options.extend(options);
        }
    }

    pub fn movie_options(&self) -> &[SelectOption] {
        &self.movie_options
    }

    pub fn theater_options(&self) -> &[SelectOption] {
        &self.theater_options
    }

    pub fn charts(&self) -> &ChartHost {
        &self.charts
    }

    pub fn charts_mut(&mut self) -> &mut ChartHost {
        &mut self.charts
    }

    /// Puts a transient banner at the top of the main container.
    pub fn show_error(&mut self, message: &str, now: Instant) {
        error!("{message}");
        if self.has(Anchor::MainContainer) {
            self.banners.push(message, now);
        }
    }

    pub fn banners(&mut self, now: Instant) -> Vec<BannerView> {
        self.banners.visible(now)
    }

    pub fn snapshot(&mut self, now: Instant) -> PageSnapshot {
        let cards = [
            Anchor::TotalRevenue,
            Anchor::TodayRevenue,
            Anchor::TotalBookings,
            Anchor::TodayBookings,
        ]
        .into_iter()
        .filter_map(|anchor| Some((anchor.id(), self.text(anchor)?.to_string())))
        .collect();

        let charts = [Anchor::RevenueChart, Anchor::MoviesChart, Anchor::TheatersChart]
            .into_iter()
            .filter_map(|canvas| {
                let instance = self.charts.attached(canvas).last()?;
                Some((canvas.id(), instance.config.clone()))
            })
            .collect();

        PageSnapshot {
            cards,
            charts,
            bookings_table: self.text(Anchor::BookingsTable).map(str::to_string),
            badge: self.badge().map(str::to_string),
            date_range_visible: self.date_range_visible,
            movie_options: self.movie_options.clone(),
            theater_options: self.theater_options.clone(),
            banners: self.banners(now),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PageSnapshot {
    pub cards: BTreeMap<&'static str, String>,
    pub charts: BTreeMap<&'static str, Value>,
    pub bookings_table: Option<String>,
    pub badge: Option<String>,
    pub date_range_visible: bool,
    pub movie_options: Vec<SelectOption>,
    pub theater_options: Vec<SelectOption>,
    pub banners: Vec<BannerView>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bar(points: Value) -> Value {
        json!({"type": "bar", "data": {"labels": ["a", "b"], "datasets": [{"data": points}]}})
    }

    #[test]
    fn missing_anchors_swallow_writes() {
        let mut page = Page::full(Duration::from_secs(5)).without(Anchor::TotalRevenue);
        assert!(!page.set_text(Anchor::TotalRevenue, "₹1"));
        assert!(page.set_text(Anchor::TodayBookings, "12"));
        assert_eq!(page.text(Anchor::TotalRevenue), None);
        assert_eq!(page.text(Anchor::TodayBookings), Some("12"));
    }

    #[test]
    fn host_rejects_inconsistent_configs() {
        let mut host = ChartHost::default();
        assert!(host.construct(Anchor::MoviesChart, bar(json!([1, 2]))).is_ok());
        assert!(host.construct(Anchor::MoviesChart, bar(json!([1]))).is_err());
        assert!(host.construct(Anchor::MoviesChart, bar(json!([1, null]))).is_err());
        assert!(host.construct(Anchor::MoviesChart, json!({"type": "pie"})).is_err());
        assert_eq!(host.attached(Anchor::MoviesChart).len(), 1);
    }

    #[test]
    fn destroy_detaches_only_that_instance() {
        let mut host = ChartHost::default();
        let first = host.construct(Anchor::MoviesChart, bar(json!([1, 2]))).unwrap();
        let _second = host.construct(Anchor::MoviesChart, bar(json!([3, 4]))).unwrap();
        assert_eq!(host.attached(Anchor::MoviesChart).len(), 2);

        host.destroy(first);
        let left = host.attached(Anchor::MoviesChart);
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].config.pointer("/data/datasets/0/data/0"), Some(&json!(3)));
    }

    #[test]
    fn badge_and_banners_need_their_anchors() {
        let now = Instant::now();
        let mut page = Page::full(Duration::from_secs(5));
        page.set_badge(2);
        assert_eq!(page.badge(), Some("2 active"));
        page.set_badge(0);
        assert_eq!(page.badge(), None);

        page.show_error("boom", now);
        assert_eq!(page.banners(now).len(), 1);

        let mut bare = Page::full(Duration::from_secs(5))
            .without(Anchor::MainContainer)
            .without(Anchor::ActiveFiltersCount);
        bare.set_badge(3);
        bare.show_error("boom", now);
        assert_eq!(bare.badge(), None);
        assert!(bare.banners(now).is_empty());
    }
}
