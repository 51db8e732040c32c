use crate::errors::LoadError;
use crate::format;
use crate::models::{RankingEntry, RevenueSeries};
use crate::page::{Anchor, ChartHandle, Page};
use chrono::{Duration as Days, NaiveDate};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, info, warn};

pub const LABEL_LIMIT: usize = 20;

const GRID_COLOR: &str = "rgba(0, 0, 0, 0.05)";
const TICK_COLOR: &str = "#858796";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartSlot {
    Revenue,
    Movies,
    Theaters,
}

impl ChartSlot {
    pub fn canvas(self) -> Anchor {
        match self {
            ChartSlot::Revenue => Anchor::RevenueChart,
            ChartSlot::Movies => Anchor::MoviesChart,
            ChartSlot::Theaters => Anchor::TheatersChart,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ChartSlot::Revenue => "revenue",
            ChartSlot::Movies => "movies",
            ChartSlot::Theaters => "theaters",
        }
    }
}

/// Named tick/tooltip formats understood by the page script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueFormat {
    /// `₹950`, `₹13k`
    CurrencyTick,
    /// `1,250`
    Count,
    /// `Revenue: ₹1,25,000`
    RevenueTooltip,
    /// `Bookings: 1,250`
    BookingsTooltip,
}

pub fn tick_text(format: ValueFormat, value: f64) -> String {
    match format {
        ValueFormat::CurrencyTick => format::axis_tick(value),
        _ => format::count(value),
    }
}

pub fn tooltip_text(format: ValueFormat, value: f64) -> String {
    match format {
        ValueFormat::BookingsTooltip => format!("Bookings: {}", format::count(value)),
        _ => format!("Revenue: {}", format::currency_whole(value)),
    }
}

/// The live chart of each slot.
#[derive(Debug, Default)]
pub struct ChartSlots {
    handles: BTreeMap<ChartSlot, ChartHandle>,
}

impl ChartSlots {
    pub fn get(&self, slot: ChartSlot) -> Option<&ChartHandle> {
        self.handles.get(&slot)
    }

    /// Destroys the slot's current chart, then builds one from `config`.
    /// On failure the slot is left empty.
    fn replace(&mut self, page: &mut Page, slot: ChartSlot, config: Value) -> Result<(), LoadError> {
        if let Some(previous) = self.handles.remove(&slot) {
            page.charts_mut().destroy(previous);
        }
        let handle = page.charts_mut().construct(slot.canvas(), config)?;
        self.handles.insert(slot, handle);
        Ok(())
    }
}

fn install(page: &mut Page, slots: &mut ChartSlots, slot: ChartSlot, config: Value, now: Instant) {
    match slots.replace(page, slot, config) {
        Ok(()) => info!("{} chart rendered", slot.name()),
        Err(err) => {
            warn!("error rendering {} chart: {err}", slot.name());
            page.show_error(&format!("Failed to render {} chart.", slot.name()), now);
        }
    }
}

/// Zero-filled series covering the `days` days that end on `today`.
pub fn placeholder_series(days: u32, today: NaiveDate) -> RevenueSeries {
    let dates = (0..i64::from(days))
        .rev()
        .map(|offset| (today - Days::days(offset)).to_string())
        .collect();
    RevenueSeries {
        dates,
        revenues: vec![0.0; days as usize],
    }
}

pub fn render_revenue(
    page: &mut Page,
    slots: &mut ChartSlots,
    series: &RevenueSeries,
    days: u32,
    today: NaiveDate,
    now: Instant,
) {
    if !page.has(Anchor::RevenueChart) {
        debug!("revenue chart canvas not found");
        return;
    }

    let placeholder;
    let series = if series.is_empty() || !series.is_aligned() {
        warn!(
            "no usable revenue data ({} dates, {} revenues), rendering a {days}-day baseline",
            series.dates.len(),
            series.revenues.len()
        );
        placeholder = placeholder_series(days, today);
        &placeholder
    } else {
        series
    };

    install(page, slots, ChartSlot::Revenue, revenue_config(series), now);
}

pub fn render_movies(page: &mut Page, slots: &mut ChartSlots, movies: &[RankingEntry], now: Instant) {
    if !page.has(Anchor::MoviesChart) {
        return;
    }
    if movies.is_empty() {
        warn!("no movie data to render");
        return;
    }
    install(page, slots, ChartSlot::Movies, movies_config(movies), now);
}

pub fn render_theaters(page: &mut Page, slots: &mut ChartSlots, theaters: &[RankingEntry], now: Instant) {
    if !page.has(Anchor::TheatersChart) {
        return;
    }
    if theaters.is_empty() {
        warn!("no theater data to render");
        return;
    }
    install(page, slots, ChartSlot::Theaters, theaters_config(theaters), now);
}

/// `formatters` names the tick and tooltip callbacks the page script installs.
pub fn revenue_config(series: &RevenueSeries) -> Value {
    let labels: Vec<String> = series.dates.iter().map(|date| format::date_label(date)).collect();
    let values: Vec<f64> = series.revenues.iter().map(|value| value.max(0.0)).collect();

    json!({
        "type": "line",
        "data": {
            "labels": labels,
            "datasets": [{
                "label": "Revenue (₹)",
                "data": values,
                "borderColor": "#667eea",
                "backgroundColor": "rgba(102, 126, 234, 0.1)",
                "fill": true,
                "tension": 0.4,
                "pointRadius": 4,
                "pointBackgroundColor": "#667eea",
                "pointBorderColor": "#fff",
                "pointBorderWidth": 2,
                "pointHoverRadius": 6
            }]
        },
        "options": {
            "responsive": true,
            "maintainAspectRatio": false,
            "interaction": { "mode": "index", "intersect": false },
            "plugins": {
                "legend": legend(),
                "filler": { "propagate": true },
                "tooltip": tooltip()
            },
            "scales": {
                "y": {
                    "beginAtZero": true,
                    "grid": { "color": GRID_COLOR, "drawBorder": false },
                    "ticks": { "font": { "size": 11 }, "color": TICK_COLOR, "padding": 8 }
                },
                "x": {
                    "grid": { "display": false, "drawBorder": false },
                    "ticks": { "font": { "size": 11 }, "color": TICK_COLOR, "padding": 8 }
                }
            }
        },
        "formatters": {
            "axis": "y",
            "ticks": ValueFormat::CurrencyTick,
            "tooltip": ValueFormat::RevenueTooltip
        }
    })
}

pub fn movies_config(movies: &[RankingEntry]) -> Value {
    ranking_config(
        movies.iter().map(|movie| (movie.label.as_str(), movie.bookings)),
        "Bookings",
        ("#1cc88a", "#17a66f"),
        ValueFormat::Count,
        ValueFormat::BookingsTooltip,
    )
}

pub fn theaters_config(theaters: &[RankingEntry]) -> Value {
    ranking_config(
        theaters.iter().map(|theater| (theater.label.as_str(), theater.revenue)),
        "Revenue (₹)",
        ("#36b9cc", "#2aa5ba"),
        ValueFormat::CurrencyTick,
        ValueFormat::RevenueTooltip,
    )
}

fn ranking_config<'a>(
    entries: impl Iterator<Item = (&'a str, f64)>,
    series_label: &str,
    (color, hover): (&str, &str),
    ticks: ValueFormat,
    tooltip_format: ValueFormat,
) -> Value {
    let (labels, values): (Vec<String>, Vec<f64>) = entries
        .map(|(label, value)| (format::truncate_label(label, LABEL_LIMIT), value.max(0.0)))
        .unzip();

    json!({
        "type": "bar",
        "data": {
            "labels": labels,
            "datasets": [{
                "label": series_label,
                "data": values,
                "backgroundColor": color,
                "borderRadius": 6,
                "borderSkipped": false,
                "hoverBackgroundColor": hover
            }]
        },
        "options": {
            "responsive": true,
            "maintainAspectRatio": false,
            "indexAxis": "y",
            "plugins": {
                "legend": legend(),
                "tooltip": tooltip()
            },
            "scales": {
                "y": {
                    "beginAtZero": true,
                    "grid": { "display": false, "drawBorder": false },
                    "ticks": { "font": { "size": 11 }, "color": TICK_COLOR }
                },
                "x": {
                    "beginAtZero": true,
                    "grid": { "color": GRID_COLOR, "drawBorder": false },
                    "ticks": { "font": { "size": 11 }, "color": TICK_COLOR }
                }
            }
        },
        "formatters": {
            "axis": "x",
            "ticks": ticks,
            "tooltip": tooltip_format
        }
    })
}

fn legend() -> Value {
    json!({
        "display": true,
        "position": "top",
        "labels": { "font": { "size": 12, "weight": "600" }, "padding": 15, "usePointStyle": true }
    })
}

fn tooltip() -> Value {
    json!({
        "backgroundColor": "rgba(0, 0, 0, 0.8)",
        "padding": 12,
        "cornerRadius": 6
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn page() -> Page {
        Page::full(Duration::from_secs(5))
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn entry(label: &str, bookings: f64, revenue: f64) -> RankingEntry {
        RankingEntry {
            label: label.to_string(),
            bookings,
            revenue,
        }
    }

    fn data_of(page: &Page, canvas: Anchor) -> Value {
        page.charts().attached(canvas)[0]
            .config
            .pointer("/data/datasets/0/data")
            .cloned()
            .unwrap()
    }

    #[test]
    fn empty_revenue_renders_a_zero_baseline() {
        let mut page = page();
        let mut slots = ChartSlots::default();
        render_revenue(&mut page, &mut slots, &RevenueSeries::default(), 30, today(), Instant::now());

        let config = &page.charts().attached(Anchor::RevenueChart)[0].config;
        let labels = config.pointer("/data/labels").and_then(Value::as_array).unwrap();
        assert_eq!(labels.len(), 30);
        assert_eq!(labels.last(), Some(&json!("19 Oct")));
        assert_eq!(labels.first(), Some(&json!("20 Sep")));
        let values = data_of(&page, Anchor::RevenueChart);
        assert!(values.as_array().unwrap().iter().all(|value| value == &json!(0.0)));
    }

    #[test]
    fn misaligned_revenue_falls_back_too() {
        let mut page = page();
        let mut slots = ChartSlots::default();
        let series = RevenueSeries {
            dates: vec!["2026-10-18".into(), "2026-10-19".into()],
            revenues: vec![100.0],
        };
        render_revenue(&mut page, &mut slots, &series, 30, today(), Instant::now());
        assert_eq!(data_of(&page, Anchor::RevenueChart).as_array().unwrap().len(), 30);
    }

    #[test]
    fn placeholder_ends_today() {
        let series = placeholder_series(30, today());
        assert_eq!(series.dates.len(), 30);
        assert_eq!(series.dates[0], "2026-09-20");
        assert_eq!(series.dates[29], "2026-10-19");
    }

    #[test]
    fn revenue_chart_is_a_filled_smooth_line() {
        let mut page = page();
        let mut slots = ChartSlots::default();
        let series = RevenueSeries {
            dates: vec!["2026-10-18".into(), "2026-10-19".into()],
            revenues: vec![-50.0, 1800.0],
        };
        render_revenue(&mut page, &mut slots, &series, 30, today(), Instant::now());

        let config = &page.charts().attached(Anchor::RevenueChart)[0].config;
        assert_eq!(config["type"], "line");
        assert_eq!(config.pointer("/data/datasets/0/fill"), Some(&json!(true)));
        assert_eq!(config.pointer("/data/datasets/0/tension"), Some(&json!(0.4)));
        assert_eq!(config.pointer("/formatters/ticks"), Some(&json!("currency_tick")));
        assert_eq!(data_of(&page, Anchor::RevenueChart), json!([0.0, 1800.0]));
    }

    #[test]
    fn rendering_twice_keeps_one_instance_per_slot() {
        let mut page = page();
        let mut slots = ChartSlots::default();
        let now = Instant::now();
        let movies = [entry("Dune", 4.0, 0.0)];
        let theaters = [entry("INOX", 2.0, 900.0)];

        for _ in 0..2 {
            render_revenue(&mut page, &mut slots, &RevenueSeries::default(), 30, today(), now);
            render_movies(&mut page, &mut slots, &movies, now);
            render_theaters(&mut page, &mut slots, &theaters, now);
        }

        for slot in [ChartSlot::Revenue, ChartSlot::Movies, ChartSlot::Theaters] {
            let attached = page.charts().attached(slot.canvas());
            assert_eq!(attached.len(), 1, "{slot:?}");
            assert_eq!(slots.get(slot).map(ChartHandle::id), Some(attached[0].id));
        }
        assert_eq!(page.charts().live_count(), 3);
    }

    #[test]
    fn ranking_charts_truncate_and_clamp() {
        let mut page = page();
        let mut slots = ChartSlots::default();
        let movies = [
            entry("The Lord of the Rings: The Return of the King", 42.0, 0.0),
            entry("Her", -1.0, 0.0),
        ];
        render_movies(&mut page, &mut slots, &movies, Instant::now());

        let config = &page.charts().attached(Anchor::MoviesChart)[0].config;
        assert_eq!(config.pointer("/options/indexAxis"), Some(&json!("y")));
        assert_eq!(
            config.pointer("/data/labels"),
            Some(&json!(["The Lord of the Ring...", "Her"]))
        );
        assert_eq!(data_of(&page, Anchor::MoviesChart), json!([42.0, 0.0]));
        assert_eq!(config.pointer("/formatters/tooltip"), Some(&json!("bookings_tooltip")));
    }

    #[test]
    fn theaters_chart_plots_revenue() {
        let mut page = page();
        let mut slots = ChartSlots::default();
        render_theaters(&mut page, &mut slots, &[entry("PVR", 10.0, 12500.0)], Instant::now());
        assert_eq!(data_of(&page, Anchor::TheatersChart), json!([12500.0]));
        assert_eq!(tick_text(ValueFormat::CurrencyTick, 12500.0), "₹13k");
        assert_eq!(tooltip_text(ValueFormat::RevenueTooltip, 12500.0), "Revenue: ₹12,500");
        assert_eq!(tooltip_text(ValueFormat::BookingsTooltip, 1250.0), "Bookings: 1,250");
    }

    #[test]
    fn empty_rankings_keep_the_previous_chart() {
        let mut page = page();
        let mut slots = ChartSlots::default();
        let now = Instant::now();
        render_movies(&mut page, &mut slots, &[entry("Dune", 4.0, 0.0)], now);
        let before = slots.get(ChartSlot::Movies).map(ChartHandle::id);

        render_movies(&mut page, &mut slots, &[], now);
        assert_eq!(slots.get(ChartSlot::Movies).map(ChartHandle::id), before);
        assert_eq!(page.charts().attached(Anchor::MoviesChart).len(), 1);
    }

    #[test]
    fn missing_canvas_is_a_no_op() {
        let mut page = page().without(Anchor::RevenueChart).without(Anchor::MoviesChart);
        let mut slots = ChartSlots::default();
        let now = Instant::now();
        render_revenue(&mut page, &mut slots, &RevenueSeries::default(), 30, today(), now);
        render_movies(&mut page, &mut slots, &[entry("Dune", 1.0, 0.0)], now);
        assert_eq!(page.charts().live_count(), 0);
        assert!(page.banners(now).is_empty());
    }

    #[test]
    fn construction_failure_becomes_a_banner() {
        let mut page = page();
        let mut slots = ChartSlots::default();
        let now = Instant::now();
        install(&mut page, &mut slots, ChartSlot::Movies, movies_config(&[entry("Dune", 1.0, 0.0)]), now);

        let broken = json!({"type": "bar", "data": {"labels": ["a"], "datasets": [{"data": []}]}});
        install(&mut page, &mut slots, ChartSlot::Movies, broken, now);

        assert!(slots.get(ChartSlot::Movies).is_none());
        assert_eq!(page.charts().live_count(), 0);
        let banners = page.banners(now);
        assert_eq!(banners.len(), 1);
        assert_eq!(banners[0].message, "Failed to render movies chart.");
    }
}
