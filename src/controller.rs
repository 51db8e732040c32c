use crate::api::{DashboardApi, Endpoint};
use crate::charts::{self, ChartSlots};
use crate::config::{DashboardConfig, REVENUE_DAYS_RANGE};
use crate::errors::LoadError;
use crate::filters::{FilterField, FilterState};
use crate::models::{BadgeView, FeatureArea, LoadOutcome, RevenueSeries};
use crate::page::{Anchor, Page, PageSnapshot};
use crate::table;
use crate::validate;
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    Idle,
    Loading,
}

struct View {
    page: Page,
    filters: FilterState,
    slots: ChartSlots,
    listeners_wired: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub state: LoadState,
    pub listeners_wired: bool,
    pub filters: FilterState,
    pub query: String,
    pub page: PageSnapshot,
}

pub struct Dashboard<A> {
    api: A,
    revenue_days: u32,
    loading: AtomicBool,
    view: Mutex<View>,
}

/// Holds the loading flag for one cycle and clears it on drop.
struct LoadGuard<'a>(&'a AtomicBool);

impl<'a> LoadGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<A: DashboardApi> Dashboard<A> {
    pub fn new(api: A, page: Page, config: &DashboardConfig) -> Self {
        Self {
            api,
            revenue_days: config
                .revenue_days
                .clamp(*REVENUE_DAYS_RANGE.start(), *REVENUE_DAYS_RANGE.end()),
            loading: AtomicBool::new(false),
            view: Mutex::new(View {
                page,
                filters: FilterState::default(),
                slots: ChartSlots::default(),
                listeners_wired: false,
            }),
        }
    }

    pub fn state(&self) -> LoadState {
        if self.loading.load(Ordering::Acquire) {
            LoadState::Loading
        } else {
            LoadState::Idle
        }
    }

    /// Loads everything, then wires the filter controls if that has not
    /// happened yet for this page.
    pub async fn initialize(&self) -> LoadOutcome {
        info!("initializing dashboard");
        let outcome = self.run_cycle().await;
        if outcome != LoadOutcome::Dropped {
            self.wire_listeners().await;
        }
        outcome
    }

    /// Reacts to a filter control change. Returns `None` while the controls
    /// have no listeners.
    pub async fn change_filter(&self, field: FilterField, value: &str) -> Option<BadgeView> {
        let mut view = self.view.lock().await;
        if !view.listeners_wired {
            debug!("filter change on {field:?} before listeners were wired");
            return None;
        }

        view.filters.set(field, value, today());
        Some(refresh_filter_ui(&mut view))
    }

    pub async fn apply_filters(&self) -> LoadOutcome {
        if !self.view.lock().await.listeners_wired {
            return LoadOutcome::NotWired;
        }
        self.run_cycle().await
    }

    pub async fn reset_filters(&self) -> LoadOutcome {
        {
            let mut view = self.view.lock().await;
            if !view.listeners_wired {
                return LoadOutcome::NotWired;
            }
            view.filters = FilterState::default();
            refresh_filter_ui(&mut view);
        }
        self.initialize().await
    }

    pub async fn snapshot(&self) -> DashboardView {
        let mut view = self.view.lock().await;
        let filters = view.filters.clone();
        DashboardView {
            state: self.state(),
            listeners_wired: view.listeners_wired,
            query: filters.to_query_string(),
            filters,
            page: view.page.snapshot(Instant::now()),
        }
    }

    async fn run_cycle(&self) -> LoadOutcome {
        let Some(_guard) = LoadGuard::acquire(&self.loading) else {
            debug!("load already in progress, dropping trigger");
            return LoadOutcome::Dropped;
        };

        let query = self.view.lock().await.filters.to_query_string();
        debug!("loading dashboard with filters {query:?}");

        let (stats, revenue, bookings) = tokio::join!(
            self.load_stats(&query),
            self.load_revenue(&query),
            self.load_bookings(&query),
        );

        let mut failed = Vec::new();
        for (area, result) in [
            (FeatureArea::Statistics, stats),
            (FeatureArea::RevenueChart, revenue),
            (FeatureArea::BookingsAndTheaters, bookings),
        ] {
            if let Err(err) = result {
                error!("error loading {area:?}: {err}");
                self.view
                    .lock()
                    .await
                    .page
                    .show_error(area.banner_message(), Instant::now());
                failed.push(area);
            }
        }

        if failed.is_empty() {
            info!("dashboard data loaded");
        }
        LoadOutcome::Completed { failed }
    }

    async fn load_stats(&self, query: &str) -> Result<(), LoadError> {
        let body = self.api.get_json(Endpoint::Stats, query).await?;
        let stats = validate::stats(&body)?;

        let mut view = self.view.lock().await;
        table::render_stats(&mut view.page, &stats);
        Ok(())
    }

    async fn load_revenue(&self, query: &str) -> Result<(), LoadError> {
        let query = if query.is_empty() {
            format!("days={}", self.revenue_days)
        } else {
            format!("days={}&{query}", self.revenue_days)
        };

        let result = match self.api.get_json(Endpoint::Revenue, &query).await {
            Ok(body) => validate::revenue(&body),
            Err(err) => Err(err),
        };

        let mut view = self.view.lock().await;
        let View { page, slots, .. } = &mut *view;
        match result {
            Ok(series) => {
                debug!("revenue series with {} points", series.dates.len());
                charts::render_revenue(page, slots, &series, self.revenue_days, today(), Instant::now());
                Ok(())
            }
            Err(err) => {
                charts::render_revenue(
                    page,
                    slots,
                    &RevenueSeries::default(),
                    self.revenue_days,
                    today(),
                    Instant::now(),
                );
                Err(err)
            }
        }
    }

    /// Bookings and theaters are fetched together. Only the bookings half
    /// decides the outcome; theaters render when they arrive intact.
    async fn load_bookings(&self, query: &str) -> Result<(), LoadError> {
        let (bookings, theaters) = tokio::join!(
            self.api.get_json(Endpoint::Bookings, query),
            self.api.get_json(Endpoint::Theaters, query),
        );
        let payload = validate::bookings(&bookings?)?;

        let mut view = self.view.lock().await;
        let View { page, slots, .. } = &mut *view;
        let now = Instant::now();
        charts::render_movies(page, slots, &payload.movies, now);
        table::render_bookings_table(page, &payload.bookings);

        match theaters.and_then(|body| validate::theaters(&body)) {
            Ok(theaters) => charts::render_theaters(page, slots, &theaters, now),
            Err(err) => warn!("theater data unavailable: {err}"),
        }
        Ok(())
    }

    async fn wire_listeners(&self) {
        {
            let mut view = self.view.lock().await;
            if view.listeners_wired {
                return;
            }
            if !view.page.has(Anchor::ApplyFilters) || !view.page.has(Anchor::ResetFilters) {
                debug!("filter buttons missing, leaving filters unwired");
                return;
            }
            view.listeners_wired = true;
            refresh_filter_ui(&mut view);
        }

        let options = match self.api.get_json(Endpoint::FilterOptions, "").await {
            Ok(body) => validate::filter_options(&body),
            Err(err) => Err(err),
        };
        match options {
            Ok(options) => {
                let mut view = self.view.lock().await;
                view.page.append_movie_options(options.movies);
                view.page.append_theater_options(options.theaters);
            }
            Err(err) => error!("error loading filter options: {err}"),
        }
    }
}

fn refresh_filter_ui(view: &mut View) -> BadgeView {
    let count = view.filters.active_count();
    let date_range_visible = view.filters.date_range_visible();
    view.page.set_badge(count);
    view.page.set_date_range_visible(date_range_visible);
    BadgeView {
        count,
        text: view.page.badge().map(str::to_string),
        visible: count > 0,
        date_range_visible,
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
