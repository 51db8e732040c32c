use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total_revenue: f64,
    pub today_revenue: f64,
    pub total_bookings: f64,
    pub today_bookings: f64,
}

/// Daily revenue, `dates[i]` paired with `revenues[i]`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RevenueSeries {
    pub dates: Vec<String>,
    pub revenues: Vec<f64>,
}

impl RevenueSeries {
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() || self.revenues.is_empty()
    }

    pub fn is_aligned(&self) -> bool {
        self.dates.len() == self.revenues.len()
    }
}

/// One row of a top-N list: a movie by bookings or a theater by revenue.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RankingEntry {
    pub label: String,
    pub bookings: f64,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRow {
    pub user: String,
    pub movie: String,
    pub amount: f64,
}

/// Payload of `/bookings/`. Rows stay raw until the table builds them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BookingsPayload {
    pub movies: Vec<RankingEntry>,
    pub bookings: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterOptions {
    pub movies: Vec<SelectOption>,
    pub theaters: Vec<SelectOption>,
}

/// The part of the dashboard a failed load is reported against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureArea {
    Statistics,
    RevenueChart,
    BookingsAndTheaters,
}

impl FeatureArea {
    pub fn banner_message(self) -> &'static str {
        match self {
            FeatureArea::Statistics => "Failed to load statistics. Please try again.",
            FeatureArea::RevenueChart => "Failed to load revenue chart.",
            FeatureArea::BookingsAndTheaters => "Failed to load bookings and theater data.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoadOutcome {
    Completed { failed: Vec<FeatureArea> },
    /// A cycle was already running; nothing was requested.
    Dropped,
    /// Filter controls are not wired, so the action has no listener.
    NotWired,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgeView {
    pub count: usize,
    pub text: Option<String>,
    pub visible: bool,
    pub date_range_visible: bool,
}
