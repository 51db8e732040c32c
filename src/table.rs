use crate::errors::LoadError;
use crate::format::{self, escape_html};
use crate::models::{BookingRow, StatsSnapshot};
use crate::page::{Anchor, Page};
use serde_json::Value;
use tracing::{debug, error};

pub const MOVIE_CELL_LIMIT: usize = 25;

const EMPTY_ROW: &str =
    r#"<tr><td colspan="3" class="text-center text-muted"><em>No bookings found</em></td></tr>"#;
const ERROR_ROW: &str =
    r#"<tr><td colspan="3" class="text-center text-danger">Error loading bookings</td></tr>"#;

pub fn render_stats(page: &mut Page, stats: &StatsSnapshot) {
    let cards = [
        (Anchor::TotalRevenue, format::currency(stats.total_revenue)),
        (Anchor::TotalBookings, format::count(stats.total_bookings)),
        (Anchor::TodayRevenue, format::currency(stats.today_revenue)),
        (Anchor::TodayBookings, format::count(stats.today_bookings)),
    ];
    for (anchor, text) in cards {
        if !page.set_text(anchor, text) {
            debug!("stat card {} not on page", anchor.id());
        }
    }
}

pub fn render_bookings_table(page: &mut Page, bookings: &[Value]) {
    if !page.has(Anchor::BookingsTable) {
        return;
    }
    page.set_text(Anchor::BookingsTable, bookings_table_body(bookings));
}

/// Table body markup: one row per booking, a notice when there are none, or a
/// single error row if any booking cannot be shown.
pub fn bookings_table_body(bookings: &[Value]) -> String {
    if bookings.is_empty() {
        return EMPTY_ROW.to_string();
    }

    let rows: Result<Vec<BookingRow>, LoadError> = bookings.iter().map(booking_row).collect();
    match rows {
        Ok(rows) => rows.iter().map(row_markup).collect(),
        Err(err) => {
            error!("error rendering bookings table: {err}");
            ERROR_ROW.to_string()
        }
    }
}

fn booking_row(value: &Value) -> Result<BookingRow, LoadError> {
    let object = value
        .as_object()
        .ok_or_else(|| LoadError::render("bookings table", "booking is not an object"))?;

    let text = |key: &str| match object.get(key) {
        None | Some(Value::Null) => Ok("Unknown".to_string()),
        Some(Value::String(text)) if text.is_empty() => Ok("Unknown".to_string()),
        Some(Value::String(text)) => Ok(text.clone()),
        Some(_) => Err(LoadError::render("bookings table", format!("`{key}` is not a string"))),
    };

    let amount = match object.get("amount") {
        None | Some(Value::Null) => 0.0,
        Some(value) => value
            .as_f64()
            .ok_or_else(|| LoadError::render("bookings table", "`amount` is not a number"))?,
    };

    Ok(BookingRow {
        user: text("user")?,
        movie: text("movie")?,
        amount,
    })
}

fn row_markup(row: &BookingRow) -> String {
    format!(
        r#"<tr><td><strong>{user}</strong></td><td title="{title}" style="max-width: 200px; overflow: hidden; text-overflow: ellipsis; white-space: nowrap;">{movie}</td><td class="text-end">{amount}</td></tr>"#,
        user = escape_html(&row.user),
        title = escape_html(&row.movie),
        movie = escape_html(&format::take_chars(&row.movie, MOVIE_CELL_LIMIT)),
        amount = format::currency(row.amount),
    )
}
