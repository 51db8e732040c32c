use crate::api::Endpoint;
use crate::errors::LoadError;
use crate::models::{
    BookingsPayload, FilterOptions, RankingEntry, RevenueSeries, SelectOption, StatsSnapshot,
};
use serde_json::Value;

pub fn stats(value: &Value) -> Result<StatsSnapshot, LoadError> {
    let number = |key: &str| {
        value
            .get(key)
            .and_then(Value::as_f64)
            .ok_or_else(|| LoadError::shape(Endpoint::Stats, format!("`{key}` is not a number")))
    };

    Ok(StatsSnapshot {
        total_revenue: number("total_revenue")?,
        today_revenue: number("today_revenue")?,
        total_bookings: number("total_bookings")?,
        today_bookings: number("today_bookings")?,
    })
}

pub fn revenue(value: &Value) -> Result<RevenueSeries, LoadError> {
    let dates = array(value, "dates", Endpoint::Revenue)?
        .iter()
        .map(|date| {
            date.as_str()
                .map(str::to_string)
                .ok_or_else(|| LoadError::shape(Endpoint::Revenue, "`dates` holds a non-string"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let revenues = array(value, "revenues", Endpoint::Revenue)?
        .iter()
        .map(|amount| {
            amount
                .as_f64()
                .ok_or_else(|| LoadError::shape(Endpoint::Revenue, "`revenues` holds a non-number"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RevenueSeries { dates, revenues })
}

pub fn bookings(value: &Value) -> Result<BookingsPayload, LoadError> {
    let movies = array(value, "movies", Endpoint::Bookings)?;
    let bookings = array(value, "bookings", Endpoint::Bookings)?;

    Ok(BookingsPayload {
        movies: movies.iter().map(|movie| ranking_entry(movie, "title")).collect(),
        bookings: bookings.clone(),
    })
}

pub fn theaters(value: &Value) -> Result<Vec<RankingEntry>, LoadError> {
    Ok(array(value, "theaters", Endpoint::Theaters)?
        .iter()
        .map(|theater| ranking_entry(theater, "name"))
        .collect())
}

/// Missing lists are treated as empty; only a non-object body is rejected.
pub fn filter_options(value: &Value) -> Result<FilterOptions, LoadError> {
    if !value.is_object() {
        return Err(LoadError::shape(Endpoint::FilterOptions, "body is not an object"));
    }

    let options = |key: &str, label_key: &str| -> Vec<SelectOption> {
        value
            .get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| {
                        let value = scalar_text(item.get("id")?)?;
                        let label = item.get(label_key).and_then(Value::as_str).unwrap_or(&value);
                        Some(SelectOption {
                            label: label.to_string(),
                            value,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default()
    };

    Ok(FilterOptions {
        movies: options("movies", "title"),
        theaters: options("theaters", "name"),
    })
}

fn array<'a>(value: &'a Value, key: &str, endpoint: Endpoint) -> Result<&'a Vec<Value>, LoadError> {
    value
        .get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| LoadError::shape(endpoint, format!("`{key}` is not an array")))
}

fn ranking_entry(value: &Value, label_key: &str) -> RankingEntry {
    let label = value
        .get(label_key)
        .and_then(Value::as_str)
        .filter(|label| !label.is_empty())
        .unwrap_or("Unknown");
    let number = |key: &str| value.get(key).and_then(Value::as_f64).unwrap_or(0.0);

    RankingEntry {
        label: label.to_string(),
        bookings: number("bookings"),
        revenue: number("revenue"),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
