use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    All,
    Today,
    Week,
    Month,
    Custom,
}

impl Period {
    pub const ALL: [Period; 5] = [
        Period::All,
        Period::Today,
        Period::Week,
        Period::Month,
        Period::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Period::All => "all",
            Period::Today => "today",
            Period::Week => "week",
            Period::Month => "month",
            Period::Custom => "custom",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Period::All => "All Time",
            Period::Today => "Today",
            Period::Week => "Last 7 Days",
            Period::Month => "Last 30 Days",
            Period::Custom => "Custom Range",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownValue(pub String);

impl fmt::Display for UnknownValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown value {:?}", self.0)
    }
}

impl std::error::Error for UnknownValue {}

impl FromStr for Period {
    type Err = UnknownValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "" | "all" => Ok(Period::All),
            "today" => Ok(Period::Today),
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "custom" => Ok(Period::Custom),
            other => Err(UnknownValue(other.to_string())),
        }
    }
}

/// One of the five filter controls on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    Movie,
    Period,
    Theater,
    DateFrom,
    DateTo,
}

impl FromStr for FilterField {
    type Err = UnknownValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "movie" | "movie_id" => Ok(FilterField::Movie),
            "period" => Ok(FilterField::Period),
            "theater" | "theater_id" => Ok(FilterField::Theater),
            "date_from" => Ok(FilterField::DateFrom),
            "date_to" => Ok(FilterField::DateTo),
            other => Err(UnknownValue(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterState {
    pub movie_id: Option<String>,
    pub period: Period,
    pub theater_id: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl FilterState {
    /// Query parameters in the order they are sent upstream.
    ///
    /// A custom period sends only its dates; any other period except `all`
    /// sends only itself. The two never appear together.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(4);
        if let Some(movie) = &self.movie_id {
            pairs.push(("movie_id", movie.clone()));
        }
        if let Some(theater) = &self.theater_id {
            pairs.push(("theater_id", theater.clone()));
        }

        match self.period {
            Period::Custom => {
                if let Some(from) = self.date_from {
                    pairs.push(("date_from", from.to_string()));
                }
                if let Some(to) = self.date_to {
                    pairs.push(("date_to", to.to_string()));
                }
            }
            Period::All => {}
            period => pairs.push(("period", period.as_str().to_string())),
        }

        pairs
    }

    pub fn to_query_string(&self) -> String {
        self.query_pairs()
            .iter()
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }

    pub fn active_count(&self) -> usize {
        let mut count = 0;
        if self.movie_id.is_some() {
            count += 1;
        }
        if self.theater_id.is_some() {
            count += 1;
        }
        if self.period != Period::All {
            count += 1;
        }
        if self.date_from.is_some() || self.date_to.is_some() {
            count += 1;
        }
        count
    }

    pub fn date_range_visible(&self) -> bool {
        self.period == Period::Custom
    }

    /// Applies a control change. `today` seeds the custom date range.
    pub fn set(&mut self, field: FilterField, value: &str, today: NaiveDate) {
        let value = value.trim();
        match field {
            FilterField::Movie => self.movie_id = non_empty(value),
            FilterField::Theater => self.theater_id = non_empty(value),
            FilterField::DateFrom => self.date_from = parse_date(value),
            FilterField::DateTo => self.date_to = parse_date(value),
            FilterField::Period => match value.parse::<Period>() {
                Ok(period) => {
                    self.period = period;
                    if period == Period::Custom && self.date_from.is_none() {
                        self.date_from = Some(today.checked_sub_months(Months::new(1)).unwrap_or(today));
                        self.date_to = Some(today);
                    }
                }
                Err(err) => warn!("ignoring period change: {err}"),
            },
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    if value.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(err) => {
            warn!("ignoring date {value:?}: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 31).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn default_state_serializes_to_nothing() {
        let state = FilterState::default();
        assert_eq!(state.to_query_string(), "");
        assert_eq!(state.active_count(), 0);
    }

    #[test]
    fn preset_period_ignores_dates() {
        let state = FilterState {
            movie_id: Some("7".into()),
            period: Period::Week,
            date_from: date(2026, 1, 1),
            date_to: date(2026, 1, 31),
            ..Default::default()
        };
        assert_eq!(state.to_query_string(), "movie_id=7&period=week");
    }

    #[test]
    fn custom_period_sends_only_present_dates() {
        let state = FilterState {
            theater_id: Some("3".into()),
            period: Period::Custom,
            date_from: date(2026, 1, 1),
            ..Default::default()
        };
        assert_eq!(state.to_query_string(), "theater_id=3&date_from=2026-01-01");
    }

    #[test]
    fn never_sends_period_together_with_dates() {
        let dates = [None, date(2026, 2, 1)];
        for period in Period::ALL {
            for from in dates {
                for to in dates {
                    let state = FilterState {
                        movie_id: Some("1".into()),
                        period,
                        theater_id: Some("2".into()),
                        date_from: from,
                        date_to: to,
                    };
                    let keys: Vec<&str> = state.query_pairs().iter().map(|(key, _)| *key).collect();
                    let has_period = keys.contains(&"period");
                    let has_dates = keys.contains(&"date_from") || keys.contains(&"date_to");
                    assert!(!(has_period && has_dates), "{period}: {keys:?}");
                    assert!(keys.contains(&"movie_id") && keys.contains(&"theater_id"));
                }
            }
        }
    }

    #[test]
    fn values_are_percent_encoded() {
        let state = FilterState {
            movie_id: Some("a b&c".into()),
            ..Default::default()
        };
        assert_eq!(state.to_query_string(), "movie_id=a%20b%26c");
    }

    #[test]
    fn selecting_custom_seeds_a_one_month_range() {
        let mut state = FilterState::default();
        state.set(FilterField::Period, "custom", today());
        assert!(state.date_range_visible());
        assert_eq!(state.date_from, date(2026, 2, 28));
        assert_eq!(state.date_to, date(2026, 3, 31));

        state.set(FilterField::DateFrom, "2026-03-01", today());
        state.set(FilterField::Period, "week", today());
        state.set(FilterField::Period, "custom", today());
        assert_eq!(state.date_from, date(2026, 3, 1));
        assert!(state.date_range_visible());
    }

    #[test]
    fn badge_count_rules() {
        let mut state = FilterState::default();
        state.set(FilterField::Movie, "4", today());
        state.set(FilterField::Theater, "", today());
        assert_eq!(state.active_count(), 1);

        state.set(FilterField::Period, "month", today());
        state.set(FilterField::DateTo, "2026-03-10", today());
        assert_eq!(state.active_count(), 3);

        state.set(FilterField::Theater, "9", today());
        assert_eq!(state.active_count(), 4);
    }

    #[test]
    fn bad_input_is_ignored() {
        let mut state = FilterState::default();
        state.set(FilterField::Period, "week", today());
        state.set(FilterField::Period, "fortnight", today());
        assert_eq!(state.period, Period::Week);

        state.set(FilterField::DateFrom, "31/03/2026", today());
        assert_eq!(state.date_from, None);
        assert!("screen".parse::<FilterField>().is_err());
    }
}
