use std::{env, ops::RangeInclusive, str::FromStr, time::Duration};
use tracing::warn;

pub const DEFAULT_API_ROOT: &str = "http://127.0.0.1:8000/custom-admin/api";
pub const REVENUE_DAYS_RANGE: RangeInclusive<u32> = 1..=366;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub port: u16,
    pub api_root: String,
    pub session_cookie: Option<String>,
    pub revenue_days: u32,
    pub banner_ttl: Duration,
    pub request_timeout: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            api_root: DEFAULT_API_ROOT.to_string(),
            session_cookie: None,
            revenue_days: 30,
            banner_ttl: Duration::from_millis(5000),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let api_root = lookup("DASHBOARD_API_ROOT")
            .map(|value| value.trim().trim_end_matches('/').to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or(defaults.api_root);

        let session_cookie = lookup("DASHBOARD_SESSION_COOKIE")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        Self {
            port: parse_or(&lookup, "PORT", defaults.port),
            api_root,
            session_cookie,
            revenue_days: clamp_days(parse_or(
                &lookup,
                "DASHBOARD_REVENUE_DAYS",
                defaults.revenue_days,
            )),
            banner_ttl: Duration::from_millis(parse_or(
                &lookup,
                "DASHBOARD_BANNER_TTL_MS",
                defaults.banner_ttl.as_millis() as u64,
            )),
            request_timeout: Duration::from_secs(parse_or(
                &lookup,
                "DASHBOARD_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )),
        }
    }
}

fn clamp_days(days: u32) -> u32 {
    let clamped = days.clamp(*REVENUE_DAYS_RANGE.start(), *REVENUE_DAYS_RANGE.end());
    if clamped != days {
        warn!("DASHBOARD_REVENUE_DAYS={days} is out of range, using {clamped}");
    }
    clamped
}

fn parse_or<T: FromStr + Copy>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!("ignoring invalid {key}={raw:?}, using default");
                default
            }
        },
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = DashboardConfig::from_lookup(|_| None);
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.revenue_days, 30);
        assert_eq!(config.banner_ttl, Duration::from_secs(5));
    }

    #[test]
    fn overrides_are_applied_and_root_is_normalized() {
        let config = DashboardConfig::from_lookup(lookup_from(&[
            ("PORT", "9001"),
            ("DASHBOARD_API_ROOT", "http://backend:8000/custom-admin/api/"),
            ("DASHBOARD_SESSION_COOKIE", "sessionid=abc"),
            ("DASHBOARD_BANNER_TTL_MS", "250"),
        ]));
        assert_eq!(config.port, 9001);
        assert_eq!(config.api_root, "http://backend:8000/custom-admin/api");
        assert_eq!(config.session_cookie.as_deref(), Some("sessionid=abc"));
        assert_eq!(config.banner_ttl, Duration::from_millis(250));
    }

    #[test]
    fn invalid_numbers_fall_back() {
        let config = DashboardConfig::from_lookup(lookup_from(&[
            ("PORT", "http"),
            ("DASHBOARD_REVENUE_DAYS", "thirty"),
            ("DASHBOARD_REQUEST_TIMEOUT_SECS", "-5"),
        ]));
        assert_eq!(config.port, 8080);
        assert_eq!(config.revenue_days, 30);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn revenue_days_are_clamped_to_a_year() {
        let days = |raw: &str| {
            DashboardConfig::from_lookup(lookup_from(&[("DASHBOARD_REVENUE_DAYS", raw)])).revenue_days
        };
        assert_eq!(days("0"), 1);
        assert_eq!(days("90"), 90);
        assert_eq!(days("366"), 366);
        assert_eq!(days("4000000000"), 366);
    }
}
