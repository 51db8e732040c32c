use chrono::NaiveDate;

pub const RUPEE: char = '₹';

/// Formats `value` with Indian digit grouping and at most `max_fraction`
/// fraction digits, dropping trailing zeros.
pub fn format_number(value: f64, max_fraction: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let factor = 10f64.powi(max_fraction as i32);
    let rounded = (value.abs() * factor).round() / factor;
    let fixed = format!("{:.*}", max_fraction, rounded);
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part.trim_end_matches('0')),
        None => (fixed.as_str(), ""),
    };

    let mut out = String::with_capacity(fixed.len() + 8);
    if value < 0.0 && rounded != 0.0 {
        out.push('-');
    }
    out.push_str(&group_indian(int_part));
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (front, pair) = rest.split_at(rest.len() - 2);
        groups.push(pair);
        rest = front;
    }
    if !rest.is_empty() {
        groups.push(rest);
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// Currency with zero to two fraction digits, as shown on cards and table rows.
pub fn currency(value: f64) -> String {
    format!("{RUPEE}{}", format_number(value, 2))
}

/// Currency rounded to whole rupees, used by chart tooltips.
pub fn currency_whole(value: f64) -> String {
    format!("{RUPEE}{}", format_number(value, 0))
}

/// Plain counts (bookings).
pub fn count(value: f64) -> String {
    format_number(value, 3)
}

/// Value-axis tick: thousands are abbreviated with a `k` suffix.
pub fn axis_tick(value: f64) -> String {
    if value >= 1000.0 {
        format!("{RUPEE}{}k", (value / 1000.0).round())
    } else {
        format!("{RUPEE}{value}")
    }
}

/// Cuts `text` to `max` characters and appends an ellipsis when it was longer.
pub fn truncate_label(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let mut cut: String = text.chars().take(max).collect();
        cut.push_str("...");
        cut
    } else {
        text.to_string()
    }
}

/// Cuts `text` to `max` characters without any marker.
pub fn take_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            other => out.push(other),
        }
    }
    out
}

/// `2026-10-19` becomes `19 Oct`; anything that is not an ISO date is kept as is.
pub fn date_label(iso: &str) -> String {
    match NaiveDate::parse_from_str(iso, "%Y-%m-%d") {
        Ok(date) => date.format("%-d %b").to_string(),
        Err(_) => iso.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indian_grouping() {
        assert_eq!(format_number(125000.0, 2), "1,25,000");
        assert_eq!(format_number(1234567.891, 2), "12,34,567.89");
        assert_eq!(format_number(999.0, 2), "999");
        assert_eq!(format_number(1000.5, 2), "1,000.5");
        assert_eq!(format_number(100000000.0, 0), "10,00,00,000");
    }

    #[test]
    fn negative_and_tiny_values() {
        assert_eq!(format_number(-4500.25, 2), "-4,500.25");
        assert_eq!(format_number(-0.001, 2), "0");
        assert_eq!(format_number(0.0, 2), "0");
    }

    #[test]
    fn currency_variants() {
        assert_eq!(currency(125000.0), "₹1,25,000");
        assert_eq!(currency(3200.0), "₹3,200");
        assert_eq!(currency(249.999), "₹250");
        assert_eq!(currency_whole(1499.6), "₹1,500");
        assert_eq!(count(12.0), "12");
        assert_eq!(count(540.0), "540");
    }

    #[test]
    fn axis_ticks_abbreviate_thousands() {
        assert_eq!(axis_tick(0.0), "₹0");
        assert_eq!(axis_tick(500.0), "₹500");
        assert_eq!(axis_tick(250.5), "₹250.5");
        assert_eq!(axis_tick(1000.0), "₹1k");
        assert_eq!(axis_tick(12500.0), "₹13k");
    }

    #[test]
    fn truncation() {
        assert_eq!(truncate_label("Short", 20), "Short");
        assert_eq!(truncate_label("exactly twenty chars", 20), "exactly twenty chars");
        assert_eq!(
            truncate_label("The Lord of the Rings: The Return of the King", 20),
            "The Lord of the Ring..."
        );
        assert_eq!(take_chars("Crouching Tiger, Hidden Dragon", 25), "Crouching Tiger, Hidden D");
    }

    #[test]
    fn escaping_and_dates() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#039;Jerry&#039;&lt;/b&gt;"
        );
        assert_eq!(date_label("2026-10-09"), "9 Oct");
        assert_eq!(date_label("yesterday"), "yesterday");
    }
}
