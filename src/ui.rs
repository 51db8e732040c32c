use crate::controller::DashboardView;
use crate::filters::Period;
use crate::format::escape_html;
use crate::models::SelectOption;
use crate::page::Anchor;

pub fn render_dashboard(view: &DashboardView) -> String {
    let card = |anchor: Anchor| {
        view.page
            .cards
            .get(anchor.id())
            .map(|text| escape_html(text))
            .unwrap_or_else(|| "&mdash;".to_string())
    };

    let filters = &view.filters;
    let period_options: String = Period::ALL
        .iter()
        .map(|period| option_markup(period.as_str(), period.label(), *period == filters.period))
        .collect();

    let banners: String = view
        .page
        .banners
        .iter()
        .map(|banner| {
            format!(
                r#"<div class="error-message" data-phase="{phase}"><span>{message}</span></div>"#,
                phase = banner.phase.as_str(),
                message = escape_html(&banner.message),
            )
        })
        .collect();

    let charts_json = serde_json::to_string(&view.page.charts)
        .unwrap_or_else(|_| "{}".to_string())
        .replace("</", "<\\/");

    fill_template(INDEX_HTML, |key| {
        let value = match key {
            "TOTAL_REVENUE" => card(Anchor::TotalRevenue),
            "TODAY_REVENUE" => card(Anchor::TodayRevenue),
            "TOTAL_BOOKINGS" => card(Anchor::TotalBookings),
            "TODAY_BOOKINGS" => card(Anchor::TodayBookings),
            "MOVIE_OPTIONS" => {
                select_options("All movies", &view.page.movie_options, filters.movie_id.as_deref())
            }
            "THEATER_OPTIONS" => select_options(
                "All theaters",
                &view.page.theater_options,
                filters.theater_id.as_deref(),
            ),
            "PERIOD_OPTIONS" => period_options.clone(),
            "DATE_FROM" => filters.date_from.map(|d| d.to_string()).unwrap_or_default(),
            "DATE_TO" => filters.date_to.map(|d| d.to_string()).unwrap_or_default(),
            "DATE_RANGE_STYLE" => {
                let style = if view.page.date_range_visible { "block" } else { "none" };
                style.to_string()
            }
            "BADGE_STYLE" => {
                let style = if view.page.badge.is_some() { "inline-block" } else { "none" };
                style.to_string()
            }
            "BADGE" => escape_html(view.page.badge.as_deref().unwrap_or_default()),
            "BOOKINGS_ROWS" => view.page.bookings_table.clone().unwrap_or_default(),
            "BANNERS" => banners.clone(),
            "CHARTS_JSON" => charts_json.clone(),
            _ => return None,
        };
        Some(value)
    })
}

/// Substitutes `{{KEY}}` tokens in one left-to-right pass. Inserted text is
/// never scanned again; unknown tokens are kept as they are.
fn fill_template(template: &str, value_for: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            rest = &rest[open..];
            break;
        };

        let key = &after[..close];
        match value_for(key) {
            Some(value) => out.push_str(&value),
            None => out.push_str(&rest[open..open + close + 4]),
        }
        rest = &after[close + 2..];
    }

    out.push_str(rest);
    out
}

fn select_options(placeholder: &str, options: &[SelectOption], selected: Option<&str>) -> String {
    let mut markup = option_markup("", placeholder, selected.is_none());
    for option in options {
        markup.push_str(&option_markup(
            &option.value,
            &option.label,
            selected == Some(option.value.as_str()),
        ));
    }
    markup
}

fn option_markup(value: &str, label: &str, selected: bool) -> String {
    format!(
        r#"<option value="{}"{}>{}</option>"#,
        escape_html(value),
        if selected { " selected" } else { "" },
        escape_html(label)
    )
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Admin Dashboard</title>
  <script src="https://cdn.jsdelivr.net/npm/chart.js@4"></script>
  <style>
    :root {
      --bg: #f8f9fc;
      --ink: #2b2d42;
      --muted: #858796;
      --accent: #667eea;
      --danger: #e74a3b;
      --card: #ffffff;
      --shadow: 0 12px 32px rgba(58, 59, 69, 0.12);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Nunito", "Segoe UI", sans-serif;
    }

    .container-main {
      width: min(1200px, 100%);
      margin: 0 auto;
      padding: 28px 18px 48px;
      display: grid;
      gap: 24px;
    }

    .error-message {
      background: #fdecea;
      color: var(--danger);
      border-radius: 12px;
      padding: 12px 16px;
      transition: opacity 0.3s ease;
    }

    .error-message[data-phase="fading"] {
      opacity: 0;
    }

    .filters,
    .cards,
    .charts {
      display: grid;
      gap: 16px;
    }

    .filters {
      grid-template-columns: repeat(auto-fit, minmax(170px, 1fr));
      align-items: end;
      background: var(--card);
      border-radius: 16px;
      padding: 18px;
      box-shadow: var(--shadow);
    }

    .filters label {
      display: grid;
      gap: 6px;
      font-size: 0.85rem;
      color: var(--muted);
    }

    .badge {
      background: var(--accent);
      color: white;
      border-radius: 999px;
      padding: 4px 10px;
      font-size: 0.8rem;
    }

    .cards {
      grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
    }

    .card {
      background: var(--card);
      border-radius: 16px;
      padding: 18px;
      box-shadow: var(--shadow);
    }

    .card .label {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: var(--muted);
    }

    .card .value {
      font-size: 1.6rem;
      font-weight: 700;
    }

    .charts {
      grid-template-columns: repeat(auto-fit, minmax(340px, 1fr));
    }

    .chart-box {
      position: relative;
      height: 300px;
    }

    table {
      width: 100%;
      border-collapse: collapse;
    }

    td {
      padding: 10px 8px;
      border-top: 1px solid rgba(0, 0, 0, 0.06);
    }

    .text-center { text-align: center; }
    .text-end { text-align: right; }
    .text-muted { color: var(--muted); }
    .text-danger { color: var(--danger); }
  </style>
</head>
<body>
  <main class="container-main" id="containerMain">
    {{BANNERS}}

    <section class="filters">
      <label>Movie
        <select id="movieFilter" data-field="movie">{{MOVIE_OPTIONS}}</select>
      </label>
      <label>Period
        <select id="periodFilter" data-field="period">{{PERIOD_OPTIONS}}</select>
      </label>
      <label>Theater
        <select id="theaterFilter" data-field="theater">{{THEATER_OPTIONS}}</select>
      </label>
      <div id="dateRangeGroup" style="display: {{DATE_RANGE_STYLE}}">
        <label>From <input type="date" id="dateFrom" data-field="date_from" value="{{DATE_FROM}}" /></label>
        <label>To <input type="date" id="dateTo" data-field="date_to" value="{{DATE_TO}}" /></label>
      </div>
      <div>
        <button type="button" id="applyFilters">Apply</button>
        <button type="button" id="resetFilters">Reset</button>
        <span class="badge" id="activeFiltersCount" style="display: {{BADGE_STYLE}}">{{BADGE}}</span>
      </div>
    </section>

    <section class="cards">
      <div class="card"><div class="label">Total revenue</div><div class="value" id="totalRevenue">{{TOTAL_REVENUE}}</div></div>
      <div class="card"><div class="label">Total bookings</div><div class="value" id="totalBookings">{{TOTAL_BOOKINGS}}</div></div>
      <div class="card"><div class="label">Today's revenue</div><div class="value" id="todayRevenue">{{TODAY_REVENUE}}</div></div>
      <div class="card"><div class="label">Today's bookings</div><div class="value" id="todayBookings">{{TODAY_BOOKINGS}}</div></div>
    </section>

    <section class="charts">
      <div class="card"><div class="label">Revenue trend</div><div class="chart-box"><canvas id="revenueChart"></canvas></div></div>
      <div class="card"><div class="label">Top movies</div><div class="chart-box"><canvas id="moviesChart"></canvas></div></div>
      <div class="card"><div class="label">Top theaters</div><div class="chart-box"><canvas id="theatersChart"></canvas></div></div>
    </section>

    <section class="card">
      <div class="label">Recent bookings</div>
      <table>
        <tbody id="bookingsTable">{{BOOKINGS_ROWS}}</tbody>
      </table>
    </section>
  </main>

  <script type="application/json" id="chartConfigs">{{CHARTS_JSON}}</script>
  <script>
    const rupees = (value, digits) =>
      '₹' + (value || 0).toLocaleString('en-IN', { maximumFractionDigits: digits });

    const tickFormats = {
      currency_tick: (v) => (v >= 1000 ? '₹' + Math.round(v / 1000) + 'k' : '₹' + v),
      count: (v) => (v || 0).toLocaleString('en-IN'),
    };

    const tooltipFormats = {
      revenue_tooltip: (v) => 'Revenue: ' + rupees(v, 0),
      bookings_tooltip: (v) => 'Bookings: ' + (v || 0).toLocaleString('en-IN'),
    };

    const configs = JSON.parse(document.getElementById('chartConfigs').textContent);
    Object.entries(configs).forEach(([canvasId, config]) => {
      const canvas = document.getElementById(canvasId);
      if (!canvas || typeof Chart === 'undefined') {
        return;
      }
      const { axis, ticks, tooltip } = config.formatters || {};
      delete config.formatters;
      if (axis && tickFormats[ticks]) {
        config.options.scales[axis].ticks.callback = tickFormats[ticks];
      }
      if (tooltipFormats[tooltip]) {
        config.options.plugins.tooltip.callbacks = {
          label: (context) => tooltipFormats[tooltip](context.parsed[axis === 'y' ? 'y' : 'x']),
        };
      }
      new Chart(canvas.getContext('2d'), config);
    });

    const post = async (url, body) => {
      const res = await fetch(url, {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: body ? JSON.stringify(body) : undefined,
      });
      if (!res.ok) {
        throw new Error((await res.text()) || 'Request failed');
      }
      return res.json();
    };

    const badge = document.getElementById('activeFiltersCount');
    const dateRange = document.getElementById('dateRangeGroup');

    document.querySelectorAll('[data-field]').forEach((control) => {
      control.addEventListener('change', async () => {
        const state = await post('/api/filters', { field: control.dataset.field, value: control.value });
        badge.textContent = state.text || '';
        badge.style.display = state.visible ? 'inline-block' : 'none';
        dateRange.style.display = state.date_range_visible ? 'block' : 'none';
        if (control.dataset.field === 'period' && state.date_range_visible) {
          window.location.reload();
        }
      });
    });

    document.getElementById('applyFilters').addEventListener('click', () => {
      post('/api/filters/apply').finally(() => window.location.reload());
    });

    document.getElementById('resetFilters').addEventListener('click', () => {
      post('/api/filters/reset').finally(() => window.location.reload());
    });
  </script>
</body>
</html>
"#;
