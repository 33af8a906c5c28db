use super::{format_currency, table_columns, DashboardReport};

fn json_for_script_tag(value: &str) -> String {
    value.replace("</", "<\\/")
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn stat_card(label: &str, value: &str, hint: &str) -> String {
    format!(
        r#"        <div class="bg-white dark:bg-slate-900 rounded-2xl border border-slate-200 dark:border-slate-800 p-5 shadow-sm">
          <p class="text-[11px] font-display uppercase tracking-widest text-slate-500">{}</p>
          <p class="text-2xl font-bold mt-2">{}</p>
          <p class="text-xs text-slate-500 mt-1">{}</p>
        </div>
"#,
        escape_html(label),
        escape_html(value),
        escape_html(hint)
    )
}

fn stat_cards(report: &DashboardReport<'_>) -> String {
    let mut cards = String::new();
    let o = &report.overview;
    if let Some(occ) = report.occupancy.as_ref() {
        cards.push_str(&stat_card(
            "Occupied rooms",
            &occ.occupied_rooms.to_string(),
            &format!("{}% occupancy of {} rooms", occ.occupancy_rate, occ.total_rooms),
        ));
        cards.push_str(&stat_card(
            "Vacant rooms",
            &occ.vacant_rooms.to_string(),
            &format!("{}% available", occ.vacancy_rate),
        ));
        cards.push_str(&stat_card(
            "Today",
            &format!("{} in / {} out", occ.today_check_ins, occ.today_check_outs),
            &format!("avg stay {} days", occ.avg_stay_days),
        ));
        cards.push_str(&stat_card(
            "Revenue this week",
            &format_currency(occ.weekly_revenue),
            "check-ins in the last 7 days",
        ));
    } else if let Some(u) = report.upcoming.as_ref() {
        cards.push_str(&stat_card("Next 7 days", &u.next_7_day_count.to_string(), "check-ins"));
        cards.push_str(&stat_card("Next 30 days", &u.next_30_day_count.to_string(), "check-ins"));
        cards.push_str(&stat_card(
            "Expected revenue",
            &format_currency(u.expected_revenue_30_day),
            "next 30 days",
        ));
        cards.push_str(&stat_card(
            "Top source",
            u.top_source.map(|s| s.as_str()).unwrap_or("-"),
            &format!("{}% of upcoming", u.top_source_share),
        ));
    } else {
        cards.push_str(&stat_card("Bookings", &o.total_count.to_string(), "all records"));
        cards.push_str(&stat_card(
            "Revenue",
            &format_currency(o.total_revenue),
            "excluding cancelled",
        ));
        cards.push_str(&stat_card(
            "Average value",
            &format_currency(o.avg_booking_value.round() as u64),
            "per booking",
        ));
        cards.push_str(&stat_card(
            "Online share",
            &format!("{}%", o.online_share),
            "OTA channels",
        ));
    }
    cards
}

fn breakdown_rows(report: &DashboardReport<'_>) -> String {
    let mut rows = String::new();
    for s in &report.sources {
        rows.push_str(&format!(
            "          <li class=\"flex justify-between\"><span>{}</span><span>{} / {}</span></li>\n",
            escape_html(s.source.as_str()),
            s.count,
            escape_html(&format_currency(s.revenue))
        ));
    }
    for s in &report.upcoming_sources {
        rows.push_str(&format!(
            "          <li class=\"flex justify-between\"><span>{}</span><span>{} ({}%)</span></li>\n",
            escape_html(s.source.as_str()),
            s.count,
            s.share
        ));
    }
    for m in &report.monthly {
        rows.push_str(&format!(
            "          <li class=\"flex justify-between\"><span>{}</span><span>{} / {}</span></li>\n",
            m.month,
            m.count,
            escape_html(&format_currency(m.revenue))
        ));
    }
    rows
}

fn table(report: &DashboardReport<'_>) -> String {
    let columns = table_columns(report.view);
    let mut out = String::from("            <thead><tr class=\"bg-slate-50 dark:bg-slate-800/50\">\n");
    for c in &columns {
        out.push_str(&format!(
            "              <th class=\"px-4 py-3 text-[11px] font-display uppercase tracking-widest\">{}</th>\n",
            escape_html(c.title)
        ));
    }
    out.push_str("            </tr></thead>\n            <tbody class=\"divide-y divide-slate-100 dark:divide-slate-800\">\n");
    for r in &report.records {
        out.push_str("              <tr>");
        for c in &columns {
            out.push_str(&format!(
                "<td class=\"px-4 py-3 text-sm\">{}</td>",
                escape_html(&(c.value)(r))
            ));
        }
        out.push_str("</tr>\n");
    }
    if report.records.is_empty() {
        out.push_str(&format!(
            "              <tr><td class=\"px-4 py-6 text-center text-slate-500\" colspan=\"{}\">No matching bookings</td></tr>\n",
            columns.len()
        ));
    }
    out.push_str("            </tbody>\n");
    out
}

/// Static single-file dashboard. The full report is also embedded as JSON for
/// anything that wants to post-process the page.
pub fn render_html(report: &DashboardReport<'_>) -> Vec<u8> {
    let json = serde_json::to_string(report).unwrap_or_else(|_| "{}".to_string());
    let json = json_for_script_tag(&json);
    let title = format!("Hotel Dashboard: {}", report.view.label());
    let pages = report
        .page
        .page_numbers
        .iter()
        .map(|n| {
            if *n == report.page.page {
                format!("<span class=\"px-3 py-1 rounded-lg bg-primary text-white\">{n}</span>")
            } else {
                format!("<span class=\"px-3 py-1 rounded-lg border border-slate-200\">{n}</span>")
            }
        })
        .collect::<Vec<_>>()
        .join("");

    let html = format!(
        r####"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8"/>
  <meta content="width=device-width, initial-scale=1.0" name="viewport"/>
  <title>{title}</title>
  <script src="https://cdn.tailwindcss.com"></script>
  <script>
    tailwind.config = {{ darkMode: "class", theme: {{ extend: {{ colors: {{ "primary": "#135bec" }} }} }} }};
  </script>
</head>
<body class="bg-slate-50 dark:bg-slate-950 text-slate-900 dark:text-slate-100 min-h-screen">
  <script type="application/json" id="dashboard-data">{json}</script>
  <header class="flex items-center justify-between border-b border-slate-200 dark:border-slate-800 bg-white dark:bg-slate-900 px-8 py-4">
    <h2 class="text-xl uppercase tracking-tight font-bold">{title}</h2>
    <button id="theme-toggle" class="rounded-xl bg-slate-100 dark:bg-slate-800 px-3 py-2 text-sm" type="button">Theme</button>
  </header>
  <main class="max-w-[1440px] mx-auto w-full px-8 py-10">
    <p class="text-sm text-slate-500 mb-6">Generated {generated} &middot; sorted by {sort}</p>
    <section class="grid grid-cols-1 md:grid-cols-4 gap-5 mb-8">
{cards}    </section>
    <section class="bg-white dark:bg-slate-900 rounded-2xl border border-slate-200 dark:border-slate-800 p-5 mb-8">
      <ul class="space-y-1 text-sm">
{breakdown}      </ul>
    </section>
    <section class="bg-white dark:bg-slate-900 border border-slate-200 dark:border-slate-800 rounded-2xl overflow-hidden">
      <div class="overflow-x-auto">
        <table class="w-full text-left border-collapse">
{table}        </table>
      </div>
      <div class="px-8 py-5 border-t border-slate-100 dark:border-slate-800 flex items-center justify-between">
        <p class="text-sm text-slate-500 font-bold">Showing {from}-{to} of {total}</p>
        <div class="flex gap-2 text-sm">{pages}</div>
      </div>
    </section>
  </main>
  <script>
    (function() {{
      const htmlEl = document.documentElement;
      const stored = localStorage.getItem('hotel-theme');
      if (stored === 'dark') htmlEl.classList.add('dark');
      document.getElementById('theme-toggle').addEventListener('click', function() {{
        htmlEl.classList.toggle('dark');
        localStorage.setItem('hotel-theme', htmlEl.classList.contains('dark') ? 'dark' : 'light');
      }});
    }})();
  </script>
</body>
</html>
"####,
        title = escape_html(&title),
        json = json,
        generated = report.generated_at.format("%d/%m/%Y %H:%M"),
        sort = escape_html(&report.sort),
        cards = stat_cards(report),
        breakdown = breakdown_rows(report),
        table = table(report),
        from = report.page.showing_from,
        to = report.page.showing_to,
        total = report.page.total_items,
        pages = pages,
    );
    html.into_bytes()
}
