pub mod report;

use chrono::{NaiveDate, NaiveDateTime};
use colored::Colorize;
use itertools::Itertools;
use serde::Serialize;

use crate::engine::stats::{
    self, MonthlyStat, OccupancyStats, OverviewStats, SourceShare, SourceStat, UpcomingStats,
};
use crate::engine::{self, MAX_VISIBLE_PAGES};
use crate::model::BookingRecord;
use crate::session::DashboardSession;
use crate::source::DashboardView;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
    Html,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".csv") {
        return Some(OutputFormat::Csv);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

#[derive(Clone, Debug, Serialize)]
pub struct PageInfo {
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub showing_from: usize,
    pub showing_to: usize,
    pub page_numbers: Vec<usize>,
}

/// Everything one render of a dashboard shows. Stats cover the whole record
/// set; the table covers the filtered, sorted list.
#[derive(Clone, Debug, Serialize)]
pub struct DashboardReport<'a> {
    pub view: DashboardView,
    pub generated_at: NaiveDateTime,
    pub sort: String,
    pub page: PageInfo,
    pub overview: OverviewStats,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SourceStat>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub monthly: Vec<MonthlyStat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upcoming: Option<UpcomingStats>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub upcoming_sources: Vec<SourceShare>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupancy: Option<OccupancyStats>,
    pub records: Vec<&'a BookingRecord>,
    #[serde(skip)]
    pub matches: Vec<&'a BookingRecord>,
}

pub fn build_report(session: &DashboardSession, now: NaiveDateTime) -> DashboardReport<'_> {
    let all = session.records();
    let view = session.view(now);
    let page = view.page();
    let (showing_from, showing_to) = page.display_range();
    let page_info = PageInfo {
        page: page.page,
        page_size: page.page_size,
        total_pages: page.total_pages,
        total_items: page.total_items,
        showing_from,
        showing_to,
        page_numbers: engine::page_window(page.page, page.total_pages, MAX_VISIBLE_PAGES)
            .collect(),
    };
    let records = page.items.to_vec();

    let dashboard = session.dashboard_view();
    let (sources, monthly) = match dashboard {
        DashboardView::AllBookings => (
            stats::compute_source_breakdown(all),
            stats::compute_monthly_breakdown(all),
        ),
        _ => (Vec::new(), Vec::new()),
    };
    let (upcoming, upcoming_sources) = match dashboard {
        DashboardView::Upcoming => (
            Some(stats::compute_upcoming_stats(all, now)),
            stats::compute_upcoming_source_breakdown(all, now),
        ),
        _ => (None, Vec::new()),
    };
    let occupancy = (dashboard == DashboardView::Guests)
        .then(|| stats::compute_occupancy_stats(all, stats::DEFAULT_TOTAL_ROOMS, now));

    DashboardReport {
        view: dashboard,
        generated_at: now,
        sort: session.query().sort.label(),
        page: page_info,
        overview: stats::compute_overview_stats(all),
        sources,
        monthly,
        upcoming,
        upcoming_sources,
        occupancy,
        records,
        matches: view.matches,
    }
}

/// Amount with Indian digit grouping, e.g. `12,34,567`.
pub fn format_amount(value: u64) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

pub fn format_currency(value: u64) -> String {
    format!("₹{}", format_amount(value))
}

pub fn format_date(at: NaiveDateTime) -> String {
    at.format("%d/%m/%Y").to_string()
}

pub fn format_nights(nights: u64) -> String {
    if nights > 1 {
        format!("{nights} days")
    } else {
        format!("{nights} day")
    }
}

pub(crate) struct Column {
    pub(crate) title: &'static str,
    pub(crate) width: usize,
    pub(crate) value: fn(&BookingRecord) -> String,
}

pub(crate) fn table_columns(view: DashboardView) -> Vec<Column> {
    let booked = Column {
        title: "Booked",
        width: 10,
        value: |r| format_date(r.booking_date),
    };
    let name = Column {
        title: "Guest",
        width: 22,
        value: |r| r.guest_name.clone(),
    };
    let mobile = Column {
        title: "Mobile",
        width: 18,
        value: |r| r.mobile.clone(),
    };
    let check_in = Column {
        title: "Check-in",
        width: 10,
        value: |r| format_date(r.check_in),
    };
    let check_out = Column {
        title: "Check-out",
        width: 10,
        value: |r| format_date(r.check_out),
    };
    let nights = Column {
        title: "Stay",
        width: 7,
        value: |r| format_nights(r.stay_duration_days()),
    };
    let room_type = Column {
        title: "Type",
        width: 8,
        value: |r| r.room_type.to_string(),
    };
    let source = Column {
        title: "Source",
        width: 11,
        value: |r| r.booking_source.to_string(),
    };
    let amount = Column {
        title: "Amount",
        width: 10,
        value: |r| format_currency(r.total_amount),
    };
    let status = Column {
        title: "Status",
        width: 12,
        value: |r| r.status.as_str().to_uppercase(),
    };
    match view {
        DashboardView::AllBookings => vec![
            booked, name, mobile, check_in, check_out, nights, room_type, source, amount, status,
        ],
        DashboardView::Upcoming => vec![
            check_in, name, mobile, room_type, nights, source, amount, booked,
        ],
        DashboardView::Guests => vec![
            Column {
                title: "Room",
                width: 4,
                value: |r| r.room_number.to_string(),
            },
            name,
            mobile,
            check_in,
            check_out,
            nights,
            room_type,
            status,
        ],
    }
}

fn format_kv_line(out: &mut String, label: &str, value: &str) {
    out.push_str(&format!(":: {:<10}: {}\n", label, value));
}

pub fn render_text(report: &DashboardReport<'_>) -> Vec<u8> {
    let mut out = String::new();
    let o = &report.overview;
    format_kv_line(
        &mut out,
        "View",
        &format!(
            "{} as of {}",
            report.view.label().bold(),
            report.generated_at.format("%d/%m/%Y %H:%M")
        ),
    );
    format_kv_line(
        &mut out,
        "Overview",
        &format!(
            "bookings={} revenue={} avg={} online={}%",
            o.total_count,
            format_currency(o.total_revenue).green(),
            format_currency(o.avg_booking_value.round() as u64),
            o.online_share
        ),
    );
    if !report.sources.is_empty() {
        let line = report
            .sources
            .iter()
            .map(|s| {
                format!(
                    "{}={}/{}",
                    s.source,
                    s.count,
                    format_currency(s.revenue)
                )
            })
            .join(" ");
        format_kv_line(&mut out, "Sources", &line);
    }
    if !report.monthly.is_empty() {
        let line = report
            .monthly
            .iter()
            .map(|m| format!("{}={}/{}", m.month, m.count, format_currency(m.revenue)))
            .join(" ");
        format_kv_line(&mut out, "Monthly", &line);
    }
    if let Some(u) = report.upcoming.as_ref() {
        format_kv_line(
            &mut out,
            "Upcoming",
            &format!(
                "7d={} 30d={} expected={} top={} ({}%)",
                u.next_7_day_count,
                u.next_30_day_count,
                format_currency(u.expected_revenue_30_day).green(),
                u.top_source.map(|s| s.as_str()).unwrap_or("-"),
                u.top_source_share
            ),
        );
        if !report.upcoming_sources.is_empty() {
            let line = report
                .upcoming_sources
                .iter()
                .map(|s| format!("{}={}({}%)", s.source, s.count, s.share))
                .join(" ");
            format_kv_line(&mut out, "Sources", &line);
        }
    }
    if let Some(occ) = report.occupancy.as_ref() {
        format_kv_line(
            &mut out,
            "Rooms",
            &format!(
                "occupied={} vacant={} occupancy={}% vacancy={}% total={}",
                occ.occupied_rooms,
                occ.vacant_rooms,
                occ.occupancy_rate,
                occ.vacancy_rate,
                occ.total_rooms
            ),
        );
        format_kv_line(
            &mut out,
            "Today",
            &format!(
                "check-ins={} check-outs={} avg-stay={} days week-revenue={}",
                occ.today_check_ins,
                occ.today_check_outs,
                occ.avg_stay_days,
                format_currency(occ.weekly_revenue)
            ),
        );
    }
    format_kv_line(
        &mut out,
        "Results",
        &format!(
            "showing {}-{} of {} sort={} page {}/{} [{}]",
            report.page.showing_from,
            report.page.showing_to,
            report.page.total_items,
            report.sort,
            report.page.page,
            report.page.total_pages,
            report
                .page
                .page_numbers
                .iter()
                .map(|n| if *n == report.page.page {
                    format!("*{n}")
                } else {
                    n.to_string()
                })
                .join(" ")
        ),
    );
    out.push('\n');

    let columns = table_columns(report.view);
    let header = columns
        .iter()
        .map(|c| format!("{:<width$}", c.title, width = c.width))
        .join("  ");
    out.push_str(&format!("{}\n", header.trim_end().bold()));
    for r in &report.records {
        let row = columns
            .iter()
            .map(|c| format!("{:<width$}", (c.value)(r), width = c.width))
            .join("  ");
        out.push_str(row.trim_end());
        out.push('\n');
    }
    if report.records.is_empty() {
        out.push_str("(no matching bookings)\n");
    }
    out.into_bytes()
}

pub fn render_json(report: &DashboardReport<'_>) -> Vec<u8> {
    serde_json::to_vec_pretty(report).unwrap_or_else(|_| b"{}\n".to_vec())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CsvLayout {
    Bookings,
    Guests,
}

impl CsvLayout {
    pub fn for_view(view: DashboardView) -> Self {
        match view {
            DashboardView::Guests => CsvLayout::Guests,
            _ => CsvLayout::Bookings,
        }
    }

    fn header(self) -> &'static str {
        match self {
            CsvLayout::Bookings => {
                "BookingDate,Name,Mobile,CheckIn,CheckOut,Duration,RoomType,BookingSource,TotalAmount,Status"
            }
            CsvLayout::Guests => "Room,Name,Mobile,Address,CheckIn,CheckOut,RoomType,Status,TotalAmount",
        }
    }

    fn row(self, r: &BookingRecord) -> Vec<String> {
        let day = |at: NaiveDateTime| at.format("%Y-%m-%d").to_string();
        let iso = |at: NaiveDateTime| at.format("%Y-%m-%dT%H:%M:%S%.3f").to_string();
        match self {
            CsvLayout::Bookings => vec![
                day(r.booking_date),
                r.guest_name.clone(),
                r.mobile.clone(),
                day(r.check_in),
                day(r.check_out),
                r.stay_duration_days().to_string(),
                r.room_type.to_string(),
                r.booking_source.to_string(),
                r.total_amount.to_string(),
                r.status.to_string(),
            ],
            CsvLayout::Guests => vec![
                r.room_number.to_string(),
                r.guest_name.clone(),
                r.mobile.clone(),
                r.address.clone(),
                iso(r.check_in),
                iso(r.check_out),
                r.room_type.to_string(),
                r.status.to_string(),
                r.total_amount.to_string(),
            ],
        }
    }
}

fn escape_csv(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Header line then one line per record, in the given order.
pub fn render_csv<'a, I>(records: I, layout: CsvLayout) -> Vec<u8>
where
    I: IntoIterator<Item = &'a BookingRecord>,
{
    let mut out = String::from(layout.header());
    out.push('\n');
    for r in records {
        out.push_str(&layout.row(r).iter().map(|f| escape_csv(f)).join(","));
        out.push('\n');
    }
    out.into_bytes()
}

pub fn default_export_name(layout: CsvLayout, today: NaiveDate) -> String {
    let stem = match layout {
        CsvLayout::Bookings => "all_bookings",
        CsvLayout::Guests => "hotel_guests",
    };
    format!("{}_{}.csv", stem, today.format("%Y-%m-%d"))
}

/// Renders `report` in `format`. CSV exports every matching record, not just
/// the current page.
pub fn render(report: &DashboardReport<'_>, format: OutputFormat) -> Vec<u8> {
    match format {
        OutputFormat::Text => render_text(report),
        OutputFormat::Json => render_json(report),
        OutputFormat::Csv => render_csv(
            report.matches.iter().copied(),
            CsvLayout::for_view(report.view),
        ),
        OutputFormat::Html => report::render_html(report),
    }
}
