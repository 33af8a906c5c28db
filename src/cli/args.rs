use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "bookingdesk",
    version,
    about = "hotel booking dashboard: filter, sort, page and summarize reservations",
    long_about = "bookingdesk renders the hotel management dashboards (all bookings, upcoming arrivals, current guests) from a JSON export or a seeded synthetic data set.\n\nExamples:\n  bookingdesk --view all --source OYO --sort checkIn-asc\n  bookingdesk --view upcoming --period next-7 -o upcoming.html\n  bookingdesk --view guests --watch 30 --ticks 10\n  bookingdesk --input-file bookings.json --from 2024-01-01 --to 2024-01-31 -o january.csv\n\nTip: Use --config to persist defaults and keep CLI invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase log verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'd',
        long = "vw",
        visible_alias = "view",
        value_name = "VIEW",
        help_heading = "Input",
        help = "Dashboard to render: all, upcoming or guests."
    )]
    pub view: Option<String>,

    #[arg(
        short = 'i',
        long = "if",
        visible_alias = "input-file",
        value_name = "FILE",
        help_heading = "Input",
        help = "Load booking records from a JSON file instead of synthetic data."
    )]
    pub input_file: Option<String>,

    #[arg(
        long = "sd",
        visible_alias = "seed",
        value_name = "N",
        help_heading = "Input",
        help = "Seed for the synthetic data set and simulated updates."
    )]
    pub seed: Option<u64>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.bookingdesk/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "ic",
        visible_alias = "init-config",
        help_heading = "Input",
        help = "Write a commented default config file if none exists, then exit."
    )]
    pub init_config: bool,

    #[arg(
        short = 's',
        long = "q",
        visible_alias = "search",
        value_name = "TEXT",
        help_heading = "Filters",
        help = "Case-insensitive search over guest name, mobile, room and source (guests view: address too)."
    )]
    pub search: Option<String>,

    #[arg(
        short = 'S',
        long = "src",
        visible_alias = "source",
        value_name = "SOURCE",
        help_heading = "Filters",
        help = "Booking source (Offline, OYO, MakeMyTrip, Goibibo, Booking.com, Expedia, Agoda)."
    )]
    pub source: Option<String>,

    #[arg(
        short = 't',
        long = "st",
        visible_alias = "status",
        value_name = "STATUS",
        help_heading = "Filters",
        help = "Booking status (confirmed, checked-in, checking-out, completed, cancelled)."
    )]
    pub status: Option<String>,

    #[arg(
        short = 'R',
        long = "rt",
        visible_alias = "room-type",
        value_name = "TYPE",
        help_heading = "Filters",
        help = "Room type (Standard, Deluxe, Suite)."
    )]
    pub room_type: Option<String>,

    #[arg(
        short = 'F',
        long = "fr",
        visible_alias = "from",
        value_name = "YYYY-MM-DD",
        requires = "to",
        help_heading = "Filters",
        help = "Check-in on or after this date (requires --to)."
    )]
    pub from: Option<String>,

    #[arg(
        short = 'T',
        long = "to",
        value_name = "YYYY-MM-DD",
        requires = "from",
        help_heading = "Filters",
        help = "Check-in on or before the end of this date (requires --from)."
    )]
    pub to: Option<String>,

    #[arg(
        short = 'p',
        long = "pd",
        visible_alias = "period",
        value_name = "PERIOD",
        help_heading = "Filters",
        help = "Quick period: all, N or last-N (days back), next-N (days ahead). Overrides --from/--to."
    )]
    pub period: Option<String>,

    #[arg(
        short = 'k',
        long = "srt",
        visible_alias = "sort",
        value_name = "FIELD-DIR",
        help_heading = "Sort & Paging",
        help = "Sort key: checkIn, bookingDate, amount or name, suffixed -asc or -desc."
    )]
    pub sort: Option<String>,

    #[arg(
        short = 'P',
        long = "pg",
        visible_alias = "page",
        value_name = "N",
        help_heading = "Sort & Paging",
        help = "Page to show (1-based, clamped to the last page)."
    )]
    pub page: Option<usize>,

    #[arg(
        short = 'z',
        long = "ps",
        visible_alias = "page-size",
        value_name = "N",
        help_heading = "Sort & Paging",
        help = "Rows per page (default 50)."
    )]
    pub page_size: Option<usize>,

    #[arg(
        short = 'o',
        long = "o",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the report to a file (format inferred from .txt/.json/.csv/.html)."
    )]
    pub output: Option<String>,

    #[arg(
        short = 'O',
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Report format: text, json, csv or html."
    )]
    pub output_format: Option<String>,

    #[arg(
        short = 'n',
        long = "nc",
        visible_alias = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'w',
        long = "wt",
        visible_alias = "watch",
        value_name = "SECS",
        help_heading = "Watch",
        help = "Re-render every SECS seconds; the guests view simulates check-outs between renders."
    )]
    pub watch: Option<u64>,

    #[arg(
        long = "tk",
        visible_alias = "ticks",
        value_name = "N",
        help_heading = "Watch",
        help = "Stop watching after N refreshes (default: until Ctrl-C)."
    )]
    pub ticks: Option<u64>,
}
