use std::time::Duration;

use chrono::NaiveDateTime;
use clap::{error::ErrorKind, CommandFactory, Parser};
use colored::Colorize;
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::engine::{DateRange, FilterCriteria, SearchScope, SortDirection, SortField, SortSpec};
use crate::output::{self, CsvLayout, OutputFormat};
use crate::session::DashboardSession;
use crate::source::{DashboardView, JsonFileSource, MockSource, RecordSource};
use crate::utils;

const DEFAULT_SEED: u64 = 42;

fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<10}: {}", label, value);
}

fn flag_line(arg: &clap::Arg) -> String {
    let mut names: Vec<String> = arg.get_short().map(|c| format!("-{c}")).into_iter().collect();
    names.extend(arg.get_long().map(|l| format!("--{l}")));
    for alias in arg.get_visible_aliases().unwrap_or_default() {
        let alias = format!("--{alias}");
        if !names.contains(&alias) {
            names.push(alias);
        }
    }
    let mut line = names.join(", ");
    if arg.get_action().takes_values() {
        let value = arg
            .get_value_names()
            .and_then(|v| v.first())
            .map(|v| v.as_str())
            .unwrap_or("VALUE");
        line.push_str(&format!(" <{value}>"));
    }
    line
}

/// Help grouped by heading in declaration order, listing the short codes next
/// to their full-name aliases.
fn render_custom_help() -> String {
    let cmd = CliArgs::command();
    let mut out = format!(
        "{} {}\n{}\n\n{}\n\nUsage: {} [OPTIONS]\n",
        cmd.get_name(),
        cmd.get_version().unwrap_or_default(),
        cmd.get_about().map(|a| a.to_string()).unwrap_or_default(),
        cmd.get_long_about().map(|a| a.to_string()).unwrap_or_default(),
        cmd.get_name()
    );
    let args: Vec<&clap::Arg> = cmd.get_arguments().filter(|a| !a.is_hide_set()).collect();
    let headings = args
        .iter()
        .map(|a| a.get_help_heading().unwrap_or("Options"))
        .unique();
    for heading in headings {
        out.push_str(&format!("\n{heading}:\n"));
        for arg in args
            .iter()
            .filter(|a| a.get_help_heading().unwrap_or("Options") == heading)
        {
            out.push_str(&format!("  {}\n", flag_line(arg)));
            if let Some(help) = arg.get_help().map(|h| h.to_string()) {
                out.push_str(&format!("          {}\n", help.trim()));
            }
        }
    }
    out
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}

fn current_time() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Initial ordering of each dashboard before the user picks one.
fn default_sort(view: DashboardView) -> SortSpec {
    match view {
        DashboardView::AllBookings => SortSpec::default(),
        DashboardView::Upcoming => SortSpec::new(SortField::CheckIn, SortDirection::Ascending),
        DashboardView::Guests => SortSpec::unsorted(),
    }
}

#[derive(Clone, Debug)]
struct RunConfig {
    view: DashboardView,
    seed: u64,
    input_file: Option<String>,
    criteria: FilterCriteria,
    sort: SortSpec,
    page: usize,
    page_size: Option<usize>,
    output: Option<String>,
    output_format: OutputFormat,
    watch: Option<Duration>,
    ticks: Option<u64>,
    no_color: bool,
    verbose: u8,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = args.no_color || cfg.no_color.unwrap_or(false);
    let view = match args.view.or(cfg.view) {
        Some(raw) => utils::parse_view(&raw)?,
        None => DashboardView::default(),
    };
    let seed = args.seed.or(cfg.seed).unwrap_or(DEFAULT_SEED);
    let input_file = args
        .input_file
        .or(cfg.input_file)
        .map(|p| config::expand_tilde_string(&p));

    let search = args
        .search
        .or(cfg.search)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let source_raw = args.source.or(cfg.source);
    let source = utils::non_wildcard(source_raw.as_deref())
        .map(utils::parse_source)
        .transpose()?;
    let status_raw = args.status.or(cfg.status);
    let status = utils::non_wildcard(status_raw.as_deref())
        .map(utils::parse_status)
        .transpose()?;
    let room_type_raw = args.room_type.or(cfg.room_type);
    let room_type = utils::non_wildcard(room_type_raw.as_deref())
        .map(utils::parse_room_type)
        .transpose()?;
    let date_range = match (args.from.or(cfg.from), args.to.or(cfg.to)) {
        (Some(from), Some(to)) => {
            let start = utils::parse_date(&from).map_err(|e| format!("invalid from: {e}"))?;
            let end = utils::parse_date(&to).map_err(|e| format!("invalid to: {e}"))?;
            if end < start {
                return Err(format!("invalid date range, {end} is before {start}"));
            }
            Some(DateRange::from_dates(start, end))
        }
        (None, None) => None,
        _ => return Err("a date range needs both from and to".to_string()),
    };
    let period = args
        .period
        .or(cfg.period)
        .map(|raw| utils::parse_period(&raw).map_err(|e| format!("invalid period: {e}")))
        .transpose()?;
    let scope = match view {
        DashboardView::Guests => SearchScope::Guests,
        _ => SearchScope::Bookings,
    };
    let criteria = FilterCriteria {
        search,
        scope,
        source,
        status,
        room_type,
        date_range,
        period,
    };

    let sort = args
        .sort
        .or(cfg.sort)
        .map(|raw| SortSpec::parse(&raw))
        .unwrap_or_else(|| default_sort(view));
    let page = args.page.or(cfg.page).unwrap_or(1).max(1);
    let page_size = args.page_size.or(cfg.page_size);
    if page_size == Some(0) {
        return Err("invalid page_size, expected positive integer".to_string());
    }

    let output = args
        .output
        .or(cfg.output)
        .map(|p| config::expand_tilde_string(&p));
    let output_format = match args.output_format.or(cfg.output_format) {
        Some(raw) => utils::parse_output_format(&raw)?,
        None => output
            .as_deref()
            .and_then(output::infer_format_from_path)
            .unwrap_or(OutputFormat::Text),
    };

    let watch = match args.watch.or(cfg.watch) {
        Some(0) => return Err("invalid watch interval, expected at least 1 second".to_string()),
        Some(secs) => Some(Duration::from_secs(secs)),
        None => None,
    };
    let ticks = args.ticks.or(cfg.ticks);
    if ticks.is_some() && watch.is_none() {
        return Err("ticks requires a watch interval".to_string());
    }

    Ok(RunConfig {
        view,
        seed,
        input_file,
        criteria,
        sort,
        page,
        page_size,
        output,
        output_format,
        watch,
        ticks,
        no_color,
        verbose: args.verbose,
    })
}

fn open_session(run: &RunConfig, now: NaiveDateTime) -> Result<DashboardSession, String> {
    let mut source: Box<dyn RecordSource> = match run.input_file.as_deref() {
        Some(path) => Box::new(JsonFileSource::new(path)),
        None => Box::new(MockSource::new(run.view, run.seed)),
    };
    let mut session =
        DashboardSession::load(run.view, source.as_mut(), now).map_err(|e| e.to_string())?;
    session.set_criteria(run.criteria.clone());
    session.set_sort(run.sort);
    if let Some(size) = run.page_size {
        session.set_page_size(size);
    }
    let page = session.go_to_page(run.page, now);
    if page != run.page {
        log::warn!("page {} is out of range, showing page {}", run.page, page);
    }
    Ok(session)
}

/// Where a render goes: stdout, the `--output` file, or for CSV without an
/// explicit file the dated export name.
fn output_target(run: &RunConfig, view: DashboardView, now: NaiveDateTime) -> Option<String> {
    match (run.output.as_ref(), run.output_format) {
        (Some(path), _) => Some(path.clone()),
        (None, OutputFormat::Csv) => Some(output::default_export_name(
            CsvLayout::for_view(view),
            now.date(),
        )),
        (None, _) => None,
    }
}

fn emit(run: &RunConfig, session: &DashboardSession, now: NaiveDateTime) -> Result<(), String> {
    let report = output::build_report(session, now);
    let bytes = output::render(&report, run.output_format);
    match output_target(run, session.dashboard_view(), now) {
        Some(path) => {
            std::fs::write(&path, &bytes)
                .map_err(|e| format!("failed to write output '{path}': {e}"))?;
            let rows = match run.output_format {
                OutputFormat::Csv => report.matches.len(),
                _ => report.records.len(),
            };
            format_kv_line("Output", &format!("{} ({} rows)", path.as_str().bold(), rows));
        }
        None => {
            print!("{}", String::from_utf8_lossy(&bytes));
        }
    }
    Ok(())
}

/// Refresh cadence for [`watch_session`].
#[derive(Clone, Copy, Debug)]
pub struct WatchSettings {
    pub interval: Duration,
    /// Stop after this many refreshes; `None` runs until Ctrl-C.
    pub ticks: Option<u64>,
}

/// Periodically advances the simulated guest board and re-renders through
/// `render`. Returns the number of refreshes performed.
pub async fn watch_session<R, F>(
    session: &mut DashboardSession,
    settings: WatchSettings,
    rng: &mut R,
    mut render: F,
) -> Result<u64, String>
where
    R: Rng,
    F: FnMut(&DashboardSession, NaiveDateTime) -> Result<(), String>,
{
    let mut interval = tokio::time::interval(settings.interval);
    interval.tick().await;
    let mut refreshes = 0u64;
    while settings.ticks.map_or(true, |limit| refreshes < limit) {
        tokio::select! {
            _ = interval.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                log::info!("interrupted after {refreshes} refreshes");
                break;
            }
        }
        if session.dashboard_view() == DashboardView::Guests && session.simulate_update(rng) {
            log::info!("simulated a guest check-out");
        }
        render(session, current_time())?;
        refreshes += 1;
    }
    Ok(refreshes)
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    let now = current_time();
    let mut session = open_session(&run, now)?;
    log::debug!(
        "view={} sort={} page={} filters={:?}",
        run.view.label(),
        run.sort.label(),
        session.page(),
        session.criteria()
    );
    emit(&run, &session, now)?;

    let Some(interval) = run.watch else {
        return Ok(());
    };
    let settings = WatchSettings {
        interval,
        ticks: run.ticks,
    };
    format_kv_line(
        "Watch",
        &format!("refreshing every {}s (Ctrl-C to stop)", interval.as_secs()),
    );
    let mut rng = StdRng::seed_from_u64(run.seed);
    let refreshes = watch_session(&mut session, settings, &mut rng, |session, now| {
        emit(&run, session, now)
    })
    .await?;
    format_kv_line("Completed", &format!("{refreshes} refreshes"));
    Ok(())
}

fn init_config(path: Option<&str>) -> Result<(), String> {
    let path = match path {
        Some(p) => config::expand_tilde(p),
        None => config::default_config_path()
            .ok_or_else(|| "could not determine home directory for config".to_string())?,
    };
    config::ensure_default_config_file(&path)?;
    format_kv_line("Config", &path.display().to_string());
    Ok(())
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp => {
                print!("{}", render_custom_help());
                return Ok(());
            }
            ErrorKind::DisplayVersion => {
                let cmd = CliArgs::command();
                print!("{}", cmd.render_version());
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    init_logging(args.verbose);

    if args.init_config {
        return init_config(args.config.as_deref());
    }

    let cfg = match args.config.as_deref() {
        Some(path) => config::load_config(&config::expand_tilde(path), false)?,
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true)?,
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg)?;
    if run.no_color {
        colored::control::set_override(false);
    }
    log::debug!("verbosity level {}", run.verbose);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))?;
    Ok(())
}
