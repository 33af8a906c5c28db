use crate::cli::args::CliArgs;
use crate::utils;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(raw) = args.view.as_deref() {
        utils::parse_view(raw)?;
    }
    if let Some(raw) = utils::non_wildcard(args.source.as_deref()) {
        utils::parse_source(raw)?;
    }
    if let Some(raw) = utils::non_wildcard(args.status.as_deref()) {
        utils::parse_status(raw)?;
    }
    if let Some(raw) = utils::non_wildcard(args.room_type.as_deref()) {
        utils::parse_room_type(raw)?;
    }
    if let Some(raw) = args.period.as_deref() {
        utils::parse_period(raw).map_err(|e| format!("invalid --period: {e}"))?;
    }
    if let (Some(from), Some(to)) = (args.from.as_deref(), args.to.as_deref()) {
        let start = utils::parse_date(from).map_err(|e| format!("invalid --from: {e}"))?;
        let end = utils::parse_date(to).map_err(|e| format!("invalid --to: {e}"))?;
        if end < start {
            return Err(format!("invalid date range, --to {end} is before --from {start}"));
        }
    }
    if let Some(raw) = args.output_format.as_deref() {
        utils::parse_output_format(raw)?;
    }
    if args.page == Some(0) {
        return Err("invalid page, expected positive integer".to_string());
    }
    if args.page_size == Some(0) {
        return Err("invalid page-size, expected positive integer".to_string());
    }
    if args.watch == Some(0) {
        return Err("invalid watch interval, expected at least 1 second".to_string());
    }
    Ok(())
}
