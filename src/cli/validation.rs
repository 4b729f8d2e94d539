use crate::cli::args::CliArgs;
use crate::output::OutputFormat;
use crate::view::{DateFormat, Layout, PageSize};

pub fn validate(args: &CliArgs) -> Result<(), String> {
    let actions = [args.generate, args.find.is_some(), args.list]
        .iter()
        .filter(|set| **set)
        .count();
    if actions > 1 {
        return Err("use only one of --gen, --find or --ls".to_string());
    }
    if let Some(number) = args.find.as_deref() {
        if number.trim().is_empty() {
            return Err("invalid --find, terminal number must not be blank".to_string());
        }
    }
    if let Some(page) = args.page {
        if page == 0 {
            return Err("invalid --page, expected positive integer".to_string());
        }
    }
    if let Some(raw) = args.page_size.as_deref() {
        if PageSize::parse(raw).is_none() {
            return Err(format!(
                "invalid --page-size '{raw}', expected 5, 10, 20, 50 or all"
            ));
        }
    }
    if let Some(raw) = args.layout.as_deref() {
        if Layout::parse(raw).is_none() {
            return Err(format!("invalid --layout '{raw}', expected table or grid"));
        }
    }
    if let Some(raw) = args.date_format.as_deref() {
        if DateFormat::parse(raw).is_none() {
            return Err(format!(
                "invalid --date-format '{raw}', expected dmy, mdy or iso"
            ));
        }
    }
    if let Some(raw) = args.base_url.as_deref() {
        if reqwest::Url::parse(raw).is_err() {
            return Err(format!("invalid --base-url '{raw}'"));
        }
    }
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err("invalid --timeout, expected positive integer".to_string());
        }
    }
    if let Some(raw) = args.output_format.as_deref() {
        if OutputFormat::parse(raw).is_none() {
            return Err(format!(
                "invalid --output-format '{raw}', expected text or json"
            ));
        }
    }
    Ok(())
}
