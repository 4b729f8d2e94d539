use chrono::NaiveDateTime;
use colored::Colorize;

use crate::api::TerminalRecord;
use crate::pager::{PageLabel, PagerState};
use crate::view::{DateFormat, Generated, Notice};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()
}

// unparseable timestamps pass through untouched rather than failing a render
pub fn format_date(raw: &str, format: DateFormat) -> String {
    match parse_timestamp(raw) {
        Some(dt) => match format {
            DateFormat::DayMonthYear => dt.format("%d/%m/%Y").to_string(),
            DateFormat::MonthDayYear => dt.format("%m/%d/%Y").to_string(),
            DateFormat::Iso => dt.format("%Y-%m-%d").to_string(),
        },
        None => raw.to_string(),
    }
}

pub fn format_time(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(dt) => dt.format("%I:%M %p").to_string(),
        None => raw.to_string(),
    }
}

pub fn render_table(
    records: &[TerminalRecord],
    start_index: usize,
    date_format: DateFormat,
) -> String {
    let number_width = records
        .iter()
        .map(|r| r.number.len())
        .max()
        .unwrap_or(0)
        .max("TERMINAL NUMBER".len());
    let date_width = records
        .iter()
        .map(|r| format_date(&r.date_created, date_format).len())
        .max()
        .unwrap_or(0)
        .max("DATE CREATED".len());

    let mut out = String::new();
    out.push_str(&format!(
        "  {}  {}  {}  {}\n",
        format!("{:<5}", "S/N").bold(),
        format!("{:<number_width$}", "TERMINAL NUMBER").bold(),
        format!("{:<date_width$}", "DATE CREATED").bold(),
        "TIME".bold(),
    ));
    out.push_str(&format!(
        "  {}  {}  {}  {}\n",
        "-".repeat(5),
        "-".repeat(number_width),
        "-".repeat(date_width),
        "-".repeat(8),
    ));
    for (i, record) in records.iter().enumerate() {
        out.push_str(&format!(
            "  {:<5}  {:<number_width$}  {:<date_width$}  {}\n",
            start_index + i + 1,
            record.number,
            format_date(&record.date_created, date_format),
            format_time(&record.date_created),
        ));
    }
    out
}

pub fn render_grid(records: &[TerminalRecord], date_format: DateFormat) -> String {
    const COLUMNS: usize = 3;

    let cell_width = records
        .iter()
        .map(|r| {
            r.number
                .len()
                .max(format_date(&r.date_created, date_format).len())
        })
        .max()
        .unwrap_or(0)
        .max(10)
        + 4;

    let mut out = String::new();
    for row in records.chunks(COLUMNS) {
        let mut numbers = String::from("  ");
        let mut dates = String::from("  ");
        for record in row {
            numbers.push_str(&format!(
                "{}{}",
                record.number.bold(),
                " ".repeat(cell_width.saturating_sub(record.number.len())),
            ));
            let date = format_date(&record.date_created, date_format);
            dates.push_str(&format!(
                "{}{}",
                date,
                " ".repeat(cell_width.saturating_sub(date.len())),
            ));
        }
        out.push_str(numbers.trim_end());
        out.push('\n');
        out.push_str(dates.trim_end());
        out.push('\n');
        out.push('\n');
    }
    out
}

pub fn render_pager(pager: &PagerState) -> String {
    let mut parts: Vec<String> = Vec::new();

    if pager.has_prev() {
        parts.push("‹".to_string());
    } else {
        parts.push("‹".dimmed().to_string());
    }

    for label in pager.window() {
        match label {
            PageLabel::Page(p) if p == pager.current_page() => {
                parts.push(format!("[{}]", p).green().bold().to_string());
            }
            PageLabel::Page(p) => parts.push(p.to_string()),
            PageLabel::Gap => parts.push("…".to_string()),
        }
    }

    if pager.has_next() {
        parts.push("›".to_string());
    } else {
        parts.push("›".dimmed().to_string());
    }

    parts.join(" ")
}

// both panels headline the code itself, so the detail rows carry the rest
pub fn render_details(record: &TerminalRecord, date_format: DateFormat) -> String {
    let mut out = String::new();
    out.push_str(&format!("  {:<8}: {}\n", "ID", record.terminal_number_id));
    out.push_str(&format!(
        "  {:<8}: {}\n",
        "Created",
        format_date(&record.date_created, date_format)
    ));
    out.push_str(&format!(
        "  {:<8}: {}\n",
        "Time",
        format_time(&record.date_created)
    ));
    out
}

pub fn render_generated(generated: &Generated, date_format: DateFormat) -> String {
    let mut out = String::new();
    out.push_str(&format!("  {}\n", "NEW TERMINAL CODE".dimmed()));
    out.push_str(&format!("  {}\n", generated.number.green().bold()));
    if let Some(details) = generated.details.as_ref() {
        out.push_str(&render_details(details, date_format));
    }
    out
}

pub fn render_search(record: &TerminalRecord, date_format: DateFormat) -> String {
    let mut out = String::new();
    out.push_str(&format!("  {}\n", "SEARCH RESULT".dimmed()));
    out.push_str(&format!("  {}\n", record.number.cyan().bold()));
    out.push_str(&render_details(record, date_format));
    out
}

pub fn render_empty() -> String {
    format!(
        "  {}\n  {}\n",
        "No terminals available".bold(),
        "Generate your first terminal number to get started".dimmed(),
    )
}

pub fn render_notice(notice: &Notice) -> String {
    match notice {
        Notice::Success(message) => format!("{} {}", "✓".green().bold(), message),
        Notice::Error(message) => format!("{} {}", "✗".red().bold(), message),
    }
}

pub fn render_text(records: &[TerminalRecord]) -> Vec<u8> {
    let mut out = String::new();
    for record in records {
        out.push_str(&record.number);
        out.push('\n');
    }
    out.into_bytes()
}

pub fn render_json(records: &[TerminalRecord]) -> Vec<u8> {
    serde_json::to_vec_pretty(records).unwrap_or_else(|_| b"[]\n".to_vec())
}
