use std::time::Duration;

use clap::{error::ErrorKind, CommandFactory, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::{self, ApiClient, ClientOptions, TerminalRecord};
use crate::browse;
use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::output::{self, OutputFormat};
use crate::view::{DateFormat, Layout, Notice, PageSize, TerminalView, ViewOptions};

fn print_banner(no_color: bool) {
    let _ = no_color;
    const BANNER: &str = r#"
   __
  / /____  _________ ___  ____  __  ______ ___
 / __/ _ \/ ___/ __ `__ \/ __ \/ / / / __ `__ \
/ /_/  __/ /  / / / / / / / / / /_/ / / / / / /
\__/\___/_/  /_/ /_/ /_/_/ /_/\__,_/_/ /_/ /_/
       v0.3.2 - POS terminal number console
    "#;
    print!("{}", BANNER);
    println!();
}

fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<10}: {}", label, value);
}

fn format_bool(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn render_custom_help() -> String {
    let cmd = CliArgs::command();
    let mut out = String::new();

    out.push_str(cmd.get_name());
    if let Some(version) = cmd.get_version() {
        out.push(' ');
        out.push_str(version);
    }
    out.push('\n');

    if let Some(about) = cmd.get_about() {
        out.push_str(&about.to_string());
        out.push('\n');
    }

    if let Some(long_about) = cmd.get_long_about() {
        out.push('\n');
        out.push_str(&long_about.to_string());
        out.push('\n');
    }

    out.push('\n');
    out.push_str("Usage: ");
    out.push_str(cmd.get_name());
    out.push_str(" [OPTIONS]\n\n");

    let mut sections: Vec<(String, Vec<&clap::Arg>)> = Vec::new();
    for arg in cmd.get_arguments() {
        if arg.is_hide_set() {
            continue;
        }
        let heading = arg.get_help_heading().unwrap_or("Options").to_string();
        match sections.iter_mut().find(|(h, _)| *h == heading) {
            Some((_, args)) => args.push(arg),
            None => sections.push((heading, vec![arg])),
        }
    }

    for (heading, args) in sections {
        out.push_str(&heading);
        out.push_str(":\n");

        for arg in args {
            let mut parts: Vec<String> = Vec::new();

            if let Some(short) = arg.get_short() {
                parts.push(format!("-{short}"));
            }

            if let Some(long) = arg.get_long() {
                parts.push(format!("--{long}"));
            }

            if let Some(aliases) = arg.get_visible_aliases() {
                for alias in aliases {
                    parts.push(format!("--{alias}"));
                }
            }

            let mut flags = parts.join(", ");

            if arg.get_action().takes_values() {
                let value_name = arg
                    .get_value_names()
                    .and_then(|names| names.first())
                    .map(|name| name.as_str())
                    .unwrap_or("VALUE");
                flags.push(' ');
                flags.push('<');
                flags.push_str(value_name);
                flags.push('>');
            }

            out.push_str("  ");
            out.push_str(&flags);
            out.push('\n');

            if let Some(help) = arg.get_help() {
                let help = help.to_string();
                if !help.trim().is_empty() {
                    out.push_str("          ");
                    out.push_str(help.trim());
                    out.push('\n');
                }
            }

            out.push('\n');
        }
    }

    out
}

fn init_logging(verbosity: u8) {
    let default_filter = match verbosity {
        0 => "termnum=warn",
        1 => "termnum=info",
        _ => "termnum=debug",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Action {
    Generate,
    Find(String),
    List,
    Browse,
}

#[derive(Clone, Debug)]
struct RunOptions {
    action: Action,
    page: usize,
    view: ViewOptions,
    client: ClientOptions,
    output: Option<String>,
    output_format: Option<String>,
    no_color: bool,
}

fn build_run_options(args: CliArgs, cfg: ConfigFile) -> Result<RunOptions, String> {
    validation::validate(&args)?;

    let no_color = args.no_color || cfg.no_color.unwrap_or(false);
    let insecure = args.insecure || cfg.insecure.unwrap_or(false);
    let timeout_seconds = args.timeout.or(cfg.timeout).unwrap_or(10);
    if timeout_seconds == 0 {
        return Err("invalid timeout, expected positive integer".to_string());
    }
    let proxy = args
        .proxy
        .or(cfg.proxy)
        .filter(|proxy| !proxy.trim().is_empty());

    let base_url = args
        .base_url
        .or(cfg.base_url)
        .unwrap_or_else(|| api::DEFAULT_BASE_URL.to_string());
    if reqwest::Url::parse(&base_url).is_err() {
        return Err(format!("invalid base URL '{base_url}'"));
    }

    let defaults = ViewOptions::default();
    let page_size = match args.page_size.or(cfg.page_size) {
        Some(raw) => PageSize::parse(&raw)
            .ok_or_else(|| format!("invalid page-size '{raw}', expected 5, 10, 20, 50 or all"))?,
        None => defaults.page_size,
    };
    let layout = match args.layout.or(cfg.layout) {
        Some(raw) => Layout::parse(&raw)
            .ok_or_else(|| format!("invalid layout '{raw}', expected table or grid"))?,
        None => defaults.layout,
    };
    let date_format = match args.date_format.or(cfg.date_format) {
        Some(raw) => DateFormat::parse(&raw)
            .ok_or_else(|| format!("invalid date-format '{raw}', expected dmy, mdy or iso"))?,
        None => defaults.date_format,
    };

    let output = args
        .output
        .or(cfg.output)
        .map(|p| config::expand_tilde_string(&p));
    let output_format = args.output_format.or(cfg.output_format);
    if let Some(raw) = output_format.as_deref() {
        if OutputFormat::parse(raw).is_none() {
            return Err(format!(
                "invalid output-format '{raw}', expected text or json"
            ));
        }
    }

    let action = if let Some(number) = args.find {
        Action::Find(number)
    } else if args.generate {
        Action::Generate
    } else if args.list {
        Action::List
    } else {
        Action::Browse
    };

    Ok(RunOptions {
        action,
        page: args.page.unwrap_or(1),
        view: ViewOptions {
            page_size,
            layout,
            date_format,
        },
        client: ClientOptions {
            base_url,
            timeout_seconds,
            proxy,
            insecure,
        },
        output,
        output_format,
        no_color,
    })
}

fn action_spinner(message: &str) -> Result<ProgressBar, String> {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_style(
        ProgressStyle::with_template(":: {msg} {spinner}")
            .map_err(|e| format!("failed to build progress style: {e}"))?,
    );
    pb.set_message(message.to_string());
    Ok(pb)
}

// success notices print, error notices become the process exit error
fn report_notice(view: &mut TerminalView) -> Result<(), String> {
    match view.take_notice() {
        Some(Notice::Error(message)) => Err(message),
        Some(notice) => {
            println!("{}", output::render_notice(&notice));
            Ok(())
        }
        None => Ok(()),
    }
}

async fn run_generate(client: &ApiClient, options: &ViewOptions) -> Result<(), String> {
    let mut view = TerminalView::new(options.clone());
    view.begin_generate();

    let pb = action_spinner("Generating terminal number")?;
    let generated = client.generate().await;
    view.apply_generate(generated);

    let number = view.generated().map(|g| g.number.clone());
    if let Some(number) = number.as_deref() {
        pb.set_message("Fetching terminal details".to_string());
        match client.find_by_number(number).await {
            Ok(record) => view.apply_generate_details(Some(record)),
            // the code is already known, a failed detail lookup stays quiet
            Err(err) => debug!("detail lookup after generate failed: {err}"),
        }
    }
    pb.finish_and_clear();

    report_notice(&mut view)?;
    if let Some(generated) = view.generated() {
        println!();
        print!("{}", output::render_generated(generated, options.date_format));
    }
    Ok(())
}

async fn run_find(client: &ApiClient, options: &ViewOptions, number: &str) -> Result<(), String> {
    let mut view = TerminalView::new(options.clone());
    let query = match view.begin_search(number) {
        Some(query) => query,
        None => return report_notice(&mut view),
    };

    let pb = action_spinner("Searching")?;
    let found = client.find_by_number(&query).await;
    pb.finish_and_clear();
    view.apply_search(found);

    report_notice(&mut view)?;
    if let Some(record) = view.search_result() {
        println!();
        print!("{}", output::render_search(record, options.date_format));
    }
    Ok(())
}

async fn write_output(
    path: &str,
    format: Option<&str>,
    records: &[TerminalRecord],
) -> Result<(), String> {
    let output_format = format
        .and_then(OutputFormat::parse)
        .or_else(|| output::infer_format_from_path(path))
        .unwrap_or(OutputFormat::Text);
    let rendered = match output_format {
        OutputFormat::Text => output::render_text(records),
        OutputFormat::Json => output::render_json(records),
    };

    let mut outfile = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .await
        .map_err(|e| format!("failed to open output file: {e}"))?;
    outfile
        .write_all(&rendered)
        .await
        .map_err(|_| "failed to write output file".to_string())?;
    Ok(())
}

async fn run_list(
    client: &ApiClient,
    options: &ViewOptions,
    page: usize,
    output_path: Option<&str>,
    output_format: Option<&str>,
) -> Result<(), String> {
    let mut view = TerminalView::new(options.clone());

    let pb = action_spinner("Loading terminals")?;
    let listed = client.list_all().await;
    pb.finish_and_clear();
    view.apply_list(listed);

    report_notice(&mut view)?;
    view.goto_page(page);

    if view.records().is_empty() {
        print!("{}", output::render_empty());
        return Ok(());
    }

    let pager = view.pager();
    println!(
        "{} {}",
        "All Terminal Codes".bold(),
        format!("({} total)", pager.total_items()).dimmed()
    );
    println!();
    match options.layout {
        Layout::Table => print!(
            "{}",
            output::render_table(view.visible(), pager.slice().start, options.date_format)
        ),
        Layout::Grid => print!(
            "{}",
            output::render_grid(view.visible(), options.date_format)
        ),
    }
    if pager.total_pages() > 1 {
        println!();
        println!("{}", output::render_pager(pager));
    }

    if let Some(path) = output_path {
        write_output(path, output_format, view.records()).await?;
        println!();
        format_kv_line("Saved", path);
    }
    Ok(())
}

fn print_header(run: &RunOptions, client: &ApiClient) {
    print_banner(run.no_color);
    format_kv_line("Service", client.base_url());
    format_kv_line(
        "View",
        &format!(
            "layout={} page-size={} dates={}",
            run.view.layout.label(),
            run.view.page_size.label(),
            run.view.date_format.label()
        ),
    );
    format_kv_line(
        "HTTP",
        &format!(
            "timeout={}s proxy={} insecure={}",
            run.client.timeout_seconds,
            if run.client.proxy.is_some() { "on" } else { "off" },
            format_bool(run.client.insecure)
        ),
    );
    println!();
}

async fn run_async(run: RunOptions) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }

    let client = ApiClient::new(&run.client).map_err(|e| e.to_string())?;

    match run.action {
        Action::Browse => browse::run(client, run.view.clone(), run.page).await,
        Action::Generate => {
            print_header(&run, &client);
            run_generate(&client, &run.view).await
        }
        Action::Find(ref number) => {
            print_header(&run, &client);
            run_find(&client, &run.view, number).await
        }
        Action::List => {
            print_header(&run, &client);
            run_list(
                &client,
                &run.view,
                run.page,
                run.output.as_deref(),
                run.output_format.as_deref(),
            )
            .await
        }
    }
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

    let user_config_path = args.config.clone().map(|p| config::expand_tilde(&p));
    let cfg = match user_config_path.as_ref() {
        Some(path) => config::load_config(path, false)?,
        None => match config::default_config_path() {
            Some(path) => {
                config::ensure_default_config_file(&path)?;
                config::load_config(&path, true)?
            }
            None => ConfigFile::default(),
        },
    };

    let run = build_run_options(args, cfg)?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))
}

#[cfg(test)]
mod cli_tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn defaults_to_interactive_browse() {
        let args = CliArgs::parse_from(["termnum"]);
        let run = build_run_options(args, ConfigFile::default()).unwrap();
        assert_eq!(run.action, Action::Browse);
        assert_eq!(run.page, 1);
        assert_eq!(run.view.page_size, PageSize::Limited(5));
        assert_eq!(run.view.layout, Layout::Table);
        assert_eq!(run.client.base_url, api::DEFAULT_BASE_URL);
        assert_eq!(run.client.timeout_seconds, 10);
    }

    #[test]
    fn find_carries_the_number() {
        let args = CliArgs::parse_from(["termnum", "--find", "2033axb1"]);
        let run = build_run_options(args, ConfigFile::default()).unwrap();
        assert_eq!(run.action, Action::Find("2033axb1".to_string()));
    }

    #[test]
    fn flags_take_precedence_over_config() {
        let args = CliArgs::parse_from(["termnum", "--ls", "--ps", "20", "--to", "30"]);
        let cfg = ConfigFile {
            page_size: Some("50".to_string()),
            timeout: Some(5),
            layout: Some("grid".to_string()),
            ..ConfigFile::default()
        };
        let run = build_run_options(args, cfg).unwrap();
        assert_eq!(run.action, Action::List);
        assert_eq!(run.view.page_size, PageSize::Limited(20));
        assert_eq!(run.client.timeout_seconds, 30);
        assert_eq!(run.view.layout, Layout::Grid);
    }

    #[test]
    fn conflicting_actions_are_rejected() {
        let args = CliArgs::parse_from(["termnum", "--gen", "--ls"]);
        assert!(build_run_options(args, ConfigFile::default()).is_err());
    }

    #[test]
    fn bad_config_page_size_is_rejected() {
        let args = CliArgs::parse_from(["termnum", "--ls"]);
        let cfg = ConfigFile {
            page_size: Some("7".to_string()),
            ..ConfigFile::default()
        };
        assert!(build_run_options(args, cfg).is_err());
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let args = CliArgs::parse_from(["termnum", "--api", "not a url"]);
        assert!(build_run_options(args, ConfigFile::default()).is_err());
    }
}
