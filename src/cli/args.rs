use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "termnum",
    version,
    about = "POS terminal number management console",
    long_about = "Termnum is a console front end for the terminal-number service: generate new POS terminal numbers, look existing ones up, and page through everything generated so far.\n\nExamples:\n  termnum\n  termnum --gen\n  termnum --find 2033AXB1\n  termnum --ls --pg 2 --ps 20\n\nTip: Run without action flags for the interactive browser. Use --cfg to persist connection settings and keep CLI invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'g',
        long = "gen",
        visible_alias = "generate",
        help_heading = "Actions",
        help = "Generate a new terminal number and exit."
    )]
    pub generate: bool,

    #[arg(
        short = 's',
        long = "find",
        visible_alias = "search",
        value_name = "NUMBER",
        help_heading = "Actions",
        help = "Look up a terminal number and exit."
    )]
    pub find: Option<String>,

    #[arg(
        short = 'l',
        long = "ls",
        visible_alias = "list",
        help_heading = "Actions",
        help = "List generated terminal numbers and exit."
    )]
    pub list: bool,

    #[arg(
        short = 'p',
        long = "pg",
        visible_alias = "page",
        value_name = "N",
        help_heading = "Listing",
        help = "Page to display (clamped to the last page)."
    )]
    pub page: Option<usize>,

    #[arg(
        short = 'z',
        long = "ps",
        visible_alias = "page-size",
        value_name = "SIZE",
        help_heading = "Listing",
        help = "Rows per page (5, 10, 20, 50 or all)."
    )]
    pub page_size: Option<String>,

    #[arg(
        long = "lo",
        visible_alias = "layout",
        value_name = "LAYOUT",
        help_heading = "Listing",
        help = "Listing layout (table or grid)."
    )]
    pub layout: Option<String>,

    #[arg(
        short = 'd',
        long = "df",
        visible_alias = "date-format",
        value_name = "FORMAT",
        help_heading = "Listing",
        help = "Date format (dmy, mdy or iso)."
    )]
    pub date_format: Option<String>,

    #[arg(
        short = 'b',
        long = "api",
        visible_alias = "base-url",
        value_name = "URL",
        help_heading = "HTTP",
        help = "Terminal-number service base URL."
    )]
    pub base_url: Option<String>,

    #[arg(
        short = 'T',
        long = "to",
        visible_alias = "timeout",
        value_name = "SECONDS",
        help_heading = "HTTP",
        help = "Per-request timeout in seconds."
    )]
    pub timeout: Option<usize>,

    #[arg(
        short = 'x',
        long = "px",
        visible_alias = "proxy",
        value_name = "URL",
        help_heading = "HTTP",
        help = "HTTP proxy URL (e.g. http://127.0.0.1:8080)."
    )]
    pub proxy: Option<String>,

    #[arg(
        short = 'k',
        long = "insecure",
        help_heading = "HTTP",
        help = "Accept invalid TLS certificates (test environments)."
    )]
    pub insecure: bool,

    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the listing to a file."
    )]
    pub output: Option<String>,

    #[arg(
        short = 'A',
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output format (text or json)."
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
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.termnum/config.yml)."
    )]
    pub config: Option<String>,
}
