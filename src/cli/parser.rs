use clap::{Args, Parser, Subcommand};

/// Command-line interface definition for gltime
#[derive(Parser)]
#[command(
    name = "gltime",
    version = env!("CARGO_PKG_VERSION"),
    about = "Store GitLab time-tracking webhook events and report time spent per developer, project and issue",
    long_about = None
)]
pub struct Cli {
    /// Override the event store path (useful for tests or a custom store)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where a report reads its records from, and which ones it keeps.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Event store (.db), directory of stores, or dataset dump (.json).
    /// Repeatable; defaults to the configured store.
    #[arg(long = "source", short = 's', value_name = "PATH")]
    pub sources: Vec<String>,

    /// Keep only records where COLUMN equals VALUE (repeatable, all must match)
    #[arg(long = "where", short = 'w', value_name = "COLUMN=VALUE")]
    pub filters: Vec<String>,

    /// Also read the dataset served by the webhook receiver at URL
    #[arg(long, value_name = "URL", conflicts_with = "remote")]
    pub url: Option<String>,

    /// Also read the dataset served by the configured receiver (config `url`)
    #[arg(long)]
    pub remote: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the event store and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Store one webhook body (JSON) in the event store
    Ingest {
        /// File holding the body; reads stdin when omitted
        #[arg(long, value_name = "FILE")]
        file: Option<String>,

        /// Receive time (YYYY-MM-DD HH:MM:SS[.ffffff]); defaults to now
        #[arg(long, value_name = "TIME")]
        time: Option<String>,
    },

    /// List time-tracking records
    List {
        #[command(flatten)]
        source: SourceArgs,

        /// Columns to show after the date
        #[arg(
            long,
            short = 'c',
            value_delimiter = ',',
            default_value = "project,dev,time"
        )]
        columns: Vec<String>,

        /// Sort by this column instead of by date
        #[arg(long)]
        sort: Option<String>,

        /// Show only the last N lines
        #[arg(long, short = 't')]
        tail: Option<usize>,
    },

    /// Print nested time totals (e.g. per developer, then project, then issue)
    Totals {
        #[command(flatten)]
        source: SourceArgs,

        /// Grouping levels, outermost first (default from config)
        #[arg(long, short = 'l', value_delimiter = ',')]
        levels: Vec<String>,

        /// Levels listed alphabetically instead of by time (default from config)
        #[arg(long = "sort-levels", value_delimiter = ',')]
        sort_levels: Vec<String>,
    },

    /// Recent records plus totals by developer and by project
    Summary {
        #[command(flatten)]
        source: SourceArgs,

        /// Records shown before the totals (default from config)
        #[arg(long, short = 't')]
        tail: Option<usize>,
    },

    /// List the groups of one or more columns
    Groups {
        #[command(flatten)]
        source: SourceArgs,

        /// Grouping columns
        #[arg(long, short = 'b', value_delimiter = ',', required = true)]
        by: Vec<String>,

        /// Order groups by the sum of this column
        #[arg(long)]
        reorder: Option<String>,

        /// Ascending order with --reorder
        #[arg(long, requires = "reorder")]
        ascending: bool,
    },

    /// Draw monthly stacked-bar charts (PDF)
    Plot {
        #[command(flatten)]
        source: SourceArgs,

        /// Grouping columns; without it the standard chart set is drawn
        #[arg(long, short = 'b', value_delimiter = ',')]
        by: Vec<String>,

        /// Draw only this group (repeatable, drawn in the given order).
        /// With several --by columns give one value per column: "team/api,Alice"
        #[arg(long, short = 'g', requires = "by")]
        groups: Vec<String>,

        /// Draw the top N groups and sum the rest into "Other"
        #[arg(long, short = 'n')]
        top: Option<usize>,

        /// Chart title, also used in the file name
        #[arg(long)]
        title: Option<String>,

        /// Column to sum per month
        #[arg(long, default_value = "time")]
        column: String,

        /// Output directory (default from config)
        #[arg(long = "out-dir", value_name = "DIR")]
        out_dir: Option<String>,
    },

    /// Serialize the dataset as JSON (column → {timestamp → value})
    Dump {
        #[command(flatten)]
        source: SourceArgs,

        /// Write to FILE instead of stdout
        #[arg(long, value_name = "FILE")]
        file: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Export every table of the event store as TSV
    Export {
        /// Output template (absolute path): dump.tsv → dump.events.tsv, dump.log.tsv
        #[arg(long, value_name = "FILE")]
        file: String,

        /// Overwrite output files without confirmation
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}
