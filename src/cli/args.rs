use clap::{Parser, Subcommand, ValueEnum};

/// dev-space-audit: how much space are your developer caches using?
#[derive(Parser, Debug)]
#[command(
    name = "dev-space-audit",
    version,
    about = "Audit disk space used by developer caches",
    long_about = "dev-space-audit sizes package manager caches, IDE caches and simulator\n\
                  data under your home directory, and deletes the ones you choose.\n\
                  Nothing outside your home directory is ever deleted.",
    after_help = "EXAMPLES:\n  \
        dev-space-audit scan                             Categorized report\n  \
        dev-space-audit scan --format json               Machine-readable report\n  \
        dev-space-audit scan --category Xcode --top 3    One category, top 3\n  \
        dev-space-audit clean --target \"Yarn Cache\"      Delete one target\n  \
        dev-space-audit clean --category Xcode --dry-run Preview a deletion\n  \
        dev-space-audit targets                          Show the scan catalog\n  \
        dev-space-audit config show                      Show configuration"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode: minimal output
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan developer caches and report their sizes
    Scan {
        /// Only scan these categories
        #[arg(long, value_delimiter = ',')]
        category: Option<Vec<String>>,

        /// Number of entries in the largest-directories ranking
        #[arg(long)]
        top: Option<usize>,

        /// Size targets one at a time
        #[arg(long)]
        sequential: bool,
    },

    /// Delete selected cache directories
    Clean {
        /// Target names to delete (case-insensitive)
        #[arg(long, value_delimiter = ',')]
        target: Option<Vec<String>>,

        /// Delete every target in these categories
        #[arg(long, value_delimiter = ',')]
        category: Option<Vec<String>>,

        /// Delete every non-empty target
        #[arg(long)]
        all: bool,

        /// Show what would be deleted without deleting
        #[arg(long)]
        dry_run: bool,

        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// List the scan catalog
    Targets,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Print the config file location
    Path,

    /// Reset to default configuration
    Reset,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },

    /// Create the data directory and a default config
    Init,
}

#[derive(Debug, Clone, ValueEnum, PartialEq)]
pub enum OutputFormat {
    Human,
    Json,
    Quiet,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
