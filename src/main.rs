use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dev_space_audit::cleaner::Remover;
use dev_space_audit::cli::args::{Cli, Commands, CompletionShell, ConfigAction, OutputFormat};
use dev_space_audit::cli::output;
use dev_space_audit::common::config::Config;
use dev_space_audit::common::errors::AuditError;
use dev_space_audit::common::format;
use dev_space_audit::common::logging;
use dev_space_audit::common::safety::HomeBoundary;
use dev_space_audit::scanner::{self, report, targets, ScanOptions};

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let home = HomeBoundary::from_env()?;
    let config = Config::load(&home)?;

    let log_dir = if config.log_to_file {
        let dir = Config::logs_dir(&home);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
        Some(dir)
    } else {
        None
    };
    let _log_guard = logging::init(cli.verbose, log_dir.as_deref());
    tracing::debug!("home directory: {}", home.root().display());

    let cancel = install_cancel_handler();

    match cli.command {
        Commands::Scan {
            ref category,
            top,
            sequential,
        } => cmd_scan(&cli, &home, &config, category.as_deref(), top, sequential, &cancel),

        Commands::Clean {
            ref target,
            ref category,
            all,
            dry_run,
            yes,
        } => cmd_clean(
            &cli,
            &home,
            &config,
            CleanSelection {
                names: target.as_deref(),
                categories: category.as_deref(),
                all,
            },
            dry_run,
            yes,
            &cancel,
        ),

        Commands::Targets => cmd_targets(&cli, &home, &config),

        Commands::Config { ref action } => cmd_config(&home, action),

        Commands::Completions { shell } => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            let shell = match shell {
                CompletionShell::Bash => clap_complete::Shell::Bash,
                CompletionShell::Zsh => clap_complete::Shell::Zsh,
                CompletionShell::Fish => clap_complete::Shell::Fish,
            };
            clap_complete::generate(shell, &mut cmd, "dev-space-audit", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Ctrl-C stops issuing new work; whatever already finished stays finished
fn install_cancel_handler() -> Arc<AtomicBool> {
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        if !flag.swap(true, Ordering::Relaxed) {
            eprintln!("\n  Interrupted, finishing the current target, then stopping.");
        }
    }) {
        tracing::warn!("could not install Ctrl-C handler: {}", e);
    }
    cancel
}

fn matches_any(value: &str, wanted: Option<&[String]>) -> bool {
    match wanted {
        Some(list) => list.iter().any(|w| w.eq_ignore_ascii_case(value)),
        None => true,
    }
}

fn scan_options(cli: &Cli, config: &Config, sequential: bool) -> ScanOptions {
    ScanOptions {
        parallel: config.parallel_scan && !sequential,
        show_progress: !cli.quiet && cli.format == OutputFormat::Human,
    }
}

// ─── Scan ─────────────────────────────────────────────────────────────────────

fn cmd_scan(
    cli: &Cli,
    home: &HomeBoundary,
    config: &Config,
    categories: Option<&[String]>,
    top: Option<usize>,
    sequential: bool,
    cancel: &AtomicBool,
) -> Result<()> {
    let catalog: Vec<_> = targets::catalog(home, config)
        .into_iter()
        .filter(|t| matches_any(&t.category, categories))
        .collect();

    let options = scan_options(cli, config, sequential);
    let report = scanner::run_scan(&catalog, &options, top.unwrap_or(config.top_n), cancel)?;

    match cli.format {
        OutputFormat::Human => output::print_scan_report(&report),
        OutputFormat::Json => output::print_scan_json(&report),
        OutputFormat::Quiet => output::print_scan_quiet(&report),
    }

    Ok(())
}

// ─── Clean ────────────────────────────────────────────────────────────────────

struct CleanSelection<'a> {
    names: Option<&'a [String]>,
    categories: Option<&'a [String]>,
    all: bool,
}

impl CleanSelection<'_> {
    fn is_empty(&self) -> bool {
        !self.all && self.names.is_none() && self.categories.is_none()
    }

    fn selects(&self, target: &targets::TargetConfig) -> bool {
        if self.all {
            return true;
        }
        let by_name = self.names.is_some_and(|names| {
            names.iter().any(|n| n.eq_ignore_ascii_case(&target.name))
        });
        let by_category = self.categories.is_some_and(|cats| {
            cats.iter().any(|c| c.eq_ignore_ascii_case(&target.category))
        });
        by_name || by_category
    }
}

fn cmd_clean(
    cli: &Cli,
    home: &HomeBoundary,
    config: &Config,
    selection: CleanSelection<'_>,
    dry_run: bool,
    yes: bool,
    cancel: &AtomicBool,
) -> Result<()> {
    if selection.is_empty() {
        anyhow::bail!("Nothing selected. Use --target, --category or --all (see `dev-space-audit targets`).");
    }

    let catalog: Vec<_> = targets::catalog(home, config)
        .into_iter()
        .filter(|t| selection.selects(t))
        .collect();
    if catalog.is_empty() {
        anyhow::bail!("No catalog target matches the selection. Run `dev-space-audit targets` to list them.");
    }

    let options = scan_options(cli, config, false);
    let results = scanner::scan_all_cancellable(&catalog, &options, cancel)?;
    let selected = report::deletable(&catalog, &results);

    if selected.is_empty() {
        if !cli.quiet {
            println!("  {} No cache or paths to delete.", "✨");
        }
        return Ok(());
    }

    let human = cli.format == OutputFormat::Human;
    if human && !cli.quiet {
        output::print_clean_plan(&selected, home.root());
    }

    if !dry_run && !yes {
        let total: u64 = selected.iter().map(|d| d.result.size).sum();
        print!(
            "\n  {} Delete {} path(s) ({})? [y/N] ",
            "❓",
            selected.len(),
            format::format_size(total)
        );
        use std::io::Write;
        std::io::stdout().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("  {} Cancelled", "✗".red());
            return Ok(());
        }
    }

    let chosen: Vec<_> = selected.into_iter().map(|d| d.target).collect();
    let remover = Remover::new(home.clone()).with_progress(human && !cli.quiet);
    let outcome = remover.delete_many(&chosen, dry_run, cancel);

    match cli.format {
        OutputFormat::Human => output::print_deletion_outcome(&outcome, dry_run, home.root()),
        OutputFormat::Json => output::print_deletion_json(&outcome, dry_run),
        OutputFormat::Quiet => println!("{}  {}", outcome.deleted.len(), outcome.errors.len()),
    }

    if outcome.cancelled {
        return Err(AuditError::Cancelled.into());
    }
    if !outcome.errors.is_empty() {
        anyhow::bail!("{} path(s) could not be deleted", outcome.errors.len());
    }
    Ok(())
}

// ─── Targets ──────────────────────────────────────────────────────────────────

fn cmd_targets(cli: &Cli, home: &HomeBoundary, config: &Config) -> Result<()> {
    let catalog = targets::catalog(home, config);
    match cli.format {
        OutputFormat::Human => output::print_targets(&catalog, home.root()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&catalog)?),
        OutputFormat::Quiet => {
            for t in &catalog {
                println!("{}\t{}\t{}", t.category, t.name, t.path.display());
            }
        }
    }
    Ok(())
}

// ─── Config ───────────────────────────────────────────────────────────────────

fn cmd_config(home: &HomeBoundary, action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init => {
            Config::init_dirs(home)?;
            let path = Config::config_path(home);
            if !path.exists() {
                Config::default().save(home)?;
            }
            println!("  {} Initialized {}", "✓".green(), format::format_path(&path, home.root()));
            Ok(())
        }
        ConfigAction::Show => {
            let config = Config::load(home)?;
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        ConfigAction::Path => {
            println!("{}", Config::config_path(home).display());
            Ok(())
        }
        ConfigAction::Reset => {
            Config::default().save(home)?;
            println!("  {} Configuration reset to defaults", "✓".green());
            Ok(())
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load(home)?;
            config.set(key, value)?;
            config.save(home)?;
            println!("  {} Set {} = {}", "✓".green(), key, value);
            Ok(())
        }
    }
}
