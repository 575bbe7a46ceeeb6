use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use log::{LevelFilter, debug, info, warn};
use playbook_mender_config::{Config, MetaConfig, WriteMode};
use playbook_mender_engine::{
    MetaDefaults, Platform, RepairOptions, RunOptions, WritePolicy, io, repair_text, run,
};
use std::{
    io::Read,
    path::{Path, PathBuf},
    process,
};

mod report;

#[derive(Debug, Parser)]
#[command(name = "playbook-mender")]
#[command(about = "Repair syntactically broken Ansible YAML files", long_about = None)]
struct Cli {
    /// Files or directories to repair; defaults to `root` from the config file
    paths: Vec<PathBuf>,

    /// Report what would change without writing anything
    #[arg(long, conflicts_with = "best_effort")]
    dry_run: bool,

    /// Also write the last candidate for files that could not be repaired
    #[arg(long)]
    best_effort: bool,

    /// Overwrite without keeping a copy of the original
    #[arg(long)]
    no_backup: bool,

    /// Config file to use instead of ~/.config/playbook-mender/config.toml
    #[arg(long, env = "PLAYBOOK_MENDER_CONFIG")]
    config: Option<PathBuf>,

    /// Worker threads (0 = one per core)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Repair one document from stdin and print it to stdout
    #[arg(long, conflicts_with = "paths")]
    stdin: bool,

    /// Path used to detect the kind of a stdin document
    #[arg(long, default_value = "stdin.yml")]
    path_hint: String,

    /// Log more (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let (config, config_path) = load_config(cli.config.as_deref())?;
    let options = run_options(&cli, &config);

    if cli.stdin {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return repair_stdin(&cli.path_hint, &text, &options);
    }

    let roots = match (cli.paths.is_empty(), &config.root) {
        (false, _) => cli.paths.clone(),
        (true, Some(root)) => {
            if let Err(e) = io::validate_root(root) {
                bail!(
                    "Root '{}' from config file '{}' is invalid: {e}",
                    root.display(),
                    config_path.display()
                );
            }
            vec![root.clone()]
        }
        (true, None) => bail!(
            "No paths given and no root set in {}",
            config_path.display()
        ),
    };

    let excludes = config.exclude_patterns()?;
    let files = collect_files(&roots, &excludes)?;
    info!("repairing {} files", files.len());

    let outcome = run(&files, &options)?;
    for report in &outcome.reports {
        println!("{}", report::format_report(report));
    }
    println!("{}", report::format_summary(&outcome.summary));

    if outcome.summary.has_failures() {
        process::exit(1);
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Loads the config file, falling back to defaults when it does not exist.
fn load_config(explicit: Option<&Path>) -> Result<(Config, PathBuf)> {
    let config_path = explicit.map_or_else(Config::config_path, Path::to_path_buf);
    let config = match Config::load_from_path(&config_path)? {
        Some(config) => {
            debug!("loaded config from {}", config_path.display());
            config
        }
        None if explicit.is_some() => {
            bail!("Config file '{}' does not exist", config_path.display())
        }
        None => Config::default(),
    };
    Ok((config, config_path))
}

/// Command-line flags win over the config file.
fn run_options(cli: &Cli, config: &Config) -> RunOptions {
    let write = if cli.dry_run {
        WritePolicy::DryRun
    } else if cli.best_effort {
        WritePolicy::BestEffort
    } else {
        match config.write {
            WriteMode::DryRun => WritePolicy::DryRun,
            WriteMode::Repaired => WritePolicy::Repaired,
            WriteMode::BestEffort => WritePolicy::BestEffort,
        }
    };
    let backup_suffix = if cli.no_backup {
        None
    } else {
        config.backup_suffix().map(str::to_string)
    };

    RunOptions {
        write,
        backup_suffix,
        jobs: cli.jobs.unwrap_or(config.jobs),
        repair: RepairOptions {
            meta: meta_defaults(&config.meta),
        },
    }
}

fn meta_defaults(meta: &MetaConfig) -> MetaDefaults {
    let mut defaults = MetaDefaults::default();
    let overrides = [
        (&mut defaults.author, &meta.author),
        (&mut defaults.description, &meta.description),
        (&mut defaults.company, &meta.company),
        (&mut defaults.license, &meta.license),
        (&mut defaults.min_ansible_version, &meta.min_ansible_version),
    ];
    for (field, value) in overrides {
        if let Some(value) = value {
            field.clone_from(value);
        }
    }
    if let Some(platforms) = &meta.platforms {
        defaults.platforms = platforms
            .iter()
            .map(|p| Platform {
                name: p.name.clone(),
                versions: p.versions.clone(),
            })
            .collect();
    }
    if let Some(tags) = &meta.galaxy_tags {
        defaults.galaxy_tags.clone_from(tags);
    }
    defaults
}

/// Expands directories into the YAML files under them.
///
/// Exclude patterns are matched against the path relative to the directory
/// that was scanned. Files named explicitly are always kept, so a missing one
/// shows up as an IO error in the report.
fn collect_files(roots: &[PathBuf], excludes: &[glob::Pattern]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for root in roots {
        if !root.is_dir() {
            files.push(root.clone());
            continue;
        }
        for file in io::scan_yaml_files(root)? {
            let relative = file.strip_prefix(root).unwrap_or(&file);
            if excludes.iter().any(|pattern| pattern.matches_path(relative)) {
                debug!("excluded {}", file.display());
            } else {
                files.push(file);
            }
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn repair_stdin(path_hint: &str, text: &str, options: &RunOptions) -> Result<()> {
    let result = match repair_text(path_hint, text, options) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {path_hint}: {e}");
            process::exit(1);
        }
    };
    for ambiguity in result.ambiguities() {
        warn!("{path_hint}: {ambiguity}");
    }
    print!("{}", result.text());

    if !result.ok() {
        eprintln!(
            "Error: {path_hint}: {}",
            result.diagnostic().unwrap_or("repair failed")
        );
        process::exit(1);
    }
    Ok(())
}
