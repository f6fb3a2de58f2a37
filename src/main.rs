//! Command-line interface for the profile-stats binary.
//!
//! A single invocation aggregates statistics for the authenticated GitHub
//! user, renders the markdown sections and patches the profile document.

use std::{io, path::PathBuf, process, sync::Arc, time::Duration};

use clap::{ArgAction, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use profile_stats::{
    AggregationResult, BoundedExecutor, Error, GitHubSource, Settings, collect_statistics,
    load_settings, render_sections, resolve_token, update_document,
};
use tracing_subscriber::EnvFilter;

/// Command line interface for refreshing profile README statistics.
#[derive(Debug, Parser,)]
#[command(
    name = "profile-stats",
    version,
    about = "Refresh GitHub statistics sections in a profile README"
)]
struct Cli
{
    /// Document containing the STATS, LANGS, RECENT and CONTRIB markers.
    #[arg(long = "readme", value_name = "PATH", env = "PROFILE_README")]
    readme: Option<PathBuf,>,

    /// Optional YAML settings file with limits and placeholder text.
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf,>,

    /// Access token; defaults to GH_TOKEN, then GITHUB_TOKEN.
    #[arg(long = "token", value_name = "TOKEN")]
    token: Option<String,>,

    /// Report what would change without writing the document.
    #[arg(long = "dry-run", action = ArgAction::SetTrue)]
    dry_run: bool,

    /// Print the aggregated statistics as JSON on stdout.
    #[arg(long = "json", action = ArgAction::SetTrue)]
    json: bool,

    /// Enable debug logging.
    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue)]
    verbose: bool,

    /// Only log warnings and hide the progress spinner.
    #[arg(short = 'q', long = "quiet", action = ArgAction::SetTrue, conflicts_with = "verbose")]
    quiet: bool,
}

/// Entry point that reports errors and sets the appropriate exit status.
fn main()
{
    if let Err(error,) = run() {
        eprintln!("{}", error.to_display_string());
        process::exit(1,);
    }
}

/// Executes one refresh using parsed arguments.
///
/// # Errors
///
/// Propagates configuration, remote fetch and document I/O errors.
fn run() -> Result<(), Error,>
{
    let cli = Cli::parse();
    init_tracing(&cli,);

    let settings = resolve_settings(&cli,)?;
    let token = resolve_token(cli.token.as_deref(), |name| std::env::var(name,).ok(),)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::internal(format!("failed to start async runtime: {e}"),),)?;

    runtime.block_on(refresh(&cli, &settings, &token,),)
}

async fn refresh(cli: &Cli, settings: &Settings, token: &str,) -> Result<(), Error,>
{
    let source = Arc::new(GitHubSource::new(token,)?,);
    let progress = progress_bar(cli.quiet,);

    let collected =
        collect_statistics(source, &BoundedExecutor::default(), &settings.limits, &progress,).await;
    progress.finish_and_clear();
    let result = collected?;

    let sections = render_sections(&result, &settings.placeholder,);
    let report = update_document(&settings.document, &sections, cli.dry_run,)?;

    if cli.json {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        write_result(&mut handle, &result,)?;
        eprintln!("{report}");
    } else {
        println!("{report}");
    }

    Ok((),)
}

/// Merges the optional settings file with CLI overrides.
fn resolve_settings(cli: &Cli,) -> Result<Settings, Error,>
{
    let mut settings = match cli.config.as_deref() {
        Some(path,) => load_settings(path,)?,
        None => Settings::default(),
    };

    if let Some(readme,) = cli.readme.as_ref() {
        settings.document = readme.clone();
    }

    Ok(settings,)
}

fn write_result<W: io::Write,>(writer: &mut W, result: &AggregationResult,) -> Result<(), Error,>
{
    serde_json::to_writer_pretty(&mut *writer, result,)?;
    writeln!(writer).map_err(|e| Error::internal(format!("failed to write output: {e}"),),)?;
    Ok((),)
}

fn init_tracing(cli: &Cli,)
{
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level,),);

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter,)
        .with_writer(io::stderr,)
        .with_target(false,)
        .try_init();
}

fn progress_bar(quiet: bool,) -> ProgressBar
{
    if quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.yellow} [{elapsed_precise}] {msg}",)
        .unwrap_or_else(|_| ProgressStyle::default_spinner(),);
    pb.set_style(style,);
    pb.enable_steady_tick(Duration::from_millis(120,),);
    pb
}

#[cfg(test)]
mod tests
{
    use std::{fs, io::Cursor, path::Path};

    use clap::Parser;
    use profile_stats::AggregationResult;
    use tempfile::tempdir;

    use super::{Cli, resolve_settings, write_result};

    fn empty_result() -> AggregationResult
    {
        AggregationResult {
            login:              "octocat".to_owned(),
            repository_count:   0,
            total_stars:        0,
            total_forks:        0,
            open_issues:        0,
            open_pull_requests: 0,
            languages:          Vec::new(),
            recent:             Vec::new(),
            contributors:       Vec::new(),
        }
    }

    #[test]
    fn cli_defaults_to_live_run()
    {
        let cli = Cli::try_parse_from([env!("CARGO_PKG_NAME"), "--readme", "PROFILE.md",],)
            .expect("failed to parse CLI",);

        assert_eq!(cli.readme.as_deref(), Some(Path::new("PROFILE.md")));
        assert!(!cli.dry_run);
        assert!(!cli.json);
    }

    #[test]
    fn cli_rejects_verbose_with_quiet()
    {
        let result = Cli::try_parse_from([env!("CARGO_PKG_NAME"), "--verbose", "--quiet",],);
        assert!(result.is_err());
    }

    #[test]
    fn readme_flag_overrides_settings_document()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let config_path = temp.path().join("settings.yaml",);
        fs::write(&config_path, "document: FROM_SETTINGS.md\n",).expect("failed to write settings",);

        let cli = Cli::try_parse_from([
            env!("CARGO_PKG_NAME"),
            "--config",
            config_path.to_str().expect("utf8",),
            "--readme",
            "FROM_CLI.md",
            "--dry-run",
        ],)
        .expect("failed to parse CLI",);

        let settings = resolve_settings(&cli,).expect("settings resolve",);
        assert_eq!(settings.document, Path::new("FROM_CLI.md"));
        assert!(cli.dry_run);
    }

    #[test]
    fn settings_document_used_without_flag()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let config_path = temp.path().join("settings.yaml",);
        fs::write(&config_path, "document: FROM_SETTINGS.md\n",).expect("failed to write settings",);

        let cli = Cli::try_parse_from([
            env!("CARGO_PKG_NAME"),
            "--config",
            config_path.to_str().expect("utf8",),
        ],)
        .expect("failed to parse CLI",);

        let settings = resolve_settings(&cli,).expect("settings resolve",);
        if std::env::var_os("PROFILE_README",).is_none() {
            assert_eq!(settings.document, Path::new("FROM_SETTINGS.md"));
        }
    }

    #[test]
    fn json_output_is_pretty_and_newline_terminated()
    {
        let mut buffer = Cursor::new(Vec::new(),);
        write_result(&mut buffer, &empty_result(),).expect("failed to serialize result",);

        let output = String::from_utf8(buffer.into_inner(),).expect("invalid UTF-8",);
        assert!(output.starts_with("{\n  \"login\": \"octocat\""));
        assert!(output.ends_with("}\n"));
    }
}
