//! `orbitmap population` — rebuild the per-planet workforce file.

use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::config::{validate_feed_url, ConfigError, OrbitmapConfig};
use crate::exit_codes::{EXIT_CONFIG_INVALID, EXIT_ERROR, EXIT_FEED_PARSE};
use crate::fetch::FeedClient;
use crate::sink::{render_planets, write_json};
use crate::CliError;

#[derive(Subcommand)]
pub enum PopulationCommands {
    /// Download the infrastructure feed and write the workforce JSON
    #[command(after_help = "\
Examples:
  orbitmap population run
  orbitmap population run --output public/population_data.json
  orbitmap population run --input allreports.csv --json --quiet
  orbitmap population run --config orbitmap.toml --pretty")]
    Run {
        /// Path to an orbitmap.toml config file
        #[arg(long, env = "ORBITMAP_CONFIG")]
        config: Option<PathBuf>,

        /// Feed URL (overrides the config file)
        #[arg(long, conflicts_with = "input")]
        url: Option<String>,

        /// Read the feed from a local CSV file instead of downloading it
        #[arg(long)]
        input: Option<PathBuf>,

        /// Output JSON path (overrides the config file)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Also print the JSON mapping to stdout
        #[arg(long)]
        json: bool,

        /// Indent the JSON output
        #[arg(long)]
        pretty: bool,

        /// Suppress the summary line
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Validate a config file without running
    #[command(after_help = "\
Examples:
  orbitmap population validate orbitmap.toml
  orbitmap population validate orbitmap.toml --print")]
    Validate {
        /// Path to the orbitmap.toml config file
        config: PathBuf,

        /// Print the resolved config (defaults filled in) as TOML
        #[arg(long)]
        print: bool,
    },
}

pub fn cmd_population(cmd: PopulationCommands) -> Result<(), CliError> {
    match cmd {
        PopulationCommands::Run { config, url, input, output, json, pretty, quiet } => {
            cmd_population_run(RunOptions { config, url, input, output, json, pretty, quiet })
        }
        PopulationCommands::Validate { config, print } => cmd_population_validate(&config, print),
    }
}

struct RunOptions {
    config: Option<PathBuf>,
    url: Option<String>,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    json: bool,
    pretty: bool,
    quiet: bool,
}

fn config_err(e: ConfigError) -> CliError {
    CliError { code: EXIT_CONFIG_INVALID, message: e.to_string(), hint: None }
}

/// Config file values with command-line overrides applied.
fn effective_config(opts: &RunOptions) -> Result<OrbitmapConfig, CliError> {
    let (mut config, loaded) = OrbitmapConfig::resolve(opts.config.as_deref()).map_err(config_err)?;
    match loaded {
        Some(path) => log::debug!("using config {}", path.display()),
        None => log::debug!("no config file, using defaults"),
    }

    if let Some(ref url) = opts.url {
        validate_feed_url(url).map_err(|e| CliError::args(e.to_string()))?;
        config.source.url = url.clone();
    }
    if let Some(ref output) = opts.output {
        config.output.json = output.clone();
    }
    if opts.pretty {
        config.output.pretty = true;
    }
    Ok(config)
}

fn read_feed(input: Option<&Path>, config: &OrbitmapConfig) -> Result<String, CliError> {
    match input {
        Some(path) => {
            log::info!("reading feed from {}", path.display());
            std::fs::read_to_string(path)
                .map_err(|e| CliError::args(format!("cannot read {}: {e}", path.display())))
        }
        None => {
            let client = FeedClient::new(&config.source)?;
            log::info!("downloading feed from {}", client.url());
            client.fetch_csv()
        }
    }
}

fn cmd_population_run(opts: RunOptions) -> Result<(), CliError> {
    let config = effective_config(&opts)?;
    let feed = read_feed(opts.input.as_deref(), &config)?;

    let result = orbitmap_workforce::run_csv(&feed).map_err(|e| CliError {
        code: EXIT_FEED_PARSE,
        message: e.to_string(),
        hint: Some("is the source the FIO infrastructure report CSV?".into()),
    })?;

    let json_str = render_planets(&result.planets, config.output.pretty)?;
    write_json(&config.output.json, &json_str)?;

    if opts.json {
        println!("{json_str}");
    }

    if !opts.quiet {
        let s = &result.summary;
        eprintln!(
            "{} planets from {} rows ({} dropped) -> {}",
            s.planets,
            s.rows_read,
            s.rows_dropped,
            config.output.json.display(),
        );
        eprintln!(
            "tiers: {} absorbed, {} jobs scarce, {} population shrank",
            s.workers_absorbed, s.jobs_scarce, s.population_shrank,
        );
    }

    Ok(())
}

fn cmd_population_validate(config_path: &Path, print: bool) -> Result<(), CliError> {
    let config = OrbitmapConfig::load(config_path).map_err(config_err)?;

    if print {
        let rendered = toml::to_string_pretty(&config).map_err(|e| CliError {
            code: EXIT_ERROR,
            message: format!("TOML serialization error: {e}"),
            hint: None,
        })?;
        print!("{rendered}");
    }

    eprintln!("config ok: {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit_codes::EXIT_USAGE;

    fn opts() -> RunOptions {
        RunOptions {
            config: None,
            url: None,
            input: None,
            output: None,
            json: false,
            pretty: false,
            quiet: true,
        }
    }

    fn config_file(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("orbitmap.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file(
            dir.path(),
            "[source]\nurl = \"https://example.com/a.csv\"\n[output]\njson = \"from_config.json\"\n",
        );

        let mut o = opts();
        o.config = Some(path);
        o.url = Some("http://localhost:1234/b.csv".into());
        o.output = Some(PathBuf::from("from_flag.json"));
        o.pretty = true;

        let config = effective_config(&o).unwrap();
        assert_eq!(config.source.url, "http://localhost:1234/b.csv");
        assert_eq!(config.output.json, PathBuf::from("from_flag.json"));
        assert!(config.output.pretty);
    }

    #[test]
    fn config_file_values_used_without_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file(dir.path(), "[output]\njson = \"from_config.json\"\npretty = true\n");

        let mut o = opts();
        o.config = Some(path);
        let config = effective_config(&o).unwrap();
        assert_eq!(config.output.json, PathBuf::from("from_config.json"));
        assert!(config.output.pretty);
    }

    #[test]
    fn bad_url_flag_is_usage_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut o = opts();
        o.config = Some(config_file(dir.path(), ""));
        o.url = Some("file:///etc/passwd".into());
        let err = effective_config(&o).unwrap_err();
        assert_eq!(err.code, EXIT_USAGE);
    }

    #[test]
    fn invalid_config_file_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let mut o = opts();
        o.config = Some(config_file(dir.path(), "[source]\ntimeout_secs = 0\n"));
        let err = effective_config(&o).unwrap_err();
        assert_eq!(err.code, EXIT_CONFIG_INVALID);
    }

    #[test]
    fn missing_input_file_is_usage_error() {
        let err = read_feed(Some(Path::new("/nonexistent/feed.csv")), &OrbitmapConfig::default()).unwrap_err();
        assert_eq!(err.code, EXIT_USAGE);
    }
}
