//! CLI runner - executes commands

use crate::auth::LoginConfig;
use crate::cli::commands::{Cli, Commands, FetchArgs, OutputFormat};
use crate::config::{FetchConfig, JobConfig};
use crate::engine::{FetchData, FetchEngine, FetchReport};
use crate::error::{Error, Result};
use crate::http::RateLimiterConfig;
use crate::progress::LogProgress;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Fetch(args) => self.fetch(args).await,
            Commands::Run { job } => self.run_job(job).await,
        }
    }

    /// Execute a fetch described by command-line flags
    async fn fetch(&self, args: &FetchArgs) -> Result<()> {
        let params = parse_key_values(&args.params, "param")?;
        let config = build_config(args)?;

        let engine =
            FetchEngine::new(config)?.with_progress(Arc::new(LogProgress::default()));
        let report = engine.fetch_all_pages(&args.url, &params, args.flatten).await?;

        self.print_report(&report)
    }

    /// Execute a fetch described by a YAML job file
    async fn run_job(&self, path: &Path) -> Result<()> {
        let job = JobConfig::from_path(path)?;
        let config = job.to_fetch_config()?;

        let engine =
            FetchEngine::new(config)?.with_progress(Arc::new(LogProgress::default()));
        let report = engine
            .fetch_all_pages(&job.url, &job.params, job.flatten)
            .await?;

        self.print_report(&report)
    }

    /// Print the fetch result in the selected format
    fn print_report(&self, report: &FetchReport) -> Result<()> {
        match self.cli.format {
            OutputFormat::Json => match &report.data {
                FetchData::Records(records) => {
                    for record in records {
                        println!("{}", serde_json::to_string(record)?);
                    }
                }
                FetchData::Raw(body) => println!("{}", serde_json::to_string(body)?),
            },
            OutputFormat::Pretty => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&report.data.clone().into_value())?
                );
                let stats = &report.stats;
                eprintln!(
                    "Fetched {} of {} records across {}/{} pages in {}ms",
                    stats.records_fetched,
                    stats.records_expected,
                    stats.pages_fetched,
                    stats.pages_planned,
                    stats.duration_ms
                );
                if !stats.is_complete() {
                    eprintln!(
                        "Warning: {} records missing ({} pages dropped)",
                        stats.shortfall(),
                        stats.pages_failed
                    );
                }
            }
        }
        Ok(())
    }
}

/// Translate fetch flags into an engine config
fn build_config(args: &FetchArgs) -> Result<FetchConfig> {
    let mut builder = FetchConfig::builder()
        .current_page_field(args.page_field.clone())
        .start_index_field(args.start_index_field.clone())
        .per_page_field(args.per_page_field.clone())
        .total_count_field(args.total_field.clone())
        .data_field(args.data_field.clone())
        .max_concurrency(args.concurrency)
        .retry(args.retry)
        .retry_delay(Duration::from_secs(args.retry_delay))
        .timeout(Duration::from_secs(args.timeout))
        .download_one_page_only(args.one_page)
        .verify_ssl(!args.no_verify_ssl);

    if let Some(per_page) = args.per_page {
        builder = builder.per_page(per_page);
    }
    for (key, value) in parse_key_values(&args.headers, "header")? {
        builder = builder.header(key, value);
    }
    if let Some(login_url) = &args.login_url {
        let auth_data = args
            .auth_data
            .as_deref()
            .ok_or_else(|| Error::missing_field("auth-data"))?;
        let payload = serde_json::from_str(auth_data)?;
        builder = builder.login(LoginConfig::new(login_url, payload));
    }
    if let Some(raw) = &args.rate_limit {
        builder = builder.rate_limit(parse_rate_limit(raw)?);
    }

    builder.build()
}

/// Parse repeated KEY=VALUE flags into a map
fn parse_key_values(pairs: &[String], flag: &str) -> Result<HashMap<String, String>> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .ok_or_else(|| {
                    Error::invalid_value(flag, format!("expected KEY=VALUE, got '{pair}'"))
                })
        })
        .collect()
}

/// Parse a CALLS/SECONDS rate limit flag
fn parse_rate_limit(raw: &str) -> Result<RateLimiterConfig> {
    let invalid =
        || Error::invalid_value("rate-limit", format!("expected CALLS/SECONDS, got '{raw}'"));

    let (calls, secs) = raw.split_once('/').ok_or_else(invalid)?;
    let calls: u32 = calls.parse().map_err(|_| invalid())?;
    let secs: u64 = secs.parse().map_err(|_| invalid())?;
    if calls == 0 || secs == 0 {
        return Err(invalid());
    }

    Ok(RateLimiterConfig::new(calls, Duration::from_secs(secs)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn fetch_args(argv: &[&str]) -> FetchArgs {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Commands::Fetch(args) => args,
            Commands::Run { .. } => panic!("expected fetch subcommand"),
        }
    }

    #[test]
    fn test_parse_key_values() {
        let pairs = vec!["a=1".to_string(), "b=two".to_string()];
        let map = parse_key_values(&pairs, "param").unwrap();
        assert_eq!(map.get("a"), Some(&"1".to_string()));
        assert_eq!(map.get("b"), Some(&"two".to_string()));

        let bad = vec!["no-equals".to_string()];
        assert!(parse_key_values(&bad, "param").is_err());
    }

    #[test]
    fn test_parse_rate_limit() {
        let limit = parse_rate_limit("10/1").unwrap();
        assert_eq!(limit.calls, 10);
        assert_eq!(limit.period, Duration::from_secs(1));

        assert!(parse_rate_limit("10").is_err());
        assert!(parse_rate_limit("x/1").is_err());
        assert!(parse_rate_limit("0/1").is_err());
    }

    #[test]
    fn test_build_config_from_flags() {
        let args = fetch_args(&[
            "pagefetch",
            "fetch",
            "https://api.example.com/users",
            "--page-field",
            "p",
            "--data-field",
            "results",
            "--per-page",
            "100",
            "-j",
            "8",
            "--retry",
            "3",
            "--one-page",
            "--no-verify-ssl",
            "-H",
            "X-Env=staging",
        ]);

        let config = build_config(&args).unwrap();
        assert_eq!(config.current_page_field.as_deref(), Some("p"));
        assert_eq!(config.data_field.as_deref(), Some("results"));
        assert_eq!(config.per_page, Some(100));
        assert_eq!(config.max_concurrency, 8);
        assert_eq!(config.retry, 3);
        assert!(config.download_one_page_only);
        assert!(!config.verify_ssl);
        assert_eq!(
            config.default_headers.get("X-Env"),
            Some(&"staging".to_string())
        );
    }

    #[test]
    fn test_build_config_empty_field_disables() {
        let args = fetch_args(&[
            "pagefetch",
            "fetch",
            "https://api.example.com/users",
            "--data-field",
            "",
        ]);

        let config = build_config(&args).unwrap();
        assert!(config.data_field.is_none());
    }

    #[test]
    fn test_build_config_login_requires_auth_data() {
        let args = fetch_args(&[
            "pagefetch",
            "fetch",
            "https://api.example.com/users",
            "--login-url",
            "https://api.example.com/login",
        ]);

        assert!(matches!(
            build_config(&args),
            Err(Error::MissingConfigField { .. })
        ));
    }

    #[test]
    fn test_build_config_with_login() {
        let args = fetch_args(&[
            "pagefetch",
            "fetch",
            "https://api.example.com/users",
            "--login-url",
            "https://api.example.com/login",
            "--auth-data",
            r#"{"email":"a@b.c","password":"secret"}"#,
        ]);

        let config = build_config(&args).unwrap();
        let login = config.login.expect("login configured");
        assert_eq!(login.url, "https://api.example.com/login");
        assert_eq!(login.payload["email"], "a@b.c");
    }
}
