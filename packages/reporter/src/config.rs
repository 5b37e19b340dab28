//! Application configuration loaded from environment variables.

use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

use report::MergePolicy;

/// Default cron schedule: every Monday at 10:00 UTC.
const DEFAULT_SCHEDULE: &str = "0 0 10 * * MON";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_model: String,
    pub github_token: String,
    pub github_repo: String,
    pub report_path: String,
    pub schedule: String,
    pub merge_policy: MergePolicy,
    pub societies: Vec<String>,
    pub mail: Option<MailConfig>,
}

/// SMTP settings for the report digest; absent when SMTP_HOST is unset.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
    pub to: String,
    pub subject: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let merge_policy = env::var("MERGE_POLICY")
            .unwrap_or_else(|_| "average".to_string())
            .parse::<MergePolicy>()
            .map_err(|e| anyhow::anyhow!(e))
            .context("MERGE_POLICY is invalid")?;

        let societies = match env::var("SOCIETIES") {
            Ok(raw) => raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            Err(_) => default_societies(),
        };

        Ok(Self {
            openai_api_key: env::var("OPENAI_API_KEY")
                .context("OPENAI_API_KEY must be set")?,
            openai_model: env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            github_token: env::var("GITHUB_TOKEN")
                .context("GITHUB_TOKEN must be set")?,
            github_repo: env::var("GITHUB_REPO")
                .context("GITHUB_REPO must be set (owner/name)")?,
            report_path: env::var("REPORT_PATH")
                .unwrap_or_else(|_| "Pharma_Society_Report.csv".to_string()),
            schedule: env::var("REPORT_SCHEDULE")
                .unwrap_or_else(|_| DEFAULT_SCHEDULE.to_string()),
            merge_policy,
            societies,
            mail: MailConfig::from_env()?,
        })
    }
}

impl MailConfig {
    fn from_env() -> Result<Option<Self>> {
        let Ok(smtp_host) = env::var("SMTP_HOST") else {
            return Ok(None);
        };

        Ok(Some(Self {
            smtp_host,
            smtp_port: env::var("SMTP_PORT")
                .unwrap_or_else(|_| "587".to_string())
                .parse()
                .context("SMTP_PORT must be a valid port number")?,
            username: env::var("SMTP_USERNAME").context("SMTP_USERNAME must be set")?,
            password: env::var("SMTP_PASSWORD").context("SMTP_PASSWORD must be set")?,
            from: env::var("MAIL_FROM").context("MAIL_FROM must be set")?,
            to: env::var("MAIL_TO").context("MAIL_TO must be set")?,
            subject: env::var("MAIL_SUBJECT")
                .unwrap_or_else(|_| "Consolidated Pharma Society Report".to_string()),
        }))
    }
}

/// The society roster used when SOCIETIES is not configured.
pub fn default_societies() -> Vec<String> {
    [
        "FLASCO (Florida Society of Clinical Oncology)",
        "GASCO (Georgia Society of Clinical Oncology)",
        "IOS (Indiana Oncology Society)",
        "IOWA Oncology Society",
        "MOASC (Medical Oncology Association of Southern California)",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
