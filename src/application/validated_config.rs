use crate::infrastructure::browser::LaunchOptions;
use crate::infrastructure::config::AppConfig;
use std::path::PathBuf;
use std::time::Duration;

/// Fetch settings derived once from `AppConfig`.
///
/// Values are clamped into usable ranges and converted to `Duration`s, so
/// the fetch engine and page aggregator never re-read raw configuration.
#[derive(Debug, Clone)]
pub struct ValidatedFetchConfig {
    pub headless: bool,
    /// Total attempts per fetch, at least 1
    pub attempts: u32,
    pub navigation_timeout: Duration,
    /// Sleep after readiness, before capture
    pub grace_period: Duration,
    pub user_agent: String,
    pub listing_retry_delay: Duration,
    pub detail_retry_delay: Duration,
    /// Selector whose presence marks a rendered detail page
    pub content_marker: String,
    pub content_marker_timeout: Duration,
    pub min_document_length: usize,
    pub browser_args: Vec<String>,
}

impl ValidatedFetchConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        let scraper = &config.scraper;
        Self {
            headless: scraper.headless,
            attempts: scraper.retries.max(1),
            navigation_timeout: Duration::from_millis(scraper.pw_timeout.max(1000)),
            grace_period: seconds(scraper.wait_after_idle),
            user_agent: scraper.user_agent.clone(),
            listing_retry_delay: seconds(scraper.delay),
            detail_retry_delay: seconds(scraper.detail_retry_delay),
            content_marker: config.parsing.detail.name.clone(),
            content_marker_timeout: Duration::from_millis(scraper.content_marker_timeout),
            min_document_length: scraper.min_document_length.max(1),
            browser_args: scraper.browser_args.clone(),
        }
    }

    pub fn launch_options(&self) -> LaunchOptions {
        LaunchOptions {
            headless: self.headless,
            user_agent: self.user_agent.clone(),
            request_timeout: self.navigation_timeout,
            extra_args: self.browser_args.clone(),
        }
    }
}

impl Default for ValidatedFetchConfig {
    fn default() -> Self {
        Self::from_app_config(&AppConfig::default())
    }
}

/// Run-level settings for the catalog and detail passes
#[derive(Debug, Clone)]
pub struct ValidatedRunConfig {
    pub listing_url: String,
    pub catalog_file: PathBuf,
    pub output_dir: PathBuf,
    pub snapshot_dir: Option<PathBuf>,
    pub politeness_delay: Duration,
}

impl ValidatedRunConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        let run = &config.run;
        Self {
            listing_url: run.listing_url.clone(),
            catalog_file: run.catalog_file.clone(),
            output_dir: run.output_dir.clone(),
            snapshot_dir: run.snapshot_dir.clone(),
            politeness_delay: seconds(run.politeness_delay),
        }
    }
}

/// Negative, non-finite or unrepresentable values collapse to zero
fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_convert_to_durations() {
        let config = ValidatedFetchConfig::default();
        assert_eq!(config.attempts, 2);
        assert_eq!(config.navigation_timeout, Duration::from_secs(60));
        assert_eq!(config.grace_period, Duration::from_secs(1));
        assert_eq!(config.listing_retry_delay, Duration::from_secs(2));
        assert_eq!(config.content_marker_timeout, Duration::from_millis(8000));
        assert_eq!(config.content_marker, "h1.font-logo");
    }

    #[test]
    fn test_values_are_clamped() {
        let mut app = AppConfig::default();
        app.scraper.retries = 0;
        app.scraper.pw_timeout = 10;
        app.scraper.wait_after_idle = -3.0;

        let config = ValidatedFetchConfig::from_app_config(&app);
        assert_eq!(config.attempts, 1);
        assert_eq!(config.navigation_timeout, Duration::from_secs(1));
        assert_eq!(config.grace_period, Duration::ZERO);
    }

    #[test]
    fn test_unrepresentable_seconds_collapse_to_zero() {
        let mut app = AppConfig::default();
        app.run.politeness_delay = 1e20;
        app.scraper.delay = f64::INFINITY;

        assert_eq!(ValidatedRunConfig::from_app_config(&app).politeness_delay, Duration::ZERO);
        assert_eq!(ValidatedFetchConfig::from_app_config(&app).listing_retry_delay, Duration::ZERO);
    }

    #[test]
    fn test_run_config_politeness() {
        let run = ValidatedRunConfig::from_app_config(&AppConfig::default());
        assert_eq!(run.politeness_delay, Duration::from_millis(500));
    }
}
