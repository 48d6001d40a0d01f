//! Feed download with retry / backoff / error classification.
//!
//! The feed body is kept in memory and handed straight to the engine;
//! nothing is written to disk.

use std::thread;
use std::time::Duration;

use crate::config::SourceConfig;
use crate::exit_codes;
use crate::CliError;

// ── Constants ───────────────────────────────────────────────────────

const USER_AGENT: &str = concat!("orbitmap/", env!("CARGO_PKG_VERSION"));
const ERROR_BODY_PREVIEW: usize = 200;

// ── FeedClient ──────────────────────────────────────────────────────

pub struct FeedClient {
    http: reqwest::blocking::Client,
    url: String,
    max_retries: u32,
    initial_backoff: Duration,
}

impl FeedClient {
    pub fn new(source: &SourceConfig) -> Result<Self, CliError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(source.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CliError {
                code: exit_codes::EXIT_ERROR,
                message: format!("failed to build HTTP client: {e}"),
                hint: None,
            })?;

        Ok(Self {
            http,
            url: source.url.clone(),
            max_retries: source.max_retries,
            initial_backoff: Duration::from_secs(1),
        })
    }

    /// Override the first retry delay (doubles on each further retry).
    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// GET the feed as text.
    ///
    /// 429, 5xx and transport errors are retried with exponential backoff
    /// (honouring `Retry-After` on 429). Any other non-success status
    /// fails immediately.
    pub fn fetch_csv(&self) -> Result<String, CliError> {
        let mut backoff = self.initial_backoff;

        for attempt in 0..=self.max_retries {
            match self.http.get(&self.url).send() {
                Ok(resp) => {
                    let status = resp.status().as_u16();

                    // Retryable: 429, 5xx
                    if status == 429 || status >= 500 {
                        if attempt == self.max_retries {
                            let (code, what) = if status == 429 {
                                (exit_codes::EXIT_FETCH_RATE_LIMIT, "rate limited")
                            } else {
                                (exit_codes::EXIT_FETCH_UPSTREAM, "upstream error")
                            };
                            return Err(CliError {
                                code,
                                message: format!(
                                    "feed {what} after {} attempts (HTTP {status})",
                                    attempt + 1,
                                ),
                                hint: None,
                            });
                        }

                        let wait = if status == 429 {
                            resp.headers()
                                .get("retry-after")
                                .and_then(|v| v.to_str().ok())
                                .and_then(|v| v.trim().parse::<u64>().ok())
                                .map(Duration::from_secs)
                                .unwrap_or(backoff)
                        } else {
                            backoff
                        };

                        log::warn!(
                            "retry {}/{} in {:?} (HTTP {})",
                            attempt + 1,
                            self.max_retries,
                            wait,
                            status,
                        );
                        thread::sleep(wait);
                        backoff *= 2;
                        continue;
                    }

                    // Everything else that is not 2xx: fail immediately
                    if !resp.status().is_success() {
                        let body = resp.text().unwrap_or_default();
                        return Err(CliError {
                            code: exit_codes::EXIT_FETCH_REJECTED,
                            message: format!(
                                "feed request rejected (HTTP {status}): {}",
                                preview(&body),
                            ),
                            hint: Some(format!("check the feed url: {}", self.url)),
                        });
                    }

                    let text = resp.text().map_err(|e| CliError {
                        code: exit_codes::EXIT_FETCH_UPSTREAM,
                        message: format!("failed to read feed body: {e}"),
                        hint: None,
                    })?;
                    log::info!("downloaded {} bytes from {}", text.len(), self.url);
                    return Ok(text.trim_start_matches('\u{feff}').to_string());
                }
                Err(e) => {
                    // Network/timeout errors: retry
                    if attempt == self.max_retries {
                        return Err(CliError {
                            code: exit_codes::EXIT_FETCH_UPSTREAM,
                            message: format!(
                                "feed unreachable after {} attempts: {e}",
                                attempt + 1,
                            ),
                            hint: None,
                        });
                    }

                    log::warn!(
                        "retry {}/{} in {:?} ({})",
                        attempt + 1,
                        self.max_retries,
                        backoff,
                        e,
                    );
                    thread::sleep(backoff);
                    backoff *= 2;
                }
            }
        }

        unreachable!()
    }
}

fn preview(body: &str) -> &str {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(ERROR_BODY_PREVIEW) {
        Some((idx, _)) => &trimmed[..idx],
        None => trimmed,
    }
}
