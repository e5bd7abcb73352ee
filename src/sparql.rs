use std::collections::HashMap;
use std::thread;
use std::time::Duration;

use log::warn;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde::Deserialize;

use crate::config::HarvestConfig;
use crate::error::QueryError;

/// One cell of a result row. Only `value` matters here; datatype and language
/// tags are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct SparqlValue {
    pub value: String,
}

/// A raw result row: variable name -> value object.
pub type RawRow = HashMap<String, SparqlValue>;

#[derive(Debug, Deserialize)]
struct SparqlResponse {
    results: SparqlResults,
}

#[derive(Debug, Deserialize)]
struct SparqlResults {
    bindings: Vec<RawRow>,
}

/// Classified outcome of one request attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOutcome {
    Success,
    RateLimited,
    ServerError(u16),
    TimedOut,
    ConnectionError,
}

/// Which retryable condition a wait belongs to. Rate limiting sleeps a fixed
/// cooldown; server errors and timeouts scale linearly with the backoff step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryKind {
    RateLimit,
    ServerError,
    Timeout,
}

/// Backoff duration as a pure function of (base cooldown, backoff step, kind).
pub fn backoff_delay(cooldown: Duration, step: u32, kind: RetryKind) -> Duration {
    match kind {
        RetryKind::RateLimit => cooldown,
        RetryKind::ServerError | RetryKind::Timeout => cooldown * step,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    Attempting,
    WaitingRateLimit(Duration),
    WaitingServerError(Duration),
    WaitingTimeout(Duration),
    Exhausted(u32),
    Succeeded,
}

/// Retry state machine for a single query. Purely computational: the caller
/// sleeps out the waiting states and calls `resume` before the next attempt.
///
/// Rate-limit retries consume the shared attempt budget but do not advance
/// the backoff step, so a 429 in between does not inflate later server-error
/// waits.
#[derive(Debug)]
pub struct RetrySchedule {
    cooldown: Duration,
    max_attempts: u32,
    attempts: u32,
    backoff_step: u32,
    state: RetryState,
}

impl RetrySchedule {
    pub fn new(cooldown: Duration, max_attempts: u32) -> Self {
        RetrySchedule {
            cooldown,
            max_attempts,
            attempts: 0,
            backoff_step: 0,
            state: RetryState::Attempting,
        }
    }

    /// Feed the classified outcome of the attempt just made; returns the new
    /// state (a waiting state with its delay, Exhausted, or Succeeded).
    pub fn observe(&mut self, outcome: QueryOutcome) -> RetryState {
        match outcome {
            QueryOutcome::Success => self.state = RetryState::Succeeded,
            QueryOutcome::RateLimited => self.record_failure(RetryKind::RateLimit),
            QueryOutcome::ServerError(_) => self.record_failure(RetryKind::ServerError),
            QueryOutcome::TimedOut | QueryOutcome::ConnectionError => {
                self.record_failure(RetryKind::Timeout)
            }
        }
        self.state
    }

    /// Back to Attempting once the caller has slept out a waiting state.
    pub fn resume(&mut self) {
        self.state = RetryState::Attempting;
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    fn record_failure(&mut self, kind: RetryKind) {
        self.attempts += 1;
        if self.attempts >= self.max_attempts {
            self.state = RetryState::Exhausted(self.attempts);
            return;
        }
        match kind {
            RetryKind::RateLimit => {
                self.state = RetryState::WaitingRateLimit(backoff_delay(
                    self.cooldown,
                    self.backoff_step,
                    kind,
                ));
            }
            RetryKind::ServerError => {
                self.backoff_step += 1;
                self.state = RetryState::WaitingServerError(backoff_delay(
                    self.cooldown,
                    self.backoff_step,
                    kind,
                ));
            }
            RetryKind::Timeout => {
                self.backoff_step += 1;
                self.state = RetryState::WaitingTimeout(backoff_delay(
                    self.cooldown,
                    self.backoff_step,
                    kind,
                ));
            }
        }
    }
}

/// Retryable classification of a non-2xx status. None means the status is a
/// caller defect and fails immediately.
pub(crate) fn classify_status(status: u16) -> Option<QueryOutcome> {
    match status {
        429 => Some(QueryOutcome::RateLimited),
        500 | 502 | 503 | 504 => Some(QueryOutcome::ServerError(status)),
        _ => None,
    }
}

fn classify_request_error(err: &reqwest::Error) -> QueryOutcome {
    if err.is_timeout() {
        QueryOutcome::TimedOut
    } else {
        QueryOutcome::ConnectionError
    }
}

/// Seam between the harvester and the network.
pub trait QueryExecutor {
    fn execute(&self, query: &str) -> Result<Vec<RawRow>, QueryError>;
}

/// Blocking SPARQL client with bounded retry/backoff.
pub struct SparqlClient {
    client: Client,
    endpoint: String,
    cooldown: Duration,
    max_retries: u32,
}

impl SparqlClient {
    pub fn new(config: &HarvestConfig) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/sparql-results+json"),
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).expect("Invalid user agent"),
        );

        let client = Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        SparqlClient {
            client,
            endpoint: config.endpoint.clone(),
            cooldown: config.retry_cooldown,
            max_retries: config.max_retries,
        }
    }
}

impl QueryExecutor for SparqlClient {
    fn execute(&self, query: &str) -> Result<Vec<RawRow>, QueryError> {
        let mut schedule = RetrySchedule::new(self.cooldown, self.max_retries);

        loop {
            let outcome = match self
                .client
                .post(&self.endpoint)
                .form(&[("query", query)])
                .send()
            {
                Ok(resp) => {
                    let status = resp.status().as_u16();
                    if resp.status().is_success() {
                        match resp.text() {
                            Ok(body) => {
                                let envelope: SparqlResponse = serde_json::from_str(&body)?;
                                return Ok(envelope.results.bindings);
                            }
                            Err(e) => {
                                warn!("Failed to read response body: {}", e);
                                classify_request_error(&e)
                            }
                        }
                    } else {
                        match classify_status(status) {
                            Some(outcome) => outcome,
                            None => return Err(QueryError::Http { status }),
                        }
                    }
                }
                Err(e) => {
                    warn!("Request error: {}", e);
                    classify_request_error(&e)
                }
            };

            match schedule.observe(outcome) {
                RetryState::WaitingRateLimit(delay) => {
                    warn!("Rate limited. Sleeping {}s...", delay.as_secs());
                    thread::sleep(delay);
                    schedule.resume();
                }
                RetryState::WaitingServerError(delay) => {
                    if let QueryOutcome::ServerError(code) = outcome {
                        warn!("Server error ({}). Retrying in {}s...", code, delay.as_secs());
                    }
                    thread::sleep(delay);
                    schedule.resume();
                }
                RetryState::WaitingTimeout(delay) => {
                    warn!(
                        "Attempt {}/{} failed. Retrying in {}s...",
                        schedule.attempts(),
                        self.max_retries,
                        delay.as_secs()
                    );
                    thread::sleep(delay);
                    schedule.resume();
                }
                RetryState::Exhausted(attempts) => {
                    return Err(QueryError::RetriesExhausted { attempts });
                }
                // Success returns above; observe never yields these here.
                RetryState::Attempting | RetryState::Succeeded => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COOLDOWN: Duration = Duration::from_secs(30);

    #[test]
    fn consecutive_server_errors_back_off_linearly() {
        let mut schedule = RetrySchedule::new(COOLDOWN, 5);

        assert_eq!(
            schedule.observe(QueryOutcome::ServerError(503)),
            RetryState::WaitingServerError(COOLDOWN)
        );
        schedule.resume();
        assert_eq!(
            schedule.observe(QueryOutcome::ServerError(503)),
            RetryState::WaitingServerError(COOLDOWN * 2)
        );
        schedule.resume();
        assert_eq!(
            schedule.observe(QueryOutcome::ServerError(503)),
            RetryState::WaitingServerError(COOLDOWN * 3)
        );
        schedule.resume();
        assert_eq!(schedule.observe(QueryOutcome::Success), RetryState::Succeeded);
        assert_eq!(schedule.attempts(), 3);
    }

    #[test]
    fn rate_limit_sleeps_fixed_cooldown_without_scaling() {
        let mut schedule = RetrySchedule::new(COOLDOWN, 5);

        assert_eq!(
            schedule.observe(QueryOutcome::RateLimited),
            RetryState::WaitingRateLimit(COOLDOWN)
        );
        schedule.resume();
        assert_eq!(
            schedule.observe(QueryOutcome::RateLimited),
            RetryState::WaitingRateLimit(COOLDOWN)
        );
        schedule.resume();

        // The two 429 waits must not have advanced the backoff step.
        assert_eq!(
            schedule.observe(QueryOutcome::ServerError(500)),
            RetryState::WaitingServerError(COOLDOWN)
        );
    }

    #[test]
    fn timeouts_share_the_linear_backoff() {
        let mut schedule = RetrySchedule::new(COOLDOWN, 5);

        assert_eq!(
            schedule.observe(QueryOutcome::TimedOut),
            RetryState::WaitingTimeout(COOLDOWN)
        );
        schedule.resume();
        assert_eq!(
            schedule.observe(QueryOutcome::ConnectionError),
            RetryState::WaitingTimeout(COOLDOWN * 2)
        );
    }

    #[test]
    fn budget_exhausts_after_max_attempts() {
        let mut schedule = RetrySchedule::new(COOLDOWN, 5);

        for _ in 0..4 {
            match schedule.observe(QueryOutcome::TimedOut) {
                RetryState::WaitingTimeout(_) => schedule.resume(),
                other => panic!("unexpected state: {:?}", other),
            }
        }
        // Fifth failure ends the query with no further wait.
        assert_eq!(
            schedule.observe(QueryOutcome::TimedOut),
            RetryState::Exhausted(5)
        );
    }

    #[test]
    fn mixed_conditions_share_one_budget() {
        let mut schedule = RetrySchedule::new(COOLDOWN, 5);

        schedule.observe(QueryOutcome::RateLimited);
        schedule.resume();
        schedule.observe(QueryOutcome::ServerError(502));
        schedule.resume();
        schedule.observe(QueryOutcome::TimedOut);
        schedule.resume();
        schedule.observe(QueryOutcome::RateLimited);
        schedule.resume();
        assert_eq!(
            schedule.observe(QueryOutcome::ServerError(500)),
            RetryState::Exhausted(5)
        );
    }

    #[test]
    fn backoff_delay_is_pure_and_kind_aware() {
        assert_eq!(
            backoff_delay(COOLDOWN, 3, RetryKind::RateLimit),
            COOLDOWN
        );
        assert_eq!(
            backoff_delay(COOLDOWN, 3, RetryKind::ServerError),
            COOLDOWN * 3
        );
        assert_eq!(backoff_delay(COOLDOWN, 2, RetryKind::Timeout), COOLDOWN * 2);
    }

    #[test]
    fn not_found_is_not_retryable() {
        assert_eq!(classify_status(404), None);
        assert_eq!(classify_status(400), None);
        assert_eq!(classify_status(403), None);
    }

    #[test]
    fn retryable_statuses_classify() {
        assert_eq!(classify_status(429), Some(QueryOutcome::RateLimited));
        assert_eq!(classify_status(500), Some(QueryOutcome::ServerError(500)));
        assert_eq!(classify_status(502), Some(QueryOutcome::ServerError(502)));
        assert_eq!(classify_status(503), Some(QueryOutcome::ServerError(503)));
        assert_eq!(classify_status(504), Some(QueryOutcome::ServerError(504)));
    }

    #[test]
    fn parses_results_envelope() {
        let body = r#"{
            "head": {"vars": ["painterLabel", "coords"]},
            "results": {"bindings": [
                {"painterLabel": {"type": "literal", "value": "Claude Monet"},
                 "coords": {"type": "literal", "value": "Point(2.33 48.86)"}},
                {"painterLabel": {"type": "literal", "value": "Vincent van Gogh"}}
            ]}
        }"#;

        let envelope: SparqlResponse = serde_json::from_str(body).unwrap();
        let rows = envelope.results.bindings;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["painterLabel"].value, "Claude Monet");
        assert_eq!(rows[0]["coords"].value, "Point(2.33 48.86)");
        assert!(rows[1].get("coords").is_none());
    }

    #[test]
    fn empty_bindings_parse_to_empty_row_list() {
        let body = r#"{"head": {"vars": []}, "results": {"bindings": []}}"#;
        let envelope: SparqlResponse = serde_json::from_str(body).unwrap();
        assert!(envelope.results.bindings.is_empty());
    }
}
