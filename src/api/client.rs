use crate::config::Config;
use crate::error::AppError;
use governor::clock::{Clock, DefaultClock};
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use serde_json::Value;
use std::num::NonZeroU32;
use std::thread;
use std::time::Duration;

use super::endpoints::USER_AGENT;
use super::models::AiRequest;

const MAX_RETRIES: u32 = 2;
const RETRY_BACKOFF_MS: u64 = 1000;
const REQUESTS_PER_SECOND: u32 = 5;

/// The generative backend, seen as a black box: one JSON request in, one
/// JSON document (or an error) out.
pub trait AiBackend {
    fn invoke(&self, request: &AiRequest) -> Result<Value, AppError>;
}

pub struct ScoutAiClient {
    url: String,
    api_key: Option<String>,
    agent: ureq::Agent,
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    clock: DefaultClock,
}

impl ScoutAiClient {
    pub fn new(url: &str, api_key: Option<String>, timeout: Duration) -> Self {
        let per_second = NonZeroU32::new(REQUESTS_PER_SECOND).unwrap_or(NonZeroU32::MIN);
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build();

        ScoutAiClient {
            url: url.to_string(),
            api_key,
            agent,
            rate_limiter: RateLimiter::direct(Quota::per_second(per_second)),
            clock: DefaultClock::default(),
        }
    }

    /// `None` when no service URL is configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        config
            .ai_url
            .as_deref()
            .map(|url| ScoutAiClient::new(url, config.ai_key.clone(), config.ai_timeout))
    }

    fn throttle(&self) {
        while let Err(not_until) = self.rate_limiter.check() {
            thread::sleep(not_until.wait_time_from(self.clock.now()));
        }
    }

    fn execute_request(&self, request: &AiRequest) -> Result<Value, AppError> {
        let mut retry_count = 0;

        loop {
            self.throttle();

            let mut call = self.agent.post(&self.url);
            if let Some(key) = &self.api_key {
                call = call.set("Authorization", &format!("Bearer {}", key));
            }

            match call.send_json(request) {
                Ok(resp) => {
                    return resp
                        .into_json::<Value>()
                        .map_err(|e| AppError::JsonError(e.to_string()));
                }
                Err(ureq::Error::Status(429, _)) => {
                    if retry_count >= MAX_RETRIES {
                        return Err(AppError::RateLimited);
                    }
                    let wait_ms = RETRY_BACKOFF_MS * u64::from(retry_count + 1);
                    tracing::warn!(action = request.action(), wait_ms, "scout AI rate limited, retrying");
                    thread::sleep(Duration::from_millis(wait_ms));
                    retry_count += 1;
                }
                Err(ureq::Error::Status(code, resp)) => {
                    let body = resp.into_string().unwrap_or_default();
                    return Err(classify_status(code, &body));
                }
                Err(e) => {
                    return Err(AppError::HttpError(e.to_string()));
                }
            }
        }
    }
}

impl AiBackend for ScoutAiClient {
    fn invoke(&self, request: &AiRequest) -> Result<Value, AppError> {
        tracing::debug!(action = request.action(), url = %self.url, "calling scout AI service");
        self.execute_request(request)
    }
}

// An exhausted quota is reported as a normal error body by most providers.
fn classify_status(code: u16, body: &str) -> AppError {
    if body.contains("insufficient_quota") || body.contains("exceeded your current quota") {
        return AppError::RateLimited;
    }

    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message").or(Some(e)))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("status {}", code));

    AppError::ApiError(message)
}
