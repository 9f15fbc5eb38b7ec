use crate::error::{Result, ScanError};
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::{Client, Method, Response};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Maximum redirect hops followed before a fetch is abandoned.
pub const MAX_REDIRECT_HOPS: usize = 5;

/// Outcome of a full page fetch. Transport failures are carried in the
/// value; this type never surfaces as an error to the scheduler.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub success: bool,
    pub content: Option<String>,
    pub status_code: Option<u16>,
    pub content_type: Option<String>,
}

impl FetchOutcome {
    pub fn failed() -> Self {
        Self {
            success: false,
            content: None,
            status_code: None,
            content_type: None,
        }
    }
}

/// Outcome of a lightweight existence probe (HEAD request).
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    pub success: bool,
    pub status_code: Option<u16>,
}

/// Redirect hops walked while resolving a URL.
#[derive(Debug, Clone)]
pub struct RedirectTrace {
    pub final_url: String,
    pub status: u16,
    pub chain: Vec<String>,
}

/// HTTP access used by the crawler. Redirects are followed with an
/// explicit bounded loop rather than the client's built-in policy, so the
/// hop chain is available to callers.
#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new() -> Self {
        Self::with_timeout(10)
    }

    pub fn with_timeout(timeout_secs: u64) -> Self {
        let client = Client::builder()
            .user_agent("Sitegraph/0.1 (https://github.com/sitegraph/sitegraph)")
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs / 2))
            .pool_max_idle_per_host(50)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Fetch a page body. Never errors; transport and HTTP failures come
    /// back as `success: false`.
    pub async fn fetch(&self, url: &str) -> FetchOutcome {
        match self.try_fetch(url).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Fetch failed for {}: {}", url, e);
                FetchOutcome::failed()
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> Result<FetchOutcome> {
        let (response, trace) = self.follow(Method::GET, url).await?;
        if !trace.chain.is_empty() {
            debug!(
                "{} resolved through {} redirect hop(s) to {}",
                url,
                trace.chain.len(),
                trace.final_url
            );
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let success = (200..300).contains(&trace.status);
        let content = if success {
            Some(response.text().await?)
        } else {
            None
        };

        Ok(FetchOutcome {
            success,
            content,
            status_code: Some(trace.status),
            content_type,
        })
    }

    /// Cheap existence check against a URL. Redirects are followed the
    /// same way as for a full fetch; the body is never read.
    pub async fn probe(&self, url: &str) -> ProbeOutcome {
        match self.follow(Method::HEAD, url).await {
            Ok((_, trace)) => ProbeOutcome {
                success: trace.status < 400,
                status_code: Some(trace.status),
            },
            Err(e) => {
                warn!("Probe failed for {}: {}", url, e);
                ProbeOutcome {
                    success: false,
                    status_code: None,
                }
            }
        }
    }

    /// Issue a request and walk redirects with a bounded loop, collecting
    /// the hop chain. An unparsable Location header ends the walk with the
    /// redirect response itself as the final one.
    async fn follow(&self, method: Method, url: &str) -> Result<(Response, RedirectTrace)> {
        let mut current = url.to_string();
        let mut chain = Vec::new();

        for _ in 0..=MAX_REDIRECT_HOPS {
            let response = self.client.request(method.clone(), &current).send().await?;
            let status = response.status().as_u16();

            let next = if response.status().is_redirection() {
                response
                    .headers()
                    .get(LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|loc| Url::parse(&current).ok()?.join(loc).ok())
            } else {
                None
            };

            match next {
                Some(next_url) => {
                    debug!("Redirect {} -> {}", current, next_url);
                    chain.push(current.clone());
                    current = next_url.to_string();
                }
                None => {
                    let trace = RedirectTrace {
                        final_url: current,
                        status,
                        chain,
                    };
                    return Ok((response, trace));
                }
            }
        }

        Err(ScanError::RedirectLimit(url.to_string()))
    }
}

impl Default for PageFetcher {
    fn default() -> Self {
        Self::new()
    }
}
