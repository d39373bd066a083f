//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler and scanner:
//! - Building an HTTP client with a proper user agent string
//! - HEAD requests to check link liveness
//! - GET requests to fetch page content
//! - Global concurrency limiting
//! - Transport error classification and optional retries
//!
//! HTTP error statuses are not errors here. A 404 is a completed check and
//! comes back as a status code; only failures that never produced a status
//! (timeouts, refused connections) surface as [`TransportError`].

use crate::config::Config;
use reqwest::{redirect::Policy, Client};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Semaphore, SemaphorePermit};
use url::Url;

/// A request failure that never produced an HTTP status
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}")]
    Connect { url: String },

    #[error("Request failed for {url}: {message}")]
    Other { url: String, message: String },
}

/// A successfully fetched page
#[derive(Debug)]
pub struct FetchedPage {
    /// HTTP status code of the final response
    pub status: u16,

    /// Response body
    pub body: String,
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are followed up to 10 hops, so a check on a moved URL reports
/// the status of its final destination.
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use linkmend::config::Config;
/// use linkmend::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    // Format: CrawlerName/Version (+ContactURL; ContactEmail)
    let user_agent = format!(
        "{}/{} (+{}; {})",
        config.user_agent.crawler_name,
        config.user_agent.crawler_version,
        config.user_agent.contact_url,
        config.user_agent.contact_email
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(config.crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.crawler.connect_timeout_secs))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Issues all HTTP requests, capped by a shared concurrency limit
///
/// Cloning is cheap and clones share the same client and limiter, so every
/// crawler and scanner task in a run competes for the same permit pool.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    semaphore: Arc<Semaphore>,
    max_retries: u32,
}

impl Fetcher {
    /// Builds a fetcher from the configuration
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = build_http_client(config)?;
        Ok(Self {
            client,
            semaphore: Arc::new(Semaphore::new(config.crawler.max_concurrent_requests)),
            max_retries: config.crawler.max_retries,
        })
    }

    /// Checks link liveness with a HEAD request
    ///
    /// Returns the final status code after redirects. HTTP errors (4xx, 5xx)
    /// are valid outcomes; only transport failures return `Err`.
    pub async fn check_status(&self, url: &Url) -> Result<u16, TransportError> {
        let _permit = self.acquire_permit(url).await?;

        let mut attempt = 0;
        loop {
            match self.client.head(url.clone()).send().await {
                Ok(response) => return Ok(response.status().as_u16()),
                Err(e) if attempt < self.max_retries => {
                    attempt += 1;
                    tracing::debug!(
                        "Retrying HEAD {} after transport error ({}/{}): {}",
                        url,
                        attempt,
                        self.max_retries,
                        e
                    );
                }
                Err(e) => return Err(classify_error(e, url)),
            }
        }
    }

    /// Fetches a page body with a GET request
    ///
    /// Any status code with a readable body counts as fetched; callers decide
    /// what to do with non-200 responses.
    pub async fn fetch_page(&self, url: &Url) -> Result<FetchedPage, TransportError> {
        let _permit = self.acquire_permit(url).await?;

        let mut attempt = 0;
        loop {
            match self.client.get(url.clone()).send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    return match response.text().await {
                        Ok(body) => Ok(FetchedPage { status, body }),
                        Err(e) => Err(classify_error(e, url)),
                    };
                }
                Err(e) if attempt < self.max_retries => {
                    attempt += 1;
                    tracing::debug!(
                        "Retrying GET {} after transport error ({}/{}): {}",
                        url,
                        attempt,
                        self.max_retries,
                        e
                    );
                }
                Err(e) => return Err(classify_error(e, url)),
            }
        }
    }

    async fn acquire_permit(&self, url: &Url) -> Result<SemaphorePermit<'_>, TransportError> {
        // acquire only fails once the semaphore is closed, which never happens
        self.semaphore
            .acquire()
            .await
            .map_err(|_| TransportError::Other {
                url: url.to_string(),
                message: "request limiter closed".to_string(),
            })
    }
}

/// Classifies a reqwest error into a transport error
fn classify_error(e: reqwest::Error, url: &Url) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout {
            url: url.to_string(),
        }
    } else if e.is_connect() {
        TransportError::Connect {
            url: url.to_string(),
        }
    } else {
        TransportError::Other {
            url: url.to_string(),
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let config = Config::default();
        let client = build_http_client(&config);
        assert!(client.is_ok());
    }

    #[test]
    fn test_fetcher_from_default_config() {
        let fetcher = Fetcher::new(&Config::default());
        assert!(fetcher.is_ok());
    }

    #[test]
    fn test_transport_error_messages() {
        let timeout = TransportError::Timeout {
            url: "https://example.com/".to_string(),
        };
        assert_eq!(timeout.to_string(), "Request timeout for https://example.com/");

        let connect = TransportError::Connect {
            url: "https://example.com/".to_string(),
        };
        assert!(connect.to_string().contains("Connection failed"));

        let other = TransportError::Other {
            url: "https://example.com/".to_string(),
            message: "body truncated".to_string(),
        };
        assert!(other.to_string().contains("body truncated"));
    }

    // Request behavior (statuses, retries, concurrency) is covered with
    // wiremock in the integration tests
}
