//! HTTP client for the Sensei admin API

use async_trait::async_trait;
use serde::Serialize;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::{ApiConfig, RetryConfig};
use crate::error::{AdminError, AdminResult};
use crate::repository::NodeRepository;
use crate::types::{ListNodesQuery, NodePage};

/// [`NodeRepository`] backed by the admin REST API
///
/// Listing requests are idempotent and retried with exponential backoff
/// while the failure is transient.
/// Lifecycle commands are sent exactly once; a failure is reported to the
/// caller instead of being retried behind the operator's back.
pub struct HttpNodeRepository {
    client: reqwest::Client,
    base_url: String,
    retry: RetryConfig,
}

#[derive(Serialize)]
struct StopNodeBody<'a> {
    pubkey: &'a str,
}

#[derive(Serialize)]
struct StartNodeBody<'a> {
    pubkey: &'a str,
    passphrase: &'a str,
}

impl HttpNodeRepository {
    pub fn new(config: &ApiConfig) -> AdminResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry: config.retry.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/v1/{}", self.base_url, path)
    }

    async fn fetch_page(&self, query: &ListNodesQuery) -> AdminResult<NodePage> {
        let response = self
            .client
            .get(self.endpoint("nodes"))
            .query(query)
            .send()
            .await
            .map_err(|e| {
                let message = format!("Request failed: {}", e);
                if e.is_connect() || e.is_timeout() {
                    AdminError::fetch_unreachable(message)
                } else {
                    AdminError::fetch(message)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdminError::fetch_status(
                status.as_u16(),
                format!("HTTP {}: {}", status, body.trim()),
            ));
        }

        response
            .json::<NodePage>()
            .await
            .map_err(|e| AdminError::fetch(format!("Parse error: {}", e)))
    }

    async fn send_command<B: Serialize + ?Sized>(
        &self,
        operation: &str,
        pubkey: &str,
        body: &B,
    ) -> AdminResult<()> {
        let response = self
            .client
            .post(self.endpoint(&format!("nodes/{}", operation)))
            .json(body)
            .send()
            .await
            .map_err(|e| AdminError::command(operation, pubkey, format!("Request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(AdminError::command(
                operation,
                pubkey,
                format!("HTTP {}: {}", status, body.trim()),
            ))
        }
    }
}

#[async_trait]
impl NodeRepository for HttpNodeRepository {
    async fn list_nodes(&self, query: &ListNodesQuery) -> AdminResult<NodePage> {
        let mut attempt = 0;

        loop {
            attempt += 1;

            match self.fetch_page(query).await {
                Ok(page) => {
                    debug!(
                        page = query.page,
                        returned = page.nodes.len(),
                        total = page.pagination.total,
                        "Fetched node listing"
                    );
                    return Ok(page);
                }
                Err(e) if !e.is_transient() || attempt >= self.retry.max_attempts => {
                    return Err(e)
                }
                Err(e) => {
                    warn!(
                        "Listing nodes failed (attempt {}/{}): {}",
                        attempt, self.retry.max_attempts, e
                    );
                }
            }

            sleep(self.retry.delay_after(attempt)).await;
        }
    }

    async fn stop_node(&self, pubkey: &str) -> AdminResult<()> {
        self.send_command("stop", pubkey, &StopNodeBody { pubkey }).await
    }

    async fn start_node(&self, pubkey: &str, passphrase: &str) -> AdminResult<()> {
        self.send_command("start", pubkey, &StartNodeBody { pubkey, passphrase })
            .await
    }
}
