//! Client configuration.

use std::time::Duration;

use url::Url;
use uuid::Uuid;

use crate::content;
use crate::error::ClientError;

const DEFAULT_COUNT: u64 = 100;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);
const DEFAULT_WINDOW: u32 = 10;
const DEFAULT_BODY_SIZE: usize = 1024;

/// Configuration shared by the sender and receiver clients.
///
/// The target address is usually carried in the URL path
/// (`amqp://host:5672/queue-1`); an explicitly configured address takes
/// precedence over the path.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Broker or router endpoint.
    pub url: Url,
    /// Source or target address of the link.
    pub address: String,
    /// Target number of messages for the run.
    pub count: u64,
    /// Payload carried by every message a sender emits.
    pub body: String,
    /// Container id announced when opening the connection.
    pub container_id: String,
    /// Deadline for the whole run.
    pub timeout: Duration,
    /// Upper bound on deliveries kept in flight by a sender.
    pub window: u32,
}

impl ClientConfig {
    /// Starts building a config.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    url: Option<String>,
    address: Option<String>,
    count: Option<u64>,
    body: Option<String>,
    container_id: Option<String>,
    timeout: Option<Duration>,
    window: Option<u32>,
}

impl ClientConfigBuilder {
    /// The endpoint to connect to, e.g. `amqp://localhost:5672/queue-1`.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Link address, overriding the URL path.
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Target number of messages. Defaults to 100.
    pub fn count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }

    /// Payload for every sent message. Defaults to a generated 1 KiB payload.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Container id announced on open. Defaults to a random one.
    pub fn container_id(mut self, container_id: impl Into<String>) -> Self {
        self.container_id = Some(container_id.into());
        self
    }

    /// Deadline for the whole run. Defaults to 600 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// In-flight window for senders. Values below 1 are raised to 1.
    pub fn window(mut self, window: u32) -> Self {
        self.window = Some(window);
        self
    }

    /// Validates the endpoint and resolves the link address.
    pub fn build(self) -> Result<ClientConfig, ClientError> {
        let url: Url = self.url.unwrap_or_default().parse()?;
        let address = match self.address {
            Some(address) => address,
            None => {
                let path = url.path().trim_start_matches('/');
                if path.is_empty() {
                    return Err(ClientError::MissingAddress);
                }
                path.to_string()
            }
        };
        Ok(ClientConfig {
            url,
            address,
            count: self.count.unwrap_or(DEFAULT_COUNT),
            body: self
                .body
                .unwrap_or_else(|| content::generate_content(DEFAULT_BODY_SIZE)),
            container_id: self
                .container_id
                .unwrap_or_else(|| format!("amqp-smoke-{}", Uuid::new_v4())),
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            window: self.window.unwrap_or(DEFAULT_WINDOW).max(1),
        })
    }
}
