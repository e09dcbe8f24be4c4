//! Black Hole API gateway client

pub mod admin;
pub mod auth;
pub mod config;
pub mod error;
pub mod manga;
pub mod users;

use blackhole_core::SessionStorage;
use config::ClientConfig;
use error::ClientError;
use reqwest::{Client, ClientBuilder, Method, StatusCode, header};
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Signals emitted by the gateway to whoever holds session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayEvent {
    /// A response came back 401; the persisted session is already cleared
    SessionExpired,
}

const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Called synchronously on every session-expiring 401 with the bearer token
/// the rejected request carried, if any
pub type ExpiryHook = Arc<dyn Fn(Option<&str>) + Send + Sync>;

/// Handle for removing a hook registered with
/// [`BlackHoleClient::on_session_expired`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExpiryHookId(u64);

#[derive(Default)]
struct ExpiryHooks {
    next_id: AtomicU64,
    hooks: Mutex<Vec<(ExpiryHookId, ExpiryHook)>>,
}

impl ExpiryHooks {
    fn register(&self, hook: ExpiryHook) -> ExpiryHookId {
        let id = ExpiryHookId(self.next_id.fetch_add(1, Ordering::Relaxed));
        if let Ok(mut hooks) = self.hooks.lock() {
            hooks.push((id, hook));
        }
        id
    }

    fn remove(&self, id: ExpiryHookId) -> bool {
        match self.hooks.lock() {
            Ok(mut hooks) => {
                let before = hooks.len();
                hooks.retain(|(hook_id, _)| *hook_id != id);
                hooks.len() != before
            }
            Err(_) => false,
        }
    }

    fn run(&self, rejected_token: Option<&str>) {
        // Hooks run outside the lock so they may register or remove hooks
        let hooks: Vec<ExpiryHook> = match self.hooks.lock() {
            Ok(hooks) => hooks.iter().map(|(_, hook)| hook.clone()).collect(),
            Err(_) => return,
        };
        for hook in hooks {
            hook(rejected_token);
        }
    }
}

/// How a 401 answer is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnauthorizedPolicy {
    /// The stored credential was rejected
    ExpireSession,
    /// Wrong credentials submitted to a login endpoint; nothing to expire
    ReportOnly,
}

/// Black Hole API client
///
/// Cloning is cheap and every clone shares the connection pool, the session
/// storage and the event channel.
#[derive(Clone)]
pub struct BlackHoleClient {
    client: Client,
    base_url: String,
    storage: SessionStorage,
    events: broadcast::Sender<GatewayEvent>,
    hooks: Arc<ExpiryHooks>,
}

impl BlackHoleClient {
    /// Create a new client with default configuration and in-memory storage
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a new client builder
    pub fn builder() -> BlackHoleClientBuilder {
        BlackHoleClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Storage the bearer token is read from on every request
    pub fn storage(&self) -> &SessionStorage {
        &self.storage
    }

    /// Receive [`GatewayEvent`]s emitted after this call
    pub fn subscribe(&self) -> broadcast::Receiver<GatewayEvent> {
        self.events.subscribe()
    }

    /// Run `hook` before any session-expiring 401 is returned to its caller
    ///
    /// Hooks are shared by every clone of this client.
    pub fn on_session_expired(&self, hook: ExpiryHook) -> ExpiryHookId {
        self.hooks.register(hook)
    }

    /// Returns false if the hook was already removed
    pub fn remove_expiry_hook(&self, id: ExpiryHookId) -> bool {
        self.hooks.remove(id)
    }

    /// Create a request builder, attaching the currently persisted token
    pub fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.request(method, url);

        match self.storage.token() {
            Ok(Some(token)) => {
                request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
            }
            Ok(None) => {}
            Err(e) => warn!("Failed to read persisted token, sending request anonymously: {e}"),
        }

        request
    }

    /// Execute a request and handle common errors
    ///
    /// A 401 answer clears the persisted session and emits
    /// [`GatewayEvent::SessionExpired`] before the error is returned.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        self.dispatch(request, UnauthorizedPolicy::ExpireSession)
            .await
    }

    /// Execute a login request. A 401 here means the submitted credentials
    /// were wrong, so the current session is left alone.
    pub(crate) async fn execute_credential_exchange<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        self.dispatch(request, UnauthorizedPolicy::ReportOnly).await
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        policy: UnauthorizedPolicy,
    ) -> Result<T, ClientError> {
        let request = request.build()?;
        let bearer = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::to_owned);

        let response = self.client.execute(request).await?;
        let status = response.status();
        let path = response.url().path().to_string();

        if status.is_success() {
            debug!(%status, %path, "Request succeeded");
            let body = response.bytes().await?;
            return Ok(serde_json::from_slice(&body)?);
        }

        let body = response.text().await.unwrap_or_else(|_| status.to_string());
        debug!(%status, %path, "Request failed");

        if status == StatusCode::UNAUTHORIZED && policy == UnauthorizedPolicy::ExpireSession {
            self.expire_session(bearer.as_deref());
        }

        Err(ClientError::from_status(status, &body))
    }

    /// Drop the persisted session, run the expiry hooks and tell
    /// subscribers it is gone
    ///
    /// `rejected_token` is the bearer token the server refused, if the
    /// request carried one.
    pub fn expire_session(&self, rejected_token: Option<&str>) {
        warn!("Session credential rejected, clearing persisted session");
        if let Err(e) = self.storage.clear() {
            warn!("Failed to clear persisted session: {e}");
        }
        self.hooks.run(rejected_token);
        // Sending fails only when nobody is listening
        let _ = self.events.send(GatewayEvent::SessionExpired);
    }
}

/// Builder for BlackHoleClient
#[derive(Default)]
pub struct BlackHoleClientBuilder {
    base_url: Option<String>,
    storage: Option<SessionStorage>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl BlackHoleClientBuilder {
    /// Start from a loaded [`ClientConfig`]
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::default()
            .base_url(config.base_url.clone())
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
    }

    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the storage holding the persisted session
    pub fn storage(mut self, storage: SessionStorage) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client
    pub fn build(self) -> Result<BlackHoleClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        url::Url::parse(&base_url)
            .map_err(|e| ClientError::Configuration(format!("invalid base_url: {e}")))?;

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let timeout = self
            .timeout
            .unwrap_or(Duration::from_secs(ClientConfig::DEFAULT_TIMEOUT_SECS));

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| ClientConfig::default().user_agent);

        let client = ClientBuilder::new()
            .default_headers(headers)
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(BlackHoleClient {
            client,
            base_url,
            storage: self.storage.unwrap_or_default(),
            events,
            hooks: Arc::default(),
        })
    }
}
