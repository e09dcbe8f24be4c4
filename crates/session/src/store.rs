//! The session store

use crate::messages;
use crate::outcome::Outcome;
use crate::session::{Session, SessionState};
use blackhole_core::{SessionStorage, User, UserId};
use blackhole_http::types::{LoginRequest, ProfileUpdate, RegisterRequest, VerifyRequest};
use blackhole_http::{BlackHoleClient, ExpiryHookId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Single source of truth for the signed-in identity
///
/// Construct one per application (or per test) and hand out clones; all
/// clones share state. The store registers an expiry hook on its client, so
/// a 401 has cleared the session by the time the failing call returns.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

struct Inner {
    client: BlackHoleClient,
    state: watch::Sender<SessionState>,
    initializing: AtomicBool,
    expiry_hook: Mutex<Option<ExpiryHookId>>,
}

impl Inner {
    fn storage(&self) -> &SessionStorage {
        self.client.storage()
    }

    fn session(&self) -> Session {
        self.state.borrow().session.clone()
    }

    fn commit(&self, session: Session) {
        self.state.send_modify(|state| state.session = session);
    }

    /// Forget the in-memory session; persisted entries are the caller's concern
    fn clear_memory(&self) {
        let cleared = self.state.send_if_modified(|state| {
            if state.session == Session::default() {
                false
            } else {
                state.session = Session::default();
                true
            }
        });
        if cleared {
            info!("Session cleared");
        }
    }

    fn clear_storage(&self) {
        if let Err(e) = self.storage().clear() {
            warn!("Failed to clear persisted session: {e}");
        }
    }

    /// React to a 401 reported by the gateway
    ///
    /// The session is cleared unless the rejected request carried a token
    /// other than the current one, which means a newer login replaced it
    /// while the request was in flight.
    fn handle_expiry(&self, rejected_token: Option<&str>) {
        let current = self.state.borrow().session.token.clone();
        match (rejected_token, current.as_deref()) {
            (Some(rejected), Some(current)) if rejected != current => {
                debug!("Ignoring expiry of a superseded credential");
                // The gateway already cleared storage; put the live session back
                self.resync_storage();
            }
            _ => {
                debug!("Gateway reported an expired session");
                self.clear_memory();
            }
        }
    }

    /// Rewrite storage from the in-memory session after a failed write
    fn resync_storage(&self) {
        let session = self.session();
        let result = match (&session.token, &session.user) {
            (Some(token), Some(user)) => self.storage().save(token, user),
            _ => self.storage().clear(),
        };
        if let Err(e) = result {
            warn!("Failed to resynchronize persisted session: {e}");
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Ok(hook) = self.expiry_hook.get_mut()
            && let Some(id) = hook.take()
        {
            self.client.remove_expiry_hook(id);
        }
    }
}

impl SessionStore {
    pub fn new(client: BlackHoleClient) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        let inner = Arc::new(Inner {
            client,
            state,
            initializing: AtomicBool::new(false),
            expiry_hook: Mutex::new(None),
        });

        let weak: Weak<Inner> = Arc::downgrade(&inner);
        let id = inner
            .client
            .on_session_expired(Arc::new(move |rejected_token: Option<&str>| {
                if let Some(inner) = weak.upgrade() {
                    inner.handle_expiry(rejected_token);
                }
            }));
        if let Ok(mut hook) = inner.expiry_hook.lock() {
            *hook = Some(id);
        }

        Self { inner }
    }

    /// Gateway all requests go through
    pub fn client(&self) -> &BlackHoleClient {
        &self.inner.client
    }

    pub fn storage(&self) -> &SessionStorage {
        self.inner.storage()
    }

    /// Snapshot of the current session
    pub fn session(&self) -> Session {
        self.inner.session()
    }

    pub fn user(&self) -> Option<User> {
        self.inner.state.borrow().session.user.clone()
    }

    /// A call that failed with 401 has already cleared this by the time it
    /// returns, unless the store was disposed
    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().session.is_authenticated()
    }

    pub fn is_admin(&self) -> bool {
        self.inner.state.borrow().session.is_admin()
    }

    pub fn is_moderator(&self) -> bool {
        self.inner.state.borrow().session.is_moderator()
    }

    /// True until [`initialize`](Self::initialize) completes
    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().loading
    }

    /// Watch every change to the session, including the clear that follows
    /// an expired credential
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Wait until startup revalidation has finished
    pub async fn ready(&self) {
        let mut state = self.inner.state.subscribe();
        loop {
            let loading = state.borrow_and_update().loading;
            if !loading || state.changed().await.is_err() {
                break;
            }
        }
    }

    /// Restore the persisted session and revalidate it with the server
    ///
    /// Only the first call does any work; later calls wait for it and return
    /// the resulting session.
    pub async fn initialize(&self) -> Session {
        if self.inner.initializing.swap(true, Ordering::AcqRel) {
            self.ready().await;
            return self.session();
        }

        let session = self.restore().await;
        self.inner.state.send_modify(|state| {
            state.session = session;
            state.loading = false;
        });
        self.session()
    }

    async fn restore(&self) -> Session {
        let storage = self.storage();
        let token = storage.token().unwrap_or_else(|e| {
            warn!("Failed to read persisted token: {e}");
            None
        });
        let user = storage.user().unwrap_or_else(|e| {
            warn!("Failed to read persisted user: {e}");
            None
        });

        let (token, stale_user) = match (token, user) {
            (Some(token), Some(user)) => (token, user),
            (None, None) => {
                debug!("No persisted session");
                return Session::default();
            }
            _ => {
                debug!("Discarding incomplete persisted session");
                self.inner.clear_storage();
                return Session::default();
            }
        };

        match self.inner.client.get_profile().await {
            Ok(profile) => {
                if profile.user != stale_user {
                    debug!(user_id = profile.user.id, "Persisted user refreshed from server");
                }
                if let Err(e) = storage.set_user(&profile.user) {
                    warn!("Failed to persist refreshed user: {e}");
                }
                info!(user_id = profile.user.id, "Session restored");
                Session::new(token, profile.user)
            }
            Err(e) => {
                info!("Persisted session rejected: {e}");
                self.inner.clear_storage();
                Session::default()
            }
        }
    }

    /// Sign in and persist the issued token and user
    ///
    /// On failure neither the in-memory nor the persisted session changes.
    pub async fn login(&self, email: &str, password: &str) -> Outcome<User> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        match self.inner.client.login(&request).await {
            Ok(response) => {
                if let Err(e) = self.storage().save(&response.access_token, &response.user) {
                    warn!("Failed to persist session: {e}");
                    self.inner.resync_storage();
                    return Outcome::failure(messages::STORAGE_FAILED);
                }
                info!(user_id = response.user.id, "Signed in");
                self.inner
                    .commit(Session::new(response.access_token, response.user.clone()));
                Outcome::success(response.user, messages::LOGIN_SUCCESS)
            }
            Err(e) => Outcome::from_error(&e, messages::LOGIN_FAILED),
        }
    }

    /// Create an account. No session is established; the returned id is
    /// needed by [`verify`](Self::verify).
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Outcome<UserId> {
        let request = RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };

        match self.inner.client.register(&request).await {
            Ok(response) => Outcome::success(response.user_id, messages::REGISTER_SUCCESS),
            Err(e) => Outcome::from_error(&e, messages::REGISTER_FAILED),
        }
    }

    /// Confirm a pending account. Does not sign in.
    pub async fn verify(&self, user_id: UserId, code: &str) -> Outcome<()> {
        let request = VerifyRequest {
            user_id,
            verification_code: code.to_string(),
        };

        match self.inner.client.verify(&request).await {
            Ok(_) => Outcome::success((), messages::VERIFY_SUCCESS),
            Err(e) => Outcome::from_error(&e, messages::VERIFY_FAILED),
        }
    }

    pub async fn resend_verification(&self, email: &str) -> Outcome<()> {
        match self.inner.client.resend_verification(email).await {
            Ok(_) => Outcome::success((), messages::RESEND_SUCCESS),
            Err(e) => Outcome::from_error(&e, messages::RESEND_FAILED),
        }
    }

    /// Send a profile update and adopt the user record the server returns
    ///
    /// The input is never merged locally. When several updates are in flight
    /// the last response to arrive is the one kept.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Outcome<User> {
        let response = match self.inner.client.update_profile(update).await {
            Ok(response) => response,
            Err(e) => return Outcome::from_error(&e, messages::PROFILE_UPDATE_FAILED),
        };
        let user = response.user;

        // The session may have been cleared while the request was in flight
        if !self.is_authenticated() {
            warn!("Discarding profile update for a session that has ended");
            return Outcome::success(user, messages::PROFILE_UPDATE_SUCCESS);
        }

        if let Err(e) = self.storage().set_user(&user) {
            warn!("Failed to persist updated user: {e}");
            self.inner.resync_storage();
            return Outcome::failure(messages::STORAGE_FAILED);
        }

        let committed = self.inner.state.send_if_modified(|state| {
            if state.session.token.is_some() {
                state.session.user = Some(user.clone());
                true
            } else {
                false
            }
        });
        if !committed {
            self.inner.resync_storage();
        }

        debug!(user_id = user.id, "Profile updated");
        Outcome::success(user, messages::PROFILE_UPDATE_SUCCESS)
    }

    /// Forget the session locally. Never fails and sends no request.
    pub fn logout(&self) -> Outcome<()> {
        self.inner.clear_storage();
        self.inner.clear_memory();
        Outcome::success((), messages::LOGOUT_SUCCESS)
    }

    /// Stop reacting to gateway expiries. Safe to call more than once.
    pub fn dispose(&self) {
        if let Ok(mut hook) = self.inner.expiry_hook.lock()
            && let Some(id) = hook.take()
        {
            self.inner.client.remove_expiry_hook(id);
            debug!("Session store detached from gateway");
        }
    }
}
