//! `AdminConsole` builder and the profile-sync task.
//!
//! This is the entry point for an admin client. It ties together all the
//! layers: configuration → identity API → token storage → session.

use std::path::PathBuf;
use std::sync::Arc;

use careerlink_protocol::{Credentials, LoginResponse};
use careerlink_session::{
    FileTokenStore, RouteDecision, Session, SessionConfig, SessionManager,
    TokenStore,
};
use careerlink_transport::{HttpIdentityApi, IdentityApi};
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};

use crate::{AdminConfig, AdminError};

/// Builder for configuring and starting an admin console.
///
/// # Example
///
/// ```rust,no_run
/// use careerlink::prelude::*;
///
/// # async fn run() -> Result<(), AdminError> {
/// let console = AdminConsole::builder()
///     .api_base_url("https://api.careerlink.test/api")
///     .build()
///     .await?;
///
/// console.login("root@careerlink.test", "hunter2").await?;
/// assert_eq!(console.settled().await.error, None);
/// # Ok(())
/// # }
/// ```
pub struct AdminConsoleBuilder {
    config: AdminConfig,
}

impl AdminConsoleBuilder {
    /// Creates a builder with built-in defaults, ignoring the environment.
    pub fn new() -> Self {
        Self::with_config(AdminConfig::default())
    }

    /// Creates a builder seeded from the process environment.
    pub fn from_env() -> Self {
        Self::with_config(AdminConfig::from_env())
    }

    pub fn with_config(config: AdminConfig) -> Self {
        Self { config }
    }

    /// Sets the identity API base URL.
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_base_url = url.into();
        self
    }

    /// Sets the file the bearer token is persisted in.
    pub fn storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.storage_path = path.into();
        self
    }

    /// Sets the session configuration.
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.config.session = config;
        self
    }

    pub fn config(&self) -> &AdminConfig {
        &self.config
    }

    /// Builds the console over HTTP and a file-backed token store, then
    /// starts the profile-sync task.
    ///
    /// Must be awaited inside a tokio runtime.
    ///
    /// # Errors
    /// [`AdminError::Api`] if the base URL is not an absolute http(s) URL.
    pub async fn build(self) -> Result<AdminConsole, AdminError> {
        let api = HttpIdentityApi::new(&self.config.api_base_url)?;
        let store = FileTokenStore::new(&self.config.storage_path);
        tracing::info!(
            base_url = api.base_url(),
            storage = %store.path().display(),
            "admin console starting"
        );
        Ok(self.build_with(api, store).await)
    }

    /// Builds the console over a caller-supplied API and store. The
    /// configured URL and storage path are ignored.
    pub async fn build_with<A, S>(self, api: A, store: S) -> AdminConsole<A, S>
    where
        A: IdentityApi,
        S: TokenStore,
    {
        let session = Arc::new(SessionManager::new(api, store, self.config.session));
        AdminConsole::start(session)
    }
}

impl Default for AdminConsoleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running admin console.
///
/// Owns the session manager and a background task that fetches the
/// profile whenever a token becomes present: once at startup if one was
/// persisted, and after every successful login. Dropping the console stops
/// that task along with any fetch it has in flight.
pub struct AdminConsole<A = HttpIdentityApi, S = FileTokenStore>
where
    A: IdentityApi,
    S: TokenStore,
{
    session: Arc<SessionManager<A, S>>,
    sync: JoinHandle<()>,
}

impl AdminConsole {
    /// Creates a new builder.
    pub fn builder() -> AdminConsoleBuilder {
        AdminConsoleBuilder::new()
    }
}

impl<A, S> AdminConsole<A, S>
where
    A: IdentityApi,
    S: TokenStore,
{
    /// Starts the profile-sync task for an existing session manager.
    ///
    /// Must be called inside a tokio runtime.
    pub fn start(session: Arc<SessionManager<A, S>>) -> Self {
        let changes = session.subscribe();
        let sync = tokio::spawn(sync_profile(Arc::clone(&session), changes));
        Self { session, sync }
    }

    /// The underlying session manager, for hosts that need the full API.
    pub fn session(&self) -> &Arc<SessionManager<A, S>> {
        &self.session
    }

    pub fn snapshot(&self) -> Session {
        self.session.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.session.subscribe()
    }

    pub fn route_decision(&self) -> RouteDecision {
        self.session.route_decision()
    }

    /// Signs in with `email` and `password`. The profile is fetched in the
    /// background once the token is installed.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<LoginResponse, AdminError> {
        let credentials = Credentials::new(email, password);
        Ok(self.session.login(&credentials).await?)
    }

    pub fn logout(&self) {
        self.session.logout();
    }

    /// Waits until no request is in flight and the session has reached a
    /// resting state: logged out, signed in with a profile, or holding an
    /// error. Returns that session.
    pub async fn settled(&self) -> Session {
        let mut changes = self.session.subscribe();
        let settled = changes.wait_for(is_settled).await.map(|s| s.clone());
        match settled {
            Ok(session) => session,
            Err(_) => self.session.snapshot(),
        }
    }
}

impl<A, S> Drop for AdminConsole<A, S>
where
    A: IdentityApi,
    S: TokenStore,
{
    fn drop(&mut self) {
        self.sync.abort();
    }
}

fn is_settled(session: &Session) -> bool {
    !session.is_loading()
        && (session.token.is_none()
            || session.user.is_some()
            || session.error.is_some())
}

/// Fetches the profile each time a token is present in an epoch that has
/// not been synced yet.
///
/// Every successful login and every logout starts a new epoch, so each
/// login gets exactly one fetch, even when it returns the token the session
/// already held. Fetches run in a `JoinSet` owned by this loop and are
/// aborted with it.
async fn sync_profile<A, S>(
    session: Arc<SessionManager<A, S>>,
    mut changes: watch::Receiver<Session>,
) where
    A: IdentityApi,
    S: TokenStore,
{
    let mut synced_epoch = None;
    let mut fetches = JoinSet::new();

    loop {
        let due = {
            let current = changes.borrow_and_update();
            let due =
                current.token.is_some() && synced_epoch != Some(current.epoch);
            if due {
                synced_epoch = Some(current.epoch);
            }
            due
        };

        if due {
            // Run beside the loop so a slow fetch doesn't hide a logout.
            let session = Arc::clone(&session);
            fetches.spawn(async move {
                if let Err(e) = session.fetch_current_user().await {
                    tracing::debug!(error = %e, "profile sync ended with error");
                }
            });
        }

        tokio::select! {
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            Some(_) = fetches.join_next(), if !fetches.is_empty() => {}
        }
    }
}
