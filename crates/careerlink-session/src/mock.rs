//! Scripted [`IdentityApi`] and [`TokenStore`] used by the session manager
//! tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use careerlink_protocol::{Credentials, LoginResponse, Role, UserProfile};
use careerlink_transport::{ApiError, IdentityApi};
use tokio::sync::Notify;

use crate::{MemoryTokenStore, StoreError, TokenStore};

/// What the mock answers to `login`.
pub(crate) enum LoginReply {
    Token(&'static str),
    Reject(u16, Option<&'static str>),
    Unreachable,
}

/// What the mock answers to `current_user`.
pub(crate) enum ProfileReply {
    User(UserProfile),
    Reject(u16, Option<&'static str>),
}

pub(crate) struct MockApi {
    login_reply: LoginReply,
    profile_reply: ProfileReply,
    pub(crate) login_calls: AtomicUsize,
    pub(crate) profile_calls: AtomicUsize,
    pub(crate) bearer_tokens: Mutex<Vec<String>>,
    /// When set, each call signals `entered` and then parks until
    /// `release` is notified.
    gated: bool,
    pub(crate) entered: Notify,
    pub(crate) release: Notify,
}

impl MockApi {
    pub(crate) fn new(login_reply: LoginReply, profile_reply: ProfileReply) -> Self {
        Self {
            login_reply,
            profile_reply,
            login_calls: AtomicUsize::new(0),
            profile_calls: AtomicUsize::new(0),
            bearer_tokens: Mutex::new(Vec::new()),
            gated: false,
            entered: Notify::new(),
            release: Notify::new(),
        }
    }

    pub(crate) fn gated(mut self) -> Self {
        self.gated = true;
        self
    }

    async fn wait_for_release(&self) {
        if self.gated {
            self.entered.notify_one();
            self.release.notified().await;
        }
    }

    pub(crate) fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn profile_calls(&self) -> usize {
        self.profile_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn bearer_tokens(&self) -> Vec<String> {
        self.bearer_tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

pub(crate) fn admin(name: &str) -> UserProfile {
    UserProfile {
        id: format!("id-{name}"),
        username: name.to_string(),
        email: format!("{name}@careerlink.test"),
        role: Role::Admin,
        avatar: None,
        is_active: true,
        created_at: None,
        updated_at: None,
    }
}

impl IdentityApi for MockApi {
    async fn login(
        &self,
        _credentials: &Credentials,
    ) -> Result<LoginResponse, ApiError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_for_release().await;

        match &self.login_reply {
            LoginReply::Token(token) => Ok(LoginResponse {
                token: (*token).to_string(),
                user: None,
                expiry: None,
            }),
            LoginReply::Reject(status, message) => Err(ApiError::Rejected {
                status: *status,
                message: message.map(str::to_string),
            }),
            LoginReply::Unreachable => {
                Err(ApiError::Network("connection refused".into()))
            }
        }
    }

    async fn current_user(&self, token: &str) -> Result<UserProfile, ApiError> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        self.bearer_tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(token.to_string());

        self.wait_for_release().await;

        match &self.profile_reply {
            ProfileReply::User(user) => Ok(user.clone()),
            ProfileReply::Reject(status, message) => Err(ApiError::Rejected {
                status: *status,
                message: message.map(str::to_string),
            }),
        }
    }
}

/// A [`TokenStore`] whose operations can be made to fail with an I/O
/// error. Operations that don't fail go to an in-memory store.
#[derive(Default)]
pub(crate) struct FlakyStore {
    pub(crate) inner: MemoryTokenStore,
    pub(crate) fail_load: bool,
    pub(crate) fail_save: bool,
    pub(crate) fail_clear: bool,
}

impl FlakyStore {
    pub(crate) fn holding(token: &str) -> Self {
        Self {
            inner: MemoryTokenStore::with_token(token),
            ..Self::default()
        }
    }

    /// Reads the underlying store, bypassing `fail_load`.
    pub(crate) fn persisted(&self) -> Option<String> {
        self.inner.load().unwrap_or_default()
    }

    fn broken() -> StoreError {
        StoreError::Io {
            path: "/mnt/readonly/storage.json".into(),
            source: std::io::Error::other("read-only file system"),
        }
    }
}

impl TokenStore for FlakyStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        if self.fail_load {
            return Err(Self::broken());
        }
        self.inner.load()
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        if self.fail_save {
            return Err(Self::broken());
        }
        self.inner.save(token)
    }

    fn clear(&self) -> Result<(), StoreError> {
        if self.fail_clear {
            return Err(Self::broken());
        }
        self.inner.clear()
    }
}
