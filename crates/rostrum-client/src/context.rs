//! Application state shared by every command

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use rostrum_core::User;

use crate::api::{DebateApi, HttpApi};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::session::{Session, SessionStore};

/// Who may use a page or command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthRequirement {
    #[default]
    None,
    User,
    Admin,
}

/// The API, the logged-in user and the in-flight turn flag
pub struct AppContext {
    api: Arc<dyn DebateApi>,
    store: SessionStore,
    user: RwLock<Option<User>>,
    generating_turn: AtomicBool,
}

impl AppContext {
    pub fn new(api: Arc<dyn DebateApi>, store: SessionStore) -> Self {
        Self {
            api,
            store,
            user: RwLock::new(None),
            generating_turn: AtomicBool::new(false),
        }
    }

    /// HTTP backend and session file as configured
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let api = HttpApi::new(config)?;
        let store = SessionStore::new(config.session_path()?);
        Ok(Self::new(Arc::new(api), store))
    }

    pub fn api(&self) -> &dyn DebateApi {
        self.api.as_ref()
    }

    pub fn session_store(&self) -> &SessionStore {
        &self.store
    }

    /// The logged-in user, once [`AppContext::init`] or [`AppContext::login`] ran
    pub fn user(&self) -> Option<User> {
        self.user.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn set_user(&self, user: Option<User>) {
        *self.user.write().unwrap_or_else(|e| e.into_inner()) = user;
    }

    /// Restore the session saved by an earlier run.
    ///
    /// Uses the cached profile when there is one; otherwise fetches it and
    /// caches it. A profile that cannot be fetched leaves nobody logged in.
    pub async fn init(&self) -> ClientResult<Option<User>> {
        let session = self.store.load().await?;
        let Some(user_id) = session.user_id else {
            self.set_user(None);
            return Ok(None);
        };
        self.api.set_session(Some(user_id));

        let user = match session.user {
            Some(user) if user.id == user_id => Some(user),
            _ => match self.api.get_user(user_id).await {
                Ok(user) => {
                    self.store
                        .save(&Session {
                            user_id: Some(user_id),
                            user: Some(user.clone()),
                        })
                        .await?;
                    Some(user)
                }
                Err(e) => {
                    tracing::warn!(user_id, error = %e, "failed to fetch user");
                    None
                }
            },
        };

        self.set_user(user.clone());
        Ok(user)
    }

    /// Log in by user name and remember the session
    pub async fn login(&self, user_name: &str) -> ClientResult<User> {
        let user_name = user_name.trim();
        if user_name.is_empty() {
            return Err(ClientError::Precondition(
                "Please provide a user name.".to_string(),
            ));
        }

        let user_id = match self.api.login(user_name).await {
            Err(e) if e.is_not_found() => {
                return Err(ClientError::Precondition(format!(
                    "User {user_name} not found."
                )))
            }
            other => other?,
        };
        let user = self.api.get_user(user_id).await?;
        self.store
            .save(&Session {
                user_id: Some(user_id),
                user: Some(user.clone()),
            })
            .await?;

        tracing::info!(user = %user.user_name, "logged in");
        self.set_user(Some(user.clone()));
        Ok(user)
    }

    /// Forget the session cookie, the cached profile and the current user
    pub async fn logout(&self) -> ClientResult<()> {
        self.api.set_session(None);
        self.store.clear().await?;
        if let Some(user) = self.user() {
            tracing::info!(user = %user.user_name, "logged out");
        }
        self.set_user(None);
        Ok(())
    }

    /// Check the current user meets `requirement`
    pub fn require(&self, requirement: AuthRequirement) -> ClientResult<Option<User>> {
        let user = self.user();
        match (requirement, &user) {
            (AuthRequirement::None, _) => Ok(user),
            (_, None) => Err(ClientError::Precondition(
                "You must be logged in to view this page.".to_string(),
            )),
            (AuthRequirement::Admin, Some(u)) if !u.admin => Err(ClientError::Precondition(
                "This page is only available to admins.".to_string(),
            )),
            _ => Ok(user),
        }
    }

    /// The logged-in user, or the login-required error
    pub fn require_user(&self) -> ClientResult<User> {
        self.require(AuthRequirement::User)?.ok_or_else(|| {
            ClientError::Precondition("You must be logged in to view this page.".to_string())
        })
    }

    /// Is a turn being generated right now?
    pub fn is_generating_turn(&self) -> bool {
        self.generating_turn.load(Ordering::SeqCst)
    }

    /// Claim the turn flag until the guard is dropped
    pub fn begin_turn(&self) -> ClientResult<TurnGuard<'_>> {
        if self
            .generating_turn
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ClientError::Precondition(
                "A turn is already being generated.".to_string(),
            ));
        }
        Ok(TurnGuard {
            flag: &self.generating_turn,
        })
    }
}

/// Releases the turn flag on drop
#[derive(Debug)]
pub struct TurnGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
