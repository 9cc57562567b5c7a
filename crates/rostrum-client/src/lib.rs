//! # Rostrum Client
//!
//! Talks to the debate backend on behalf of a human judge.
//!
//! - [`DebateApi`] / [`HttpApi`] - the REST endpoints, with the `user_id` session cookie
//! - [`AppContext`] - logged-in user, persisted session and the in-flight turn flag
//! - [`turn::run_turn`] - generate the next round with a live elapsed-time placeholder
//! - [`judging::submit_judgement`] - validate and send a verdict
//! - [`MockApi`] - in-memory backend for tests
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rostrum_client::{AppContext, ClientConfig};
//!
//! let ctx = AppContext::from_config(&ClientConfig::from_env()?)?;
//! ctx.init().await?;
//! let user = ctx.login("sam").await?;
//! let debate = ctx.api().get_debate(12).await?;
//! ```

pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod flow;
pub mod judging;
pub mod mock;
pub mod session;
pub mod turn;

pub use api::{
    DebateApi, DebaterConfigs, HttpApi, JudgementSubmission, NewPlaygroundDebate,
    PlaygroundDebateType,
};
pub use config::{ClientConfig, ConfigError};
pub use context::{AppContext, AuthRequirement, TurnGuard};
pub use error::{ClientError, ClientResult};
pub use flow::Flow;
pub use mock::MockApi;
pub use session::{Session, SessionStore};
