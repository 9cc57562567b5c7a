//! REST API of the debate backend

use std::fmt;
use std::str::FromStr;
use std::sync::RwLock;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use rostrum_core::{Debate, DebateDetail, FileDetail, FileSummary, RowDetail, User};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Name of the session cookie set by the login endpoint
pub const SESSION_COOKIE: &str = "user_id";

/// Body of a judgement submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgementSubmission {
    pub confidence_correct: u8,
    pub user_name: String,
    pub explanation: String,
}

/// Kinds of debate that can be started in the playground
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaygroundDebateType {
    Debate,
    Consultancy,
    CorrectConsultancy,
    IncorrectConsultancy,
}

impl PlaygroundDebateType {
    pub const ALL: [PlaygroundDebateType; 4] = [
        PlaygroundDebateType::Debate,
        PlaygroundDebateType::Consultancy,
        PlaygroundDebateType::CorrectConsultancy,
        PlaygroundDebateType::IncorrectConsultancy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PlaygroundDebateType::Debate => "debate",
            PlaygroundDebateType::Consultancy => "consultancy",
            PlaygroundDebateType::CorrectConsultancy => "correct_consultancy",
            PlaygroundDebateType::IncorrectConsultancy => "incorrect_consultancy",
        }
    }

    /// Only two-sided debates are configured with debater configs
    pub fn uses_debater_configs(self) -> bool {
        self == PlaygroundDebateType::Debate
    }
}

impl fmt::Display for PlaygroundDebateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlaygroundDebateType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "unknown debate type '{s}', expected one of: debate, consultancy, \
                     correct_consultancy, incorrect_consultancy"
                )
            })
    }
}

/// Request to start a playground debate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPlaygroundDebate {
    pub debate_type: PlaygroundDebateType,
    pub config_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_debate_id: Option<i64>,
}

/// Config files available for playground debates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebaterConfigs {
    #[serde(default)]
    pub debater_configs: Vec<String>,
    #[serde(default)]
    pub consultant_configs: Vec<String>,
}

impl DebaterConfigs {
    /// Configs that apply to a debate type
    pub fn for_type(&self, debate_type: PlaygroundDebateType) -> &[String] {
        if debate_type.uses_debater_configs() {
            &self.debater_configs
        } else {
            &self.consultant_configs
        }
    }
}

#[derive(Debug, Deserialize)]
struct DebateList {
    debates: Vec<Debate>,
}

#[derive(Debug, Deserialize)]
struct Created {
    id: i64,
}

#[derive(Debug, Serialize)]
struct TurnRequest<'a> {
    judge_message: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    user_name: &'a str,
}

/// Everything the front end asks of the backend.
///
/// Implementations carry the session: once a user id is set it accompanies
/// every request.
#[async_trait]
pub trait DebateApi: Send + Sync {
    /// User id sent with requests, if any
    fn session(&self) -> Option<i64>;

    /// Replace the user id sent with requests
    fn set_session(&self, user_id: Option<i64>);

    async fn get_debate(&self, id: i64) -> ClientResult<DebateDetail>;

    /// Ask the debaters for another round, optionally with a judge message
    async fn create_turn(&self, id: i64, judge_message: Option<&str>)
        -> ClientResult<DebateDetail>;

    async fn submit_judgement(&self, id: i64, submission: &JudgementSubmission)
        -> ClientResult<()>;

    async fn list_files(&self) -> ClientResult<Vec<FileSummary>>;

    async fn get_file(&self, path_hash: &str) -> ClientResult<FileDetail>;

    async fn get_row(&self, path_hash: &str, row: u32) -> ClientResult<RowDetail>;

    async fn get_user(&self, id: i64) -> ClientResult<User>;

    /// Log in by name, returning the user id the backend put in the session cookie
    async fn login(&self, user_name: &str) -> ClientResult<i64>;

    async fn playground_debates(&self) -> ClientResult<Vec<Debate>>;

    /// Start a playground debate, returning its id
    async fn create_playground_debate(&self, request: &NewPlaygroundDebate) -> ClientResult<i64>;

    async fn debater_configs(&self) -> ClientResult<DebaterConfigs>;

    async fn completed_debates(&self) -> ClientResult<Vec<Debate>>;

    /// Next debate assigned to the current judge, if any
    async fn next_debate(&self) -> ClientResult<Option<DebateDetail>>;
}

/// [`DebateApi`] over HTTP
#[derive(Debug)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
    user_id: RwLock<Option<i64>>,
}

impl HttpApi {
    /// Create a client for the configured backend
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
            user_id: RwLock::new(None),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, %url, "API request");
        let builder = self.client.request(method, url);
        match self.session() {
            Some(id) => builder.header(COOKIE, format!("{SESSION_COOKIE}={id}")),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> ClientResult<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response.text().await.unwrap_or_default();
        let err = ClientError::from_response(status.as_u16(), content_type.as_deref(), &body);
        tracing::debug!(status = status.as_u16(), error = %err, "API request failed");
        Err(err)
    }

    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        let response = self.send(builder).await?;
        response
            .json()
            .await
            .map_err(|e| ClientError::Transport(format!("invalid response: {e}")))
    }
}

/// Value of the session cookie among a response's `Set-Cookie` headers
pub fn session_cookie<'a>(set_cookie: impl IntoIterator<Item = &'a str>) -> Option<i64> {
    set_cookie.into_iter().find_map(|header| {
        let pair = header.split(';').next()?.trim();
        let (name, value) = pair.split_once('=')?;
        if name.trim() != SESSION_COOKIE {
            return None;
        }
        value.trim().trim_matches('"').parse().ok()
    })
}

#[async_trait]
impl DebateApi for HttpApi {
    fn session(&self) -> Option<i64> {
        *self.user_id.read().unwrap_or_else(|e| e.into_inner())
    }

    fn set_session(&self, user_id: Option<i64>) {
        *self.user_id.write().unwrap_or_else(|e| e.into_inner()) = user_id;
    }

    async fn get_debate(&self, id: i64) -> ClientResult<DebateDetail> {
        self.fetch(self.request(Method::GET, &format!("/api/debates/{id}")))
            .await
    }

    async fn create_turn(
        &self,
        id: i64,
        judge_message: Option<&str>,
    ) -> ClientResult<DebateDetail> {
        let body = TurnRequest { judge_message };
        self.fetch(
            self.request(Method::POST, &format!("/api/debates/{id}/turn"))
                .json(&body),
        )
        .await
    }

    async fn submit_judgement(
        &self,
        id: i64,
        submission: &JudgementSubmission,
    ) -> ClientResult<()> {
        self.send(
            self.request(Method::POST, &format!("/api/debates/{id}/judgements"))
                .json(submission),
        )
        .await?;
        Ok(())
    }

    async fn list_files(&self) -> ClientResult<Vec<FileSummary>> {
        self.fetch(self.request(Method::GET, "/api/files")).await
    }

    async fn get_file(&self, path_hash: &str) -> ClientResult<FileDetail> {
        self.fetch(self.request(Method::GET, &format!("/api/files/{path_hash}")))
            .await
    }

    async fn get_row(&self, path_hash: &str, row: u32) -> ClientResult<RowDetail> {
        self.fetch(self.request(Method::GET, &format!("/api/files/{path_hash}/row/{row}")))
            .await
    }

    async fn get_user(&self, id: i64) -> ClientResult<User> {
        self.fetch(self.request(Method::GET, &format!("/api/users/{id}")))
            .await
    }

    async fn login(&self, user_name: &str) -> ClientResult<i64> {
        let response = self
            .send(
                self.request(Method::POST, "/api/users/login")
                    .json(&LoginRequest { user_name }),
            )
            .await?;

        let user_id = session_cookie(
            response
                .headers()
                .get_all(SET_COOKIE)
                .iter()
                .filter_map(|v| v.to_str().ok()),
        )
        .ok_or_else(|| {
            ClientError::Session("login succeeded but no session cookie was set".to_string())
        })?;

        self.set_session(Some(user_id));
        Ok(user_id)
    }

    async fn playground_debates(&self) -> ClientResult<Vec<Debate>> {
        let list: DebateList = self
            .fetch(self.request(Method::GET, "/api/playground/debates"))
            .await?;
        Ok(list.debates)
    }

    async fn create_playground_debate(&self, request: &NewPlaygroundDebate) -> ClientResult<i64> {
        let created: Created = self
            .fetch(
                self.request(Method::POST, "/api/playground/debates")
                    .json(request),
            )
            .await?;
        Ok(created.id)
    }

    async fn debater_configs(&self) -> ClientResult<DebaterConfigs> {
        self.fetch(self.request(Method::GET, "/api/playground/debater_configs"))
            .await
    }

    async fn completed_debates(&self) -> ClientResult<Vec<Debate>> {
        let list: DebateList = self
            .fetch(self.request(Method::GET, "/api/experiments/completed_debates"))
            .await?;
        Ok(list.debates)
    }

    async fn next_debate(&self) -> ClientResult<Option<DebateDetail>> {
        self.fetch(self.request(Method::GET, "/api/debates/next"))
            .await
    }
}
