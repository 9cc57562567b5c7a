//! In-memory backend for testing

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, RwLock};
use std::time::Duration;

use async_trait::async_trait;

use rostrum_core::{Debate, DebateDetail, FileDetail, FileSummary, RowDetail, User};

use crate::api::{DebateApi, DebaterConfigs, JudgementSubmission, NewPlaygroundDebate};
use crate::error::{ClientError, ClientResult};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

fn not_found(what: &str) -> ClientError {
    ClientError::Api {
        status: 404,
        message: format!("{what} not found"),
    }
}

/// A backend that answers from memory.
///
/// Turn requests pop queued results; when the queue is empty the stored
/// debate is returned with one more round.
#[derive(Debug, Default)]
pub struct MockApi {
    session: RwLock<Option<i64>>,
    users: Mutex<BTreeMap<i64, User>>,
    debates: Mutex<BTreeMap<i64, DebateDetail>>,
    turn_results: Mutex<VecDeque<ClientResult<DebateDetail>>>,
    turn_delay: Duration,
    judgements: Mutex<Vec<(i64, JudgementSubmission)>>,
    created: Mutex<Vec<NewPlaygroundDebate>>,
    user_fetches: AtomicUsize,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, user: User) -> Self {
        lock(&self.users).insert(user.id, user);
        self
    }

    pub fn with_debate(self, debate: DebateDetail) -> Self {
        lock(&self.debates).insert(debate.id, debate);
        self
    }

    /// Delay every turn request
    pub fn with_turn_delay(mut self, delay: Duration) -> Self {
        self.turn_delay = delay;
        self
    }

    /// Queue the outcome of the next turn request
    pub fn push_turn(&self, result: ClientResult<DebateDetail>) {
        lock(&self.turn_results).push_back(result);
    }

    /// Judgements submitted so far
    pub fn judgements(&self) -> Vec<(i64, JudgementSubmission)> {
        lock(&self.judgements).clone()
    }

    /// Playground debates requested so far
    pub fn created(&self) -> Vec<NewPlaygroundDebate> {
        lock(&self.created).clone()
    }

    /// Number of user profile requests
    pub fn user_fetches(&self) -> usize {
        self.user_fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DebateApi for MockApi {
    fn session(&self) -> Option<i64> {
        *self.session.read().unwrap_or_else(|e| e.into_inner())
    }

    fn set_session(&self, user_id: Option<i64>) {
        *self.session.write().unwrap_or_else(|e| e.into_inner()) = user_id;
    }

    async fn get_debate(&self, id: i64) -> ClientResult<DebateDetail> {
        lock(&self.debates)
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("Debate"))
    }

    async fn create_turn(
        &self,
        id: i64,
        judge_message: Option<&str>,
    ) -> ClientResult<DebateDetail> {
        if !self.turn_delay.is_zero() {
            tokio::time::sleep(self.turn_delay).await;
        }
        let queued = lock(&self.turn_results).pop_front();
        if let Some(result) = queued {
            return result;
        }

        let mut debates = lock(&self.debates);
        let debate = debates.get_mut(&id).ok_or_else(|| not_found("Debate"))?;
        let n = debate.transcript.rounds.len() + 1;
        debate.transcript.rounds.push(rostrum_core::Round {
            correct: Some(format!("Argument {n} for the correct answer")),
            incorrect: Some(format!("Argument {n} for the incorrect answer")),
            judge: judge_message.map(str::to_owned),
            ..rostrum_core::Round::default()
        });
        Ok(debate.clone())
    }

    async fn submit_judgement(
        &self,
        id: i64,
        submission: &JudgementSubmission,
    ) -> ClientResult<()> {
        if !lock(&self.debates).contains_key(&id) {
            return Err(not_found("Debate"));
        }
        lock(&self.judgements).push((id, submission.clone()));
        Ok(())
    }

    async fn list_files(&self) -> ClientResult<Vec<FileSummary>> {
        Ok(Vec::new())
    }

    async fn get_file(&self, _path_hash: &str) -> ClientResult<FileDetail> {
        Err(not_found("File"))
    }

    async fn get_row(&self, _path_hash: &str, _row: u32) -> ClientResult<RowDetail> {
        Err(not_found("Row"))
    }

    async fn get_user(&self, id: i64) -> ClientResult<User> {
        self.user_fetches.fetch_add(1, Ordering::SeqCst);
        lock(&self.users)
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("User"))
    }

    async fn login(&self, user_name: &str) -> ClientResult<i64> {
        let id = lock(&self.users)
            .values()
            .find(|u| u.user_name == user_name)
            .map(|u| u.id)
            .ok_or_else(|| not_found("User"))?;
        self.set_session(Some(id));
        Ok(id)
    }

    async fn playground_debates(&self) -> ClientResult<Vec<Debate>> {
        Ok(lock(&self.debates)
            .values()
            .filter(|d| d.experiment.is_none())
            .map(|d| d.debate.clone())
            .collect())
    }

    async fn create_playground_debate(&self, request: &NewPlaygroundDebate) -> ClientResult<i64> {
        let mut created = lock(&self.created);
        created.push(request.clone());
        Ok(1000 + created.len() as i64)
    }

    async fn debater_configs(&self) -> ClientResult<DebaterConfigs> {
        Ok(DebaterConfigs::default())
    }

    async fn completed_debates(&self) -> ClientResult<Vec<Debate>> {
        Ok(lock(&self.debates)
            .values()
            .filter(|d| d.experiment.is_some() && d.judgement.is_some())
            .map(|d| d.debate.clone())
            .collect())
    }

    async fn next_debate(&self) -> ClientResult<Option<DebateDetail>> {
        Ok(lock(&self.debates)
            .values()
            .find(|d| d.experiment.is_some() && d.judgement.is_none())
            .cloned())
    }
}
