//! Quiz session coordinator.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use strum::{Display, EnumString};
use tracing::{debug, info, warn};

use crate::error::{LexisError, LexisResult};
use crate::repository::VocabularyRepository;
use crate::scheduler::ScheduleUpdate;
use crate::types::VocabularyRecord;

/// Where the active session is in its presentation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SessionState {
    /// Item shown, waiting for exactly one answer.
    Presenting,
    /// Answer graded, verdict available.
    Graded,
    /// Session finished.
    Advanced,
}

/// Outcome of grading one answer.
///
/// Carries what downstream collaborators (dictionary or explanation lookups)
/// need; the coordinator never calls them itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub was_correct: bool,
    pub word: String,
    pub description: String,
    pub answer: String,
    /// The persisted interval change, or `None` for a retry or a failed write.
    pub scheduled: Option<ScheduleUpdate>,
}

/// One presentation-to-resolution cycle for a single record.
#[derive(Debug, Clone)]
pub struct QuizSession {
    record: VocabularyRecord,
    state: SessionState,
    is_retry: bool,
    verdict: Option<Verdict>,
    rewrite_confirmed: bool,
}

impl QuizSession {
    fn new(record: VocabularyRecord) -> Self {
        Self {
            record,
            state: SessionState::Presenting,
            is_retry: false,
            verdict: None,
            rewrite_confirmed: false,
        }
    }

    pub fn record(&self) -> &VocabularyRecord {
        &self.record
    }

    pub fn word(&self) -> &str {
        &self.record.word
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True once the learner asked to retry; further answers do not reschedule.
    pub fn is_retry(&self) -> bool {
        self.is_retry
    }

    pub fn verdict(&self) -> Option<&Verdict> {
        self.verdict.as_ref()
    }

    pub fn rewrite_confirmed(&self) -> bool {
        self.rewrite_confirmed
    }
}

/// Trim and case-fold an answer for comparison.
pub fn normalize_answer(answer: &str) -> String {
    answer.trim().to_lowercase()
}

/// Drives one quiz session at a time against a [`VocabularyRepository`].
///
/// ```text
/// Presenting --submit--> Graded --advance--> Advanced --start--> Presenting
///                          |
///                          +--retry--> Presenting (no further rescheduling)
/// ```
pub struct QuizCoordinator {
    repo: Arc<VocabularyRepository>,
    session: Option<QuizSession>,
    reminder_enabled: bool,
    rewrite_gate: bool,
    rng: StdRng,
}

impl QuizCoordinator {
    /// Create a coordinator with reminders on and the rewrite gate off.
    pub fn new(repo: Arc<VocabularyRepository>) -> Self {
        Self {
            repo,
            session: None,
            reminder_enabled: true,
            rewrite_gate: false,
            rng: StdRng::from_entropy(),
        }
    }

    /// Turn presentation on or off. When off, `start` and `advance` never
    /// open a session.
    pub fn with_reminder_enabled(mut self, enabled: bool) -> Self {
        self.reminder_enabled = enabled;
        self
    }

    /// Require a sentence containing the word before `advance` is accepted.
    pub fn with_rewrite_gate(mut self, enabled: bool) -> Self {
        self.rewrite_gate = enabled;
        self
    }

    /// Seed the due-item selection.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn repository(&self) -> &Arc<VocabularyRepository> {
        &self.repo
    }

    /// The active session, if any.
    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    fn state_name(&self) -> String {
        self.session
            .as_ref()
            .map(|s| s.state.to_string())
            .unwrap_or_else(|| "idle".to_string())
    }

    fn is_active(&self) -> bool {
        matches!(
            self.session.as_ref().map(|s| s.state),
            Some(SessionState::Presenting | SessionState::Graded)
        )
    }

    fn session_in(&mut self, action: &str, state: SessionState) -> LexisResult<&mut QuizSession> {
        let current = self.state_name();
        match self.session.as_mut() {
            Some(session) if session.state == state => Ok(session),
            _ => Err(LexisError::invalid_transition(action, current)),
        }
    }

    /// Open a session on a uniformly chosen due item.
    ///
    /// `Ok(None)` when nothing is due or reminders are off.
    pub async fn start(&mut self, now: i64) -> LexisResult<Option<&QuizSession>> {
        if self.is_active() {
            return Err(LexisError::invalid_transition("start", self.state_name()));
        }
        self.open_next(now).await
    }

    /// Open a session on a specific word.
    pub async fn present(&mut self, word: &str) -> LexisResult<&QuizSession> {
        if self.is_active() {
            return Err(LexisError::invalid_transition("present", self.state_name()));
        }
        let record = self
            .repo
            .find(word)
            .await
            .ok_or_else(|| LexisError::not_found(word))?;

        debug!(word = %record.word, "Presenting vocabulary item");
        Ok(&*self.session.insert(QuizSession::new(record)))
    }

    async fn open_next(&mut self, now: i64) -> LexisResult<Option<&QuizSession>> {
        if !self.reminder_enabled {
            self.session = None;
            return Ok(None);
        }

        match self.repo.pick_due_item_with_rng(now, &mut self.rng).await {
            Some(record) => {
                debug!(word = %record.word, "Presenting vocabulary item");
                Ok(Some(&*self.session.insert(QuizSession::new(record))))
            }
            None => {
                debug!("No vocabulary items are due for review");
                self.session = None;
                Ok(None)
            }
        }
    }

    /// Grade `answer` against the presented word.
    ///
    /// Reschedules the record exactly once per session; after a retry the
    /// verdict is computed but nothing is persisted. A failed reschedule is
    /// logged and shows up as `scheduled: None`.
    pub async fn submit(&mut self, answer: &str) -> LexisResult<Verdict> {
        let session = self.session_in("submit", SessionState::Presenting)?;
        let word = session.record.word.clone();
        let is_retry = session.is_retry;
        let was_correct = normalize_answer(answer) == normalize_answer(&word);

        let scheduled = if is_retry {
            None
        } else {
            match self.repo.try_update_review_interval(&word, was_correct).await {
                Ok(update) => Some(update),
                Err(e) => {
                    warn!(word = %word, error = %e, "Failed to reschedule after review");
                    None
                }
            }
        };

        let session = self.session_in("submit", SessionState::Presenting)?;
        let verdict = Verdict {
            was_correct,
            word,
            description: session.record.description.clone(),
            answer: answer.to_string(),
            scheduled,
        };
        session.verdict = Some(verdict.clone());
        session.state = SessionState::Graded;

        info!(word = %verdict.word, was_correct, is_retry, "Graded answer");
        Ok(verdict)
    }

    /// Discard the verdict and present the same word again.
    pub fn retry(&mut self) -> LexisResult<()> {
        let session = self.session_in("retry", SessionState::Graded)?;
        session.verdict = None;
        session.rewrite_confirmed = false;
        session.is_retry = true;
        session.state = SessionState::Presenting;
        debug!(word = %session.record.word, "Retrying vocabulary item");
        Ok(())
    }

    /// Check a practice sentence for the graded word. Returns whether it
    /// satisfied the rewrite gate.
    pub fn confirm_rewrite(&mut self, sentence: &str) -> LexisResult<bool> {
        let session = self.session_in("confirm_rewrite", SessionState::Graded)?;
        let matched = sentence
            .to_lowercase()
            .contains(&session.record.word.to_lowercase());
        session.rewrite_confirmed = matched;
        Ok(matched)
    }

    /// End the graded session and open the next due one, if any.
    pub async fn advance(&mut self, now: i64) -> LexisResult<Option<&QuizSession>> {
        let gate = self.rewrite_gate;
        let session = self.session_in("advance", SessionState::Graded)?;
        if gate && !session.rewrite_confirmed {
            return Err(LexisError::invalid_transition("advance", "awaiting_rewrite"));
        }
        session.state = SessionState::Advanced;

        self.open_next(now).await
    }

    /// Drop the active session without touching scheduling.
    pub fn close(&mut self) {
        if let Some(session) = self.session.take() {
            debug!(word = %session.record.word, state = %session.state, "Closed quiz session");
        }
    }
}
