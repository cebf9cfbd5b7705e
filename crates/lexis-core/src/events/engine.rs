//! Inbound event dispatch.
//!
//! Events come from an untrusted producer (a page observer scraping review
//! UI), so every field is checked before it reaches the repository or the
//! quiz coordinator. [`ReviewEngine::handle`] never fails: each event yields
//! a definite [`EventOutcome`].

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::hint::ShowAfterHint;
use crate::config::LexisConfig;
use crate::error::{ErrorCode, LexisError, LexisResult};
use crate::repository::VocabularyRepository;
use crate::session::{QuizCoordinator, SessionState, Verdict};
use crate::traits::RemoteStore;
use crate::types::{RecordPatch, VocabularyRecord};

/// Event reported by an external collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReviewEvent {
    /// The learner met a new word. `show_after_seconds` is raw producer input.
    WordExposed {
        word: String,
        #[serde(default)]
        description: String,
        show_after_seconds: f64,
    },
    /// The learner typed an answer for `word`.
    AnswerSubmitted { word: String, answer: String },
    /// The learner asked to try the current word again.
    RetryRequested,
    /// Manual edit from the vocabulary manager.
    ItemEdited {
        word: String,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        show_after_seconds: Option<f64>,
    },
    /// Manual delete from the vocabulary manager.
    ItemDeleted { word: String },
}

impl ReviewEvent {
    /// Build a `WordExposed` event from the UI affordance text.
    ///
    /// `None` when `hint_text` holds no "Show in N unit" phrase.
    pub fn exposed_with_hint(
        word: impl Into<String>,
        description: impl Into<String>,
        hint_text: &str,
    ) -> Option<Self> {
        let hint = ShowAfterHint::parse(hint_text)?;
        Some(Self::WordExposed {
            word: word.into(),
            description: description.into(),
            show_after_seconds: hint.seconds() as f64,
        })
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::WordExposed { .. } => "word_exposed",
            Self::AnswerSubmitted { .. } => "answer_submitted",
            Self::RetryRequested => "retry_requested",
            Self::ItemEdited { .. } => "item_edited",
            Self::ItemDeleted { .. } => "item_deleted",
        }
    }
}

/// Result of handling one event.
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    Added(VocabularyRecord),
    /// The word was already in the collection; nothing changed.
    AlreadyKnown { word: String },
    Graded(Verdict),
    RetryStarted { word: String },
    Edited(VocabularyRecord),
    Deleted { word: String },
    /// The event was malformed or not applicable in the current state.
    Rejected { reason: String, code: ErrorCode },
}

impl EventOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

impl From<LexisError> for EventOutcome {
    fn from(err: LexisError) -> Self {
        Self::Rejected {
            code: err.code(),
            reason: err.to_string(),
        }
    }
}

fn require_word(word: &str) -> LexisResult<()> {
    if word.trim().is_empty() {
        return Err(LexisError::missing_field("word"));
    }
    Ok(())
}

fn checked_seconds(value: f64) -> LexisResult<u64> {
    if !value.is_finite() {
        return Err(LexisError::validation(format!(
            "show_after_seconds must be finite, got {}",
            value
        )));
    }
    if value < 0.0 {
        return Err(LexisError::validation(format!(
            "show_after_seconds must not be negative, got {}",
            value
        )));
    }
    Ok(value.round() as u64)
}

/// Event-driven facade over the repository and the quiz coordinator.
pub struct ReviewEngine {
    repo: Arc<VocabularyRepository>,
    quiz: Mutex<QuizCoordinator>,
}

impl ReviewEngine {
    /// Create an engine driving `quiz`, which must share `repo`.
    pub fn new(repo: Arc<VocabularyRepository>, quiz: QuizCoordinator) -> Self {
        Self {
            repo,
            quiz: Mutex::new(quiz),
        }
    }

    /// Build storage, sync, and the coordinator from configuration.
    pub fn from_config(
        config: &LexisConfig,
        remote: Option<Arc<dyn RemoteStore>>,
    ) -> LexisResult<Self> {
        let repo = Arc::new(VocabularyRepository::from_config(config, remote)?);
        let quiz =
            QuizCoordinator::new(Arc::clone(&repo)).with_reminder_enabled(config.reminder_enabled);
        Ok(Self::new(repo, quiz))
    }

    pub fn repository(&self) -> &Arc<VocabularyRepository> {
        &self.repo
    }

    /// Lock the coordinator for direct session control.
    pub async fn quiz(&self) -> tokio::sync::MutexGuard<'_, QuizCoordinator> {
        self.quiz.lock().await
    }

    /// Records due at `now` (epoch milliseconds).
    pub async fn due_items(&self, now: i64) -> Vec<VocabularyRecord> {
        self.repo.get_due_items(now).await
    }

    /// The whole collection.
    pub async fn all_items(&self) -> Vec<VocabularyRecord> {
        self.repo.get_all().await
    }

    /// Pull and merge the remote collection.
    pub async fn sync(&self) -> bool {
        self.repo.sync_with_remote().await
    }

    /// Validate and apply one event.
    pub async fn handle(&self, event: ReviewEvent) -> EventOutcome {
        let kind = event.kind();
        let outcome = match self.dispatch(event).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(event = kind, error = %e, "Rejected review event");
                EventOutcome::from(e)
            }
        };
        debug!(event = kind, rejected = outcome.is_rejected(), "Handled review event");
        outcome
    }

    async fn dispatch(&self, event: ReviewEvent) -> LexisResult<EventOutcome> {
        match event {
            ReviewEvent::WordExposed {
                word,
                description,
                show_after_seconds,
            } => {
                require_word(&word)?;
                let seconds = checked_seconds(show_after_seconds)?;
                match self.repo.try_add(&word, &description, seconds).await {
                    Ok(record) => Ok(EventOutcome::Added(record)),
                    Err(LexisError::DuplicateKey { word, .. }) => {
                        Ok(EventOutcome::AlreadyKnown { word })
                    }
                    Err(e) => Err(e),
                }
            }

            ReviewEvent::AnswerSubmitted { word, answer } => {
                require_word(&word)?;
                let mut quiz = self.quiz.lock().await;

                let presenting = quiz.session().and_then(|s| match s.state() {
                    SessionState::Presenting | SessionState::Graded => Some(s.word().to_string()),
                    SessionState::Advanced => None,
                });
                match presenting {
                    Some(current) if current != word => {
                        return Err(LexisError::validation(format!(
                            "answer for '{}' while '{}' is being reviewed",
                            word, current
                        )));
                    }
                    Some(_) => {}
                    None => {
                        quiz.present(&word).await?;
                    }
                }

                Ok(EventOutcome::Graded(quiz.submit(&answer).await?))
            }

            ReviewEvent::RetryRequested => {
                let mut quiz = self.quiz.lock().await;
                quiz.retry()?;
                let word = quiz
                    .session()
                    .map(|s| s.word().to_string())
                    .unwrap_or_default();
                Ok(EventOutcome::RetryStarted { word })
            }

            ReviewEvent::ItemEdited {
                word,
                description,
                show_after_seconds,
            } => {
                require_word(&word)?;
                let mut patch = RecordPatch::new();
                if let Some(description) = description {
                    patch = patch.description(description);
                }
                if let Some(seconds) = show_after_seconds {
                    patch = patch.show_after_seconds(checked_seconds(seconds)?);
                }
                if patch.is_empty() {
                    return Err(LexisError::validation("edit carries no fields"));
                }
                Ok(EventOutcome::Edited(self.repo.try_update(&word, &patch).await?))
            }

            ReviewEvent::ItemDeleted { word } => {
                require_word(&word)?;
                self.repo.try_delete(&word).await?;
                Ok(EventOutcome::Deleted { word })
            }
        }
    }
}
