//! Persistence port for questions and their choices.

mod memory;
mod postgres;

pub use memory::InMemoryQuestionStore;
pub use postgres::PgQuestionStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{Choice, NewChoice, NewQuestion, Question};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("question not found: {0}")]
    QuestionNotFound(i64),

    #[error("choice not found: {0}")]
    ChoiceNotFound(i64),

    #[error("vote tally overflow for choice {0}")]
    TallyOverflow(i64),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store lock poisoned: {0}")]
    Poisoned(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PubDateOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

/// Typed filter and sort applied by [`QuestionStore::questions`].
#[derive(Debug, Clone, Copy, Default)]
pub struct QuestionQuery {
    /// Keep only questions visible at this instant. `None` keeps everything.
    pub visible_at: Option<DateTime<Utc>>,
    pub order: PubDateOrder,
    pub limit: Option<usize>,
}

impl QuestionQuery {
    pub fn visible_at(now: DateTime<Utc>) -> Self {
        Self {
            visible_at: Some(now),
            ..Self::default()
        }
    }

    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }
}

#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// Stores a question and returns it with its assigned identifier.
    async fn create_question(&self, new: NewQuestion) -> StoreResult<Question>;

    /// Attaches a choice to an existing question.
    ///
    /// Fails with [`StoreError::QuestionNotFound`] for an unknown question.
    async fn add_choice(&self, question_id: i64, new: NewChoice) -> StoreResult<Choice>;

    async fn find_question(&self, id: i64) -> StoreResult<Option<Question>>;

    async fn questions(&self, query: &QuestionQuery) -> StoreResult<Vec<Question>>;

    /// Choices of a question ordered by identifier.
    async fn choices(&self, question_id: i64) -> StoreResult<Vec<Choice>>;

    /// Increments the tally of `choice_id` and returns the updated choice.
    ///
    /// Fails with [`StoreError::ChoiceNotFound`] when the choice does not
    /// belong to `question_id`.
    async fn record_vote(&self, question_id: i64, choice_id: i64) -> StoreResult<Choice>;
}
