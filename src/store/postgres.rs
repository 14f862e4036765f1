//! Postgres-backed question store.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::{PubDateOrder, QuestionQuery, QuestionStore, StoreError, StoreResult};
use crate::models::{Choice, NewChoice, NewQuestion, Question};

#[derive(Debug, Clone)]
pub struct PgQuestionStore {
    pool: PgPool,
}

impl PgQuestionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuestionStore for PgQuestionStore {
    async fn create_question(&self, new: NewQuestion) -> StoreResult<Question> {
        let question = sqlx::query_as::<_, Question>(
            "INSERT INTO polls_question (question_text, pub_date) \
             VALUES ($1, $2) \
             RETURNING id, question_text, pub_date",
        )
        .bind(&new.question_text)
        .bind(new.pub_date)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(id = question.id, "question created");
        Ok(question)
    }

    async fn add_choice(&self, question_id: i64, new: NewChoice) -> StoreResult<Choice> {
        if self.find_question(question_id).await?.is_none() {
            return Err(StoreError::QuestionNotFound(question_id));
        }

        let choice = sqlx::query_as::<_, Choice>(
            "INSERT INTO polls_choice (question_id, choice_text, votes) \
             VALUES ($1, $2, 0) \
             RETURNING id, question_id, choice_text, votes",
        )
        .bind(question_id)
        .bind(&new.choice_text)
        .fetch_one(&self.pool)
        .await?;

        Ok(choice)
    }

    async fn find_question(&self, id: i64) -> StoreResult<Option<Question>> {
        let question = sqlx::query_as::<_, Question>(
            "SELECT id, question_text, pub_date FROM polls_question WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(question)
    }

    async fn questions(&self, query: &QuestionQuery) -> StoreResult<Vec<Question>> {
        let mut builder = QueryBuilder::<Postgres>::new(
            "SELECT id, question_text, pub_date FROM polls_question WHERE 1=1",
        );

        if let Some(now) = query.visible_at {
            builder.push(" AND pub_date <= ");
            builder.push_bind(now);
        }

        builder.push(match query.order {
            PubDateOrder::NewestFirst => " ORDER BY pub_date DESC, id DESC",
            PubDateOrder::OldestFirst => " ORDER BY pub_date ASC, id ASC",
        });

        if let Some(limit) = query.limit {
            builder.push(" LIMIT ");
            builder.push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
        }

        let questions = builder
            .build_query_as::<Question>()
            .fetch_all(&self.pool)
            .await?;

        Ok(questions)
    }

    async fn choices(&self, question_id: i64) -> StoreResult<Vec<Choice>> {
        let choices = sqlx::query_as::<_, Choice>(
            "SELECT id, question_id, choice_text, votes FROM polls_choice \
             WHERE question_id = $1 ORDER BY id",
        )
        .bind(question_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(choices)
    }

    async fn record_vote(&self, question_id: i64, choice_id: i64) -> StoreResult<Choice> {
        // Increment in SQL; a read-modify-write here would drop concurrent votes.
        sqlx::query_as::<_, Choice>(
            "UPDATE polls_choice SET votes = votes + 1 \
             WHERE id = $1 AND question_id = $2 \
             RETURNING id, question_id, choice_text, votes",
        )
        .bind(choice_id)
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::ChoiceNotFound(choice_id))
    }
}
