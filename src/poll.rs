// src/poll.rs
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{Choice, Question};
use crate::store::{QuestionQuery, QuestionStore, StoreError};

#[derive(Debug, Error)]
pub enum PollError {
    /// Missing, or not published yet.
    #[error("question not found: {0}")]
    NotFound(i64),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug)]
pub enum VoteOutcome {
    Recorded(Choice),
    /// No choice was posted, or it belongs to another question.
    NoChoiceSelected { question: Question, choices: Vec<Choice> },
}

/// Every question published at or before `now`, newest first.
pub async fn list_visible_questions(
    store: &dyn QuestionStore,
    now: DateTime<Utc>,
) -> Result<Vec<Question>, PollError> {
    latest_questions(store, now, None).await
}

/// Like [`list_visible_questions`], truncated to `limit` when given.
pub async fn latest_questions(
    store: &dyn QuestionStore,
    now: DateTime<Utc>,
    limit: Option<usize>,
) -> Result<Vec<Question>, PollError> {
    let query = QuestionQuery::visible_at(now).with_limit(limit);
    Ok(store.questions(&query).await?)
}

/// Future-dated questions are reported as [`PollError::NotFound`], the same as
/// an unknown id.
pub async fn get_visible_question(
    store: &dyn QuestionStore,
    id: i64,
    now: DateTime<Utc>,
) -> Result<Question, PollError> {
    store
        .find_question(id)
        .await?
        .filter(|question| question.is_visible(now))
        .ok_or(PollError::NotFound(id))
}

pub async fn question_with_choices(
    store: &dyn QuestionStore,
    id: i64,
    now: DateTime<Utc>,
) -> Result<(Question, Vec<Choice>), PollError> {
    let question = get_visible_question(store, id, now).await?;
    let choices = store.choices(question.id).await?;
    Ok((question, choices))
}

pub async fn vote(
    store: &dyn QuestionStore,
    question_id: i64,
    choice_id: Option<i64>,
    now: DateTime<Utc>,
) -> Result<VoteOutcome, PollError> {
    let question = get_visible_question(store, question_id, now).await?;

    let Some(choice_id) = choice_id else {
        let choices = store.choices(question.id).await?;
        return Ok(VoteOutcome::NoChoiceSelected { question, choices });
    };

    match store.record_vote(question.id, choice_id).await {
        Ok(choice) => {
            tracing::debug!(question_id, choice_id, votes = choice.votes, "vote recorded");
            Ok(VoteOutcome::Recorded(choice))
        }
        Err(StoreError::ChoiceNotFound(_)) => {
            tracing::debug!(question_id, choice_id, "vote for unknown choice");
            let choices = store.choices(question.id).await?;
            Ok(VoteOutcome::NoChoiceSelected { question, choices })
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewChoice, NewQuestion};
    use crate::store::InMemoryQuestionStore;
    use chrono::{TimeDelta, TimeZone};
    use rstest::{fixture, rstest};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    #[fixture]
    fn store() -> InMemoryQuestionStore {
        InMemoryQuestionStore::new()
    }

    async fn past_question(store: &InMemoryQuestionStore, text: &str, days: i64) -> Question {
        store
            .create_question(NewQuestion::new(text, now() - TimeDelta::days(days)))
            .await
            .expect("create past question")
    }

    async fn future_question(store: &InMemoryQuestionStore, text: &str, days: i64) -> Question {
        store
            .create_question(NewQuestion::new(text, now() + TimeDelta::days(days)))
            .await
            .expect("create future question")
    }

    #[rstest]
    #[tokio::test]
    async fn no_questions_lists_nothing(store: InMemoryQuestionStore) {
        let listed = list_visible_questions(&store, now()).await.unwrap();
        assert!(listed.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn past_question_is_listed(store: InMemoryQuestionStore) {
        let question = past_question(&store, "Past question.", 30).await;
        let listed = list_visible_questions(&store, now()).await.unwrap();
        assert_eq!(listed, vec![question]);
    }

    #[rstest]
    #[tokio::test]
    async fn future_question_is_not_listed(store: InMemoryQuestionStore) {
        future_question(&store, "Future question.", 30).await;
        let listed = list_visible_questions(&store, now()).await.unwrap();
        assert!(listed.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn only_past_of_past_and_future_is_listed(store: InMemoryQuestionStore) {
        let question = past_question(&store, "Past question.", 30).await;
        future_question(&store, "Future question", 30).await;
        let listed = list_visible_questions(&store, now()).await.unwrap();
        assert_eq!(listed, vec![question]);
    }

    #[rstest]
    #[tokio::test]
    async fn past_questions_are_listed_newest_first(store: InMemoryQuestionStore) {
        let older = past_question(&store, "Past question 1", 30).await;
        let newer = past_question(&store, "Past question 2", 4).await;
        let listed = list_visible_questions(&store, now()).await.unwrap();
        assert_eq!(listed, vec![newer, older]);
    }

    #[rstest]
    #[tokio::test]
    async fn question_published_exactly_now_is_listed(store: InMemoryQuestionStore) {
        let question = past_question(&store, "Right now", 0).await;
        let listed = list_visible_questions(&store, now()).await.unwrap();
        assert_eq!(listed, vec![question]);
    }

    #[rstest]
    #[tokio::test]
    async fn latest_questions_honours_limit(store: InMemoryQuestionStore) {
        for days in 1..=7 {
            past_question(&store, &format!("Question {days}"), days).await;
        }
        let listed = latest_questions(&store, now(), Some(5)).await.unwrap();
        let texts: Vec<_> = listed.iter().map(|q| q.question_text.as_str()).collect();
        assert_eq!(
            texts,
            ["Question 1", "Question 2", "Question 3", "Question 4", "Question 5"]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn future_question_detail_is_not_found(store: InMemoryQuestionStore) {
        let question = future_question(&store, "Future question", 5).await;
        let err = get_visible_question(&store, question.id, now())
            .await
            .unwrap_err();
        assert!(matches!(err, PollError::NotFound(id) if id == question.id));
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_question_detail_is_not_found(store: InMemoryQuestionStore) {
        let err = get_visible_question(&store, 99, now()).await.unwrap_err();
        assert!(matches!(err, PollError::NotFound(99)));
    }

    #[rstest]
    #[tokio::test]
    async fn past_question_detail_is_returned(store: InMemoryQuestionStore) {
        let question = past_question(&store, "Past question", 5).await;
        let found = get_visible_question(&store, question.id, now())
            .await
            .unwrap();
        assert_eq!(found.question_text, "Past question");
    }

    #[rstest]
    #[tokio::test]
    async fn detail_becomes_visible_once_published(store: InMemoryQuestionStore) {
        let question = future_question(&store, "Soon", 5).await;
        let later = now() + TimeDelta::days(5);
        assert!(get_visible_question(&store, question.id, later).await.is_ok());
    }

    #[rstest]
    #[tokio::test]
    async fn vote_increments_the_selected_choice(store: InMemoryQuestionStore) {
        let question = past_question(&store, "Tabs or spaces?", 1).await;
        let tabs = store
            .add_choice(question.id, NewChoice::new("Tabs"))
            .await
            .unwrap();

        let outcome = vote(&store, question.id, Some(tabs.id), now()).await.unwrap();
        assert!(matches!(outcome, VoteOutcome::Recorded(choice) if choice.votes == 1));

        let (_, choices) = question_with_choices(&store, question.id, now())
            .await
            .unwrap();
        assert_eq!(choices[0].votes, 1);
    }

    #[rstest]
    #[case::nothing_posted(None)]
    #[case::unknown_choice(Some(404))]
    #[tokio::test]
    async fn vote_without_valid_choice_is_rejected(
        store: InMemoryQuestionStore,
        #[case] choice_id: Option<i64>,
    ) {
        let question = past_question(&store, "Tabs or spaces?", 1).await;
        store
            .add_choice(question.id, NewChoice::new("Tabs"))
            .await
            .unwrap();

        let outcome = vote(&store, question.id, choice_id, now()).await.unwrap();
        match outcome {
            VoteOutcome::NoChoiceSelected { question: q, choices } => {
                assert_eq!(q, question);
                assert_eq!(choices.len(), 1);
                assert_eq!(choices[0].votes, 0);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn vote_on_future_question_is_not_found(store: InMemoryQuestionStore) {
        let question = future_question(&store, "Not yet", 2).await;
        let choice = store
            .add_choice(question.id, NewChoice::new("Maybe"))
            .await
            .unwrap();

        let err = vote(&store, question.id, Some(choice.id), now())
            .await
            .unwrap_err();
        assert!(matches!(err, PollError::NotFound(_)));
        assert_eq!(store.choices(question.id).await.unwrap()[0].votes, 0);
    }
}
