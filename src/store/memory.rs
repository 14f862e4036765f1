//! In-memory question store.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use super::{PubDateOrder, QuestionQuery, QuestionStore, StoreError, StoreResult};
use crate::models::{Choice, NewChoice, NewQuestion, Question};

/// Thread-safe store keeping everything in process memory. Identifiers are
/// assigned sequentially starting at 1.
#[derive(Debug, Clone, Default)]
pub struct InMemoryQuestionStore {
    state: Arc<RwLock<State>>,
}

#[derive(Debug, Default)]
struct State {
    questions: BTreeMap<i64, Question>,
    choices: BTreeMap<i64, Choice>,
    last_question_id: i64,
    last_choice_id: i64,
}

impl InMemoryQuestionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, State>> {
        self.state
            .read()
            .map_err(|err| StoreError::Poisoned(err.to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, State>> {
        self.state
            .write()
            .map_err(|err| StoreError::Poisoned(err.to_string()))
    }
}

#[async_trait]
impl QuestionStore for InMemoryQuestionStore {
    async fn create_question(&self, new: NewQuestion) -> StoreResult<Question> {
        let mut state = self.write()?;
        state.last_question_id += 1;
        let question = Question {
            id: state.last_question_id,
            question_text: new.question_text,
            pub_date: new.pub_date,
        };
        state.questions.insert(question.id, question.clone());
        Ok(question)
    }

    async fn add_choice(&self, question_id: i64, new: NewChoice) -> StoreResult<Choice> {
        let mut state = self.write()?;
        if !state.questions.contains_key(&question_id) {
            return Err(StoreError::QuestionNotFound(question_id));
        }
        state.last_choice_id += 1;
        let choice = Choice {
            id: state.last_choice_id,
            question_id,
            choice_text: new.choice_text,
            votes: 0,
        };
        state.choices.insert(choice.id, choice.clone());
        Ok(choice)
    }

    async fn find_question(&self, id: i64) -> StoreResult<Option<Question>> {
        Ok(self.read()?.questions.get(&id).cloned())
    }

    async fn questions(&self, query: &QuestionQuery) -> StoreResult<Vec<Question>> {
        let state = self.read()?;
        let mut questions: Vec<Question> = state
            .questions
            .values()
            .filter(|question| {
                query
                    .visible_at
                    .map_or(true, |now| question.is_visible(now))
            })
            .cloned()
            .collect();

        questions.sort_by_key(|question| (question.pub_date, question.id));
        if query.order == PubDateOrder::NewestFirst {
            questions.reverse();
        }
        if let Some(limit) = query.limit {
            questions.truncate(limit);
        }
        Ok(questions)
    }

    async fn choices(&self, question_id: i64) -> StoreResult<Vec<Choice>> {
        let state = self.read()?;
        Ok(state
            .choices
            .values()
            .filter(|choice| choice.question_id == question_id)
            .cloned()
            .collect())
    }

    async fn record_vote(&self, question_id: i64, choice_id: i64) -> StoreResult<Choice> {
        let mut state = self.write()?;
        let choice = state
            .choices
            .get_mut(&choice_id)
            .filter(|choice| choice.question_id == question_id)
            .ok_or(StoreError::ChoiceNotFound(choice_id))?;
        choice.votes = choice
            .votes
            .checked_add(1)
            .ok_or(StoreError::TallyOverflow(choice_id))?;
        Ok(choice.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};
    use rstest::{fixture, rstest};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    #[fixture]
    fn store() -> InMemoryQuestionStore {
        InMemoryQuestionStore::new()
    }

    async fn seed(store: &InMemoryQuestionStore, text: &str, offset: TimeDelta) -> Question {
        store
            .create_question(NewQuestion::new(text, now() + offset))
            .await
            .expect("create question")
    }

    #[rstest]
    #[tokio::test]
    async fn assigns_sequential_ids(store: InMemoryQuestionStore) {
        let first = seed(&store, "first", TimeDelta::zero()).await;
        let second = seed(&store, "second", TimeDelta::zero()).await;
        assert_eq!((first.id, second.id), (1, 2));
        assert_eq!(store.find_question(2).await.unwrap(), Some(second));
        assert_eq!(store.find_question(3).await.unwrap(), None);
    }

    #[rstest]
    #[tokio::test]
    async fn visible_query_drops_future_and_orders_newest_first(store: InMemoryQuestionStore) {
        let old = seed(&store, "old", -TimeDelta::days(30)).await;
        seed(&store, "future", TimeDelta::days(30)).await;
        let recent = seed(&store, "recent", -TimeDelta::days(4)).await;

        let visible = store
            .questions(&QuestionQuery::visible_at(now()))
            .await
            .unwrap();
        assert_eq!(visible, vec![recent, old]);
    }

    #[rstest]
    #[tokio::test]
    async fn unfiltered_query_respects_order_and_limit(store: InMemoryQuestionStore) {
        let a = seed(&store, "a", -TimeDelta::days(2)).await;
        let b = seed(&store, "b", TimeDelta::days(2)).await;
        seed(&store, "c", TimeDelta::days(5)).await;

        let query = QuestionQuery {
            visible_at: None,
            order: PubDateOrder::OldestFirst,
            limit: Some(2),
        };
        assert_eq!(store.questions(&query).await.unwrap(), vec![a, b]);
    }

    #[rstest]
    #[tokio::test]
    async fn choice_requires_existing_question(store: InMemoryQuestionStore) {
        let err = store
            .add_choice(42, NewChoice::new("Nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::QuestionNotFound(42)));
    }

    #[rstest]
    #[tokio::test]
    async fn votes_only_count_for_the_owning_question(store: InMemoryQuestionStore) {
        let first = seed(&store, "first", TimeDelta::zero()).await;
        let second = seed(&store, "second", TimeDelta::zero()).await;
        let choice = store
            .add_choice(first.id, NewChoice::new("Yes"))
            .await
            .unwrap();

        let voted = store.record_vote(first.id, choice.id).await.unwrap();
        assert_eq!(voted.votes, 1);

        let err = store.record_vote(second.id, choice.id).await.unwrap_err();
        assert!(matches!(err, StoreError::ChoiceNotFound(id) if id == choice.id));
        assert_eq!(store.choices(first.id).await.unwrap()[0].votes, 1);
        assert!(store.choices(second.id).await.unwrap().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn full_tally_rejects_another_vote(store: InMemoryQuestionStore) {
        let question = seed(&store, "popular", TimeDelta::zero()).await;
        let choice = store
            .add_choice(question.id, NewChoice::new("Yes"))
            .await
            .unwrap();
        store
            .state
            .write()
            .unwrap()
            .choices
            .get_mut(&choice.id)
            .unwrap()
            .votes = i32::MAX;

        let err = store.record_vote(question.id, choice.id).await.unwrap_err();
        assert!(matches!(err, StoreError::TallyOverflow(id) if id == choice.id));
        assert_eq!(store.choices(question.id).await.unwrap()[0].votes, i32::MAX);
    }
}
