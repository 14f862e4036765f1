// models.rs
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Width of the trailing window that counts as "recently published".
pub const RECENT_WINDOW: TimeDelta = TimeDelta::days(1);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Question {
    pub id: i64,
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
}

impl Question {
    /// True when `pub_date` lies in `[now - RECENT_WINDOW, now]`.
    ///
    /// Future-dated questions are never recent.
    pub fn was_published_recently(&self, now: DateTime<Utc>) -> bool {
        if self.pub_date > now {
            return false;
        }
        match now.checked_sub_signed(RECENT_WINDOW) {
            Some(window_start) => window_start <= self.pub_date,
            None => true,
        }
    }

    /// True once `pub_date` has been reached. Has no lower bound, unlike
    /// [`Question::was_published_recently`].
    pub fn is_visible(&self, now: DateTime<Utc>) -> bool {
        self.pub_date <= now
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Choice {
    pub id: i64,
    pub question_id: i64,
    pub choice_text: String,
    pub votes: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewQuestion {
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
}

impl NewQuestion {
    pub fn new(question_text: impl Into<String>, pub_date: DateTime<Utc>) -> Self {
        Self {
            question_text: question_text.into(),
            pub_date,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewChoice {
    pub choice_text: String,
}

impl NewChoice {
    pub fn new(choice_text: impl Into<String>) -> Self {
        Self {
            choice_text: choice_text.into(),
        }
    }
}

/// Form body posted to the vote route. Kept as raw text so a blank or garbled
/// `choice` reads as "nothing selected" instead of failing extraction.
#[derive(Debug, Default, Deserialize)]
pub struct VoteForm {
    pub choice: Option<String>,
}

impl VoteForm {
    pub fn choice_id(&self) -> Option<i64> {
        self.choice.as_deref()?.trim().parse().ok()
    }
}

/// Question as exposed by the JSON API.
#[derive(Debug, Serialize)]
pub struct QuestionSummary {
    pub id: i64,
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
    pub was_published_recently: bool,
}

impl QuestionSummary {
    pub fn from_question(question: &Question, now: DateTime<Utc>) -> Self {
        Self {
            id: question.id,
            question_text: question.question_text.clone(),
            pub_date: question.pub_date,
            was_published_recently: question.was_published_recently(now),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QuestionDetail {
    #[serde(flatten)]
    pub question: QuestionSummary,
    pub choices: Vec<Choice>,
}
