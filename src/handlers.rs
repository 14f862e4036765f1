// handlers.rs
use axum::extract::{Form, FromRequestParts, Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Json;
use serde_json::{json, Value};

use crate::app_state::AppState;
use crate::errors::AppError;
use crate::models::{QuestionDetail, QuestionSummary, VoteForm};
use crate::poll::{self, VoteOutcome};
use crate::templates;

/// Question id taken from the path. Anything that is not an `i64` is a 404.
#[derive(Debug, serde::Deserialize, FromRequestParts)]
#[from_request(via(Path), rejection(AppError))]
pub struct QuestionId(pub i64);

/// Index page: latest published questions, or a notice when there are none.
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let now = state.clock.utc();
    let questions = poll::latest_questions(state.store.as_ref(), now, state.index_limit).await?;
    let html = templates::render_index(&state.templates, &questions)?;
    Ok(Html(html))
}

pub async fn detail(
    State(state): State<AppState>,
    QuestionId(question_id): QuestionId,
) -> Result<Html<String>, AppError> {
    let now = state.clock.utc();
    let (question, choices) =
        poll::question_with_choices(state.store.as_ref(), question_id, now).await?;
    let html = templates::render_detail(&state.templates, &question, &choices, None)?;
    Ok(Html(html))
}

pub async fn results(
    State(state): State<AppState>,
    QuestionId(question_id): QuestionId,
) -> Result<Html<String>, AppError> {
    let now = state.clock.utc();
    let (question, choices) =
        poll::question_with_choices(state.store.as_ref(), question_id, now).await?;
    let html = templates::render_results(&state.templates, &question, &choices)?;
    Ok(Html(html))
}

/// Records a vote and redirects to the results page, or re-renders the
/// detail page when nothing usable was selected.
pub async fn vote(
    State(state): State<AppState>,
    QuestionId(question_id): QuestionId,
    Form(form): Form<VoteForm>,
) -> Result<Response, AppError> {
    let now = state.clock.utc();
    match poll::vote(state.store.as_ref(), question_id, form.choice_id(), now).await? {
        VoteOutcome::Recorded(choice) => {
            let location = format!("/polls/{}/results/", choice.question_id);
            Ok(Redirect::to(&location).into_response())
        }
        VoteOutcome::NoChoiceSelected { question, choices } => {
            let html = templates::render_detail(
                &state.templates,
                &question,
                &choices,
                Some(templates::NO_CHOICE_SELECTED),
            )?;
            Ok(Html(html).into_response())
        }
    }
}

/// JSON flavour of the index page.
pub async fn list_questions(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let now = state.clock.utc();
    let questions = poll::latest_questions(state.store.as_ref(), now, state.index_limit).await?;
    let latest_question_list: Vec<QuestionSummary> = questions
        .iter()
        .map(|question| QuestionSummary::from_question(question, now))
        .collect();

    Ok(Json(json!({ "latest_question_list": latest_question_list })))
}

pub async fn get_question(
    State(state): State<AppState>,
    QuestionId(question_id): QuestionId,
) -> Result<Json<QuestionDetail>, AppError> {
    let now = state.clock.utc();
    let (question, choices) =
        poll::question_with_choices(state.store.as_ref(), question_id, now).await?;

    Ok(Json(QuestionDetail {
        question: QuestionSummary::from_question(&question, now),
        choices,
    }))
}
