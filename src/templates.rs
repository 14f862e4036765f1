//! HTML pages rendered with minijinja.

use minijinja::{context, Environment};

use crate::models::{Choice, Question};

pub const INDEX: &str = "index.html";
pub const DETAIL: &str = "detail.html";
pub const RESULTS: &str = "results.html";

pub const NO_CHOICE_SELECTED: &str = "You didn't select a choice.";

/// Builds the environment with every page template embedded.
pub fn environment() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template(INDEX, include_str!("../templates/index.html"))?;
    env.add_template(DETAIL, include_str!("../templates/detail.html"))?;
    env.add_template(RESULTS, include_str!("../templates/results.html"))?;
    Ok(env)
}

pub fn render_index(
    env: &Environment<'_>,
    latest_question_list: &[Question],
) -> Result<String, minijinja::Error> {
    env.get_template(INDEX)?
        .render(context! { latest_question_list })
}

pub fn render_detail(
    env: &Environment<'_>,
    question: &Question,
    choices: &[Choice],
    error_message: Option<&str>,
) -> Result<String, minijinja::Error> {
    env.get_template(DETAIL)?
        .render(context! { question, choices, error_message })
}

pub fn render_results(
    env: &Environment<'_>,
    question: &Question,
    choices: &[Choice],
) -> Result<String, minijinja::Error> {
    env.get_template(RESULTS)?
        .render(context! { question, choices })
}
