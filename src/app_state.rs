use std::sync::Arc;

use minijinja::Environment;

use crate::clock::SharedClock;
use crate::store::QuestionStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn QuestionStore>,
    pub clock: SharedClock,
    pub templates: Arc<Environment<'static>>,
    pub index_limit: Option<usize>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn QuestionStore>,
        clock: SharedClock,
    ) -> Result<Self, minijinja::Error> {
        Ok(Self {
            store,
            clock,
            templates: Arc::new(crate::templates::environment()?),
            index_limit: None,
        })
    }

    pub fn with_index_limit(mut self, index_limit: Option<usize>) -> Self {
        self.index_limit = index_limit;
        self
    }
}
