//! State

use std::sync::Arc;

use trolley_app::{context::AppContext, domain::carts::CartsService};

#[derive(Clone)]
pub(crate) struct State {
    pub(crate) carts: Arc<dyn CartsService>,
}

impl State {
    #[must_use]
    pub(crate) fn new(carts: Arc<dyn CartsService>) -> Self {
        Self { carts }
    }

    #[must_use]
    pub(crate) fn from_app_context(app: &AppContext) -> Arc<Self> {
        Arc::new(Self::new(app.carts.clone()))
    }
}
