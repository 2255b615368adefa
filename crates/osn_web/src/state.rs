use std::sync::Arc;
use osn_scrapers::CurationManager;

pub struct AppState {
    pub manager: Arc<CurationManager>,
}

/// Which navigation tab a page belongs to. Chosen per request from the
/// route and handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Create,
    List,
}

impl View {
    pub const ALL: [View; 2] = [View::Create, View::List];

    pub fn path(self) -> &'static str {
        match self {
            View::Create => "/create",
            View::List => "/articles",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            View::Create => "✨ Create article",
            View::List => "📚 All articles",
        }
    }
}
