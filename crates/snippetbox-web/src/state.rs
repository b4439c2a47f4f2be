use std::sync::Arc;

use snippetbox_core::repositories::{SnippetRepository, UserRepository};

use crate::session::SessionManager;
use crate::templates::TemplateCache;

/// Shared handles every handler can reach.
#[derive(Clone)]
pub struct AppState {
    pub snippets: Arc<dyn SnippetRepository>,
    pub users: Arc<dyn UserRepository>,
    pub templates: Arc<TemplateCache>,
    pub sessions: Arc<SessionManager>,
}
