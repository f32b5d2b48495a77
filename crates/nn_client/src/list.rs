use std::sync::Arc;

use nn_core::{ArticleSummary, LoadState, NewsApi, Store};
use tracing::{debug, error, info};

use crate::generation::{Generation, Ticket};

pub const LIST_ERROR_MESSAGE: &str = "Failed to load news articles";

pub type ArticleList = LoadState<Vec<ArticleSummary>>;

/// Fetches the summaries for the active date. When selections overlap, the
/// last one issued wins no matter which response arrives first.
pub struct ArticleListLoader {
    api: Arc<dyn NewsApi>,
    state: Store<ArticleList>,
    generation: Generation,
}

impl ArticleListLoader {
    pub fn new(api: Arc<dyn NewsApi>) -> Self {
        Self {
            api,
            state: Store::new(LoadState::Idle),
            generation: Generation::new(),
        }
    }

    pub fn state(&self) -> &Store<ArticleList> {
        &self.state
    }

    /// Load the list for `date`. `None` or an empty date means nothing is
    /// selected, which shows an empty list rather than an error.
    pub async fn load(&self, date: Option<&str>) {
        let request = self.begin(date);
        self.complete(request).await;
    }

    /// Synchronous half of [`load`](Self::load): claims the newest
    /// generation and publishes the loading state. Callers that hand the
    /// retrieval to another task must call this at selection time so the
    /// selection order, not the spawn order, decides which result wins.
    pub fn begin(&self, date: Option<&str>) -> ListRequest {
        let ticket = self.generation.next();
        match date.filter(|d| !d.is_empty()) {
            Some(date) => {
                self.state.set(LoadState::Loading);
                ListRequest { ticket, date: Some(date.to_string()) }
            }
            None => {
                self.state.set(LoadState::Ready(Vec::new()));
                ListRequest { ticket, date: None }
            }
        }
    }

    pub async fn complete(&self, request: ListRequest) {
        let Some(date) = request.date else {
            return;
        };
        let result = self.api.articles_for_date(&date).await;

        if !self.generation.is_current(request.ticket) {
            debug!("Discarding stale article list for {}", date);
            return;
        }

        match result {
            Ok(articles) => {
                info!("📰 Loaded {} articles for {}", articles.len(), date);
                self.state.set(LoadState::Ready(articles));
            }
            Err(e) => {
                error!("Error fetching news for {}: {}", date, e);
                self.state.set(LoadState::Failed(LIST_ERROR_MESSAGE.to_string()));
            }
        }
    }
}

/// A retrieval claimed by [`ArticleListLoader::begin`].
#[derive(Debug)]
pub struct ListRequest {
    ticket: Ticket,
    date: Option<String>,
}
