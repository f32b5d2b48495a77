use std::sync::Arc;

use nn_core::{ArticleDetail, NewsApi, Store};
use tracing::{debug, info, warn};

use crate::generation::Generation;

/// Fetches one article. Unlike the list loader it never reports an error:
/// any failure resets the view to [`ArticleDetail::default`].
pub struct ArticleDetailLoader {
    api: Arc<dyn NewsApi>,
    article: Store<ArticleDetail>,
    generation: Generation,
}

impl ArticleDetailLoader {
    pub fn new(api: Arc<dyn NewsApi>) -> Self {
        Self {
            api,
            article: Store::new(ArticleDetail::default()),
            generation: Generation::new(),
        }
    }

    pub fn article(&self) -> &Store<ArticleDetail> {
        &self.article
    }

    pub async fn load(&self, id: Option<&str>) {
        let ticket = self.generation.next();

        let Some(id) = id.filter(|id| !id.is_empty()) else {
            self.article.set(ArticleDetail::default());
            return;
        };

        let result = self.api.article(id).await;
        if !self.generation.is_current(ticket) {
            debug!("Discarding superseded article {}", id);
            return;
        }

        match result {
            Ok(article) => {
                info!("📄 Loaded article {} ({} sections)", id, article.content.len());
                self.article.set(article);
            }
            Err(e) => {
                warn!("Error fetching article {}: {}", id, e);
                self.article.set(ArticleDetail::default());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{detail, ScriptedApi};

    #[tokio::test]
    async fn test_loads_article() {
        let api = ScriptedApi::new().with_detail(detail("a1", &["https://example.com", "notes"]));
        let loader = ArticleDetailLoader::new(Arc::new(api));

        loader.load(Some("a1")).await;
        let article = loader.article().get();
        assert_eq!(article.title, "Article a1");
        assert_eq!(article.sources, vec!["https://example.com", "notes"]);
    }

    #[tokio::test]
    async fn test_failure_resets_to_default() {
        let api = ScriptedApi::new().with_detail(detail("a1", &["x"]));
        let loader = ArticleDetailLoader::new(Arc::new(api));

        loader.load(Some("a1")).await;
        assert!(!loader.article().get().is_placeholder());

        loader.load(Some("missing")).await;
        let article = loader.article().get();
        assert!(article.is_placeholder());
        assert_eq!(article.title, "");
        assert_eq!(article.views, 0);
        assert!(article.sources.is_empty());
    }

    #[tokio::test]
    async fn test_no_id_is_default_without_request() {
        let api = Arc::new(ScriptedApi::new());
        let loader = ArticleDetailLoader::new(api.clone());

        loader.load(None).await;
        assert!(loader.article().get().is_placeholder());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_superseded_article_is_discarded() {
        let api = Arc::new(
            ScriptedApi::new()
                .with_detail(detail("old", &[]))
                .with_detail(detail("new", &[])),
        );
        let release_old = api.gate("articles/old");
        let loader = Arc::new(ArticleDetailLoader::new(api.clone()));

        let first = tokio::spawn({
            let loader = loader.clone();
            async move { loader.load(Some("old")).await }
        });
        while api.calls().is_empty() {
            tokio::task::yield_now().await;
        }
        loader.load(Some("new")).await;
        release_old.send(()).unwrap();
        first.await.unwrap();

        assert_eq!(loader.article().get().id, "new");
    }
}
