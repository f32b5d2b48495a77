use std::sync::Arc;

use nn_core::{ArticleDetail, NewsApi, Store, Subscription};

use crate::detail::ArticleDetailLoader;
use crate::overlay::{CloseHandler, SourcesOverlay};
use crate::page::Page;

/// The article page. Owns the detail loader and the sources overlay, and is
/// the one place that decides whether the overlay is open.
pub struct ArticleView {
    detail: ArticleDetailLoader,
    show_sources: Store<bool>,
    overlay: Arc<SourcesOverlay>,
    _open_sync: Subscription,
    _sources_sync: Subscription,
}

impl ArticleView {
    pub fn new(api: Arc<dyn NewsApi>, page: Arc<dyn Page>) -> Self {
        let detail = ArticleDetailLoader::new(api);
        let show_sources = Store::new(false);

        let on_close: CloseHandler = {
            let show_sources = show_sources.clone();
            Arc::new(move || {
                show_sources.set(false);
            })
        };
        let overlay = Arc::new(SourcesOverlay::new(page, on_close));

        // weak so that dropping the view drops the overlay and its page resources
        let open_sync = show_sources.subscribe({
            let overlay = Arc::downgrade(&overlay);
            move |open| {
                if let Some(overlay) = overlay.upgrade() {
                    overlay.set_open(*open);
                }
            }
        });
        let sources_sync = detail.article().subscribe({
            let overlay = Arc::downgrade(&overlay);
            move |article: &ArticleDetail| {
                if let Some(overlay) = overlay.upgrade() {
                    overlay.set_sources(article.sources.clone());
                }
            }
        });

        Self {
            detail,
            show_sources,
            overlay,
            _open_sync: open_sync,
            _sources_sync: sources_sync,
        }
    }

    /// Navigate to `id`; `None` shows the placeholder article.
    pub async fn open_article(&self, id: Option<&str>) {
        self.detail.load(id).await;
    }

    pub fn article(&self) -> ArticleDetail {
        self.detail.article().get()
    }

    pub fn article_store(&self) -> &Store<ArticleDetail> {
        self.detail.article()
    }

    pub fn open_sources(&self) {
        self.show_sources.set(true);
    }

    pub fn close_sources(&self) {
        self.show_sources.set(false);
    }

    pub fn sources_open(&self) -> bool {
        self.show_sources.get()
    }

    pub fn overlay(&self) -> &SourcesOverlay {
        &self.overlay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::ClickTarget;
    use crate::page::{Key, MemoryClipboard, MemoryPage};
    use crate::testing::{detail, ScriptedApi};

    fn setup(page: Arc<MemoryPage>) -> ArticleView {
        let api = ScriptedApi::new().with_detail(detail("a1", &["https://example.com/a", "Notes"]));
        ArticleView::new(Arc::new(api), page)
    }

    #[tokio::test]
    async fn test_server_error_shows_placeholder() {
        let page = Arc::new(MemoryPage::new());
        let view = setup(page);
        view.open_article(Some("does-not-exist")).await;

        let article = view.article();
        assert_eq!(article.title, "");
        assert_eq!(article.views, 0);

        view.open_sources();
        assert_eq!(view.overlay().view().unwrap().heading, "Sources (0)");
    }

    #[tokio::test]
    async fn test_overlay_follows_article_sources() {
        let clipboard = Arc::new(MemoryClipboard::new());
        let page = Arc::new(MemoryPage::new().with_clipboard(clipboard.clone()));
        let view = setup(page);
        view.open_article(Some("a1")).await;

        view.open_sources();
        let overlay = view.overlay().view().unwrap();
        assert_eq!(overlay.heading, "Sources (2)");
        assert!(view.overlay().copy_all());
        assert_eq!(clipboard.contents().as_deref(), Some("https://example.com/a\nNotes"));
    }

    #[tokio::test]
    async fn test_every_close_path_updates_owner_state() {
        let page = Arc::new(MemoryPage::new().with_scroll_affordance("auto"));
        let view = setup(page.clone());
        view.open_article(Some("a1")).await;

        view.open_sources();
        page.dispatch_key(&Key::Escape);
        assert!(!view.sources_open());
        assert_eq!(page.scroll_affordance(), "auto");

        view.open_sources();
        view.overlay().click(ClickTarget::Backdrop);
        assert!(!view.sources_open());

        view.open_sources();
        view.overlay().close();
        assert!(!view.sources_open());
        assert_eq!(page.listener_count(), 0);
        assert_eq!(page.scroll_affordance(), "auto");
    }

    #[tokio::test]
    async fn test_unmount_while_open_releases_page() {
        let page = Arc::new(MemoryPage::new().with_scroll_affordance("auto"));
        let view = setup(page.clone());
        view.open_article(Some("a1")).await;
        view.open_sources();
        assert!(page.is_scroll_locked());
        assert_eq!(page.listener_count(), 1);

        drop(view);
        assert_eq!(page.scroll_affordance(), "auto");
        assert_eq!(page.listener_count(), 0);
    }
}
