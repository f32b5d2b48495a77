//! Client-side orchestration for the NeuroNews archive: loaders that turn
//! user selections into retrievals, and the transient state of the sources
//! overlay.

pub mod archive;
pub mod article_view;
pub mod detail;
pub mod generation;
pub mod home;
pub mod list;
pub mod overlay;
pub mod page;

#[cfg(test)]
pub(crate) mod testing;

pub use archive::DateArchiveLoader;
pub use article_view::ArticleView;
pub use detail::ArticleDetailLoader;
pub use home::HomeView;
pub use list::{ArticleList, ArticleListLoader, LIST_ERROR_MESSAGE};
pub use overlay::{ClickTarget, OverlayView, SourcesOverlay, NO_SOURCES_MESSAGE};
pub use page::{Clipboard, Key, MemoryClipboard, MemoryPage, Page};

pub mod prelude {
    pub use super::{ArticleView, HomeView, Key, Page};
    pub use nn_core::prelude::*;
}
