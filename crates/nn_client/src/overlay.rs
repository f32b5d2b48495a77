//! The sources overlay shown over an article.
//!
//! The owner decides when the overlay is open. While it is open the overlay
//! holds two page resources, a scroll lock and an Escape listener, and it
//! gives both back on every way out: close, Escape, backdrop click, or being
//! dropped while still open.

use std::fmt;
use std::sync::{Arc, Mutex, RwLock};

use nn_core::{join_sources, SourceEntry};
use tracing::{debug, warn};

use crate::page::{Key, ListenerId, Page, SCROLL_LOCKED};

pub const NO_SOURCES_MESSAGE: &str = "No sources available.";

pub type CloseHandler = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The dimmed area around the panel.
    Backdrop,
    Panel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayView {
    pub heading: String,
    pub entries: Vec<SourceEntry>,
    /// Set instead of entries when there is nothing to list.
    pub empty_message: Option<&'static str>,
}

/// Disables page scrolling until dropped, then restores whatever value the
/// page had before.
struct ScrollLock {
    page: Arc<dyn Page>,
    previous: String,
}

impl ScrollLock {
    fn acquire(page: Arc<dyn Page>) -> Self {
        let previous = page.scroll_affordance();
        page.set_scroll_affordance(SCROLL_LOCKED);
        Self { page, previous }
    }
}

impl Drop for ScrollLock {
    fn drop(&mut self) {
        self.page.set_scroll_affordance(&self.previous);
    }
}

struct EscapeListener {
    page: Arc<dyn Page>,
    id: ListenerId,
}

impl EscapeListener {
    fn register(page: Arc<dyn Page>, on_close: CloseHandler) -> Self {
        let id = page.add_key_listener(Arc::new(move |key| {
            if *key == Key::Escape {
                on_close();
            }
        }));
        Self { page, id }
    }
}

impl Drop for EscapeListener {
    fn drop(&mut self) {
        self.page.remove_key_listener(self.id);
    }
}

/// Everything acquired for one open cycle.
struct OpenScope {
    _escape: EscapeListener,
    _scroll: ScrollLock,
}

pub struct SourcesOverlay {
    page: Arc<dyn Page>,
    sources: RwLock<Vec<String>>,
    on_close: CloseHandler,
    scope: Mutex<Option<OpenScope>>,
}

impl SourcesOverlay {
    /// `on_close` is the owner's close action; the overlay calls it for the
    /// close button, Escape and backdrop clicks, and the owner answers with
    /// `set_open(false)`.
    pub fn new(page: Arc<dyn Page>, on_close: CloseHandler) -> Self {
        Self {
            page,
            sources: RwLock::new(Vec::new()),
            on_close,
            scope: Mutex::new(None),
        }
    }

    pub fn set_sources(&self, sources: Vec<String>) {
        *self.sources.write().unwrap_or_else(|e| e.into_inner()) = sources;
    }

    pub fn sources(&self) -> Vec<String> {
        self.sources.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn is_open(&self) -> bool {
        self.scope.lock().unwrap_or_else(|e| e.into_inner()).is_some()
    }

    /// Apply the owner's open flag. Returns whether a transition happened;
    /// opening an open overlay or closing a closed one does nothing.
    pub fn set_open(&self, open: bool) -> bool {
        let released = {
            let mut scope = self.scope.lock().unwrap_or_else(|e| e.into_inner());
            match (open, scope.is_some()) {
                (true, false) => {
                    *scope = Some(OpenScope {
                        _escape: EscapeListener::register(self.page.clone(), self.on_close.clone()),
                        _scroll: ScrollLock::acquire(self.page.clone()),
                    });
                    debug!("Sources overlay opened");
                    return true;
                }
                (false, true) => scope.take(),
                _ => return false,
            }
        };
        // released outside the lock: page callbacks may re-enter
        drop(released);
        debug!("Sources overlay closed");
        true
    }

    /// The close button.
    pub fn close(&self) {
        (self.on_close)();
    }

    pub fn click(&self, target: ClickTarget) {
        if target == ClickTarget::Backdrop && self.is_open() {
            self.close();
        }
    }

    /// Copy every source, one per line, to the page clipboard. Returns
    /// whether anything was written; a missing clipboard is not an error.
    pub fn copy_all(&self) -> bool {
        if !self.is_open() {
            return false;
        }
        let Some(clipboard) = self.page.clipboard() else {
            return false;
        };
        let text = join_sources(&self.sources());
        match clipboard.write_text(&text) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to copy sources: {}", e);
                false
            }
        }
    }

    /// What to render, or `None` while closed.
    pub fn view(&self) -> Option<OverlayView> {
        if !self.is_open() {
            return None;
        }
        let sources = self.sources();
        let entries: Vec<SourceEntry> = sources.iter().map(|s| SourceEntry::classify(s)).collect();
        Some(OverlayView {
            heading: format!("Sources ({})", sources.len()),
            empty_message: entries.is_empty().then_some(NO_SOURCES_MESSAGE),
            entries,
        })
    }
}

impl fmt::Debug for SourcesOverlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourcesOverlay")
            .field("open", &self.is_open())
            .field("sources", &self.sources())
            .finish()
    }
}
