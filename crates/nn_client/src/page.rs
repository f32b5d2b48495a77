//! The host surface views run on: a scroll affordance, keyboard listeners and
//! an optional clipboard. A browser binding maps these onto the document;
//! [`MemoryPage`] keeps them in memory.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use nn_core::Result;

/// Scroll affordance value meaning "page scrolling disabled".
pub const SCROLL_LOCKED: &str = "hidden";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Up,
    Down,
    Left,
    Right,
    Tab,
    Char(char),
}

pub type KeyHandler = Arc<dyn Fn(&Key) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<()>;
}

pub trait Page: Send + Sync {
    /// Current scroll affordance, e.g. `""`, `"auto"` or `"hidden"`.
    fn scroll_affordance(&self) -> String;

    fn set_scroll_affordance(&self, value: &str);

    fn add_key_listener(&self, handler: KeyHandler) -> ListenerId;

    fn remove_key_listener(&self, id: ListenerId);

    fn clipboard(&self) -> Option<Arc<dyn Clipboard>>;
}

/// In-memory page. Key events are delivered with [`MemoryPage::dispatch_key`].
#[derive(Default)]
pub struct MemoryPage {
    scroll: Mutex<String>,
    listeners: Mutex<Vec<(ListenerId, KeyHandler)>>,
    next_id: AtomicU64,
    clipboard: Option<Arc<dyn Clipboard>>,
}

impl MemoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scroll_affordance(self, value: &str) -> Self {
        *self.scroll.lock().unwrap_or_else(|e| e.into_inner()) = value.to_string();
        self
    }

    pub fn with_clipboard(mut self, clipboard: Arc<dyn Clipboard>) -> Self {
        self.clipboard = Some(clipboard);
        self
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_affordance() == SCROLL_LOCKED
    }

    /// Deliver `key` to every registered listener. Listeners may add or
    /// remove listeners while being called.
    pub fn dispatch_key(&self, key: &Key) {
        let handlers: Vec<KeyHandler> = self
            .listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|(_, h)| h.clone())
            .collect();
        for handler in handlers {
            handler(key);
        }
    }
}

impl fmt::Debug for MemoryPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryPage")
            .field("scroll", &self.scroll_affordance())
            .field("listeners", &self.listener_count())
            .field("clipboard", &self.clipboard.is_some())
            .finish()
    }
}

impl Page for MemoryPage {
    fn scroll_affordance(&self) -> String {
        self.scroll.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn set_scroll_affordance(&self, value: &str) {
        *self.scroll.lock().unwrap_or_else(|e| e.into_inner()) = value.to_string();
    }

    fn add_key_listener(&self, handler: KeyHandler) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((id, handler));
        id
    }

    fn remove_key_listener(&self, id: ListenerId) {
        self.listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|(lid, _)| *lid != id);
    }

    fn clipboard(&self) -> Option<Arc<dyn Clipboard>> {
        self.clipboard.clone()
    }
}

/// Clipboard that remembers the last text written.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    text: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.text.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        *self.text.lock().unwrap_or_else(|e| e.into_inner()) = Some(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_listeners() {
        let page = MemoryPage::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let id = page.add_key_listener(Arc::new(move |key| {
            if *key == Key::Escape {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        }));

        page.dispatch_key(&Key::Escape);
        page.dispatch_key(&Key::Char('q'));
        page.remove_key_listener(id);
        page.dispatch_key(&Key::Escape);

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(page.listener_count(), 0);
    }

    #[test]
    fn test_scroll_affordance() {
        let page = MemoryPage::new().with_scroll_affordance("auto");
        assert_eq!(page.scroll_affordance(), "auto");
        page.set_scroll_affordance(SCROLL_LOCKED);
        assert!(page.is_scroll_locked());
    }
}
