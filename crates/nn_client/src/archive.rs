use std::sync::Arc;

use nn_core::{NewsApi, NewsletterDate, Store};
use tracing::{info, warn};

/// Loads the archive's date list once and picks the initial date.
pub struct DateArchiveLoader {
    api: Arc<dyn NewsApi>,
    dates: Store<Vec<NewsletterDate>>,
    selected: Store<Option<String>>,
}

impl DateArchiveLoader {
    pub fn new(api: Arc<dyn NewsApi>, selected: Store<Option<String>>) -> Self {
        Self {
            api,
            dates: Store::default(),
            selected,
        }
    }

    pub fn dates(&self) -> &Store<Vec<NewsletterDate>> {
        &self.dates
    }

    pub fn selected(&self) -> &Store<Option<String>> {
        &self.selected
    }

    /// Fetch the archive. The first date becomes the active one; the backend
    /// decides the order. Failures leave an empty archive and no selection.
    pub async fn load(&self) {
        self.load_with(None).await;
    }

    /// Fetch the archive and make `preferred` the active date when given,
    /// even if the archive could not be loaded.
    pub async fn load_with(&self, preferred: Option<&str>) {
        let preferred = preferred.map(str::to_string);
        match self.api.newsletter_dates().await {
            Ok(dates) => {
                info!("📅 Archive has {} newsletter dates", dates.len());
                let first = dates.first().map(|d| d.date.clone());
                self.dates.set(dates);
                self.selected.set(preferred.or(first));
            }
            Err(e) => {
                warn!("Failed to fetch newsletter dates from {}: {}", self.api.name(), e);
                self.dates.set(Vec::new());
                self.selected.set(preferred);
            }
        }
    }
}
