use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use futures::future::join_all;
use nn_core::format::date_label;
use nn_core::{Error, NewsApi, NewsletterDate, Result, Store, Subscription};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::archive::DateArchiveLoader;
use crate::list::{ArticleList, ArticleListLoader};

/// The archive page: a date list on one side, that date's articles on the
/// other. Changing the selected date starts a list retrieval.
pub struct HomeView {
    archive: DateArchiveLoader,
    list: Arc<ArticleListLoader>,
    tasks: Arc<Mutex<Vec<JoinHandle<()>>>>,
    _selection: Subscription,
}

impl HomeView {
    /// Must be called from within a tokio runtime; list retrievals are
    /// spawned onto it.
    pub fn new(api: Arc<dyn NewsApi>) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| Error::External(e.into()))?;
        let selected = Store::new(None);
        let list = Arc::new(ArticleListLoader::new(api.clone()));
        let tasks = Arc::new(Mutex::new(Vec::<JoinHandle<()>>::new()));

        let selection = selected.subscribe({
            let list = list.clone();
            let tasks = tasks.clone();
            move |date: &Option<String>| {
                let request = list.begin(date.as_deref());
                let list = list.clone();
                let task = runtime.spawn(async move { list.complete(request).await });
                let mut tasks = tasks.lock().unwrap_or_else(|e| e.into_inner());
                tasks.retain(|t| !t.is_finished());
                tasks.push(task);
            }
        });

        Ok(Self {
            archive: DateArchiveLoader::new(api, selected),
            list,
            tasks,
            _selection: selection,
        })
    }

    /// Load the archive and the initial date's articles.
    pub async fn init(&self) {
        self.init_with(None).await;
    }

    /// Like [`init`](Self::init), but starts on `date` instead of the
    /// archive's first date, so only that date's list is fetched.
    pub async fn init_with(&self, date: Option<&str>) {
        self.archive.load_with(date).await;
        if self.selected_date().is_none() {
            self.list.load(None).await;
        }
        self.settle().await;
    }

    pub fn select_date(&self, date: &str) {
        self.archive.selected().set(Some(date.to_string()));
    }

    pub fn selected_date(&self) -> Option<String> {
        self.archive.selected().get()
    }

    pub fn dates(&self) -> &Store<Vec<NewsletterDate>> {
        self.archive.dates()
    }

    pub fn articles(&self) -> &Store<ArticleList> {
        self.list.state()
    }

    /// Page header: the selected date's label when it is part of the
    /// archive, otherwise "Newsletter".
    pub fn header_label(&self, today: NaiveDate) -> String {
        match self.selected_date() {
            Some(date) if self.dates().with(|dates| dates.iter().any(|d| d.date == date)) => {
                date_label(&date, today)
            }
            _ => "Newsletter".to_string(),
        }
    }

    /// Wait for every retrieval started so far.
    pub async fn settle(&self) {
        loop {
            let pending: Vec<_> = self
                .tasks
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .drain(..)
                .collect();
            if pending.is_empty() {
                return;
            }
            for result in join_all(pending).await {
                if let Err(e) = result {
                    warn!("Article list task failed: {}", e);
                }
            }
        }
    }
}

impl Drop for HomeView {
    fn drop(&mut self) {
        for task in self.tasks.lock().unwrap_or_else(|e| e.into_inner()).drain(..) {
            task.abort();
        }
    }
}
