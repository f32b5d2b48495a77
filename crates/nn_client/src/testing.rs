//! Test double for [`NewsApi`] with per-request gates, so tests decide the
//! order in which concurrent retrievals complete.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use nn_core::{ArticleDetail, ArticleSummary, Error, NewsApi, NewsletterDate, Result};
use tokio::sync::oneshot;

#[derive(Default)]
pub struct ScriptedApi {
    dates: Option<Vec<NewsletterDate>>,
    fail_dates: bool,
    articles: HashMap<String, Option<Vec<ArticleSummary>>>,
    details: HashMap<String, ArticleDetail>,
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    calls: Mutex<Vec<String>>,
}

pub fn summary(id: &str, title: &str) -> ArticleSummary {
    ArticleSummary {
        id: id.to_string(),
        title: title.to_string(),
        subtitle: String::new(),
        categories: vec!["Technology".to_string()],
        groundbreaking: false,
        read_time: 120,
        views: 1_500,
        created_at: Utc.with_ymd_and_hms(2025, 8, 3, 8, 0, 0).unwrap(),
    }
}

pub fn detail(id: &str, sources: &[&str]) -> ArticleDetail {
    ArticleDetail {
        id: id.to_string(),
        title: format!("Article {}", id),
        subtitle: "subtitle".to_string(),
        views: 42,
        read_time: 90,
        sources: sources.iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    }
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dates(mut self, dates: Vec<(&str, u32)>) -> Self {
        self.dates = Some(
            dates
                .into_iter()
                .map(|(date, article_count)| NewsletterDate { date: date.to_string(), article_count })
                .collect(),
        );
        self
    }

    pub fn failing_dates(mut self) -> Self {
        self.fail_dates = true;
        self
    }

    pub fn with_articles(mut self, date: &str, articles: Vec<ArticleSummary>) -> Self {
        self.articles.insert(date.to_string(), Some(articles));
        self
    }

    pub fn failing_articles(mut self, date: &str) -> Self {
        self.articles.insert(date.to_string(), None);
        self
    }

    pub fn with_detail(mut self, detail: ArticleDetail) -> Self {
        self.details.insert(detail.id.clone(), detail);
        self
    }

    /// Hold the request identified by `key` (`news/<date>` or
    /// `articles/<id>`) until the returned sender fires or is dropped.
    pub fn gate(&self, key: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(key.to_string(), rx);
        tx
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn enter(&self, key: String) {
        self.calls.lock().unwrap().push(key.clone());
        let gate = self.gates.lock().unwrap().remove(&key);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
    }
}

#[async_trait]
impl NewsApi for ScriptedApi {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn newsletter_dates(&self) -> Result<Vec<NewsletterDate>> {
        self.enter("news".to_string()).await;
        if self.fail_dates {
            return Err(Error::Status { status: 500, url: "scripted://news".to_string() });
        }
        Ok(self.dates.clone().unwrap_or_default())
    }

    async fn articles_for_date(&self, date: &str) -> Result<Vec<ArticleSummary>> {
        self.enter(format!("news/{}", date)).await;
        match self.articles.get(date) {
            Some(Some(articles)) => Ok(articles.clone()),
            Some(None) => Err(Error::Status { status: 500, url: format!("scripted://news/{}", date) }),
            None => Ok(Vec::new()),
        }
    }

    async fn article(&self, id: &str) -> Result<ArticleDetail> {
        self.enter(format!("articles/{}", id)).await;
        self.details
            .get(id)
            .cloned()
            .ok_or_else(|| Error::Status { status: 500, url: format!("scripted://articles/{}", id) })
    }
}
