use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use nn_core::{
    ArticleDetail, ArticleSection, ArticleSummary, Error, NewsApi, NewsletterDate, Result,
};
use tokio::sync::RwLock;

#[derive(Default)]
struct MemoryStore {
    dates: Vec<NewsletterDate>,
    articles: Vec<(String, ArticleDetail)>,
}

impl MemoryStore {
    /// Add or replace an article. Replacing one under a different date moves
    /// it, and both dates are recounted.
    fn insert(&mut self, date: &str, article: ArticleDetail) {
        let mut touched = vec![date.to_string()];
        match self.articles.iter_mut().find(|(_, a)| a.id == article.id) {
            Some((existing_date, existing)) => {
                if *existing_date != date {
                    touched.push(std::mem::replace(existing_date, date.to_string()));
                }
                *existing = article;
            }
            None => self.articles.push((date.to_string(), article)),
        }

        for date in &touched {
            self.recount(date);
        }
        // newest first, the order the archive endpoint uses
        self.dates.sort_by(|a, b| b.date.cmp(&a.date));
    }

    /// Dates with no articles left are dropped from the archive.
    fn recount(&mut self, date: &str) {
        let count = self.articles.iter().filter(|(d, _)| d == date).count() as u32;
        if count == 0 {
            self.dates.retain(|d| d.date != date);
            return;
        }
        match self.dates.iter_mut().find(|d| d.date == date) {
            Some(entry) => entry.article_count = count,
            None => self.dates.push(NewsletterDate {
                date: date.to_string(),
                article_count: count,
            }),
        }
    }
}

/// In-process archive. Useful offline and as a test double.
#[derive(Default)]
pub struct InMemoryNewsApi {
    store: RwLock<MemoryStore>,
}

impl InMemoryNewsApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, date: &str, article: ArticleDetail) {
        self.store.write().await.insert(date, article);
    }

    /// A small archive spanning two dates.
    pub async fn with_sample_archive() -> Self {
        let api = Self::new();
        for (date, article) in sample_articles() {
            api.insert(date, article).await;
        }
        api
    }
}

pub fn summarize(article: &ArticleDetail) -> ArticleSummary {
    ArticleSummary {
        id: article.id.clone(),
        title: article.title.clone(),
        subtitle: article.subtitle.clone(),
        categories: article.categories.clone(),
        groundbreaking: article.groundbreaking,
        read_time: article.read_time,
        views: article.views,
        created_at: article.created_at,
    }
}

#[async_trait]
impl NewsApi for InMemoryNewsApi {
    fn name(&self) -> &str {
        "memory"
    }

    async fn newsletter_dates(&self) -> Result<Vec<NewsletterDate>> {
        Ok(self.store.read().await.dates.clone())
    }

    async fn articles_for_date(&self, date: &str) -> Result<Vec<ArticleSummary>> {
        let store = self.store.read().await;
        Ok(store
            .articles
            .iter()
            .filter(|(d, _)| d == date)
            .map(|(_, article)| summarize(article))
            .collect())
    }

    async fn article(&self, id: &str) -> Result<ArticleDetail> {
        let store = self.store.read().await;
        store
            .articles
            .iter()
            .find(|(_, a)| a.id == id)
            .map(|(_, a)| a.clone())
            .ok_or_else(|| Error::Status {
                status: 404,
                url: format!("memory://articles/{}", id),
            })
    }
}

fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0)
        .single()
        .unwrap_or_default()
}

fn sample_articles() -> Vec<(&'static str, ArticleDetail)> {
    vec![
        (
            "2025-08-03",
            ArticleDetail {
                id: "quantum-milestone".to_string(),
                title: "Quantum Computing Achieves Major Milestone".to_string(),
                subtitle: "A new processor runs error-corrected circuits for hours".to_string(),
                created_at: at(2025, 8, 3, 6),
                read_time: 372,
                views: 7_200,
                sources: vec![
                    "https://example.com/quantum/processor".to_string(),
                    "Lab press briefing, 2 August 2025".to_string(),
                ],
                categories: vec!["Science".to_string(), "Technology".to_string()],
                groundbreaking: true,
                content: vec![
                    ArticleSection {
                        heading: "What happened".to_string(),
                        content: "Researchers kept logical qubits stable for a full working day.\n\nThe result beats the previous record by an order of magnitude.".to_string(),
                    },
                    ArticleSection {
                        heading: "Why it matters".to_string(),
                        content: "Long-lived logical qubits are the precondition for useful quantum chemistry.".to_string(),
                    },
                ],
            },
        ),
        (
            "2025-08-03",
            ArticleDetail {
                id: "markets-rally".to_string(),
                title: "Markets Rally on Chip Earnings".to_string(),
                subtitle: "Semiconductor stocks lead a broad advance".to_string(),
                created_at: at(2025, 8, 3, 9),
                read_time: 240,
                views: 12_400,
                sources: vec!["https://example.com/markets/close".to_string()],
                categories: vec!["Business".to_string()],
                groundbreaking: false,
                content: vec![ArticleSection {
                    heading: "The session".to_string(),
                    content: "Indexes closed at record highs.".to_string(),
                }],
            },
        ),
        (
            "2025-08-02",
            ArticleDetail {
                id: "lunar-tourism".to_string(),
                title: "Space Tourism Takes Giant Leap Forward".to_string(),
                subtitle: "First commercial crew completes a lunar flyby".to_string(),
                created_at: at(2025, 8, 2, 18),
                read_time: 45,
                views: 15_700,
                sources: Vec::new(),
                categories: vec!["Space".to_string()],
                groundbreaking: false,
                content: vec![ArticleSection {
                    heading: "Flight".to_string(),
                    content: "The capsule returned after six days.".to_string(),
                }],
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sample_archive() {
        let api = InMemoryNewsApi::with_sample_archive().await;

        let dates = api.newsletter_dates().await.unwrap();
        assert_eq!(
            dates,
            vec![
                NewsletterDate { date: "2025-08-03".to_string(), article_count: 2 },
                NewsletterDate { date: "2025-08-02".to_string(), article_count: 1 },
            ]
        );

        let summaries = api.articles_for_date("2025-08-03").await.unwrap();
        let ids: Vec<_> = summaries.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["quantum-milestone", "markets-rally"]);

        assert!(api.articles_for_date("1999-01-01").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_article_lookup() {
        let api = InMemoryNewsApi::with_sample_archive().await;

        let article = api.article("quantum-milestone").await.unwrap();
        assert_eq!(article.sources.len(), 2);

        let missing = api.article("nope").await.unwrap_err();
        assert!(matches!(missing, Error::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_insert_replaces_same_id() {
        let api = InMemoryNewsApi::new();
        let mut article = ArticleDetail { id: "a".to_string(), ..Default::default() };
        api.insert("2025-01-01", article.clone()).await;
        article.title = "updated".to_string();
        api.insert("2025-01-01", article).await;

        let dates = api.newsletter_dates().await.unwrap();
        assert_eq!(dates[0].article_count, 1);
        assert_eq!(api.article("a").await.unwrap().title, "updated");
    }

    #[tokio::test]
    async fn test_reinsert_under_new_date_moves_article() {
        let api = InMemoryNewsApi::with_sample_archive().await;
        let article = api.article("quantum-milestone").await.unwrap();
        api.insert("2025-08-05", article).await;

        let dates = api.newsletter_dates().await.unwrap();
        assert_eq!(
            dates,
            vec![
                NewsletterDate { date: "2025-08-05".to_string(), article_count: 1 },
                NewsletterDate { date: "2025-08-03".to_string(), article_count: 1 },
                NewsletterDate { date: "2025-08-02".to_string(), article_count: 1 },
            ]
        );
        let moved = api.articles_for_date("2025-08-05").await.unwrap();
        assert_eq!(moved.len(), 1);
        assert_eq!(moved[0].id, "quantum-milestone");

        // moving the last article off a date removes the date
        let lunar = api.article("lunar-tourism").await.unwrap();
        api.insert("2025-08-05", lunar).await;
        let dates: Vec<_> = api.newsletter_dates().await.unwrap().into_iter().map(|d| d.date).collect();
        assert_eq!(dates, vec!["2025-08-05", "2025-08-03"]);
    }
}
