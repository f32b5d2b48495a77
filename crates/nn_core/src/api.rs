use async_trait::async_trait;
use crate::types::{ArticleDetail, ArticleSummary, NewsletterDate};
use crate::Result;

#[async_trait]
pub trait NewsApi: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &str;

    /// All archive dates, in the order the backend wants them displayed.
    async fn newsletter_dates(&self) -> Result<Vec<NewsletterDate>>;

    /// Summaries of the articles generated on `date`.
    async fn articles_for_date(&self, date: &str) -> Result<Vec<ArticleSummary>>;

    /// A single article, already unwrapped from any response envelope.
    async fn article(&self, id: &str) -> Result<ArticleDetail>;
}
