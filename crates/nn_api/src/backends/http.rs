use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use nn_core::{
    ArticleDetail, ArticleEnvelope, ArticleSummary, Error, NewsApi, NewsletterDate, Result,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::ApiConfig;

/// `NewsApi` over the archive's REST endpoints.
pub struct HttpNewsApi {
    client: Arc<Client>,
    base_url: Url,
}

impl HttpNewsApi {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = config.parsed_url()?;
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            client: Arc::new(client),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `segments` are appended as individual path segments, percent-encoded
    /// so a value cannot break out of its segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| Error::InvalidUrl(self.base_url.to_string()))?;
            path.pop_if_empty();
            path.extend(segments);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!("GET {}", url);
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| Error::MalformedResponse(format!("{}: {}", url, e)))
    }
}

impl fmt::Debug for HttpNewsApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpNewsApi")
            .field("client", &"<reqwest::Client>")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

#[async_trait]
impl NewsApi for HttpNewsApi {
    fn name(&self) -> &str {
        "http"
    }

    async fn newsletter_dates(&self) -> Result<Vec<NewsletterDate>> {
        let url = self.endpoint(&["api", "news"])?;
        self.get_json(url).await
    }

    async fn articles_for_date(&self, date: &str) -> Result<Vec<ArticleSummary>> {
        let url = self.endpoint(&["api", "news", date])?;
        self.get_json(url).await
    }

    async fn article(&self, id: &str) -> Result<ArticleDetail> {
        let url = self.endpoint(&["api", "articles", id])?;
        let envelope: ArticleEnvelope = self.get_json(url).await?;
        Ok(envelope.into_article())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base: &str) -> HttpNewsApi {
        HttpNewsApi::new(&ApiConfig::default().with_url(base)).unwrap()
    }

    #[test]
    fn test_endpoints() {
        let api = api("http://127.0.0.1:5000");
        assert_eq!(
            api.endpoint(&["api", "news"]).unwrap().as_str(),
            "http://127.0.0.1:5000/api/news"
        );
        assert_eq!(
            api.endpoint(&["api", "news", "2025-08-03"]).unwrap().as_str(),
            "http://127.0.0.1:5000/api/news/2025-08-03"
        );
    }

    #[test]
    fn test_endpoint_under_prefix() {
        let api = api("https://example.org/neuronews/");
        assert_eq!(
            api.endpoint(&["api", "articles", "abc"]).unwrap().as_str(),
            "https://example.org/neuronews/api/articles/abc"
        );
    }

    #[test]
    fn test_segment_is_encoded() {
        let api = api("http://localhost:5000");
        let url = api.endpoint(&["api", "articles", "../admin"]).unwrap();
        assert_eq!(url.path(), "/api/articles/..%2Fadmin");
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let result = HttpNewsApi::new(&ApiConfig::default().with_url("localhost"));
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }
}
