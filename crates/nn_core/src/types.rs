use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One calendar day's batch of generated articles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterDate {
    pub date: String,
    #[serde(default)]
    pub article_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
    #[serde(deserialize_with = "wire::id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default, deserialize_with = "wire::seq")]
    pub categories: Vec<String>,
    #[serde(default)]
    pub groundbreaking: bool,
    /// Seconds.
    #[serde(default)]
    pub read_time: u64,
    #[serde(default)]
    pub views: u64,
    #[serde(deserialize_with = "wire::timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSection {
    #[serde(default)]
    pub heading: String,
    /// Paragraphs separated by a blank line.
    #[serde(default)]
    pub content: String,
}

impl ArticleSection {
    pub fn paragraphs(&self) -> Vec<&str> {
        crate::format::paragraphs(&self.content)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDetail {
    #[serde(deserialize_with = "wire::id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(deserialize_with = "wire::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub read_time: u64,
    #[serde(default)]
    pub views: u64,
    #[serde(default, deserialize_with = "wire::seq")]
    pub sources: Vec<String>,
    #[serde(default, deserialize_with = "wire::seq")]
    pub categories: Vec<String>,
    #[serde(default)]
    pub groundbreaking: bool,
    #[serde(default, deserialize_with = "wire::seq")]
    pub content: Vec<ArticleSection>,
}

impl Default for ArticleDetail {
    /// The placeholder shown while no article is loaded or after a failed
    /// retrieval. `created_at` is the instant the placeholder was built.
    fn default() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            subtitle: String::new(),
            created_at: Utc::now(),
            read_time: 0,
            views: 0,
            sources: Vec::new(),
            categories: Vec::new(),
            groundbreaking: false,
            content: Vec::new(),
        }
    }
}

impl ArticleDetail {
    /// True for the placeholder produced by [`Default`].
    pub fn is_placeholder(&self) -> bool {
        self.id.is_empty() && self.title.is_empty() && self.content.is_empty()
    }
}

/// The detail endpoint answers either with the bare article or with the
/// article wrapped under an `article` field.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ArticleEnvelope {
    Wrapped { article: ArticleDetail },
    Bare(ArticleDetail),
}

impl ArticleEnvelope {
    pub fn into_article(self) -> ArticleDetail {
        match self {
            ArticleEnvelope::Wrapped { article } => article,
            ArticleEnvelope::Bare(article) => article,
        }
    }
}

mod wire {
    use super::*;
    use chrono::NaiveDate;
    use serde::de::Error as _;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }

    pub fn id<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<String, D::Error> {
        Ok(match Id::deserialize(d)? {
            Id::Text(s) => s,
            Id::Number(n) => n.to_string(),
        })
    }

    /// `null` is treated like an absent field.
    pub fn seq<'de, D, T>(d: D) -> std::result::Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Ok(Option::<Vec<T>>::deserialize(d)?.unwrap_or_default())
    }

    pub fn timestamp<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        parse_timestamp(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp: {}", raw)))
    }

    pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Utc));
        }
        // HTTP-date: "Sun, 03 Aug 2025 12:00:00 GMT"
        if let Ok(ts) = DateTime::parse_from_rfc2822(raw) {
            return Some(ts.with_timezone(&Utc));
        }
        if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(naive.and_utc());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }
}

pub use wire::parse_timestamp;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_summary_from_backend_json() {
        let json = r#"{
            "id": "abc123",
            "title": "Quantum leap",
            "subtitle": "A processor that works",
            "categories": ["Science", "Quantum"],
            "groundbreaking": true,
            "readTime": 125,
            "views": 1500,
            "createdAt": "2025-08-03T09:30:00Z",
            "date": "2025-08-03"
        }"#;
        let summary: ArticleSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.id, "abc123");
        assert_eq!(summary.categories, vec!["Science", "Quantum"]);
        assert!(summary.groundbreaking);
        assert_eq!(summary.read_time, 125);
        assert_eq!(summary.created_at, Utc.with_ymd_and_hms(2025, 8, 3, 9, 30, 0).unwrap());
    }

    #[test]
    fn test_numeric_id_and_http_date() {
        let json = r#"{"id": 7, "title": "t", "createdAt": "Sun, 03 Aug 2025 12:00:00 GMT"}"#;
        let summary: ArticleSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.id, "7");
        assert_eq!(summary.created_at, Utc.with_ymd_and_hms(2025, 8, 3, 12, 0, 0).unwrap());
        assert!(summary.categories.is_empty());
    }

    #[test]
    fn test_negative_views_rejected() {
        let json = r#"{"id": "x", "title": "t", "views": -1, "createdAt": "2025-08-03T00:00:00Z"}"#;
        assert!(serde_json::from_str::<ArticleSummary>(json).is_err());
    }

    #[test]
    fn test_null_sequences_become_empty() {
        let json = r#"{"id": "x", "title": "t", "createdAt": "2025-08-03", "sources": null, "content": null}"#;
        let detail: ArticleDetail = serde_json::from_str(json).unwrap();
        assert!(detail.sources.is_empty());
        assert!(detail.content.is_empty());
    }

    #[test]
    fn test_envelope_unwraps_both_shapes() {
        let bare = r#"{"id": "a1", "title": "Bare", "createdAt": "2025-08-03T00:00:00Z",
            "sources": ["https://example.com/one", "Interview notes"]}"#;
        let wrapped = format!(r#"{{"success": true, "article": {}}}"#, bare);

        let from_bare = serde_json::from_str::<ArticleEnvelope>(bare).unwrap().into_article();
        let from_wrapped = serde_json::from_str::<ArticleEnvelope>(&wrapped).unwrap().into_article();

        assert_eq!(from_bare, from_wrapped);
        assert_eq!(from_bare.sources, vec!["https://example.com/one", "Interview notes"]);
    }

    #[test]
    fn test_sections_keep_order() {
        let json = r#"{"id": "a", "title": "t", "createdAt": "2025-08-03T00:00:00Z", "content": [
            {"heading": "First", "content": "p1\n\np2"},
            {"heading": "Second", "content": "p3"}
        ]}"#;
        let detail: ArticleDetail = serde_json::from_str(json).unwrap();
        let headings: Vec<_> = detail.content.iter().map(|s| s.heading.as_str()).collect();
        assert_eq!(headings, vec!["First", "Second"]);
        assert_eq!(detail.content[0].paragraphs(), vec!["p1", "p2"]);
    }

    #[test]
    fn test_default_detail_is_placeholder() {
        let detail = ArticleDetail::default();
        assert!(detail.is_placeholder());
        assert_eq!(detail.views, 0);
        assert_eq!(detail.read_time, 0);
        assert!(detail.sources.is_empty());
        assert!(detail.categories.is_empty());
        assert!(!detail.groundbreaking);
    }
}
