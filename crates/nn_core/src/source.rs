use url::Url;

/// How a citation string is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceEntry {
    Link(Url),
    Text(String),
}

impl SourceEntry {
    pub fn classify(raw: &str) -> Self {
        match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => SourceEntry::Link(url),
            _ => SourceEntry::Text(raw.to_string()),
        }
    }

    pub fn is_link(&self) -> bool {
        matches!(self, SourceEntry::Link(_))
    }
}

pub fn is_link(raw: &str) -> bool {
    SourceEntry::classify(raw).is_link()
}

/// Text placed on the clipboard by "copy all".
pub fn join_sources(sources: &[String]) -> String {
    sources.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert!(is_link("https://example.com/article"));
        assert!(is_link("http://example.com"));
        assert!(is_link("HTTPS://EXAMPLE.COM/x"));

        assert!(!is_link("ftp://example.com/file"));
        assert!(!is_link("mailto:editor@example.com"));
        assert!(!is_link("example.com/article"));
        assert!(!is_link("/relative/path"));
        assert!(!is_link("Reuters, 3 August 2025"));
        assert!(!is_link("http://"));
        assert!(!is_link(""));
    }

    #[test]
    fn test_text_entry_keeps_original() {
        assert_eq!(
            SourceEntry::classify("Interview with the lab director"),
            SourceEntry::Text("Interview with the lab director".to_string())
        );
    }

    #[test]
    fn test_join_keeps_order() {
        let sources = vec!["b".to_string(), "https://a.example".to_string(), "c".to_string()];
        assert_eq!(join_sources(&sources), "b\nhttps://a.example\nc");
        assert_eq!(join_sources(&[]), "");
    }
}
