use chrono::{DateTime, NaiveDate, Utc};
use nn_client::{ArticleList, OverlayView};
use nn_core::format::{
    article_count_label, date_label, format_generated_on, format_read_time, format_time_ago_at,
    format_views,
};
use nn_core::{ArticleDetail, ArticleSummary, LoadState, NewsletterDate, SourceEntry};

const RULE: &str = "────────────────────────────────────────";

pub fn render_dates(dates: &[NewsletterDate], selected: Option<&str>, today: NaiveDate) -> String {
    if dates.is_empty() {
        return "No newsletters in the archive.\n".to_string();
    }
    let mut out = String::new();
    for date in dates {
        let marker = if selected == Some(date.date.as_str()) { "▸" } else { " " };
        out.push_str(&format!(
            "{} {:<24} {}\n",
            marker,
            date_label(&date.date, today),
            article_count_label(date.article_count)
        ));
    }
    out
}

/// One line of metadata: categories, age, read time and views.
pub fn summary_meta(article: &ArticleSummary, now: DateTime<Utc>) -> String {
    let mut parts = Vec::new();
    if !article.categories.is_empty() {
        parts.push(article.categories.join(", "));
    }
    parts.push(format_time_ago_at(article.created_at, now));
    parts.push(format!("{} read", format_read_time(article.read_time)));
    parts.push(format!("{} views", format_views(article.views)));
    parts.join(" · ")
}

pub fn render_list(header: &str, list: &ArticleList, now: DateTime<Utc>) -> String {
    let mut out = format!("{}\n{}\n", header, RULE);
    match list {
        LoadState::Idle | LoadState::Loading => out.push_str("Loading articles...\n"),
        LoadState::Failed(message) => out.push_str(&format!("⚠️ {}\n", message)),
        LoadState::Ready(articles) if articles.is_empty() => {
            out.push_str("No articles found for this date.\n")
        }
        LoadState::Ready(articles) => {
            for article in articles {
                let flag = if article.groundbreaking { " ⚡ Groundbreaking" } else { "" };
                out.push_str(&format!("[{}] {}{}\n", article.id, article.title, flag));
                if !article.subtitle.is_empty() {
                    out.push_str(&format!("    {}\n", article.subtitle));
                }
                out.push_str(&format!("    {}\n", summary_meta(article, now)));
            }
        }
    }
    out
}

pub fn render_article(article: &ArticleDetail) -> String {
    if article.is_placeholder() {
        return "Article not available.\n".to_string();
    }
    let mut out = String::new();
    if article.groundbreaking {
        out.push_str("⚡ Groundbreaking\n");
    }
    out.push_str(&format!("{}\n", article.title));
    if !article.subtitle.is_empty() {
        out.push_str(&format!("{}\n", article.subtitle));
    }
    out.push_str(&format!(
        "Generated on {} · {} read · {} views\n",
        format_generated_on(article.created_at),
        format_read_time(article.read_time),
        format_views(article.views)
    ));
    if !article.categories.is_empty() {
        out.push_str(&format!("{}\n", article.categories.join(", ")));
    }
    out.push_str(RULE);
    out.push('\n');

    for section in &article.content {
        if !section.heading.is_empty() {
            out.push_str(&format!("\n## {}\n", section.heading));
        }
        for paragraph in section.paragraphs() {
            out.push_str(&format!("\n{}\n", paragraph));
        }
    }
    out.push_str(&format!("\n{}\nSources ({})\n", RULE, article.sources.len()));
    out
}

pub fn render_overlay(view: &OverlayView) -> String {
    let mut out = format!("{}\n", view.heading);
    if let Some(message) = view.empty_message {
        out.push_str(message);
        out.push('\n');
        return out;
    }
    for (i, entry) in view.entries.iter().enumerate() {
        let line = match entry {
            SourceEntry::Link(url) => format!("{}. {} ↗", i + 1, url),
            SourceEntry::Text(text) => format!("{}. {}", i + 1, text),
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}
