//! Tag suggestions derived from the page's domain and URL

/// Domain substring to suggested tags. First match wins.
const DOMAIN_TAGS: &[(&str, &[&str])] = &[
    ("github.com", &["code", "development", "open-source"]),
    ("stackoverflow.com", &["programming", "qa", "development"]),
    ("medium.com", &["article", "blog"]),
    ("dev.to", &["development", "programming", "blog"]),
    ("hackernews.com", &["tech", "news"]),
    ("reddit.com", &["discussion", "community"]),
    ("youtube.com", &["video", "tutorial"]),
    ("aws.amazon.com", &["aws", "cloud", "documentation"]),
    ("docs.microsoft.com", &["microsoft", "documentation"]),
    ("developer.mozilla.org", &["web", "documentation", "reference"]),
];

/// Suggest tags for a page, by domain table first, then URL patterns.
pub fn suggest_tags(domain: &str, url: &str) -> Vec<String> {
    for (key, tags) in DOMAIN_TAGS {
        if domain.contains(key) {
            return tags.iter().map(|t| t.to_string()).collect();
        }
    }

    if domain.contains("docs") || url.contains("/docs/") {
        return vec!["documentation".to_string()];
    }
    if domain.contains("blog") || url.contains("/blog/") {
        return vec!["blog".to_string()];
    }
    if url.contains("tutorial") {
        return vec!["tutorial".to_string()];
    }

    Vec::new()
}
