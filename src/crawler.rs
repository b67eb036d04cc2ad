//! Crawler detection for the SEO fallback pages.
//!
//! Search engines and link-preview bots get a static pre-rendered document;
//! everyone else is redirected to the canonical (client-rendered) page.
//! Nothing here touches the metrics aggregator.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Lower-case tokens that identify a crawler in a `User-Agent` header.
pub const DEFAULT_CRAWLERS: &[&str] = &[
    "googlebot",
    "google-inspectiontool",
    "bingbot",
    "yandex",
    "baiduspider",
    "duckduckbot",
    "slurp",
    "sogou",
    "exabot",
    "facebot",
    "facebookexternalhit",
    "ia_archiver",
    "twitterbot",
    "linkedinbot",
    "embedly",
    "pinterest",
    "slackbot",
    "vkshare",
    "w3c_validator",
    "whatsapp",
    "telegrambot",
    "discordbot",
    "applebot",
    "petalbot",
    "semrushbot",
    "ahrefsbot",
];

/// Returns `true` when `user_agent` contains any of `crawlers`, ignoring case.
/// The tokens in `crawlers` must already be lower-case.
pub fn matches_crawler<S: AsRef<str>>(user_agent: &str, crawlers: &[S]) -> bool {
    let normalized = user_agent.to_ascii_lowercase();
    crawlers
        .iter()
        .any(|token| normalized.contains(token.as_ref()))
}

/// [`matches_crawler`] against [`DEFAULT_CRAWLERS`].
pub fn is_crawler(user_agent: &str) -> bool {
    matches_crawler(user_agent, DEFAULT_CRAWLERS)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlerResponse {
    /// Serve this HTML as-is.
    Prerendered(String),
    /// Redirect to this absolute location.
    Redirect(String),
}

/// On-disk responder configuration.
///
/// ```json
/// {
///   "canonical_base": "https://www.example.com",
///   "pages": { "/": "seo/index.html", "/services": "seo/services.html" },
///   "crawlers": ["mybot"]
/// }
/// ```
///
/// Page paths are relative to the config file. `crawlers` extends the
/// built-in list.
#[derive(Debug, Deserialize)]
pub struct CrawlerConfig {
    pub canonical_base: String,
    #[serde(default)]
    pub pages: HashMap<String, PathBuf>,
    #[serde(default)]
    pub crawlers: Vec<String>,
}

impl CrawlerConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read crawler config {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("invalid crawler config {}", path.display()))
    }
}

pub struct CrawlerResponder {
    canonical_base: String,
    pages: HashMap<String, String>,
    crawlers: Vec<String>,
}

impl CrawlerResponder {
    pub fn new(canonical_base: &str, pages: HashMap<String, String>) -> Self {
        Self {
            canonical_base: canonical_base.trim_end_matches('/').to_string(),
            pages,
            crawlers: DEFAULT_CRAWLERS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Adds extra crawler tokens on top of the defaults.
    pub fn with_crawlers<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for token in extra {
            let token = token.as_ref().trim().to_ascii_lowercase();
            if !token.is_empty() && !self.crawlers.contains(&token) {
                self.crawlers.push(token);
            }
        }
        self
    }

    /// Builds a responder from a config file, reading every page into memory.
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = CrawlerConfig::load(path)?;
        let root = path.parent().unwrap_or(Path::new("."));

        let mut pages = HashMap::with_capacity(config.pages.len());
        for (route, file) in config.pages {
            let file = root.join(file);
            let html = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read page {}", file.display()))?;
            pages.insert(normalize_path(&route), html);
        }

        Ok(Self::new(&config.canonical_base, pages).with_crawlers(config.crawlers))
    }

    pub fn is_crawler(&self, user_agent: &str) -> bool {
        matches_crawler(user_agent, self.crawlers.as_slice())
    }

    pub fn canonical_url(&self, path: &str) -> String {
        format!("{}{}", self.canonical_base, normalize_path(path))
    }

    /// Decides what to send for a request. A missing header is treated as a
    /// regular browser.
    pub fn respond(&self, user_agent: Option<&str>, path: &str) -> CrawlerResponse {
        let path = normalize_path(path);
        if let Some(ua) = user_agent {
            if self.is_crawler(ua) {
                if let Some(html) = self.pages.get(&path) {
                    return CrawlerResponse::Prerendered(html.clone());
                }
            }
        }
        CrawlerResponse::Redirect(self.canonical_url(&path))
    }
}

/// Leading slash, no trailing slash (except for the root), no query string.
fn normalize_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or("");
    let trimmed = path.trim_matches('/');
    format!("/{trimmed}")
}
