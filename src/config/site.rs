//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::content::Language;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub author: String,

    // Content store
    pub posts_dir: String,
    /// File extensions recognized as posts, in priority order for duplicate slugs
    pub extensions: Vec<String>,
    pub default_language: Language,

    // Derived fields
    pub excerpt_length: usize,
    pub words_per_minute: usize,

    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub sidebar: SidebarConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            author: String::new(),

            posts_dir: "content/posts".to_string(),
            extensions: vec!["md".to_string()],
            default_language: Language::En,

            excerpt_length: 200,
            words_per_minute: 200,

            highlight: HighlightConfig::default(),
            sidebar: SidebarConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        tracing::debug!("Loaded site config from {:?}", path.as_ref());
        Ok(config)
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

/// Sidebar widget sizes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SidebarConfig {
    pub recent_count: usize,
    pub popular_count: usize,
}

impl Default for SidebarConfig {
    fn default() -> Self {
        Self {
            recent_count: 5,
            popular_count: 5,
        }
    }
}
