//! Post record models

use serde::{Deserialize, Serialize};
use std::fmt;

/// Language a post is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Mongolian
    Mn,
    /// English
    En,
    /// Both languages in one post
    Mixed,
}

impl Language {
    /// Parse a front-matter language code (exact, lowercase)
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "mn" => Some(Language::Mn),
            "en" => Some(Language::En),
            "mixed" => Some(Language::Mixed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Mn => "mn",
            Language::En => "en",
            Language::Mixed => "mixed",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Listing view of a post, without the body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMetadata {
    /// File name without extension
    pub slug: String,

    /// Post title
    pub title: String,

    /// Publication date (ISO-8601)
    pub date: String,

    /// Summary shown in listings
    pub excerpt: String,

    /// Post tags, in front-matter order
    pub tags: Vec<String>,

    pub language: Language,

    /// Estimated reading time in minutes
    pub reading_time: u32,

    pub views: u64,
}

#[cfg(test)]
impl PostMetadata {
    /// Whether the post declares `tag` (exact match)
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// A post with its rendered body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(flatten)]
    pub meta: PostMetadata,

    /// Rendered HTML content
    pub content: String,
}
