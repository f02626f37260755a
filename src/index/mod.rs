//! Content index - the query surface over the posts directory
//!
//! Nothing is cached: every call lists the directory again and re-derives
//! each record, so edits to the store show up on the next query.

pub mod query;

use indexmap::IndexMap;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::SiteConfig;
use crate::content::loader::ContentLoader;
use crate::content::{ContentError, MarkdownRenderer, Post, PostMetadata};

/// Sidebar widgets shown next to listings
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sidebar {
    pub recent_posts: Vec<PostMetadata>,
    pub popular_posts: Vec<PostMetadata>,
    /// Tags, most used first
    pub tags: Vec<String>,
}

/// Read-through index over a directory of posts
#[derive(Debug, Clone)]
pub struct ContentIndex {
    posts_dir: PathBuf,
    config: SiteConfig,
}

impl ContentIndex {
    pub fn new<P: AsRef<Path>>(posts_dir: P, config: &SiteConfig) -> Self {
        Self {
            posts_dir: posts_dir.as_ref().to_path_buf(),
            config: config.clone(),
        }
    }

    fn loader(&self) -> ContentLoader<'_> {
        ContentLoader::new(&self.posts_dir, &self.config)
    }

    /// Every post in listing order, or the store error
    ///
    /// A store that does not exist yet is empty, not an error. Files that
    /// cannot be read are logged and skipped.
    pub fn try_list_all(&self) -> Result<Vec<PostMetadata>, ContentError> {
        let loader = self.loader();
        let posts = loader
            .entries()?
            .iter()
            .filter_map(|entry| match loader.load_metadata(entry) {
                Ok(meta) => Some(meta),
                Err(e) => {
                    tracing::warn!("Skipping post '{}': {}", entry.slug, e);
                    None
                }
            })
            .collect();
        Ok(posts)
    }

    /// Every post in listing order; an unreadable store yields no posts
    pub fn list_all(&self) -> Vec<PostMetadata> {
        self.try_list_all().unwrap_or_else(|e| {
            tracing::error!("Error reading posts: {}", e);
            Vec::new()
        })
    }

    /// Look up one post; `Ok(None)` when it does not exist
    pub fn get_by_slug(&self, slug: &str) -> Result<Option<PostMetadata>, ContentError> {
        let loader = self.loader();
        match loader.find(slug)? {
            Some(entry) => loader.load_metadata(&entry).map(Some),
            None => Ok(None),
        }
    }

    /// Look up one post with its body rendered to HTML
    ///
    /// Any failure, including I/O errors, is logged and reported as `None`.
    pub fn get_full_by_slug(&self, slug: &str) -> Option<Post> {
        let loader = self.loader();
        let entry = match loader.find(slug) {
            Ok(Some(entry)) => entry,
            Ok(None) => return None,
            Err(e) => {
                tracing::error!("Error reading post {}: {}", slug, e);
                return None;
            }
        };

        let renderer = MarkdownRenderer::new(&self.config.highlight);
        match loader.load_post(&entry, &renderer) {
            Ok(post) => Some(post),
            Err(e) => {
                tracing::error!("Error reading post {}: {}", slug, e);
                None
            }
        }
    }

    /// Posts newest first; equal dates keep listing order
    pub fn sorted_by_recency(&self) -> Vec<PostMetadata> {
        query::sort_by_recency(self.list_all())
    }

    /// Posts filed under each tag they declare
    pub fn group_by_tag(&self) -> IndexMap<String, Vec<PostMetadata>> {
        query::group_by_tag(&self.list_all())
    }

    /// Posts filed under the UTC year of their date
    pub fn group_by_year(&self) -> IndexMap<String, Vec<PostMetadata>> {
        query::group_by_year(&self.list_all())
    }

    /// Posts whose title, excerpt or a tag contains `q`, newest first
    pub fn search(&self, q: &str) -> Vec<PostMetadata> {
        if q.trim().is_empty() {
            return Vec::new();
        }
        query::search(&self.sorted_by_recency(), q)
    }

    /// The `n` newest posts
    pub fn recent(&self, n: usize) -> Vec<PostMetadata> {
        let mut posts = self.sorted_by_recency();
        posts.truncate(n);
        posts
    }

    /// The `n` most viewed posts, newer first among equals
    pub fn popular(&self, n: usize) -> Vec<PostMetadata> {
        let mut posts = query::sort_by_views(self.sorted_by_recency());
        posts.truncate(n);
        posts
    }

    /// Tag names, most used first; ties favour tags of newer posts
    pub fn tags_by_popularity(&self) -> Vec<String> {
        query::tags_by_popularity(&query::group_by_tag(&self.sorted_by_recency()))
    }

    /// Year buckets, newest year first
    pub fn archive(&self) -> Vec<(String, Vec<PostMetadata>)> {
        query::archive(self.group_by_year())
    }

    /// Every slug in listing order
    pub fn slugs(&self) -> Vec<String> {
        self.list_all().into_iter().map(|post| post.slug).collect()
    }

    /// Sidebar widgets, sized by the site config
    pub fn sidebar(&self) -> Sidebar {
        let sorted = self.sorted_by_recency();
        let tags = query::tags_by_popularity(&query::group_by_tag(&sorted));

        let mut recent_posts = sorted.clone();
        recent_posts.truncate(self.config.sidebar.recent_count);

        let mut popular_posts = query::sort_by_views(sorted);
        popular_posts.truncate(self.config.sidebar.popular_count);

        Sidebar {
            recent_posts,
            popular_posts,
            tags,
        }
    }
}
