//! blog-index: the content index behind a Markdown blog
//!
//! Reads a directory of Markdown posts with front-matter, normalizes each
//! file into a record and answers the queries the site needs: listings,
//! recency order, tag and year groupings, search and sidebar widgets.

pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;
pub mod index;
pub mod server;

use anyhow::Result;
use std::path::Path;

/// The blog application
#[derive(Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Content store directory
    pub posts_dir: std::path::PathBuf,
}

impl Blog {
    /// Create a new blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let posts_dir = base_dir.join(&config.posts_dir);

        Ok(Self {
            config,
            base_dir,
            posts_dir,
        })
    }

    /// Content index over this blog's posts directory
    pub fn index(&self) -> index::ContentIndex {
        index::ContentIndex::new(&self.posts_dir, &self.config)
    }
}
