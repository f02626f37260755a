//! Content loader - reads post files and normalizes them into records

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{ContentError, FrontMatter, Language, MarkdownRenderer, Post, PostMetadata};
use crate::config::SiteConfig;
use crate::helpers;

/// A content file and the slug it is served under
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub slug: String,
    pub path: PathBuf,
}

/// Loads posts from a flat directory of `<slug>.<ext>` files
pub struct ContentLoader<'a> {
    posts_dir: &'a Path,
    config: &'a SiteConfig,
}

impl<'a> ContentLoader<'a> {
    pub fn new(posts_dir: &'a Path, config: &'a SiteConfig) -> Self {
        Self { posts_dir, config }
    }

    /// Enumerate content files, one per slug, ordered by file name
    ///
    /// A missing directory is an empty store. When two files share a slug the
    /// one whose extension comes first in `extensions` wins.
    pub fn entries(&self) -> Result<Vec<Entry>, ContentError> {
        match fs::metadata(self.posts_dir) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                return Err(ContentError::io(
                    self.posts_dir,
                    io::Error::other("content store is not a directory"),
                ))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("Content store {:?} does not exist yet", self.posts_dir);
                return Ok(Vec::new());
            }
            Err(e) => return Err(ContentError::io(self.posts_dir, e)),
        }

        let mut found: IndexMap<String, (usize, PathBuf)> = IndexMap::new();

        for entry in WalkDir::new(self.posts_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    let path = e.path().unwrap_or(self.posts_dir).to_path_buf();
                    return Err(ContentError::io(path, io::Error::from(e)));
                }
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let Some((slug, rank)) = self.classify(path) else {
                continue;
            };

            match found.get_mut(&slug) {
                Some(existing) => {
                    let (kept, dropped) = if rank < existing.0 {
                        let previous = std::mem::replace(existing, (rank, path.to_path_buf()));
                        (path.to_path_buf(), previous.1)
                    } else {
                        (existing.1.clone(), path.to_path_buf())
                    };
                    tracing::warn!(
                        "Duplicate slug '{}': using {:?}, ignoring {:?}",
                        slug,
                        kept,
                        dropped
                    );
                }
                None => {
                    found.insert(slug, (rank, path.to_path_buf()));
                }
            }
        }

        tracing::debug!("Found {} posts in {:?}", found.len(), self.posts_dir);

        Ok(found
            .into_iter()
            .map(|(slug, (_, path))| Entry { slug, path })
            .collect())
    }

    /// Resolve a slug to its file, `None` when no such post exists
    pub fn find(&self, slug: &str) -> Result<Option<Entry>, ContentError> {
        if !is_valid_slug(slug) {
            return Ok(None);
        }

        for ext in &self.config.extensions {
            let path = self.posts_dir.join(format!("{}.{}", slug, ext));
            match fs::metadata(&path) {
                Ok(meta) if meta.is_file() => {
                    return Ok(Some(Entry {
                        slug: slug.to_string(),
                        path,
                    }))
                }
                Ok(_) => continue,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(ContentError::io(path, e)),
            }
        }

        Ok(None)
    }

    /// Read a file and derive its listing record
    pub fn load_metadata(&self, entry: &Entry) -> Result<PostMetadata, ContentError> {
        let (raw, modified) = read_source(&entry.path)?;
        let (meta, _) = self.normalize(entry, &raw, modified);
        Ok(meta)
    }

    /// Read a file, derive its record and render the body
    pub fn load_post(
        &self,
        entry: &Entry,
        renderer: &MarkdownRenderer,
    ) -> anyhow::Result<Post> {
        let (raw, modified) = read_source(&entry.path)?;
        let (meta, body) = self.normalize(entry, &raw, modified);
        let content = renderer.render(body)?;
        Ok(Post { meta, content })
    }

    /// Map a path to (slug, extension rank) if it is a content file
    fn classify(&self, path: &Path) -> Option<(String, usize)> {
        let ext = path.extension()?.to_str()?;
        let rank = self.config.extensions.iter().position(|e| e == ext)?;

        let Some(slug) = path.file_stem().and_then(|s| s.to_str()) else {
            tracing::warn!("Skipping {:?}: file name is not valid UTF-8", path);
            return None;
        };

        if !is_valid_slug(slug) {
            return None;
        }

        Some((slug.to_string(), rank))
    }

    /// Apply attribute defaults; returns the record and the body text
    fn normalize<'r>(
        &self,
        entry: &Entry,
        raw: &'r str,
        modified: Option<DateTime<Utc>>,
    ) -> (PostMetadata, &'r str) {
        let path = entry.path.as_path();
        let (fm, body) = FrontMatter::parse(raw);
        let fm = lenient(path, "front-matter", fm.map(Some)).unwrap_or_default();

        let title = lenient(path, "title", fm.string("title"))
            .unwrap_or_else(|| entry.slug.clone());

        let date = lenient(path, "date", fm.string("date"))
            .and_then(|date| {
                if helpers::parse_date(&date).is_some() {
                    Some(date)
                } else {
                    lenient::<String>(path, "date", Err(format!("unrecognized date {:?}", date)))
                }
            })
            .unwrap_or_else(|| helpers::to_iso(&modified.unwrap_or_else(Utc::now)));

        let excerpt = lenient(path, "excerpt", fm.string("excerpt"))
            .unwrap_or_else(|| body.chars().take(self.config.excerpt_length).collect());

        let tags = lenient(path, "tags", fm.tags("tags")).unwrap_or_default();

        let language = lenient(path, "language", fm.string("language"))
            .and_then(|code| match Language::from_code(&code) {
                Some(language) => Some(language),
                None => lenient(path, "language", Err(format!("unknown language {:?}", code))),
            })
            .unwrap_or(self.config.default_language);

        let reading_time = lenient(path, "readingTime", fm.unsigned("readingTime"))
            .filter(|&minutes| minutes > 0)
            .and_then(|minutes| u32::try_from(minutes).ok())
            .unwrap_or_else(|| reading_time(body, self.config.words_per_minute));

        let views = lenient(path, "views", fm.unsigned("views")).unwrap_or(0);

        let meta = PostMetadata {
            slug: entry.slug.clone(),
            title,
            date,
            excerpt,
            tags,
            language,
            reading_time,
            views,
        };

        (meta, body)
    }
}

/// Minutes to read `body` at `words_per_minute`, rounded up
pub fn reading_time(body: &str, words_per_minute: usize) -> u32 {
    let words = body.split_whitespace().count();
    let minutes = words.div_ceil(words_per_minute.max(1));
    u32::try_from(minutes).unwrap_or(u32::MAX)
}

/// Slugs name a single file inside the store
fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && !slug.starts_with('.') && !slug.contains(['/', '\\'])
}

fn read_source(path: &Path) -> Result<(String, Option<DateTime<Utc>>), ContentError> {
    let bytes = fs::read(path).map_err(|e| ContentError::io(path, e))?;
    let raw = match String::from_utf8(bytes) {
        Ok(raw) => raw,
        Err(e) => {
            let raw = String::from_utf8_lossy(e.as_bytes()).into_owned();
            lenient::<()>(path, "encoding", Err(format!("invalid UTF-8: {}", e.utf8_error())));
            raw
        }
    };
    let modified = fs::metadata(path)
        .and_then(|meta| meta.modified())
        .ok()
        .map(DateTime::<Utc>::from);
    Ok((raw, modified))
}

/// Log a malformed attribute and fall back to its default
fn lenient<T>(path: &Path, field: &str, value: Result<Option<T>, String>) -> Option<T> {
    value.unwrap_or_else(|reason| {
        let err = ContentError::Malformed {
            path: path.to_path_buf(),
            field: field.to_string(),
            reason,
        };
        tracing::warn!("{}; using default", err);
        None
    })
}
