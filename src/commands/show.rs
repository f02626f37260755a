//! Show a single post

use anyhow::Result;

use crate::content::ContentError;
use crate::helpers;
use crate::Blog;

/// Print a post's metadata, and its rendered body with `html`
pub fn run(blog: &Blog, slug: &str, html: bool) -> Result<()> {
    let index = blog.index();

    let Some(meta) = index.get_by_slug(slug)? else {
        return Err(ContentError::NotFound(slug.to_string()).into());
    };

    println!("{}", meta.title);
    println!("  slug:     {}", meta.slug);
    println!("  date:     {}", helpers::format_date(&meta.date, "MMMM DD, YYYY"));
    println!("  language: {}", meta.language);
    println!("  tags:     {}", meta.tags.join(", "));
    println!("  reading:  {} min", meta.reading_time);
    println!("  views:    {}", meta.views);
    println!();
    println!("{}", meta.excerpt);

    if html {
        let post = index
            .get_full_by_slug(slug)
            .ok_or_else(|| anyhow::anyhow!("Failed to render post: {}", slug))?;
        println!();
        println!("{}", post.content);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_show_missing_post_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        let err = run(&blog, "ghost", false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ContentError>(),
            Some(ContentError::NotFound(slug)) if slug == "ghost"
        ));
    }

    #[test]
    fn test_show_existing_post() {
        let dir = tempfile::tempdir().unwrap();
        let posts = dir.path().join("content/posts");
        fs::create_dir_all(&posts).unwrap();
        fs::write(posts.join("hello.md"), "# Hello\n").unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        assert!(run(&blog, "hello", true).is_ok());
    }
}
