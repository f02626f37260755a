//! List site content

use anyhow::Result;

use crate::content::PostMetadata;
use crate::helpers;
use crate::Blog;

/// List posts, tags or years
pub fn run(blog: &Blog, content_type: &str) -> Result<()> {
    let index = blog.index();

    match content_type {
        "post" | "posts" => {
            let posts = index.try_list_all().map(crate::index::query::sort_by_recency)?;
            println!("Posts ({}):", posts.len());
            for post in &posts {
                println!("  {}", post_line(post));
            }
        }
        "tag" | "tags" => {
            let groups = index.group_by_tag();
            println!("Tags ({}):", groups.len());
            for tag in index.tags_by_popularity() {
                let count = groups.get(&tag).map(Vec::len).unwrap_or(0);
                println!("  {} ({})", tag, count);
            }
        }
        "year" | "years" | "archive" => {
            let archive = index.archive();
            println!("Years ({}):", archive.len());
            for (year, posts) in archive {
                println!("  {} ({})", year, posts.len());
                for post in &posts {
                    println!("    {}", post_line(post));
                }
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, tag, year",
                content_type
            );
        }
    }

    Ok(())
}

fn post_line(post: &PostMetadata) -> String {
    format!(
        "{} - {} [{}]",
        helpers::format_date(&post.date, "YYYY-MM-DD"),
        post.title,
        post.slug
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn blog() -> (tempfile::TempDir, Blog) {
        let dir = tempfile::tempdir().unwrap();
        let posts = dir.path().join("content/posts");
        fs::create_dir_all(&posts).unwrap();
        fs::write(
            posts.join("intro.md"),
            "---\ntitle: Intro\ndate: 2024-01-05T10:00:00Z\ntags: [ml]\n---\n",
        )
        .unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        (dir, blog)
    }

    #[test]
    fn test_list_types() {
        let (_dir, blog) = blog();
        assert!(run(&blog, "post").is_ok());
        assert!(run(&blog, "tags").is_ok());
        assert!(run(&blog, "archive").is_ok());
        assert!(run(&blog, "category").is_err());
    }

    #[test]
    fn test_post_line() {
        let (_dir, blog) = blog();
        let post = blog.index().get_by_slug("intro").unwrap().unwrap();
        assert_eq!(post_line(&post), "2024-01-05 - Intro [intro]");
    }
}
