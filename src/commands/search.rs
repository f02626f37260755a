//! Search posts from the command line

use anyhow::Result;

use crate::Blog;

/// Print posts matching `query`, newest first
pub fn run(blog: &Blog, query: &str) -> Result<()> {
    let results = blog.index().search(query);

    println!("Results for {:?} ({}):", query.trim(), results.len());
    for post in results {
        println!("  {} [{}]", post.title, post.slug);
        if !post.tags.is_empty() {
            println!("    tags: {}", post.tags.join(", "));
        }
    }

    Ok(())
}
