//! Derived views over a listing: ordering, grouping and search

use indexmap::IndexMap;
use std::cmp::Reverse;

use crate::content::PostMetadata;
use crate::helpers;

/// Archive bucket for posts whose date cannot be read
pub const UNKNOWN_YEAR: &str = "unknown";

/// Newest first, stable; unparseable dates go last
pub fn sort_by_recency(mut posts: Vec<PostMetadata>) -> Vec<PostMetadata> {
    // Option orders None below Some, so Reverse puts undated posts at the end
    posts.sort_by_cached_key(|post| Reverse(helpers::epoch_millis(&post.date)));
    posts
}

/// Most viewed first, stable
pub fn sort_by_views(mut posts: Vec<PostMetadata>) -> Vec<PostMetadata> {
    posts.sort_by_key(|post| Reverse(post.views));
    posts
}

/// Tag buckets in first-seen order; each bucket keeps listing order
pub fn group_by_tag(posts: &[PostMetadata]) -> IndexMap<String, Vec<PostMetadata>> {
    let mut groups: IndexMap<String, Vec<PostMetadata>> = IndexMap::new();

    for post in posts {
        for (i, tag) in post.tags.iter().enumerate() {
            // A tag repeated on one post still files it once
            if post.tags[..i].contains(tag) {
                continue;
            }
            groups.entry(tag.clone()).or_default().push(post.clone());
        }
    }

    groups
}

/// Year buckets (UTC) in first-seen order; each bucket keeps listing order
pub fn group_by_year(posts: &[PostMetadata]) -> IndexMap<String, Vec<PostMetadata>> {
    let mut groups: IndexMap<String, Vec<PostMetadata>> = IndexMap::new();

    for post in posts {
        let year = helpers::year_of(&post.date).unwrap_or_else(|| UNKNOWN_YEAR.to_string());
        groups.entry(year).or_default().push(post.clone());
    }

    groups
}

/// Year buckets ordered newest year first, unknown last
pub fn archive(groups: IndexMap<String, Vec<PostMetadata>>) -> Vec<(String, Vec<PostMetadata>)> {
    let mut years: Vec<_> = groups.into_iter().collect();
    years.sort_by_cached_key(|(year, _)| Reverse(year.parse::<i64>().ok()));
    years
}

/// Tag names ordered by post count, ties in first-seen order
pub fn tags_by_popularity(groups: &IndexMap<String, Vec<PostMetadata>>) -> Vec<String> {
    let mut tags: Vec<(&String, usize)> = groups
        .iter()
        .map(|(tag, posts)| (tag, posts.len()))
        .collect();
    tags.sort_by_key(|&(_, count)| Reverse(count));
    tags.into_iter().map(|(tag, _)| tag.clone()).collect()
}

/// Case-insensitive substring match on title, excerpt and tags
///
/// A blank query matches nothing.
pub fn search(posts: &[PostMetadata], query: &str) -> Vec<PostMetadata> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    posts
        .iter()
        .filter(|post| is_match(post, &needle))
        .cloned()
        .collect()
}

fn is_match(post: &PostMetadata, needle: &str) -> bool {
    post.title.to_lowercase().contains(needle)
        || post.excerpt.to_lowercase().contains(needle)
        || post.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Language;

    fn post(slug: &str, date: &str, tags: &[&str]) -> PostMetadata {
        PostMetadata {
            slug: slug.to_string(),
            title: slug.to_string(),
            date: date.to_string(),
            excerpt: String::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            language: Language::En,
            reading_time: 1,
            views: 0,
        }
    }

    fn slugs(posts: &[PostMetadata]) -> Vec<&str> {
        posts.iter().map(|p| p.slug.as_str()).collect()
    }

    #[test]
    fn test_sort_by_recency_is_stable() {
        let posts = vec![
            post("old", "2023-02-01", &[]),
            post("tie-1", "2024-05-05", &[]),
            post("new", "2024-12-31", &[]),
            post("tie-2", "2024-05-05T00:00:00Z", &[]),
            post("tie-3", "2024-05-05", &[]),
        ];
        let sorted = sort_by_recency(posts);
        assert_eq!(slugs(&sorted), vec!["new", "tie-1", "tie-2", "tie-3", "old"]);
    }

    #[test]
    fn test_sort_by_recency_is_numeric() {
        let posts = vec![
            post("june", "2024/6/1", &[]),
            post("october", "2024-10-01", &[]),
            post("offset", "2024-10-01T08:00:00+09:00", &[]),
        ];
        let sorted = sort_by_recency(posts);
        // 08:00+09:00 is the previous day in UTC
        assert_eq!(slugs(&sorted), vec!["october", "offset", "june"]);
    }

    #[test]
    fn test_undated_sort_last() {
        let posts = vec![
            post("nodate", "whenever", &[]),
            post("dated", "2020-01-01", &[]),
        ];
        assert_eq!(slugs(&sort_by_recency(posts)), vec!["dated", "nodate"]);
    }

    #[test]
    fn test_group_by_tag() {
        let posts = vec![
            post("a", "2024-01-05", &["ml"]),
            post("b", "2024-06-01", &["ml", "comminution"]),
            post("c", "2024-07-01", &["ML", "ml", "ml"]),
            post("d", "2024-08-01", &[]),
        ];
        let groups = group_by_tag(&posts);

        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["ml", "comminution", "ML"]);
        assert_eq!(slugs(&groups["ml"]), vec!["a", "b", "c"]);
        assert_eq!(slugs(&groups["comminution"]), vec!["b"]);
        assert_eq!(slugs(&groups["ML"]), vec!["c"]);
        for (tag, bucket) in &groups {
            assert!(bucket.iter().all(|p| p.has_tag(tag)));
            assert_eq!(bucket.len(), posts.iter().filter(|p| p.has_tag(tag)).count());
        }
    }

    #[test]
    fn test_group_by_year_partitions() {
        let posts = vec![
            post("a", "2024-01-05", &[]),
            post("b", "2023-12-31T23:30:00-01:00", &[]),
            post("c", "2023-03-03", &[]),
            post("d", "sometime", &[]),
        ];
        let groups = group_by_year(&posts);

        assert_eq!(slugs(&groups["2024"]), vec!["a", "b"]);
        assert_eq!(slugs(&groups["2023"]), vec!["c"]);
        assert_eq!(slugs(&groups[UNKNOWN_YEAR]), vec!["d"]);

        let total: usize = groups.values().map(Vec::len).sum();
        assert_eq!(total, posts.len());
    }

    #[test]
    fn test_archive_orders_years_descending() {
        let posts = vec![
            post("x", "whenever", &[]),
            post("a", "2019-01-01", &[]),
            post("b", "2024-01-01", &[]),
            post("c", "2021-01-01", &[]),
        ];
        let years: Vec<String> = archive(group_by_year(&posts))
            .into_iter()
            .map(|(year, _)| year)
            .collect();
        assert_eq!(years, vec!["2024", "2021", "2019", UNKNOWN_YEAR]);
    }

    #[test]
    fn test_tags_by_popularity() {
        let posts = vec![
            post("a", "2024-01-01", &["flotation", "ml"]),
            post("b", "2024-01-02", &["ml", "leaching"]),
            post("c", "2024-01-03", &["leaching", "ml"]),
        ];
        let tags = tags_by_popularity(&group_by_tag(&posts));
        assert_eq!(tags, vec!["ml", "leaching", "flotation"]);
    }

    #[test]
    fn test_sort_by_views() {
        let mut posts = vec![
            post("quiet", "2024-01-01", &[]),
            post("hot", "2024-01-02", &[]),
            post("warm", "2024-01-03", &[]),
            post("also-quiet", "2024-01-04", &[]),
        ];
        posts[1].views = 900;
        posts[2].views = 40;
        let sorted = sort_by_views(posts);
        assert_eq!(slugs(&sorted), vec!["hot", "warm", "quiet", "also-quiet"]);
    }

    #[test]
    fn test_search_blank_query_is_empty() {
        let posts = vec![post("a", "2024-01-01", &["ml"])];
        assert!(search(&posts, "").is_empty());
        assert!(search(&posts, "   ").is_empty());
        assert!(search(&posts, "\t\n").is_empty());
    }

    #[test]
    fn test_search_fields_case_insensitive() {
        let mut gold = post("gold", "2024-01-01", &[]);
        gold.title = "Gold Price Update".to_string();
        let mut mill = post("mill", "2024-01-02", &["Comminution"]);
        mill.title = "Ball Mill Sizing".to_string();
        let mut leach = post("leach", "2024-01-03", &[]);
        leach.title = "Heap Leach".to_string();
        leach.excerpt = "Recovering GOLD with cyanide".to_string();
        let posts = vec![gold, mill, leach];

        assert_eq!(slugs(&search(&posts, "gold")), vec!["gold", "leach"]);
        assert_eq!(slugs(&search(&posts, "  COMMINUTION ")), vec!["mill"]);
        assert_eq!(slugs(&search(&posts, "ball mill")), vec!["mill"]);
        assert!(search(&posts, "flotation").is_empty());
    }

    #[test]
    fn test_search_cyrillic() {
        let mut post = post("mn", "2024-01-01", &[]);
        post.title = "Баяжуулалтын Технологи".to_string();
        assert_eq!(search(&[post], "технологи").len(), 1);
    }
}
