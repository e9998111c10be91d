//! List store content

use anyhow::Result;

use crate::content::BlogPost;
use crate::store::ContentStore;

/// List store content by type
pub async fn run(store: &dyn ContentStore, content_type: &str) -> Result<()> {
    match content_type {
        "post" | "posts" => {
            let posts = store.find_all().await?;
            println!("Posts ({}):", posts.len());
            for line in post_lines(&posts) {
                println!("  {}", line);
            }
        }
        "category" | "categories" => {
            let posts = store.find_all().await?;
            let categories = count_categories(&posts);
            println!("Categories ({}):", categories.len());
            for (cat, count) in categories {
                println!("  {} ({})", cat, count);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, category",
                content_type
            );
        }
    }

    Ok(())
}

fn post_lines(posts: &[BlogPost]) -> Vec<String> {
    posts
        .iter()
        .map(|post| {
            format!(
                "{} - {} [{}] ({})",
                post.created_at.format("%Y-%m-%d"),
                post.title,
                post.category,
                post.id
            )
        })
        .collect()
}

/// Category counts, most used first; ties sorted by name
fn count_categories(posts: &[BlogPost]) -> Vec<(String, usize)> {
    let mut categories: std::collections::HashMap<String, usize> =
        std::collections::HashMap::new();
    for post in posts {
        *categories.entry(post.category.clone()).or_insert(0) += 1;
    }
    let mut categories: Vec<_> = categories.into_iter().collect();
    categories.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    categories
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::PostDraft;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_count_categories() {
        let store = MemoryStore::new();
        for (title, cat) in [("a", "Design"), ("b", "Mobile"), ("c", "Design")] {
            store.insert(PostDraft::new(title, "x", cat)).await.unwrap();
        }
        let posts = store.find_all().await.unwrap();
        assert_eq!(
            count_categories(&posts),
            vec![("Design".to_string(), 2), ("Mobile".to_string(), 1)]
        );
    }

    #[tokio::test]
    async fn test_post_lines_include_id() {
        let store = MemoryStore::new();
        let post = store.insert(PostDraft::new("Hello", "x", "News")).await.unwrap();
        let lines = post_lines(&store.find_all().await.unwrap());
        assert!(lines[0].contains("Hello [News]"));
        assert!(lines[0].contains(post.id.as_str()));
    }

    #[tokio::test]
    async fn test_unknown_type() {
        let store = MemoryStore::new();
        assert!(run(&store, "tag").await.is_err());
    }
}
