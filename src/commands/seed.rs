//! Populate the store with the sample agency posts

use anyhow::Result;

use crate::content::{BlogPost, PostDraft};
use crate::store::ContentStore;

/// (title, category, content)
const SAMPLE_POSTS: &[(&str, &str, &str)] = &[
    (
        "Web development trends in 2024",
        "Web Development",
        "Web development keeps moving fast. React 18, Next.js 14 and the newest \
         JavaScript features sit at the heart of that change, and developers need \
         to keep up to build modern, fast applications. Performance work and \
         accessibility matter more every year.",
    ),
    (
        "How to speed up your React application",
        "Technologies",
        "Performance is what makes an interface feel smooth. We walk through \
         memoization with React.memo and useMemo, lazy loading components, image \
         optimization and code splitting with React.lazy.",
    ),
    (
        "A complete guide to mobile development with React Native",
        "Mobile Apps",
        "React Native still leads cross-platform mobile work. This guide covers \
         environment setup, project structure, navigation, state management, API \
         integration and shipping to the stores.",
    ),
    (
        "Building a modern e-commerce shop with Next.js",
        "E-commerce",
        "Next.js has everything a fast online shop needs. We lay out a full \
         architecture: product catalogue, cart, Stripe payments, order handling \
         and SEO, with Prisma for the database and a headless CMS.",
    ),
    (
        "The fundamentals of UI/UX design",
        "Design",
        "Good design decides whether an application succeeds. We cover visual \
         hierarchy, contrast and legibility, consistent components, user feedback \
         and accessibility, along with Figma, design systems and user testing.",
    ),
    (
        "Securing your web application: best practices",
        "Advice",
        "Web security matters more than ever. We go over JWT authentication, CSRF \
         protection, input validation, HTTPS and session handling, and how to \
         prevent SQL injection, XSS and brute-force attacks.",
    ),
];

/// Insert the sample posts, clearing the store first unless `keep` is set
pub async fn run(store: &dyn ContentStore, keep: bool) -> Result<Vec<BlogPost>> {
    if !keep {
        let removed = store.count().await?;
        store.clear().await?;
        tracing::info!("Cleared {} existing posts", removed);
    }

    let mut created = Vec::with_capacity(SAMPLE_POSTS.len());
    for (title, category, content) in SAMPLE_POSTS {
        let post = store.insert(PostDraft::new(*title, *content, *category)).await?;
        println!("  - {} ({})", post.title, post.category);
        created.push(post);
    }

    println!("Seeded {} sample posts", created.len());
    Ok(created)
}
