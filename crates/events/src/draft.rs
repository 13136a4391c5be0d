//! Stand-in for how a draft will look once it is published.
//!
//! Drafts have placeholder permalinks (`/?p=123`). Republishing a copy with a
//! real slug gives the URL the post will have, so its cache entries can be
//! purged before it goes live:
//!
//! - BAD: `https://example.com/?post_type=book&p=123`
//! - GOOD: `https://example.com/book/a-draft-post/`

use slug::slugify;

use crate::model::{Post, PostId, PostStatus};

/// Copy of `post` with a published status and a slug.
///
/// An existing slug is kept; otherwise one is derived from the title.
pub(crate) fn as_published(post: &Post) -> Post {
    let slug = match post.slug() {
        Some(slug) => slug.to_string(),
        None => synthesize_slug(&post.title, post.id),
    };
    Post { status: PostStatus::Publish, slug: Some(slug), ..post.clone() }
}

/// Slugify a title, falling back to the post id when nothing slug-worthy is left.
pub(crate) fn synthesize_slug(title: &str, fallback: PostId) -> String {
    let candidate = slugify(title);
    if candidate.is_empty() { fallback.to_string() } else { candidate }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(slug: Option<&str>, title: &str) -> Post {
        Post {
            id: 42,
            post_type: "post".into(),
            status: PostStatus::Draft,
            slug: slug.map(str::to_string),
            title: title.into(),
        }
    }

    #[test]
    fn test_synthesize_from_title() {
        assert_eq!(synthesize_slug("Hello, World!", 7), "hello-world");
    }

    #[test]
    fn test_synthesize_transliterates() {
        assert_eq!(synthesize_slug("Crème Brûlée", 7), "creme-brulee");
    }

    #[test]
    fn test_synthesize_falls_back_to_id() {
        assert_eq!(synthesize_slug("", 42), "42");
        assert_eq!(synthesize_slug("!!!", 42), "42");
    }

    #[test]
    fn test_as_published_derives_missing_slug() {
        let post = as_published(&draft(None, "A Draft Post"));
        assert_eq!(post.status, PostStatus::Publish);
        assert_eq!(post.slug.as_deref(), Some("a-draft-post"));
    }

    #[test]
    fn test_as_published_keeps_existing_slug() {
        let post = as_published(&draft(Some("chosen-slug"), "A Draft Post"));
        assert_eq!(post.slug.as_deref(), Some("chosen-slug"));
    }

    #[test]
    fn test_as_published_empty_slug_is_replaced() {
        let post = as_published(&draft(Some(""), "Untitled?"));
        assert_eq!(post.slug.as_deref(), Some("untitled"));
    }

    #[test]
    fn test_as_published_leaves_original_untouched() {
        let original = draft(None, "Hello");
        let _ = as_published(&original);
        assert_eq!(original.status, PostStatus::Draft);
        assert!(original.slug.is_none());
    }
}
