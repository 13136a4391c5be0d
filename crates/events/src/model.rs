//! Content records supplied by the content-management system.

pub type PostId = u64;
pub type TermId = u64;
pub type UserId = u64;
pub type CommentId = u64;

/// Post type used for stored revisions of another post.
pub const REVISION_POST_TYPE: &str = "revision";

/// Publication state of a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostStatus {
    Publish,
    Future,
    Draft,
    Pending,
    Private,
    Trash,
    AutoDraft,
    Inherit,
    Other(String),
}

impl PostStatus {
    /// Draft, pending review, or auto-draft.
    pub fn is_pre_publication(&self) -> bool {
        matches!(self, PostStatus::Draft | PostStatus::Pending | PostStatus::AutoDraft)
    }

    pub fn as_str(&self) -> &str {
        match self {
            PostStatus::Publish => "publish",
            PostStatus::Future => "future",
            PostStatus::Draft => "draft",
            PostStatus::Pending => "pending",
            PostStatus::Private => "private",
            PostStatus::Trash => "trash",
            PostStatus::AutoDraft => "auto-draft",
            PostStatus::Inherit => "inherit",
            PostStatus::Other(status) => status,
        }
    }
}

impl From<&str> for PostStatus {
    fn from(status: &str) -> Self {
        match status {
            "publish" => PostStatus::Publish,
            "future" => PostStatus::Future,
            "draft" => PostStatus::Draft,
            "pending" => PostStatus::Pending,
            "private" => PostStatus::Private,
            "trash" => PostStatus::Trash,
            "auto-draft" => PostStatus::AutoDraft,
            "inherit" => PostStatus::Inherit,
            other => PostStatus::Other(other.to_string()),
        }
    }
}

/// A content item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub post_type: String,
    pub status: PostStatus,
    /// URL slug; `None` until the post is first published.
    pub slug: Option<String>,
    pub title: String,
}

impl Post {
    pub fn is_revision(&self) -> bool {
        self.post_type == REVISION_POST_TYPE
    }

    /// The slug, treating an empty string as missing.
    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref().filter(|slug| !slug.is_empty())
    }
}

/// A taxonomy such as categories or tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxonomy {
    pub slug: String,
    /// Whether the taxonomy has public archive pages.
    pub public: bool,
}

/// A term inside a taxonomy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub id: TermId,
    pub taxonomy: String,
    pub slug: String,
}

/// A comment record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    /// The post the comment is attached to, if any.
    pub post_id: Option<PostId>,
}
