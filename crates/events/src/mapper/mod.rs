//! Event handlers.
//!
//! Each handler computes the URL set affected by one content event, runs it
//! through the matching hook, logs a one-line summary and dispatches. URL
//! computation is exposed separately (`*_urls`) so hosts can inspect it.
//!
//! URLs ending in `*` purge a page and everything below it (pagination,
//! feeds, comment pages); the site root is purged exactly.

use pagepurge_client::Purger;
use pagepurge_core::url::trailing_slash;
use pagepurge_core::{Error, PurgeLog};

use crate::draft::as_published;
use crate::hooks::{EventHooks, TermContext};
use crate::model::{Comment, Post, PostId, Taxonomy, TermId, UserId};
use crate::site::ContentSite;


/// Maps content events onto purges.
pub struct EventMapper<S> {
    site: S,
    purger: Purger,
    hooks: EventHooks,
    log: PurgeLog,
}

impl<S: ContentSite> EventMapper<S> {
    /// Create a mapper with pass-through hooks. Logging follows the purger.
    pub fn new(site: S, purger: Purger) -> Self {
        let log = purger.log();
        Self { site, purger, hooks: EventHooks::default(), log }
    }

    pub fn with_hooks(mut self, hooks: EventHooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn site(&self) -> &S {
        &self.site
    }

    pub fn purger(&self) -> &Purger {
        &self.purger
    }

    /// A post was saved, updated or deleted.
    pub fn post_changed(&self, post_id: PostId) {
        let Some(post) = self.site.post(post_id) else {
            return;
        };
        let Some((post, urls)) = self.post_urls(&post) else {
            return;
        };

        let urls = self.hooks.post.apply(urls, &post);
        if self.log.enabled() {
            tracing::info!(post_id = post.id, "Purging post ({})", post.id);
        }
        self.purger.purge(urls);
    }

    /// URLs affected by a change to `post`, with the post they were computed from.
    ///
    /// Returns `None` for revisions. Pre-publication posts are swapped for
    /// their published stand-in first.
    pub fn post_urls(&self, post: &Post) -> Option<(Post, Vec<String>)> {
        if post.is_revision() {
            return None;
        }

        let post = if post.status.is_pre_publication() { as_published(post) } else { post.clone() };

        let mut urls = Vec::new();
        if let Some(permalink) = self.site.permalink(&post) {
            urls.push(wildcard(&permalink));
        }
        if let Some(archive) = self.site.post_type_archive_link(&post.post_type) {
            urls.push(wildcard(&archive));
        }

        let root = trailing_slash(&self.site.site_url());
        let paged = format!("{root}page/*");
        urls.push(root);
        urls.push(paged);

        let taxonomies = self.site.public_taxonomies();
        for term in self.site.object_terms(post.id, &taxonomies) {
            if let Some(link) = self.site.term_link(term.id, &term.taxonomy) {
                urls.push(wildcard(&link));
            }
        }

        Some((post, urls))
    }

    /// A comment moved between moderation states.
    pub fn comment_status_changed(&self, new_status: &str, old_status: &str, comment: &Comment) {
        let urls = self.hooks.comment.apply(self.comment_urls(comment), comment);
        if urls.is_empty() {
            return;
        }

        if self.log.enabled() {
            tracing::info!(
                comment_id = comment.id,
                new_status,
                old_status,
                "Purging comments for post {}",
                comment.post_id.unwrap_or_default()
            );
        }
        self.purger.purge(urls);
    }

    /// The parent post's pages, if the comment is attached to a post.
    pub fn comment_urls(&self, comment: &Comment) -> Vec<String> {
        comment
            .post_id
            .and_then(|post_id| self.site.post(post_id))
            .and_then(|post| self.site.permalink(&post))
            .map(|permalink| vec![wildcard(&permalink)])
            .unwrap_or_default()
    }

    /// A term was edited or is about to be deleted.
    pub fn term_changed(&self, term_id: TermId, taxonomy_slug: &str) {
        let taxonomy = match self.public_taxonomy(taxonomy_slug) {
            Ok(taxonomy) => taxonomy,
            Err(e) => {
                if self.log.enabled() {
                    tracing::debug!(term_id, taxonomy = taxonomy_slug, reason = %e, "Nothing to purge for term");
                }
                return;
            }
        };

        let urls = self.term_urls(term_id, &taxonomy);
        let context = TermContext { term_id, taxonomy };
        let urls = self.hooks.terms.apply(urls, &context);
        if self.log.enabled() {
            tracing::info!(term_id, taxonomy = taxonomy_slug, "Purging terms ({term_id}, {taxonomy_slug})");
        }
        self.purger.purge(urls);
    }

    /// The term's own listing plus every published post carrying it.
    pub fn term_urls(&self, term_id: TermId, taxonomy: &Taxonomy) -> Vec<String> {
        let mut urls = Vec::new();
        if let Some(link) = self.site.term_link(term_id, &taxonomy.slug) {
            urls.push(link);
        }
        for post in self.site.published_posts_with_term(term_id, &taxonomy.slug) {
            if let Some(permalink) = self.site.permalink(&post) {
                urls.push(wildcard(&permalink));
            }
        }
        urls
    }

    /// A user was deleted.
    pub fn user_deleted(&self, user_id: UserId) {
        let urls = self.user_urls(user_id);
        let urls = self.hooks.user.apply(urls, &user_id);
        if self.log.enabled() {
            tracing::info!(user_id, "Purging user ({user_id})");
        }
        self.purger.purge(urls);
    }

    /// The user's author archive.
    pub fn user_urls(&self, user_id: UserId) -> Vec<String> {
        self.site.author_posts_url(user_id).map(|url| vec![wildcard(&url)]).unwrap_or_default()
    }

    /// Purge every cached page of the site.
    pub fn purge_all(&self) {
        self.purger.purge_all(&self.site.site_url());
    }

    fn public_taxonomy(&self, slug: &str) -> Result<Taxonomy, Error> {
        match self.site.taxonomy(slug) {
            Some(taxonomy) if taxonomy.public => Ok(taxonomy),
            Some(_) => Err(Error::MissingTaxonomy(format!("{slug} is not public"))),
            None => Err(Error::MissingTaxonomy(format!("{slug} is not registered"))),
        }
    }
}

fn wildcard(url: &str) -> String {
    format!("{url}*")
}
