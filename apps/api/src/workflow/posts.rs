//! LinkedIn post batch with per-post graphic generation.

use serde::Serialize;
use tracing::debug;

use crate::errors::AppError;
use crate::models::linkedin::{LinkedInPost, PostUpdate};
use crate::workflow::flags::InFlight;

/// Identifies one graphic request: the post index plus the batch it was
/// started against, so a result for a replaced batch can be dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphicTicket {
    pub index: usize,
    batch: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostBatch {
    posts: Vec<LinkedInPost>,
    #[serde(skip)]
    batch: u64,
    generating_graphics: InFlight<usize>,
}

impl PostBatch {
    pub fn posts(&self) -> &[LinkedInPost] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn is_generating_graphic(&self, index: usize) -> bool {
        self.generating_graphics.is_active(&index)
    }

    /// Replaces the whole batch. Pending graphic requests for the old batch
    /// become stale.
    pub fn replace(&mut self, posts: Vec<LinkedInPost>) {
        self.posts = posts;
        self.batch += 1;
        self.generating_graphics = InFlight::default();
    }

    /// Local edit of one post; other posts are untouched.
    pub fn update(&mut self, index: usize, update: PostUpdate) -> Result<&LinkedInPost, AppError> {
        let post = self.post_mut(index)?;
        if let Some(content) = update.content {
            post.content = content;
        }
        if let Some(hashtags) = update.hashtags {
            post.hashtags = normalize_hashtags(hashtags);
        }
        Ok(&*post)
    }

    /// Marks a graphic request for `index` in flight and returns the post to
    /// render. Refused if that index already has one pending.
    pub fn begin_graphic(&mut self, index: usize) -> Result<(GraphicTicket, LinkedInPost), AppError> {
        let post = self.post_mut(index)?.clone();
        if !self.generating_graphics.try_begin(index) {
            return Err(AppError::Conflict(format!(
                "A graphic for post {index} is already being generated"
            )));
        }
        Ok((
            GraphicTicket {
                index,
                batch: self.batch,
            },
            post,
        ))
    }

    /// Clears the in-flight flag and, on success, attaches the image.
    /// Returns false when the ticket belongs to a replaced batch.
    pub fn finish_graphic(&mut self, ticket: GraphicTicket, image_url: Option<String>) -> bool {
        if ticket.batch != self.batch {
            debug!("Dropping graphic for post {} from a replaced batch", ticket.index);
            return false;
        }
        self.generating_graphics.finish(&ticket.index);
        if let (Some(url), Some(post)) = (image_url, self.posts.get_mut(ticket.index)) {
            post.image_url = Some(url);
        }
        true
    }

    fn post_mut(&mut self, index: usize) -> Result<&mut LinkedInPost, AppError> {
        let len = self.posts.len();
        self.posts
            .get_mut(index)
            .ok_or_else(|| AppError::NotFound(format!("Post {index} not found (batch has {len})")))
    }
}

/// Strips leading `#`, trims, drops blanks.
pub fn normalize_hashtags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|t| t.trim().trim_start_matches('#').trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::linkedin::fixtures::batch;

    #[test]
    fn test_replace_discards_previous_posts() {
        let mut b = PostBatch::default();
        b.replace(batch(10));
        b.update(0, PostUpdate { content: Some("edited".to_string()), hashtags: None })
            .unwrap();
        b.replace(batch(3));
        assert_eq!(b.len(), 3);
        assert_ne!(b.posts()[0].content, "edited");
    }

    #[test]
    fn test_update_touches_only_one_index() {
        let mut b = PostBatch::default();
        b.replace(batch(3));
        let before = b.posts().to_vec();

        b.update(
            1,
            PostUpdate {
                content: None,
                hashtags: Some(vec!["#Skills".to_string(), " ".to_string()]),
            },
        )
        .unwrap();

        assert_eq!(b.posts()[0], before[0]);
        assert_eq!(b.posts()[2], before[2]);
        assert_eq!(b.posts()[1].content, before[1].content);
        assert_eq!(b.posts()[1].hashtags, vec!["Skills"]);
    }

    #[test]
    fn test_update_out_of_range() {
        let mut b = PostBatch::default();
        assert!(matches!(
            b.update(0, PostUpdate::default()),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_graphics_are_independent_per_index() {
        let mut b = PostBatch::default();
        b.replace(batch(3));
        let (t0, _) = b.begin_graphic(0).unwrap();
        let (t2, _) = b.begin_graphic(2).unwrap();
        assert!(matches!(b.begin_graphic(0), Err(AppError::Conflict(_))));

        assert!(b.finish_graphic(t2, Some("data:image/png;base64,AA".to_string())));
        assert!(b.is_generating_graphic(0));
        assert!(!b.is_generating_graphic(2));
        assert!(b.posts()[2].image_url.is_some());

        assert!(b.finish_graphic(t0, None));
        assert!(b.posts()[0].image_url.is_none());
        assert!(!b.is_generating_graphic(0));
    }

    #[test]
    fn test_graphic_for_replaced_batch_is_dropped() {
        let mut b = PostBatch::default();
        b.replace(batch(2));
        let (ticket, _) = b.begin_graphic(1).unwrap();
        b.replace(batch(2));

        assert!(!b.finish_graphic(ticket, Some("data:image/png;base64,AA".to_string())));
        assert!(b.posts()[1].image_url.is_none());
    }
}
