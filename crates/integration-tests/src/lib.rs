//! Shared fixtures for the integration test suite.

use async_trait::async_trait;
use domains::{PageSource, Post};

const TEST_FORUM: &str = include_str!("../fixtures/test_forum.json");

/// Posts of the `test_forum` fixture, oldest first.
pub fn test_forum_posts() -> Vec<Post> {
    serde_json::from_str(TEST_FORUM).expect("test_forum.json is valid")
}

/// Read-only post listing that answers `count`/`fetch` the way a database
/// repository would: counting first, then slicing with LIMIT/OFFSET.
#[derive(Debug, Clone)]
pub struct InMemoryPostStore {
    posts: Vec<Post>,
    /// Upper bound applied before paging, like `Post.objects.all()[:limit]`
    limit: Option<usize>,
}

impl InMemoryPostStore {
    pub fn new(posts: Vec<Post>) -> Self {
        Self { posts, limit: None }
    }

    pub fn take(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn visible(&self) -> &[Post] {
        let end = self.limit.map_or(self.posts.len(), |l| l.min(self.posts.len()));
        &self.posts[..end]
    }
}

#[async_trait]
impl PageSource for InMemoryPostStore {
    type Item = Post;

    async fn count(&self) -> anyhow::Result<u64> {
        Ok(self.visible().len() as u64)
    }

    async fn fetch(&self, offset: u64, limit: u64) -> anyhow::Result<Vec<Post>> {
        let visible = self.visible();
        let start = usize::try_from(offset)?.min(visible.len());
        let end = start.saturating_add(usize::try_from(limit)?).min(visible.len());
        Ok(visible[start..end].to_vec())
    }
}
