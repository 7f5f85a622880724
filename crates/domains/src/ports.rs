//! # Ports
//!
//! Any item store the paginator reads from must implement these traits.

use async_trait::async_trait;

/// Read-only, sliceable result set (a "queryset").
///
/// `count` and `fetch` are separate calls so a database-backed source can
/// answer them with `COUNT(*)` and `LIMIT/OFFSET` queries.
#[cfg_attr(any(test, feature = "testing"), mockall::automock(type Item = crate::models::Post;))]
#[async_trait]
pub trait PageSource: Send + Sync {
    type Item: Send;

    /// Total number of items in the result set.
    async fn count(&self) -> anyhow::Result<u64>;

    /// Returns at most `limit` items starting at `offset`.
    async fn fetch(&self, offset: u64, limit: u64) -> anyhow::Result<Vec<Self::Item>>;
}

#[async_trait]
impl<T> PageSource for Vec<T>
where
    T: Clone + Send + Sync,
{
    type Item = T;

    async fn count(&self) -> anyhow::Result<u64> {
        Ok(self.len() as u64)
    }

    async fn fetch(&self, offset: u64, limit: u64) -> anyhow::Result<Vec<T>> {
        let start = usize::try_from(offset).unwrap_or(usize::MAX).min(self.len());
        let end = start.saturating_add(usize::try_from(limit).unwrap_or(usize::MAX)).min(self.len());
        Ok(self[start..end].to_vec())
    }
}
