//! forum-markup/crates/domains/src/lib.rs
//!
//! Domain models, errors and port definitions for the forum display layer.

pub mod error;
pub mod models;
pub mod ports;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use ports::*;

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_post_creation_v7() {
        let topic_id = Uuid::now_v7();
        let post = Post::new(topic_id, "admin", MarkupMode::Bbcode, "[b]Hello Rust![/b]");
        assert_eq!(post.topic_id, topic_id);
        assert_eq!(post.id.get_version_num(), 7);
        assert!(post.body_html.is_empty());
        assert!(post.updated_at.is_none());
    }

    #[test]
    fn test_markup_mode_parsing() {
        assert_eq!(" BBCode ".parse::<MarkupMode>().unwrap(), MarkupMode::Bbcode);
        assert_eq!("markdown".parse::<MarkupMode>().unwrap(), MarkupMode::Markdown);
        let err = "textile".parse::<MarkupMode>().unwrap_err();
        assert!(matches!(err, DomainError::InvalidMarkup(ref m) if m == "textile"));
    }

    #[test]
    fn test_markup_mode_serde() {
        let json = serde_json::to_string(&MarkupMode::Markdown).unwrap();
        assert_eq!(json, "\"markdown\"");
        let back: MarkupMode = serde_json::from_str("\"bbcode\"").unwrap();
        assert_eq!(back, MarkupMode::Bbcode);
    }

    #[test]
    fn test_release_level_tags() {
        assert_eq!("rc".parse::<ReleaseLevel>().unwrap().tag(), "rc");
        assert_eq!("f".parse::<ReleaseLevel>().unwrap(), ReleaseLevel::Final);
        assert!("z".parse::<ReleaseLevel>().is_err());
    }

    #[tokio::test]
    async fn test_vec_source_slices() {
        let items: Vec<u32> = (1..=5).collect();
        assert_eq!(items.count().await.unwrap(), 5);
        assert_eq!(items.fetch(3, 3).await.unwrap(), vec![4, 5]);
        assert!(items.fetch(10, 3).await.unwrap().is_empty());
    }
}
