use domains::{DomainError, MockPageSource};
use integration_tests::{test_forum_posts, InMemoryPostStore};
use pretty_assertions::assert_eq;
use services::{paginate, PageRequest};

fn first_five_posts() -> InMemoryPostStore {
    InMemoryPostStore::new(test_forum_posts()).take(5)
}

#[tokio::test]
async fn test_paginate() {
    let posts = first_five_posts();

    let (pages, paginator, _) = paginate(&posts, &PageRequest::from_query("?page=2"), 3).await.unwrap();
    assert_eq!(pages, 2);
    assert_eq!(paginator.count(), 5);

    let (_, _, paged_list) = paginate(&posts, &PageRequest::from_query("page=1"), 3).await.unwrap();
    assert_eq!(paged_list.len(), 3);
}

#[tokio::test]
async fn second_page_holds_the_remainder_in_order() {
    let posts = first_five_posts();
    let all = test_forum_posts();

    let (_, _, page) = paginate(&posts, &PageRequest::from_query("page=2"), 3).await.unwrap();
    assert_eq!(page.items, all[3..5].to_vec());
    assert_eq!((page.start_index(), page.end_index()), (4, 5));
    assert_eq!(page.next_page_number(), None);
}

#[tokio::test]
async fn missing_or_garbage_page_parameter_means_first_page() {
    let posts = first_five_posts();
    for query in ["", "page=", "page=two", "sort=new"] {
        let (_, _, page) = paginate(&posts, &PageRequest::from_query(query), 3).await.unwrap();
        assert_eq!(page.number, 1, "query {query:?}");
    }
}

#[tokio::test]
async fn out_of_range_pages_are_not_found() {
    let posts = first_five_posts();
    for query in ["page=0", "page=-1", "page=3"] {
        let result = paginate(&posts, &PageRequest::from_query(query), 3).await;
        assert!(matches!(result, Err(DomainError::PageNotFound { .. })), "query {query:?}");
    }

    // Numbers too large to parse fall back to the first page.
    let (_, _, page) = paginate(&posts, &PageRequest::from_query("page=99999999999999999999"), 3).await.unwrap();
    assert_eq!(page.number, 1);
}

#[tokio::test]
async fn mocked_repository_is_queried_with_limit_and_offset() {
    let mut source = MockPageSource::new();
    source.expect_count().times(1).returning(|| Ok(7));
    source
        .expect_fetch()
        .withf(|offset, limit| (*offset, *limit) == (6, 3))
        .times(1)
        .returning(|_, _| Ok(test_forum_posts().into_iter().take(1).collect()));

    let (pages, _, page) = paginate(&source, &PageRequest::with_page("3"), 3).await.unwrap();
    assert_eq!(pages, 3);
    assert_eq!(page.len(), 1);
    assert!(page.has_previous());
}
