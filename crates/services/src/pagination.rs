//! # Pagination
//!
//! Splits a [`PageSource`] into fixed-size pages and resolves the `page`
//! query parameter of a listing request.

use domains::{DomainError, PageSource, Result};
use serde::Serialize;

/// The query-string view of a listing request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    page: Option<String>,
}

impl PageRequest {
    /// Parses a raw query string such as `"page=2&order=asc"`.
    /// The first `page` parameter wins.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let page = url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "page")
            .map(|(_, value)| value.into_owned());
        Self { page }
    }

    pub fn with_page(page: impl Into<String>) -> Self {
        Self { page: Some(page.into()) }
    }

    /// Requested page number. Missing or non-numeric values mean page 1;
    /// out-of-range numbers are kept so the paginator can reject them.
    pub fn page_number(&self) -> i64 {
        self.page.as_deref().and_then(|p| p.trim().parse().ok()).unwrap_or(1)
    }
}

/// Page arithmetic for a result set of `count` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Paginator {
    count: u64,
    per_page: u64,
}

impl Paginator {
    pub fn new(count: u64, per_page: u64) -> Result<Self> {
        if per_page == 0 {
            return Err(DomainError::InvalidPageSize);
        }
        Ok(Self { count, per_page })
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    /// Total pages; an empty result set still has one (empty) page.
    pub fn num_pages(&self) -> u64 {
        self.count.div_ceil(self.per_page).max(1)
    }

    pub fn page_range(&self) -> std::ops::RangeInclusive<u64> {
        1..=self.num_pages()
    }

    /// Checks that `number` names an existing page.
    pub fn validate_number(&self, number: i64) -> Result<u64> {
        let num_pages = self.num_pages();
        match u64::try_from(number) {
            Ok(n) if (1..=num_pages).contains(&n) => Ok(n),
            _ => Err(DomainError::PageNotFound { page: number, num_pages }),
        }
    }

    /// Zero-based offset of the first item on page `number`.
    fn offset(&self, number: u64) -> u64 {
        (number - 1) * self.per_page
    }

    /// Fetches page `number` from `source`.
    pub async fn page<S>(&self, source: &S, number: i64) -> Result<Page<S::Item>>
    where
        S: PageSource + ?Sized,
    {
        let number = self.validate_number(number)?;
        let items = if self.count == 0 {
            Vec::new()
        } else {
            source.fetch(self.offset(number), self.per_page).await?
        };
        Ok(Page { items, number, paginator: *self })
    }

    /// Navigation strip around `current`: first and last page, `adjacent`
    /// pages either side of the current one, and gaps for the rest.
    /// A gap that would hide a single page shows that page instead.
    pub fn page_window(&self, current: u64, adjacent: u64) -> Vec<PageLink> {
        let last = self.num_pages();
        let current = current.clamp(1, last);
        let lo = current.saturating_sub(adjacent).max(1);
        let hi = current.saturating_add(adjacent).min(last);

        let mut shown: Vec<u64> = Vec::with_capacity((hi - lo + 3) as usize);
        shown.push(1);
        shown.extend(lo..=hi);
        shown.push(last);
        shown.sort_unstable();
        shown.dedup();

        let mut links = Vec::with_capacity(shown.len() + 2);
        let mut previous = 0;
        for n in shown {
            match n - previous {
                1 => {}
                2 => links.push(PageLink::Page(n - 1)),
                _ => links.push(PageLink::Gap),
            }
            links.push(if n == current { PageLink::Current(n) } else { PageLink::Page(n) });
            previous = n;
        }
        links
    }
}

/// One entry of a page navigation strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "number", rename_all = "lowercase")]
pub enum PageLink {
    Page(u64),
    Current(u64),
    Gap,
}

/// A single page of items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub paginator: Paginator,
}

impl<T> Page<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.number < self.paginator.num_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_other_pages(&self) -> bool {
        self.has_next() || self.has_previous()
    }

    pub fn next_page_number(&self) -> Option<u64> {
        self.has_next().then(|| self.number + 1)
    }

    pub fn previous_page_number(&self) -> Option<u64> {
        self.has_previous().then(|| self.number - 1)
    }

    /// 1-based index of the first item on this page; 0 for an empty result set.
    pub fn start_index(&self) -> u64 {
        if self.paginator.count == 0 {
            0
        } else {
            self.paginator.offset(self.number) + 1
        }
    }

    /// 1-based index of the last item on this page.
    pub fn end_index(&self) -> u64 {
        if self.number == self.paginator.num_pages() {
            self.paginator.count
        } else {
            self.number * self.paginator.per_page
        }
    }
}

/// Resolves the requested page of `source`.
///
/// Returns the page count, the paginator and the requested page. A page
/// number outside the result set is [`DomainError::PageNotFound`].
pub async fn paginate<S>(source: &S, request: &PageRequest, per_page: u64) -> Result<(u64, Paginator, Page<S::Item>)>
where
    S: PageSource + ?Sized,
{
    let paginator = Paginator::new(source.count().await?, per_page)?;
    let number = request.page_number();
    tracing::debug!(page = number, per_page, count = paginator.count(), "paginating");
    let page = paginator.page(source, number).await?;
    Ok((paginator.num_pages(), paginator, page))
}
