//! Category filtering and pagination for the recipe grid.

use std::borrow::Cow;
use std::collections::BTreeSet;

use log::debug;
use serde::Serialize;

use crate::client::CatalogSource;
use crate::error::{BrowserError, Result};
use crate::model::RecipeCard;
use crate::normalize;

/// Category value that disables filtering
pub const ALL_CATEGORIES: &str = "All";

/// One page of results
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_pages: usize,
}

/// Keep cards whose category matches exactly. An empty or `"All"` category
/// returns the input as-is.
pub fn filter_by_category<'a>(cards: &'a [RecipeCard], category: &str) -> Cow<'a, [RecipeCard]> {
    if category.is_empty() || category == ALL_CATEGORIES {
        return Cow::Borrowed(cards);
    }
    Cow::Owned(
        cards
            .iter()
            .filter(|card| card.category == category)
            .cloned()
            .collect(),
    )
}

/// Distinct categories, sorted
pub fn unique_categories(cards: &[RecipeCard]) -> Vec<String> {
    cards
        .iter()
        .map(|card| card.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Category selector entries: `"All"` followed by the distinct categories
pub fn category_options(cards: &[RecipeCard]) -> Vec<String> {
    std::iter::once(ALL_CATEGORIES.to_string())
        .chain(unique_categories(cards))
        .collect()
}

/// Slice out 1-based page `page_number`.
///
/// Out-of-range page numbers, including 0, produce an empty page.
pub fn paginate<T: Clone>(items: &[T], page_number: usize, page_size: usize) -> Result<Page<T>> {
    if page_size == 0 {
        return Err(BrowserError::InvalidPageSize);
    }

    let total_pages = items.len().div_ceil(page_size);
    let page = if page_number == 0 {
        Vec::new()
    } else {
        let start = (page_number - 1).saturating_mul(page_size).min(items.len());
        let end = start.saturating_add(page_size).min(items.len());
        items[start..end].to_vec()
    };

    Ok(Page {
        items: page,
        total_pages,
    })
}

/// Entry of the pager bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PageButton {
    Page(usize),
    Ellipsis,
}

/// Narrowest pager that still shows the first, current and last page
const MIN_VISIBLE_PAGES: usize = 3;

/// Page buttons to show around `current`, at most `max_visible` numbers wide.
/// Nothing is shown when there is a single page. Widths below three are
/// widened to three.
pub fn visible_pages(current: usize, total_pages: usize, max_visible: usize) -> Vec<PageButton> {
    let max_visible = max_visible.max(MIN_VISIBLE_PAGES);
    if total_pages <= 1 {
        return Vec::new();
    }
    if total_pages <= max_visible {
        return (1..=total_pages).map(PageButton::Page).collect();
    }

    let left = max_visible / 2;
    let right = max_visible - left - 1;
    let mut buttons = Vec::with_capacity(max_visible + 2);

    if current <= left + 1 {
        buttons.extend((1..max_visible).map(PageButton::Page));
        buttons.push(PageButton::Ellipsis);
        buttons.push(PageButton::Page(total_pages));
    } else if current >= total_pages - right {
        buttons.push(PageButton::Page(1));
        buttons.push(PageButton::Ellipsis);
        buttons.extend((total_pages + 2 - max_visible..=total_pages).map(PageButton::Page));
    } else {
        buttons.push(PageButton::Page(1));
        buttons.push(PageButton::Ellipsis);
        buttons.extend((current + 1 - left..current + right).map(PageButton::Page));
        buttons.push(PageButton::Ellipsis);
        buttons.push(PageButton::Page(total_pages));
    }

    buttons
}

/// What the user asked the listing for
#[derive(Debug, Clone)]
pub struct ListingQuery {
    pub search: String,
    pub category: String,
    pub page: usize,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: ALL_CATEGORIES.to_string(),
            page: 1,
        }
    }
}

/// Sizes used by [`browse`]
#[derive(Debug, Clone, Copy)]
pub struct ListingSettings {
    pub page_size: usize,
    pub random_count: usize,
}

impl Default for ListingSettings {
    fn default() -> Self {
        Self {
            page_size: 12,
            random_count: 50,
        }
    }
}

/// Result of one listing request
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub page: Page<RecipeCard>,
    pub categories: Vec<String>,
    pub total_matches: usize,
}

/// Fetch, filter and paginate recipe cards.
///
/// A blank search term shows a random sample instead of search results.
pub async fn browse<S>(
    source: &S,
    query: &ListingQuery,
    settings: ListingSettings,
) -> Result<Listing>
where
    S: CatalogSource + ?Sized,
{
    let term = query.search.trim();
    let records = if term.is_empty() {
        debug!("No search term, sampling {} random recipes", settings.random_count);
        source.random_sample(settings.random_count).await?
    } else {
        debug!("Searching recipes for '{}'", term);
        source.search_by_name(term).await?
    };

    let cards = normalize::to_cards(&records)?;
    let categories = category_options(&cards);
    let filtered = filter_by_category(&cards, &query.category);
    let page = paginate(&filtered, query.page, settings.page_size)?;

    Ok(Listing {
        page,
        categories,
        total_matches: filtered.len(),
    })
}
