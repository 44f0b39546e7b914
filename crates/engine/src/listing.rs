//! Expense list transformation: search, category filter, sort, paginate.
//!
//! [`apply`] is a pure function of the collection and a [`ListQuery`]; the
//! same inputs always produce the same page, independent of the order in
//! which records arrived from the network beyond their position in the
//! slice (which only breaks ties).

use std::cmp::Ordering;

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{CategoryFilter, Expense};

/// Number of rows on a page of the expense list.
pub const PAGE_SIZE: usize = 10;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortKey {
    #[default]
    Date,
    Name,
    Cost,
    Category,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [SortKey::Date, SortKey::Name, SortKey::Cost, SortKey::Category];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::Name => "Name",
            Self::Cost => "Cost",
            Self::Category => "Category",
        }
    }

    #[must_use]
    pub fn next(self) -> SortKey {
        let idx = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl SortOrder {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ascending => "Ascending",
            Self::Descending => "Descending",
        }
    }

    #[must_use]
    pub const fn toggled(self) -> SortOrder {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Filter, sort and page parameters of the expense list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListQuery {
    pub search: String,
    pub category: CategoryFilter,
    pub sort_key: SortKey,
    pub sort_order: SortOrder,
    /// 1-based.
    pub page: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: CategoryFilter::All,
            sort_key: SortKey::Date,
            sort_order: SortOrder::Descending,
            page: 1,
        }
    }
}

impl ListQuery {
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 1;
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.category = category;
        self.page = 1;
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.sort_key = key;
        self.page = 1;
    }

    pub fn set_sort_order(&mut self, order: SortOrder) {
        self.sort_order = order;
        self.page = 1;
    }

    /// Moves to `page` if it lies in `[1, total_pages]`. Returns whether the
    /// page changed.
    pub fn go_to_page(&mut self, page: usize, total_pages: usize) -> bool {
        if page < 1 || page > total_pages || page == self.page {
            return false;
        }
        self.page = page;
        true
    }

    /// Pulls the page back inside `[1, total_pages]` (1 when empty).
    pub fn clamp_page(&mut self, total_pages: usize) {
        self.page = self.page.clamp(1, total_pages.max(1));
    }
}

/// One page of the transformed list.
#[derive(Debug, PartialEq)]
pub struct ListPage<'a> {
    pub items: Vec<&'a Expense>,
    pub page: usize,
    pub total_pages: usize,
    /// Number of records left after search and category filter.
    pub total_items: usize,
}

impl ListPage<'_> {
    #[must_use]
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// `Page 2 of 5`, or `Page 0 of 0` for an empty list.
    #[must_use]
    pub fn label(&self) -> String {
        if self.total_pages == 0 {
            "Page 0 of 0".to_string()
        } else {
            format!("Page {} of {}", self.page, self.total_pages)
        }
    }
}

/// Number of pages needed for `len` records.
#[must_use]
pub fn total_pages(len: usize) -> usize {
    len.div_ceil(PAGE_SIZE)
}

/// Runs the full pipeline and returns the requested page.
#[must_use]
pub fn apply<'a>(expenses: &'a [Expense], query: &ListQuery) -> ListPage<'a> {
    let needle = query.search.to_lowercase();

    let mut rows: Vec<&Expense> = expenses
        .iter()
        .filter(|e| needle.is_empty() || e.name.to_lowercase().contains(&needle))
        .filter(|e| query.category.matches(e.category))
        .collect();

    // Stable sort with a direction-aware comparator: ties keep their input
    // order in both directions.
    rows.sort_by(|a, b| {
        let ord = compare(a, b, query.sort_key);
        match query.sort_order {
            SortOrder::Ascending => ord,
            SortOrder::Descending => ord.reverse(),
        }
    });

    let total_items = rows.len();
    let total_pages = total_pages(total_items);
    let start = query.page.saturating_sub(1).saturating_mul(PAGE_SIZE);
    let items = if query.page == 0 || start >= total_items {
        Vec::new()
    } else {
        let end = (start + PAGE_SIZE).min(total_items);
        rows[start..end].to_vec()
    };

    ListPage {
        items,
        page: query.page,
        total_pages,
        total_items,
    }
}

fn compare(a: &Expense, b: &Expense, key: SortKey) -> Ordering {
    match key {
        SortKey::Date => a.date.cmp(&b.date),
        SortKey::Name => collate(&a.name, &b.name),
        SortKey::Cost => a.cost.cmp(&b.cost),
        SortKey::Category => collate(
            a.category.map_or("", |c| c.label()),
            b.category.map_or("", |c| c.label()),
        ),
    }
}

/// Locale-style string comparison: accents and case only break ties.
#[must_use]
pub fn collate(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

fn collation_key(input: &str) -> String {
    input
        .nfkd()
        .filter(|ch| !is_combining_mark(*ch))
        .flat_map(char::to_lowercase)
        .collect()
}
