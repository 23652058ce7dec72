//! Derived list views: category filtering and free-text search.
//!
//! All functions borrow the source collection and return references in original order. Nothing
//! here mutates or re-sorts.

use crate::constants::ALL_CATEGORIES;
use blueprint_types::SearchText;

/// Entities that carry a single category/type facet.
pub trait Faceted {
    fn facet(&self) -> &str;
}

/// Entities that can be matched by free-text search.
pub trait Searchable {
    /// The fields a query is matched against.
    fn search_fields(&self) -> Vec<&str>;

    fn matches(&self, needle: &SearchText) -> bool {
        self.search_fields().into_iter().any(|f| needle.matches(f))
    }
}

/// A category selection, with `all` disabling the filter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// Parse a category id. The `all` sentinel and blank input select everything.
    pub fn parse(id: &str) -> Self {
        let id = id.trim();
        if id.is_empty() || id == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(id.to_string())
        }
    }

    pub fn matches(&self, facet: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(id) => id == facet,
        }
    }
}

/// Items whose facet equals `category`, in original order.
pub fn filter_by_category<'a, T: Faceted>(items: &'a [T], category: &str) -> Vec<&'a T> {
    let filter = CategoryFilter::parse(category);
    items.iter().filter(|item| filter.matches(item.facet())).collect()
}

/// Items matching `query` case-insensitively, in original order. A blank query keeps all.
pub fn filter_by_search<'a, T: Searchable>(items: &'a [T], query: &str) -> Vec<&'a T> {
    match SearchText::new(query) {
        Some(needle) => items.iter().filter(|item| item.matches(&needle)).collect(),
        None => items.iter().collect(),
    }
}

/// Combined category + search selection for a list page.
#[derive(Clone, Debug, Default)]
pub struct ViewFilter {
    category: CategoryFilter,
    query: Option<SearchText>,
}

impl ViewFilter {
    pub fn new(category: &str, query: &str) -> Self {
        Self {
            category: CategoryFilter::parse(category),
            query: SearchText::new(query),
        }
    }

    pub fn set_category(&mut self, category: &str) {
        self.category = CategoryFilter::parse(category);
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = SearchText::new(query);
    }

    pub fn category(&self) -> &CategoryFilter {
        &self.category
    }

    pub fn is_active(&self) -> bool {
        self.category != CategoryFilter::All || self.query.is_some()
    }

    pub fn accepts<T: Faceted + Searchable>(&self, item: &T) -> bool {
        self.category.matches(item.facet())
            && self.query.as_ref().is_none_or(|needle| item.matches(needle))
    }

    pub fn apply<'a, T: Faceted + Searchable>(&self, items: &'a [T]) -> Vec<&'a T> {
        items.iter().filter(|item| self.accepts(*item)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Entry {
        id: u32,
        category: &'static str,
        title: &'static str,
        tags: Vec<&'static str>,
    }

    impl Faceted for Entry {
        fn facet(&self) -> &str {
            self.category
        }
    }

    impl Searchable for Entry {
        fn search_fields(&self) -> Vec<&str> {
            let mut fields = vec![self.title];
            fields.extend(self.tags.iter().copied());
            fields
        }
    }

    fn gallery() -> Vec<Entry> {
        let categories = ["physical", "mental", "medical", "medical", "wellness"];
        let titles = [
            "Knee rehab",
            "Mood journal",
            "Rash follow-up",
            "Mole check",
            "Yoga streak",
        ];
        categories
            .into_iter()
            .zip(titles)
            .enumerate()
            .map(|(i, (category, title))| Entry {
                id: i as u32,
                category,
                title,
                tags: if i == 4 { vec!["Morning"] } else { vec![] },
            })
            .collect()
    }

    fn ids(items: &[&Entry]) -> Vec<u32> {
        items.iter().map(|e| e.id).collect()
    }

    #[test]
    fn category_filter_keeps_matching_entries_in_order() {
        let items = gallery();
        let medical = filter_by_category(&items, "medical");
        assert_eq!(ids(&medical), vec![2, 3]);
    }

    #[test]
    fn all_sentinel_returns_everything_unchanged() {
        let items = gallery();
        assert_eq!(ids(&filter_by_category(&items, "all")), vec![0, 1, 2, 3, 4]);
        assert_eq!(ids(&filter_by_category(&items, "")), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn unknown_category_yields_nothing() {
        let items = gallery();
        assert!(filter_by_category(&items, "dental").is_empty());
    }

    #[test]
    fn search_is_case_insensitive_over_titles_and_tags() {
        let items = gallery();
        assert_eq!(ids(&filter_by_search(&items, "KNEE")), vec![0]);
        assert_eq!(ids(&filter_by_search(&items, "morning")), vec![4]);
        assert_eq!(ids(&filter_by_search(&items, "  ")), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn filters_never_reorder_survivors() {
        let items = gallery();
        for query in ["e", "o", "check", ""] {
            let got = ids(&filter_by_search(&items, query));
            let mut sorted = got.clone();
            sorted.sort_unstable();
            assert_eq!(got, sorted, "query {query:?} reordered results");
        }
    }

    #[test]
    fn view_filter_combines_category_and_search() {
        let items = gallery();
        let mut filter = ViewFilter::new("medical", "mole");
        assert!(filter.is_active());
        assert_eq!(ids(&filter.apply(&items)), vec![3]);

        filter.set_query("");
        assert_eq!(ids(&filter.apply(&items)), vec![2, 3]);

        filter.set_category("all");
        assert!(!filter.is_active());
        assert_eq!(filter.apply(&items).len(), items.len());
    }
}
