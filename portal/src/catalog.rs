//! Catalog filtering: the visible subset of an in-memory list for a search
//! box and a category bar

use crate::models::{DictionaryEntry, Text, TextCategory};
use std::fmt;

/// Label of the category button that shows everything
pub const ALL_CATEGORIES: &str = "All";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(TextCategory),
}

impl CategoryFilter {
    pub fn parse(label: &str) -> Self {
        if label == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(TextCategory::from(label))
        }
    }

    pub fn admits(&self, category: Option<&TextCategory>) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => category == Some(wanted),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str(ALL_CATEGORIES),
            CategoryFilter::Only(category) => f.write_str(category.label()),
        }
    }
}

/// Labels for the category bar, "All" first
pub fn category_labels() -> Vec<String> {
    std::iter::once(ALL_CATEGORIES.to_string())
        .chain(TextCategory::KNOWN.iter().map(|category| category.label().to_string()))
        .collect()
}

/// Something that can appear in a filterable catalog
pub trait Catalogued {
    /// Fields the search box matches against (title/word, description/meaning)
    fn haystacks(&self) -> Vec<&str>;

    fn category(&self) -> Option<&TextCategory> {
        None
    }

    /// `needle` must already be lowercased
    fn contains(&self, needle: &str) -> bool {
        needle.is_empty()
            || self
                .haystacks()
                .iter()
                .any(|field| field.to_lowercase().contains(needle))
    }
}

impl Catalogued for Text {
    fn haystacks(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.description.as_str()]
    }

    fn category(&self) -> Option<&TextCategory> {
        Some(&self.category)
    }
}

impl Catalogued for DictionaryEntry {
    fn haystacks(&self) -> Vec<&str> {
        let mut fields = Vec::with_capacity(2 + self.meanings.len());
        fields.push(self.word.as_str());
        if let Some(transliteration) = &self.transliteration {
            fields.push(transliteration.as_str());
        }
        fields.extend(self.meanings.iter().map(String::as_str));
        fields
    }
}

/// Items that pass both the category and the substring predicate, in their
/// original order. Nothing is ranked and nothing is mutated.
pub fn filter<'a, T: Catalogued>(items: &'a [T], query: &str, category: &CategoryFilter) -> Vec<&'a T> {
    let needle = query.to_lowercase();
    items
        .iter()
        .filter(|item| category.admits(item.category()) && item.contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticSource;

    fn text(title: &str, category: TextCategory, description: &str) -> Text {
        Text {
            id: title.to_lowercase(),
            slug: title.to_lowercase(),
            title: title.to_string(),
            category,
            description: description.to_string(),
            chapters: 1,
            verses: 1,
            image_url: None,
        }
    }

    fn titles(items: &[&Text]) -> Vec<String> {
        items.iter().map(|t| t.title.clone()).collect()
    }

    #[test]
    fn empty_query_and_all_returns_everything_in_order() {
        let catalog = StaticSource::new().texts().to_vec();
        let visible = filter(&catalog, "", &CategoryFilter::All);
        assert_eq!(visible.len(), catalog.len());
        for (shown, original) in visible.iter().zip(catalog.iter()) {
            assert_eq!(*shown, original);
        }
    }

    #[test]
    fn epic_filter_keeps_only_epics() {
        let catalog = vec![
            text("Ramayana", TextCategory::Epic, "Prince Rama's journey"),
            text("Vedas", TextCategory::Scripture, "The oldest scriptures"),
        ];
        let visible = filter(&catalog, "", &CategoryFilter::parse("Epic"));
        assert_eq!(titles(&visible), vec!["Ramayana"]);
    }

    #[test]
    fn query_matches_title_or_description_case_insensitively() {
        let catalog = vec![
            text("Bhagavad Gita", TextCategory::Philosophy, "Krishna and Arjuna"),
            text("Ashtavakra Gita", TextCategory::Philosophy, "Sage and King Janaka"),
            text("Ramayana", TextCategory::Epic, "Duty, courage and righteousness"),
        ];
        assert_eq!(
            titles(&filter(&catalog, "GITA", &CategoryFilter::All)),
            vec!["Bhagavad Gita", "Ashtavakra Gita"]
        );
        assert_eq!(
            titles(&filter(&catalog, "arjuna", &CategoryFilter::All)),
            vec!["Bhagavad Gita"]
        );
    }

    #[test]
    fn both_predicates_must_hold() {
        let catalog = vec![
            text("Mahabharata", TextCategory::Epic, "One of the two major epics"),
            text("Bhagavata Purana", TextCategory::Mythology, "Major Purana"),
        ];
        let visible = filter(&catalog, "major", &CategoryFilter::Only(TextCategory::Mythology));
        assert_eq!(titles(&visible), vec!["Bhagavata Purana"]);
    }

    #[test]
    fn every_result_satisfies_the_predicates() {
        let catalog = StaticSource::new().texts().to_vec();
        for label in category_labels() {
            let category = CategoryFilter::parse(&label);
            for query in ["", "upanishad", "LORD", "zzz"] {
                let visible = filter(&catalog, query, &category);
                assert!(visible.len() <= catalog.len());
                for item in visible {
                    assert!(catalog.contains(item));
                    assert!(category.admits(Some(&item.category)));
                    assert!(item.contains(&query.to_lowercase()));
                }
            }
        }
    }

    #[test]
    fn empty_items_yield_empty_result() {
        let catalog: Vec<Text> = Vec::new();
        assert!(filter(&catalog, "gita", &CategoryFilter::All).is_empty());
    }

    #[test]
    fn dictionary_entries_match_meanings() {
        let entries = StaticSource::new().dictionary().to_vec();
        let visible = filter(&entries, "knowledge", &CategoryFilter::All);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].transliteration.as_deref(), Some("vidyā"));
    }

    #[test]
    fn category_labels_parse_back() {
        let labels = category_labels();
        assert_eq!(labels.len(), 8);
        assert_eq!(labels[0], "All");
        assert_eq!(labels[6], "Economics & Politics");
        assert_eq!(CategoryFilter::parse("All"), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::parse("Economics & Politics").to_string(),
            "Economics & Politics"
        );
    }
}
