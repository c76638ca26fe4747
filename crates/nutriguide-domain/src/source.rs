//! Source ledger types and the primary-source ranking policy

use std::cmp::Ordering;

/// Label used when a claim has no linked source
pub const UNVERIFIED_LABEL: &str = "Unverified";

/// A citation record, shared by any number of interactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// Row id
    pub id: i64,

    /// Short citation text
    pub label: String,

    /// Deep link, globally unique when present
    pub url: Option<String>,

    /// Publishing body
    pub publisher: Option<String>,

    /// Publication year (1000-9999)
    pub year: Option<u16>,
}

impl Source {
    /// Compare two sources by citation preference
    ///
    /// `Less` means `self` is the better primary source:
    /// 1. sources with a URL before sources without
    /// 2. more recent year first (unknown year last)
    /// 3. lower id first
    pub fn rank(&self, other: &Source) -> Ordering {
        other
            .url
            .is_some()
            .cmp(&self.url.is_some())
            .then_with(|| other.year.cmp(&self.year))
            .then_with(|| self.id.cmp(&other.id))
    }

    /// Citation shown on a card
    pub fn citation(&self) -> Citation {
        Citation {
            label: self.label.clone(),
            url: self.url.clone(),
        }
    }
}

/// Pick the single citation that represents a claim
///
/// Returns `None` only for an empty slice.
pub fn select_primary(sources: &[Source]) -> Option<&Source> {
    sources.iter().min_by(|a, b| a.rank(b))
}

/// Sort sources into citation preference order
pub fn sort_by_rank(sources: &mut [Source]) {
    sources.sort_by(|a, b| a.rank(b));
}

/// The `{label, url}` pair rendered on a result card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    /// Citation text
    pub label: String,

    /// Link, absent for label-only citations
    pub url: Option<String>,
}

impl Citation {
    /// Placeholder for a claim with no linked source
    pub fn unverified() -> Self {
        Self {
            label: UNVERIFIED_LABEL.to_string(),
            url: None,
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_source() -> impl Strategy<Value = Source> {
        (0i64..50, any::<bool>(), proptest::option::of(1990u16..2030)).prop_map(
            |(id, has_url, year)| Source {
                id,
                label: format!("s{}", id),
                url: has_url.then(|| format!("https://example.org/{}", id)),
                publisher: None,
                year,
            },
        )
    }

    proptest! {
        /// Property: the primary source does not depend on input order
        #[test]
        fn test_primary_is_order_independent(mut sources in proptest::collection::vec(arb_source(), 1..8)) {
            // ids are unique in storage
            sources.sort_by_key(|s| s.id);
            sources.dedup_by_key(|s| s.id);

            let forward = select_primary(&sources).cloned();
            sources.reverse();
            let backward = select_primary(&sources).cloned();
            prop_assert_eq!(forward, backward);
        }

        /// Property: the primary source ranks no worse than any candidate
        #[test]
        fn test_primary_is_minimal(sources in proptest::collection::vec(arb_source(), 1..8)) {
            let primary = select_primary(&sources).unwrap();
            for s in &sources {
                prop_assert_ne!(s.rank(primary), Ordering::Less);
            }
        }
    }
}
