//! Candidate provider for completion suggestions
//!
//! This module provides the trait and implementation for fetching completion
//! candidates: user names, key names and command names.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::connection::NameCache;
use crate::parser::vocabulary;

/// Trait for providing completion candidates
pub trait CandidateProvider: Send + Sync {
    /// Get all known user names
    fn users(&self) -> Vec<String>;

    /// Get all known key names
    fn keys(&self) -> Vec<String>;

    /// Get command names matching the prefix
    fn commands(&self, prefix: &str) -> Vec<String>;
}

/// Provider backed by the preloaded name cache and the command vocabulary
pub struct CachedCandidateProvider {
    cache: Arc<NameCache>,
}

impl CachedCandidateProvider {
    /// Create a new candidate provider
    ///
    /// # Arguments
    /// * `cache` - Names fetched at start-up, empty when caching is off
    pub fn new(cache: Arc<NameCache>) -> Self {
        Self { cache }
    }
}

impl CandidateProvider for CachedCandidateProvider {
    fn users(&self) -> Vec<String> {
        self.cache.users().to_vec()
    }

    fn keys(&self) -> Vec<String> {
        self.cache.keys().to_vec()
    }

    fn commands(&self, prefix: &str) -> Vec<String> {
        filter_by_prefix(vocabulary::commands(), prefix)
    }
}

/// Keep the items starting with `prefix` (ASCII case-insensitive) and sort them.
///
/// Exact matches come first, then shorter names, then alphabetical order.
fn filter_by_prefix(items: &[String], prefix: &str) -> Vec<String> {
    let mut filtered: Vec<String> = items
        .iter()
        .filter(|item| starts_with_ignore_case(item, prefix))
        .cloned()
        .collect();

    filtered.sort_by(|a, b| {
        if !prefix.is_empty() {
            let a_exact = a.eq_ignore_ascii_case(prefix);
            let b_exact = b.eq_ignore_ascii_case(prefix);
            match (a_exact, b_exact) {
                (true, false) => return Ordering::Less,
                (false, true) => return Ordering::Greater,
                _ => {}
            }
        }

        a.len().cmp(&b.len()).then_with(|| a.cmp(b))
    });

    filtered
}

fn starts_with_ignore_case(item: &str, prefix: &str) -> bool {
    item.len() >= prefix.len()
        && item.is_char_boundary(prefix.len())
        && item[..prefix.len()].eq_ignore_ascii_case(prefix)
}
