//! Value placeholder generation.
//!
//! Two predicates on the same attribute must never share a placeholder, or one
//! bound value silently replaces the other in `ExpressionAttributeValues`. The
//! sequential source hands out numbers from a counter that is shared by every
//! builder branched from the same request, so nested sub-queries keep drawing
//! from one sequence. The random source uses UUID v4 and needs no sharing.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::{PlaceholderStrategy, QueryConfig};

/// A generated value placeholder. Renders with its leading `:`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Placeholder(String);

impl Placeholder {
    /// The placeholder name without the `:` sigil.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }

    /// The token as it appears in expressions and in the values map.
    #[must_use]
    pub fn token(&self) -> String {
        format!(":{}", self.0)
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.0)
    }
}

#[derive(Debug, Clone)]
enum Source {
    Sequential(Arc<AtomicU64>),
    Random,
}

/// Hands out placeholders that are unique within one logical request.
///
/// Cloning shares the underlying sequence.
#[derive(Debug, Clone)]
pub struct PlaceholderGenerator {
    prefix: Arc<str>,
    source: Source,
}

impl PlaceholderGenerator {
    /// Generator for the given configuration. The prefix is assumed validated.
    #[must_use]
    pub fn new(config: &QueryConfig) -> Self {
        match config.placeholder_strategy {
            PlaceholderStrategy::Sequential => Self::sequential(&config.placeholder_prefix),
            PlaceholderStrategy::Random => Self::random(&config.placeholder_prefix),
        }
    }

    /// Counter-backed generator: `:{prefix}1`, `:{prefix}2`, ...
    #[must_use]
    pub fn sequential(prefix: &str) -> Self {
        Self {
            prefix: Arc::from(prefix),
            source: Source::Sequential(Arc::new(AtomicU64::new(0))),
        }
    }

    /// UUID v4 backed generator.
    #[must_use]
    pub fn random(prefix: &str) -> Self {
        Self {
            prefix: Arc::from(prefix),
            source: Source::Random,
        }
    }

    /// Produce the next placeholder.
    #[must_use]
    pub fn next_placeholder(&self) -> Placeholder {
        let suffix = match &self.source {
            Source::Sequential(counter) => (counter.fetch_add(1, Ordering::Relaxed) + 1).to_string(),
            Source::Random => uuid::Uuid::new_v4().simple().to_string(),
        };
        Placeholder(format!("{}{suffix}", self.prefix))
    }

    /// Whether `other` draws from the same sequence as `self`.
    #[must_use]
    pub fn shares_sequence_with(&self, other: &Self) -> bool {
        match (&self.source, &other.source) {
            (Source::Sequential(a), Source::Sequential(b)) => {
                Arc::ptr_eq(a, b) && self.prefix == other.prefix
            }
            _ => false,
        }
    }

    /// Whether `other` could ever hand out a placeholder that `self` also
    /// hands out, now or later.
    ///
    /// Two separate counters collide when one prefix is a prefix of the other
    /// (`p` and `p1` both reach `:p11`). A random source never collides in
    /// practice.
    #[must_use]
    pub fn may_collide_with(&self, other: &Self) -> bool {
        match (&self.source, &other.source) {
            (Source::Sequential(_), Source::Sequential(_)) => {
                !self.shares_sequence_with(other)
                    && (self.prefix.starts_with(&*other.prefix)
                        || other.prefix.starts_with(&*self.prefix))
            }
            _ => false,
        }
    }
}

impl Default for PlaceholderGenerator {
    fn default() -> Self {
        Self::new(&QueryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::thread;

    use super::*;

    #[test]
    fn test_should_count_from_one() {
        let placeholders = PlaceholderGenerator::default();
        assert_eq!(placeholders.next_placeholder().token(), ":p1");
        assert_eq!(placeholders.next_placeholder().to_string(), ":p2");
    }

    #[test]
    fn test_should_share_sequence_between_clones() {
        let parent = PlaceholderGenerator::sequential("v");
        let child = parent.clone();
        assert_eq!(parent.next_placeholder().name(), "v1");
        assert_eq!(child.next_placeholder().name(), "v2");
        assert!(parent.shares_sequence_with(&child));
        assert!(!parent.shares_sequence_with(&PlaceholderGenerator::sequential("v")));
    }

    #[test]
    fn test_should_detect_overlapping_sequences() {
        let parent = PlaceholderGenerator::sequential("p");
        assert!(parent.may_collide_with(&PlaceholderGenerator::sequential("p")));
        assert!(parent.may_collide_with(&PlaceholderGenerator::sequential("p1")));
        assert!(!parent.may_collide_with(&parent.clone()));
        assert!(!parent.may_collide_with(&PlaceholderGenerator::sequential("s")));
        assert!(!parent.may_collide_with(&PlaceholderGenerator::random("p")));
    }

    #[test]
    fn test_should_produce_valid_random_tokens() {
        let placeholders = PlaceholderGenerator::random("p");
        let a = placeholders.next_placeholder();
        let b = placeholders.next_placeholder();
        assert_ne!(a, b);
        assert_eq!(a.name().len(), 33);
        assert!(a.name().chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_should_stay_unique_across_threads() {
        let placeholders = PlaceholderGenerator::default();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let placeholders = placeholders.clone();
                thread::spawn(move || {
                    (0..250)
                        .map(|_| placeholders.next_placeholder())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for placeholder in handle.join().unwrap() {
                assert!(seen.insert(placeholder));
            }
        }
        assert_eq!(seen.len(), 1000);
    }
}
