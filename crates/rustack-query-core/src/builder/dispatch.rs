//! String-driven verb dispatch.
//!
//! Resolves names like `orContains`, `or_contains` or `andNotEq` into a
//! connective and a predicate kind. The typed builder methods never go through
//! here; this exists for callers that hold verb names as data.

use crate::error::{QueryError, QueryResult};
use crate::expression::{Connective, PredicateKind};

/// Split a connective-prefixed verb name into its connective and kind.
///
/// The prefix is matched case-insensitively and may be followed by `_`.
/// Fails with [`QueryError::UnsupportedOperation`] when there is no `and`/`or`
/// prefix or when the remainder names no predicate kind.
pub fn parse_call(name: &str) -> QueryResult<(Connective, PredicateKind)> {
    let unsupported = || QueryError::UnsupportedOperation {
        name: name.to_owned(),
    };

    let (connective, rest) = split_prefix(name).ok_or_else(unsupported)?;
    let rest = rest.strip_prefix('_').unwrap_or(rest);
    if rest.is_empty() {
        return Err(unsupported());
    }

    let kind = PredicateKind::from_name(rest).ok_or_else(unsupported)?;
    Ok((connective, kind))
}

fn split_prefix(name: &str) -> Option<(Connective, &str)> {
    [(Connective::And, "and"), (Connective::Or, "or")]
        .into_iter()
        .find_map(|(connective, prefix)| {
            let head = name.get(..prefix.len())?;
            head.eq_ignore_ascii_case(prefix)
                .then(|| (connective, &name[prefix.len()..]))
        })
}
