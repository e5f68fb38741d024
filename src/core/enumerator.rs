// File: src/core/enumerator.rs
//! Window-pair enumeration over a token stream.
//!
//! Produces every co-occurrence the finder counts, in the order the finder
//! must record them: increasing pivot position, and for one pivot the
//! positions before it (farthest first) followed by the positions after it
//! (nearest first).

use crate::core::types::{Offset, Position};
use crate::core::window::Window;
use std::collections::HashSet;

/// One co-occurring pair of corpus positions.
///
/// `first` is the token at the earlier position. `position` is the pivot
/// position, which in symmetric mode is the earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cooccurrence<'a> {
    pub first: &'a str,
    pub second: &'a str,
    pub offset: Offset,
    pub position: Position,
}

/// Pivot and target vocabularies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roles {
    pivots: HashSet<String>,
    targets: HashSet<String>,
}

impl Roles {
    pub fn new<P, T>(pivots: P, targets: T) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        Self {
            pivots: pivots.into_iter().map(Into::into).collect(),
            targets: targets.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_pivot(&self, token: &str) -> bool {
        self.pivots.contains(token)
    }

    pub fn is_target(&self, token: &str) -> bool {
        self.targets.contains(token)
    }

    /// True if the token is counted in the word frequencies.
    pub fn is_eligible(&self, token: &str) -> bool {
        self.is_pivot(token) || self.is_target(token)
    }

    /// True if either vocabulary is empty, so no pair can be formed.
    pub fn pairs_impossible(&self) -> bool {
        self.pivots.is_empty() || self.targets.is_empty()
    }
}

/// Every pair of positions `i < j` with `j - i < window_size`.
///
/// `window_size` is the number of positions a window covers, so 2 yields
/// adjacent bigrams.
pub fn symmetric_pairs<S: AsRef<str>>(
    corpus: &[S],
    window_size: usize,
) -> impl Iterator<Item = Cooccurrence<'_>> + '_ {
    let n = corpus.len();
    (0..n).flat_map(move |i| {
        let end = n.min(i.saturating_add(window_size));
        (i + 1..end).map(move |j| Cooccurrence {
            first: corpus[i].as_ref(),
            second: corpus[j].as_ref(),
            offset: j - i,
            position: i,
        })
    })
}

/// Pivot/target pairs inside `window`.
///
/// A position pair is reported once even when both of its tokens are pivots
/// and targets; the forward scan from the earlier pivot wins whenever it
/// reaches the later one. Pairs of identical tokens are dropped unless
/// `allow_self_reference` is set.
pub fn role_pairs<'a, S: AsRef<str>>(
    corpus: &'a [S],
    roles: &'a Roles,
    window: Window,
    allow_self_reference: bool,
) -> impl Iterator<Item = Cooccurrence<'a>> + 'a {
    let n = corpus.len();
    let token = move |idx: Position| -> &'a str { corpus[idx].as_ref() };

    (0..n)
        .filter(move |&i| roles.is_pivot(token(i)))
        .flat_map(move |i| {
            let pivot = token(i);
            let start = i.saturating_sub(window.reach_before());
            let end = n.min(i.saturating_add(window.reach_after()).saturating_add(1));

            let before = (start..i).filter_map(move |j| {
                let d = i - j;
                let target = token(j);
                if !window.admits_before(d) || !roles.is_target(target) {
                    return None;
                }
                if !allow_self_reference && target == pivot {
                    return None;
                }
                // Already reported by the forward scan from `j`.
                if roles.is_pivot(target) && roles.is_target(pivot) && window.admits_after(d) {
                    return None;
                }
                Some(Cooccurrence { first: target, second: pivot, offset: d, position: i })
            });

            let after = (i + 1..end).filter_map(move |j| {
                let d = j - i;
                let target = token(j);
                if !window.admits_after(d) || !roles.is_target(target) {
                    return None;
                }
                if !allow_self_reference && target == pivot {
                    return None;
                }
                Some(Cooccurrence { first: pivot, second: target, offset: d, position: i })
            });

            before.chain(after)
        })
}
