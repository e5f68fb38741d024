// src/core/types.rs
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// Index of a token in the corpus.
pub type Position = usize;

/// Unsigned distance in token positions between the two members of a pair.
pub type Offset = usize;

/// A co-occurring pair of tokens, earlier corpus occurrence first.
pub type PairKey = (String, String);

/// Occurrence counts keyed by a token or a pair of tokens.
///
/// Only keys that were seen at least once are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreqDist<K: Eq + Hash> {
    counts: HashMap<K, u64>,
    total: u64,
}

impl<K: Eq + Hash> Default for FreqDist<K> {
    fn default() -> Self {
        Self { counts: HashMap::new(), total: 0 }
    }
}

impl<K: Eq + Hash> FreqDist<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn inc(&mut self, key: K) {
        *self.counts.entry(key).or_insert(0) += 1;
        self.total += 1;
    }

    /// Count for `key`, zero when it was never seen.
    pub fn get<Q>(&self, key: &Q) -> u64
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.counts.contains_key(key)
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> + '_ {
        self.counts.iter().map(|(k, &c)| (k, c))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.counts.keys()
    }

    /// The `n` most frequent keys, ties broken by key order.
    pub fn most_common(&self, n: usize) -> Vec<(&K, u64)>
    where
        K: Ord,
    {
        let mut items: Vec<(&K, u64)> = self.iter().collect();
        items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        items.truncate(n);
        items
    }

    /// All entries in ascending key order.
    pub fn sorted_items(&self) -> Vec<(K, u64)>
    where
        K: Ord + Clone,
    {
        let mut items: Vec<(K, u64)> = self.counts.iter().map(|(k, &c)| (k.clone(), c)).collect();
        items.sort();
        items
    }

    pub(crate) fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K, u64) -> bool,
    {
        let mut dropped = 0;
        self.counts.retain(|k, c| {
            let kept = keep(k, *c);
            if !kept {
                dropped += *c;
            }
            kept
        });
        self.total -= dropped;
    }
}

/// Append-only multimap from a key to the ordered list of values observed
/// for it.
///
/// Values keep the order in which they were pushed. Lists are never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionLists<K: Eq + Hash> {
    lists: HashMap<K, Vec<usize>>,
}

impl<K: Eq + Hash> Default for PositionLists<K> {
    fn default() -> Self {
        Self { lists: HashMap::new() }
    }
}

impl<K: Eq + Hash> PositionLists<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, key: K, value: usize) {
        self.lists.entry(key).or_default().push(value);
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&[usize]>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.lists.get(key).map(Vec::as_slice)
    }

    /// Length of the list for `key`, zero when absent.
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.lists.get(key).map_or(0, Vec::len)
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &[usize])> + '_ {
        self.lists.iter().map(|(k, v)| (k, v.as_slice()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.lists.keys()
    }

    pub(crate) fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K) -> bool,
    {
        self.lists.retain(|k, _| keep(k));
    }

    /// Owned copy as a plain map, mostly for comparisons in tests.
    pub fn to_map(&self) -> HashMap<K, Vec<usize>>
    where
        K: Clone,
    {
        self.lists.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(a: &str, b: &str) -> PairKey {
        (a.to_string(), b.to_string())
    }

    #[test]
    fn freq_dist_counts_and_totals() {
        let mut fd = FreqDist::new();
        fd.inc("a".to_string());
        fd.inc("b".to_string());
        fd.inc("a".to_string());

        assert_eq!(fd.get("a"), 2);
        assert_eq!(fd.get("b"), 1);
        assert_eq!(fd.get("missing"), 0);
        assert_eq!(fd.total(), 3);
        assert_eq!(fd.len(), 2);
        assert_eq!(fd.most_common(1), vec![(&"a".to_string(), 2)]);
    }

    #[test]
    fn freq_dist_retain_adjusts_total() {
        let mut fd = FreqDist::new();
        fd.inc(key("x", "y"));
        fd.inc(key("x", "y"));
        fd.inc(key("y", "z"));
        fd.retain(|_, c| c > 1);

        assert_eq!(fd.sorted_items(), vec![(key("x", "y"), 2)]);
        assert_eq!(fd.total(), 2);
    }

    #[test]
    fn position_lists_keep_push_order() {
        let mut lists = PositionLists::new();
        lists.push(key("a", "b"), 4);
        lists.push(key("a", "b"), 2);
        lists.push(key("b", "c"), 7);

        assert_eq!(lists.get(&key("a", "b")), Some(&[4, 2][..]));
        assert_eq!(lists.count(&key("b", "c")), 1);
        assert_eq!(lists.count(&key("c", "d")), 0);
        assert_eq!(lists.get(&key("c", "d")), None);
    }
}
