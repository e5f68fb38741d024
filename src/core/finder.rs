// File: src/core/finder.rs
use crate::core::enumerator::{role_pairs, symmetric_pairs, Cooccurrence, Roles};
use crate::core::types::{FreqDist, PairKey, PositionLists};
use crate::core::window::Window;
use crate::error::{CollocationError, Result};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Collects co-occurrences into the four parallel tables.
#[derive(Debug, Default)]
struct Aggregator {
    word_fd: FreqDist<String>,
    ngram_fd: FreqDist<PairKey>,
    dist: PositionLists<PairKey>,
    pos: PositionLists<PairKey>,
}

impl Aggregator {
    fn count_word(&mut self, token: &str) {
        self.word_fd.inc(token.to_string());
    }

    fn ingest(&mut self, occurrence: Cooccurrence<'_>) {
        let key: PairKey = (occurrence.first.to_string(), occurrence.second.to_string());
        self.dist.push(key.clone(), occurrence.offset);
        self.pos.push(key.clone(), occurrence.position);
        self.ngram_fd.inc(key);
    }

    /// Verifies the table invariants and hands the tables to a finder.
    fn finish(self, window_size: Option<usize>) -> Result<BigramCollocationFinder> {
        for (pair, count) in self.ngram_fd.iter() {
            let distances = self.dist.count(pair);
            let positions = self.pos.count(pair);
            if distances as u64 != count || positions as u64 != count {
                return Err(CollocationError::Inconsistent {
                    pair: pair.clone(),
                    count,
                    distances,
                    positions,
                });
            }
        }
        if self.dist.len() != self.ngram_fd.len() || self.pos.len() != self.ngram_fd.len() {
            let stray = self
                .dist
                .keys()
                .chain(self.pos.keys())
                .find(|k| !self.ngram_fd.contains_key(*k))
                .cloned()
                .unwrap_or_default();
            return Err(CollocationError::Inconsistent {
                distances: self.dist.count(&stray),
                positions: self.pos.count(&stray),
                pair: stray,
                count: 0,
            });
        }

        trace!(
            words = self.word_fd.len(),
            pairs = self.ngram_fd.len(),
            occurrences = self.ngram_fd.total(),
            "collocation tables built"
        );

        Ok(BigramCollocationFinder {
            word_fd: self.word_fd,
            ngram_fd: self.ngram_fd,
            dist: self.dist,
            pos: self.pos,
            window_size,
        })
    }
}

/// Bigram co-occurrence tables for one corpus, with association scoring.
///
/// Built in a single pass by one of the constructors and read-only
/// afterwards. The filtering methods consume the finder and return a
/// narrowed one.
///
/// Measures receive `(n_ii, (n_ix, n_xi), n_xx)`. `n_ix`, `n_xi` and `n_xx`
/// come from `word_fd`, which in role mode only counts pivot and target
/// tokens. `n_ii` is the pair count, divided by `window_size - 1` in
/// symmetric mode.
#[derive(Debug, Clone, PartialEq)]
pub struct BigramCollocationFinder {
    word_fd: FreqDist<String>,
    ngram_fd: FreqDist<PairKey>,
    dist: PositionLists<PairKey>,
    pos: PositionLists<PairKey>,
    /// Set in symmetric mode only.
    window_size: Option<usize>,
}

impl BigramCollocationFinder {
    /// Counts every pair of tokens less than `window_size` positions apart.
    ///
    /// Keys keep encounter order, so `("is", "a")` and `("a", "is")` are
    /// distinct. `window_size` must be at least 2.
    pub fn from_words<S: AsRef<str>>(corpus: &[S], window_size: usize) -> Result<Self> {
        Self::from_documents::<_, _, S>(std::iter::once(corpus), window_size)
    }

    /// Like [`from_words`](Self::from_words) over several documents. Windows
    /// never span two documents; positions index the concatenated stream.
    pub fn from_documents<I, D, S>(documents: I, window_size: usize) -> Result<Self>
    where
        I: IntoIterator<Item = D>,
        D: AsRef<[S]>,
        S: AsRef<str>,
    {
        if window_size < 2 {
            return Err(CollocationError::Configuration(format!(
                "window size must be at least 2, got {window_size}"
            )));
        }

        let mut agg = Aggregator::default();
        let mut base = 0;
        let mut documents_seen = 0usize;
        for document in documents {
            let tokens = document.as_ref();
            for token in tokens {
                agg.count_word(token.as_ref());
            }
            for mut occurrence in symmetric_pairs(tokens, window_size) {
                occurrence.position += base;
                agg.ingest(occurrence);
            }
            base += tokens.len();
            documents_seen += 1;
        }
        debug!(tokens = base, documents = documents_seen, window_size, "counted symmetric bigrams");

        agg.finish(Some(window_size))
    }

    /// Counts pivot/target pairs inside `window`.
    ///
    /// Each key is ordered by corpus position, so a target seen before its
    /// pivot comes first. `dist` records the unsigned distance and `pos` the
    /// pivot position. Only tokens in either vocabulary count towards
    /// `word_fd`.
    pub fn from_roles<P, T, S>(
        pivots: P,
        targets: T,
        corpus: &[S],
        window: Window,
        allow_self_reference: bool,
    ) -> Result<Self>
    where
        P: IntoIterator,
        P::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
        S: AsRef<str>,
    {
        window.validate()?;
        let roles = Roles::new(pivots, targets);

        let mut agg = Aggregator::default();
        for token in corpus {
            let token: &str = token.as_ref();
            if roles.is_eligible(token) {
                agg.count_word(token);
            }
        }
        if !roles.pairs_impossible() {
            for occurrence in role_pairs(corpus, &roles, window, allow_self_reference) {
                agg.ingest(occurrence);
            }
        }
        debug!(
            tokens = corpus.len(),
            ?window,
            allow_self_reference,
            "counted pivot/target bigrams"
        );

        agg.finish(None)
    }

    pub fn word_fd(&self) -> &FreqDist<String> {
        &self.word_fd
    }

    pub fn ngram_fd(&self) -> &FreqDist<PairKey> {
        &self.ngram_fd
    }

    /// Distances of every occurrence, per pair, in scan order.
    pub fn dist(&self) -> &PositionLists<PairKey> {
        &self.dist
    }

    /// Pivot positions parallel to [`dist`](Self::dist).
    pub fn pos(&self) -> &PositionLists<PairKey> {
        &self.pos
    }

    /// Window size for finders built in symmetric mode.
    pub fn window_size(&self) -> Option<usize> {
        self.window_size
    }

    /// Number of pair occurrences a window contributes per co-occurrence;
    /// pair counts are divided by it before scoring.
    fn pair_normalizer(&self) -> f64 {
        match self.window_size {
            Some(w) => (w - 1) as f64,
            None => 1.0,
        }
    }

    /// Score of one pair, `None` if the pair was never observed.
    pub fn score_ngram<F>(&self, score_fn: F, w1: &str, w2: &str) -> Option<f64>
    where
        F: Fn(f64, (f64, f64), f64) -> f64,
    {
        let key = (w1.to_string(), w2.to_string());
        let count = self.ngram_fd.get(&key);
        if count == 0 {
            return None;
        }
        Some(self.apply(&score_fn, &key, count))
    }

    fn apply<F>(&self, score_fn: &F, key: &PairKey, count: u64) -> f64
    where
        F: Fn(f64, (f64, f64), f64) -> f64,
    {
        let n_ii = count as f64 / self.pair_normalizer();
        let n_ix = self.word_fd.get(key.0.as_str()) as f64;
        let n_xi = self.word_fd.get(key.1.as_str()) as f64;
        let n_xx = self.word_fd.total() as f64;
        score_fn(n_ii, (n_ix, n_xi), n_xx)
    }

    /// Scores every observed pair, in no particular order.
    pub fn iter_scores<'a, F>(&'a self, score_fn: F) -> impl Iterator<Item = (&'a PairKey, f64)> + 'a
    where
        F: Fn(f64, (f64, f64), f64) -> f64 + 'a,
    {
        self.ngram_fd
            .iter()
            .map(move |(key, count)| (key, self.apply(&score_fn, key, count)))
    }

    /// Scores every observed pair, highest score first, ties by key.
    /// NaN scores rank after every number.
    pub fn score_ngrams<F>(&self, score_fn: F) -> Vec<(PairKey, f64)>
    where
        F: Fn(f64, (f64, f64), f64) -> f64,
    {
        let mut scored: Vec<(PairKey, f64)> = self
            .iter_scores(score_fn)
            .map(|(key, score)| (key.clone(), score))
            .collect();
        scored.sort_by(|a, b| {
            a.1.is_nan()
                .cmp(&b.1.is_nan())
                .then_with(|| b.1.total_cmp(&a.1))
                .then_with(|| a.0.cmp(&b.0))
        });
        scored
    }

    /// The `n` best-scoring pairs.
    pub fn nbest<F>(&self, score_fn: F, n: usize) -> Vec<PairKey>
    where
        F: Fn(f64, (f64, f64), f64) -> f64,
    {
        self.score_ngrams(score_fn)
            .into_iter()
            .take(n)
            .map(|(key, _)| key)
            .collect()
    }

    /// Pairs scoring strictly above `min_score`, best first.
    pub fn above_score<F>(&self, score_fn: F, min_score: f64) -> Vec<PairKey>
    where
        F: Fn(f64, (f64, f64), f64) -> f64,
    {
        self.score_ngrams(score_fn)
            .into_iter()
            .filter(|(_, score)| *score > min_score)
            .map(|(key, _)| key)
            .collect()
    }

    /// Drops pairs seen fewer than `min_freq` times.
    pub fn apply_freq_filter(self, min_freq: u64) -> Self {
        self.retain_pairs(|_, count| count >= min_freq)
    }

    /// Drops pairs in which either token satisfies `reject`.
    pub fn apply_word_filter<F>(self, reject: F) -> Self
    where
        F: Fn(&str) -> bool,
    {
        self.retain_pairs(|key, _| !(reject(&key.0) || reject(&key.1)))
    }

    /// Drops pairs for which `reject(first, second)` holds.
    pub fn apply_ngram_filter<F>(self, reject: F) -> Self
    where
        F: Fn(&str, &str) -> bool,
    {
        self.retain_pairs(|key, _| !reject(&key.0, &key.1))
    }

    fn retain_pairs<F>(mut self, mut keep: F) -> Self
    where
        F: FnMut(&PairKey, u64) -> bool,
    {
        let mut dropped: HashSet<PairKey> = HashSet::new();
        self.ngram_fd.retain(|key, count| {
            let kept = keep(key, count);
            if !kept {
                dropped.insert(key.clone());
            }
            kept
        });
        self.dist.retain(|key| !dropped.contains(key));
        self.pos.retain(|key| !dropped.contains(key));
        trace!(dropped = dropped.len(), remaining = self.ngram_fd.len(), "filtered pairs");
        self
    }
}
