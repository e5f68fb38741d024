// File: src/rte.rs
//! Word and named-entity overlap features for text/hypothesis pairs.
//!
//! Both sides are tokenized so that abbreviations, monetary amounts, email
//! addresses and URLs stay single tokens, reduced to word sets, and compared.
//! Hypothesis material missing from the text suggests the hypothesis says
//! more than (is not entailed by) the text.

use crate::error::{CollocationError, Result};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

const TOKEN_PATTERN: &str = r"[\w.@:/]+|\w+|\$[\d.]+";

const STOPWORDS: [&str; 15] = [
    "a", "the", "it", "they", "of", "in", "to", "is", "have", "are", "were", "and", "very", ".", ",",
];

const NEGWORDS: [&str; 6] = ["no", "not", "never", "failed", "rejected", "denied"];

/// Splits text into the maximal matches of a regular expression.
#[derive(Debug, Clone)]
pub struct RegexpTokenizer {
    pattern: Regex,
}

impl RegexpTokenizer {
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| CollocationError::Configuration(format!("bad token pattern: {e}")))?;
        Ok(Self { pattern })
    }

    pub fn tokenize<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.pattern.find_iter(text).map(|m| m.as_str()).collect()
    }
}

/// Which tokens a feature query looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokType {
    /// Ordinary words (anything that is not a named entity).
    Word,
    /// Named entities.
    Ne,
}

impl FromStr for TokType {
    type Err = CollocationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "word" => Ok(Self::Word),
            "ne" => Ok(Self::Ne),
            _ => Err(CollocationError::InvalidCategory(s.to_string())),
        }
    }
}

impl fmt::Display for TokType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Word => f.write_str("word"),
            Self::Ne => f.write_str("ne"),
        }
    }
}

/// Python-style `istitle`: uppercase letters only start a cased run,
/// lowercase letters only continue one.
fn is_title(token: &str) -> bool {
    let mut cased = false;
    let mut prev_cased = false;
    for c in token.chars() {
        if c.is_uppercase() {
            if prev_cased {
                return false;
            }
            prev_cased = true;
            cased = true;
        } else if c.is_lowercase() {
            if !prev_cased {
                return false;
            }
            prev_cased = true;
            cased = true;
        } else {
            prev_cased = false;
        }
    }
    cased
}

fn is_upper(token: &str) -> bool {
    token.chars().any(char::is_uppercase) && !token.chars().any(char::is_lowercase)
}

/// Title-case and all-caps tokens are taken as named entities.
pub fn is_named_entity(token: &str) -> bool {
    is_title(token) || is_upper(token)
}

/// Bag-of-words comparison of a text and a hypothesis.
#[derive(Debug, Clone)]
pub struct RteFeatureExtractor {
    text_words: BTreeSet<String>,
    hyp_words: BTreeSet<String>,
    overlap: BTreeSet<String>,
    hyp_extra: BTreeSet<String>,
    txt_extra: BTreeSet<String>,
}

impl RteFeatureExtractor {
    /// Builds the word sets, dropping stopwords when `stop` is set.
    pub fn new(text: &str, hyp: &str, stop: bool) -> Result<Self> {
        let tokenizer = RegexpTokenizer::new(TOKEN_PATTERN)?;
        let word_set = |s: &str| -> BTreeSet<String> {
            tokenizer
                .tokenize(s)
                .into_iter()
                .filter(|t| !stop || !STOPWORDS.contains(t))
                .map(str::to_string)
                .collect()
        };

        let text_words = word_set(text);
        let hyp_words = word_set(hyp);
        let overlap = hyp_words.intersection(&text_words).cloned().collect();
        let hyp_extra = hyp_words.difference(&text_words).cloned().collect();
        let txt_extra = text_words.difference(&hyp_words).cloned().collect();

        Ok(Self { text_words, hyp_words, overlap, hyp_extra, txt_extra })
    }

    pub fn text_words(&self) -> &BTreeSet<String> {
        &self.text_words
    }

    pub fn hyp_words(&self) -> &BTreeSet<String> {
        &self.hyp_words
    }

    /// Text words absent from the hypothesis.
    pub fn txt_extra(&self) -> &BTreeSet<String> {
        &self.txt_extra
    }

    /// Words shared by text and hypothesis, of the requested type.
    pub fn overlap(&self, toktype: TokType) -> BTreeSet<String> {
        let picked = split_by_type(&self.overlap, toktype);
        debug!(%toktype, tokens = ?picked, "overlap");
        picked
    }

    /// Hypothesis words absent from the text, of the requested type.
    pub fn hyp_extra(&self, toktype: TokType) -> BTreeSet<String> {
        let picked = split_by_type(&self.hyp_extra, toktype);
        debug!(%toktype, tokens = ?picked, "hypothesis extra");
        picked
    }

    /// [`overlap`](Self::overlap) keyed by a `"word"` / `"ne"` tag.
    pub fn overlap_str(&self, toktype: &str) -> Result<BTreeSet<String>> {
        Ok(self.overlap(toktype.parse()?))
    }

    /// [`hyp_extra`](Self::hyp_extra) keyed by a `"word"` / `"ne"` tag.
    pub fn hyp_extra_str(&self, toktype: &str) -> Result<BTreeSet<String>> {
        Ok(self.hyp_extra(toktype.parse()?))
    }

    fn negations(words: &BTreeSet<String>) -> usize {
        NEGWORDS.iter().filter(|w| words.contains(**w)).count()
    }
}

fn split_by_type(words: &BTreeSet<String>, toktype: TokType) -> BTreeSet<String> {
    words
        .iter()
        .filter(|w| is_named_entity(w) == (toktype == TokType::Ne))
        .cloned()
        .collect()
}

/// Feature vector for one text/hypothesis pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RteFeatures {
    pub alwayson: bool,
    pub word_overlap: usize,
    pub word_hyp_extra: usize,
    pub ne_overlap: usize,
    pub ne_hyp_extra: usize,
    pub neg_txt: usize,
    pub neg_hyp: usize,
}

/// Features of a pair with stopwords removed.
pub fn rte_features(text: &str, hyp: &str) -> Result<RteFeatures> {
    let extractor = RteFeatureExtractor::new(text, hyp, true)?;
    Ok(RteFeatures {
        alwayson: true,
        word_overlap: extractor.overlap(TokType::Word).len(),
        word_hyp_extra: extractor.hyp_extra(TokType::Word).len(),
        ne_overlap: extractor.overlap(TokType::Ne).len(),
        ne_hyp_extra: extractor.hyp_extra(TokType::Ne).len(),
        neg_txt: RteFeatureExtractor::negations(&extractor.text_words),
        neg_hyp: RteFeatureExtractor::negations(&extractor.hyp_words),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "Parviz Davudi was representing Iran at a meeting of the Shanghai Co-operation Organisation (SCO), the fledgling association that binds Russia, China and four former Soviet republics of central Asia together to fight terrorism.";
    const HYP: &str = "China is a member of SCO.";

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn tokenizer_keeps_urls_and_money_whole() {
        let tok = RegexpTokenizer::new(TOKEN_PATTERN).unwrap();
        assert_eq!(
            tok.tokenize("see http://nltk.org for $5.00 today"),
            vec!["see", "http://nltk.org", "for", "$5.00", "today"]
        );
    }

    #[test]
    fn named_entity_heuristic() {
        assert!(is_named_entity("China"));
        assert!(is_named_entity("SCO"));
        assert!(is_named_entity("Co-Operation"));
        assert!(!is_named_entity("Co-operation"));
        assert!(!is_named_entity("member"));
        assert!(!is_named_entity("iPhone"));
        assert!(!is_named_entity("2004"));
    }

    #[test]
    fn overlap_and_extra_split_by_type() {
        let ex = RteFeatureExtractor::new(TEXT, HYP, true).unwrap();
        assert_eq!(ex.overlap(TokType::Ne), set(&["China"]));
        assert_eq!(ex.overlap(TokType::Word), set(&[]));
        assert_eq!(ex.hyp_extra(TokType::Word), set(&["member"]));
        // "SCO." keeps its period under the token pattern.
        assert_eq!(ex.hyp_extra(TokType::Ne), set(&["SCO."]));
    }

    #[test]
    fn unknown_toktype_is_rejected() {
        let ex = RteFeatureExtractor::new(TEXT, HYP, true).unwrap();
        assert_eq!(
            ex.overlap_str("verb"),
            Err(CollocationError::InvalidCategory("verb".to_string()))
        );
        assert!(matches!(ex.hyp_extra_str("NE"), Err(CollocationError::InvalidCategory(_))));
        assert_eq!(ex.overlap_str("ne").unwrap(), set(&["China"]));
    }

    #[test]
    fn stopwords_only_dropped_when_requested() {
        let kept = RteFeatureExtractor::new("the cat", "the dog", false).unwrap();
        assert!(kept.overlap(TokType::Word).contains("the"));
        let dropped = RteFeatureExtractor::new("the cat", "the dog", true).unwrap();
        assert!(dropped.overlap(TokType::Word).is_empty());
        assert_eq!(dropped.txt_extra(), &set(&["cat"]));
    }

    #[test]
    fn feature_vector_counts_negations() {
        let f = rte_features("The plan was not rejected", "The plan failed").unwrap();
        assert!(f.alwayson);
        assert_eq!(f.neg_txt, 2);
        assert_eq!(f.neg_hyp, 1);
        assert_eq!(f.ne_overlap, 1);
        assert_eq!(f.word_overlap, 1);
    }
}
