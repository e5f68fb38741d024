// File: src/association.rs
//! Bigram association measures.
//!
//! Every measure takes the pair count `n_ii`, the marginals
//! `(n_ix, n_xi)` of the first and second token, and the total `n_xx`, and
//! scores the pair against an independence null model. Any of them can be
//! passed straight to
//! [`BigramCollocationFinder::score_ngrams`](crate::BigramCollocationFinder::score_ngrams).

use crate::error::CollocationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Keeps logarithms and divisions finite for empty cells.
const SMALL: f64 = 1e-20;

/// Observed 2x2 contingency cells `(n_ii, n_oi, n_io, n_oo)`.
fn contingency(n_ii: f64, (n_ix, n_xi): (f64, f64), n_xx: f64) -> [f64; 4] {
    let n_oi = n_xi - n_ii;
    let n_io = n_ix - n_ii;
    let n_oo = n_xx - n_ii - n_oi - n_io;
    [n_ii, n_oi, n_io, n_oo]
}

/// Expected cell values under independence, same layout as [`contingency`].
fn expected_values(cont: &[f64; 4]) -> [f64; 4] {
    let n_xx: f64 = cont.iter().sum();
    let mut expected = [0.0; 4];
    for (i, e) in expected.iter_mut().enumerate() {
        *e = (cont[i] + cont[i ^ 1]) * (cont[i] + cont[i ^ 2]) / n_xx;
    }
    expected
}

/// Relative frequency of the pair.
pub fn raw_freq(n_ii: f64, _marginals: (f64, f64), n_xx: f64) -> f64 {
    n_ii / n_xx
}

/// Student's t statistic.
pub fn student_t(n_ii: f64, (n_ix, n_xi): (f64, f64), n_xx: f64) -> f64 {
    (n_ii - n_ix * n_xi / n_xx) / (n_ii + SMALL).sqrt()
}

/// Squared phi coefficient of the contingency table.
pub fn phi_sq(n_ii: f64, marginals: (f64, f64), n_xx: f64) -> f64 {
    let [n_ii, n_oi, n_io, n_oo] = contingency(n_ii, marginals, n_xx);
    (n_ii * n_oo - n_io * n_oi).powi(2)
        / ((n_ii + n_io) * (n_ii + n_oi) * (n_io + n_oo) * (n_oi + n_oo))
}

/// Pearson's chi-square.
pub fn chi_sq(n_ii: f64, marginals: (f64, f64), n_xx: f64) -> f64 {
    n_xx * phi_sq(n_ii, marginals, n_xx)
}

/// Pointwise mutual information, in bits.
pub fn pmi(n_ii: f64, (n_ix, n_xi): (f64, f64), n_xx: f64) -> f64 {
    (n_ii * n_xx).log2() - (n_ix * n_xi).log2()
}

/// Dunning's log-likelihood ratio.
pub fn likelihood_ratio(n_ii: f64, marginals: (f64, f64), n_xx: f64) -> f64 {
    let cont = contingency(n_ii, marginals, n_xx);
    let expected = expected_values(&cont);
    2.0 * cont
        .iter()
        .zip(expected.iter())
        .map(|(&obs, &exp)| obs * (obs / (exp + SMALL) + SMALL).ln())
        .sum::<f64>()
}

/// Poisson-Stirling approximation.
pub fn poisson_stirling(n_ii: f64, (n_ix, n_xi): (f64, f64), n_xx: f64) -> f64 {
    let exp = n_ix * n_xi / n_xx;
    n_ii * ((n_ii / exp).log2() - 1.0)
}

/// Jaccard index of the two tokens' occurrence sets.
pub fn jaccard(n_ii: f64, marginals: (f64, f64), n_xx: f64) -> f64 {
    let [n_ii, n_oi, n_io, _] = contingency(n_ii, marginals, n_xx);
    n_ii / (n_ii + n_oi + n_io)
}

/// MI-like score with the default power of 3.
pub fn mi_like(n_ii: f64, marginals: (f64, f64), n_xx: f64) -> f64 {
    mi_like_with_power(3)(n_ii, marginals, n_xx)
}

/// MI-like score `n_ii^power / (n_ix * n_xi)`.
pub fn mi_like_with_power(power: i32) -> impl Fn(f64, (f64, f64), f64) -> f64 + Copy {
    move |n_ii, (n_ix, n_xi), _n_xx| n_ii.powi(power) / (n_ix * n_xi)
}

/// Dice coefficient.
pub fn dice(n_ii: f64, (n_ix, n_xi): (f64, f64), _n_xx: f64) -> f64 {
    2.0 * n_ii / (n_ix + n_xi)
}

/// Association measures by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    RawFreq,
    StudentT,
    ChiSq,
    PhiSq,
    #[default]
    Pmi,
    LikelihoodRatio,
    PoissonStirling,
    Jaccard,
    MiLike,
    Dice,
}

impl Measure {
    pub const ALL: [Measure; 10] = [
        Measure::RawFreq,
        Measure::StudentT,
        Measure::ChiSq,
        Measure::PhiSq,
        Measure::Pmi,
        Measure::LikelihoodRatio,
        Measure::PoissonStirling,
        Measure::Jaccard,
        Measure::MiLike,
        Measure::Dice,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Measure::RawFreq => "raw_freq",
            Measure::StudentT => "student_t",
            Measure::ChiSq => "chi_sq",
            Measure::PhiSq => "phi_sq",
            Measure::Pmi => "pmi",
            Measure::LikelihoodRatio => "likelihood_ratio",
            Measure::PoissonStirling => "poisson_stirling",
            Measure::Jaccard => "jaccard",
            Measure::MiLike => "mi_like",
            Measure::Dice => "dice",
        }
    }

    pub fn score(self, n_ii: f64, marginals: (f64, f64), n_xx: f64) -> f64 {
        match self {
            Measure::RawFreq => raw_freq(n_ii, marginals, n_xx),
            Measure::StudentT => student_t(n_ii, marginals, n_xx),
            Measure::ChiSq => chi_sq(n_ii, marginals, n_xx),
            Measure::PhiSq => phi_sq(n_ii, marginals, n_xx),
            Measure::Pmi => pmi(n_ii, marginals, n_xx),
            Measure::LikelihoodRatio => likelihood_ratio(n_ii, marginals, n_xx),
            Measure::PoissonStirling => poisson_stirling(n_ii, marginals, n_xx),
            Measure::Jaccard => jaccard(n_ii, marginals, n_xx),
            Measure::MiLike => mi_like(n_ii, marginals, n_xx),
            Measure::Dice => dice(n_ii, marginals, n_xx),
        }
    }

    /// The measure as a plain scoring closure.
    pub fn as_fn(self) -> impl Fn(f64, (f64, f64), f64) -> f64 + Copy {
        move |n_ii, marginals, n_xx| self.score(n_ii, marginals, n_xx)
    }
}

impl FromStr for Measure {
    type Err = CollocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Measure::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| CollocationError::UnknownMeasure(s.to_string()))
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-8;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= EPSILON
    }

    #[test]
    fn pmi_of_independent_pair_is_zero() {
        // p(a,b) = 1/4 = p(a) * p(b)
        assert!(close(pmi(4.0, (8.0, 8.0), 16.0), 0.0));
        assert!(close(pmi(1.0, (2.0, 2.0), 8.0), 1.0));
    }

    #[test]
    fn contingency_cells_sum_to_total() {
        let cont = contingency(3.0, (5.0, 7.0), 20.0);
        assert_eq!(cont, [3.0, 4.0, 2.0, 11.0]);
        let expected = expected_values(&cont);
        assert!(close(expected.iter().sum::<f64>(), 20.0));
        assert!(close(expected[0], 5.0 * 7.0 / 20.0));
    }

    #[test]
    fn chi_sq_scales_phi_sq() {
        let m = (5.0, 7.0);
        assert!(close(chi_sq(3.0, m, 20.0), 20.0 * phi_sq(3.0, m, 20.0)));
    }

    #[test]
    fn likelihood_ratio_is_zero_under_independence() {
        assert!(likelihood_ratio(4.0, (8.0, 8.0), 16.0).abs() < 1e-6);
        assert!(likelihood_ratio(6.0, (8.0, 8.0), 16.0) > 0.0);
    }

    #[test]
    fn overlap_measures() {
        assert!(close(dice(2.0, (3.0, 5.0), 10.0), 0.5));
        assert!(close(jaccard(2.0, (3.0, 5.0), 10.0), 2.0 / 6.0));
        assert!(close(mi_like(2.0, (2.0, 4.0), 10.0), 1.0));
        assert!(close(mi_like_with_power(2)(2.0, (2.0, 4.0), 10.0), 0.5));
        assert!(close(raw_freq(2.0, (3.0, 5.0), 10.0), 0.2));
    }

    #[test]
    fn student_t_and_poisson_stirling_favour_frequent_pairs() {
        assert!(student_t(6.0, (8.0, 8.0), 16.0) > student_t(4.0, (8.0, 8.0), 16.0));
        assert!(close(poisson_stirling(4.0, (8.0, 8.0), 16.0), -4.0));
    }

    #[test]
    fn measure_names_round_trip_through_from_str() {
        for m in Measure::ALL {
            assert_eq!(m.name().parse::<Measure>(), Ok(m));
        }
        assert_eq!(
            "mutual_info".parse::<Measure>(),
            Err(CollocationError::UnknownMeasure("mutual_info".to_string()))
        );
    }

    #[test]
    fn enum_dispatch_matches_functions() {
        let args = (3.0, (5.0, 7.0), 20.0);
        assert_eq!(Measure::Pmi.score(args.0, args.1, args.2), pmi(args.0, args.1, args.2));
        assert_eq!(Measure::Dice.as_fn()(args.0, args.1, args.2), dice(args.0, args.1, args.2));
    }
}
