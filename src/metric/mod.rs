//! Vector distance metrics.
//!
//! All metrics are symmetric and return zero for identical inputs. Euclidean,
//! Manhattan and Chebyshev are true metrics; Canberra treats a coordinate
//! where both values are zero as contributing nothing.

use crate::util::math::ratio_or_zero;
use crate::util::{TexSearchError, TexSearchResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Distance metric between two equal-length signatures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// `sqrt(sum (a_i - b_i)^2)`.
    Euclidean,
    /// `sum |a_i - b_i|`.
    Manhattan,
    /// `max |a_i - b_i|`.
    Chebyshev,
    /// `sum |a_i - b_i| / (|a_i| + |b_i|)`.
    Canberra,
}

impl Metric {
    /// All metrics, in reporting order.
    pub const ALL: [Metric; 4] = [
        Metric::Euclidean,
        Metric::Manhattan,
        Metric::Chebyshev,
        Metric::Canberra,
    ];

    /// Computes the distance between `a` and `b`.
    pub fn distance(self, a: &[f64], b: &[f64]) -> TexSearchResult<f64> {
        if a.len() != b.len() {
            return Err(TexSearchError::DimensionMismatch {
                expected: a.len(),
                got: b.len(),
            });
        }
        Ok(self.distance_unchecked(a, b))
    }

    /// Computes the distance assuming `a.len() == b.len()`.
    ///
    /// Extra components of the longer slice are ignored.
    #[inline]
    pub(crate) fn distance_unchecked(self, a: &[f64], b: &[f64]) -> f64 {
        let pairs = a.iter().zip(b.iter());
        match self {
            Metric::Euclidean => pairs
                .map(|(x, y)| (x - y) * (x - y))
                .sum::<f64>()
                .sqrt(),
            Metric::Manhattan => pairs.map(|(x, y)| (x - y).abs()).sum(),
            Metric::Chebyshev => pairs.map(|(x, y)| (x - y).abs()).fold(0.0, f64::max),
            Metric::Canberra => pairs
                .map(|(x, y)| ratio_or_zero((x - y).abs(), x.abs() + y.abs()))
                .sum(),
        }
    }

    /// Returns the lowercase metric name.
    pub fn name(self) -> &'static str {
        match self {
            Metric::Euclidean => "euclidean",
            Metric::Manhattan => "manhattan",
            Metric::Chebyshev => "chebyshev",
            Metric::Canberra => "canberra",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = TexSearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "euclidean" | "l2" => Ok(Metric::Euclidean),
            "manhattan" | "cityblock" | "l1" => Ok(Metric::Manhattan),
            "chebyshev" | "linf" => Ok(Metric::Chebyshev),
            "canberra" => Ok(Metric::Canberra),
            _ => Err(TexSearchError::UnknownMetric {
                name: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Metric;
    use crate::util::TexSearchError;

    #[test]
    fn known_values() {
        let a = [0.0, 0.0, 0.0];
        let b = [1.0, -2.0, 2.0];
        assert!((Metric::Euclidean.distance(&a, &b).unwrap() - 3.0).abs() < 1e-12);
        assert!((Metric::Manhattan.distance(&a, &b).unwrap() - 5.0).abs() < 1e-12);
        assert!((Metric::Chebyshev.distance(&a, &b).unwrap() - 2.0).abs() < 1e-12);
        assert!((Metric::Canberra.distance(&a, &b).unwrap() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn canberra_skips_zero_pairs() {
        let d = Metric::Canberra.distance(&[0.0, 1.0], &[0.0, 3.0]).unwrap();
        assert!((d - 0.5).abs() < 1e-12);
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let err = Metric::Chebyshev.distance(&[1.0; 5], &[1.0; 6]).unwrap_err();
        assert_eq!(
            err,
            TexSearchError::DimensionMismatch {
                expected: 5,
                got: 6
            }
        );
    }

    #[test]
    fn names_and_aliases_parse() {
        for metric in Metric::ALL {
            assert_eq!(metric.name().parse::<Metric>().unwrap(), metric);
        }
        assert_eq!("cityblock".parse::<Metric>().unwrap(), Metric::Manhattan);
        assert!("cosine".parse::<Metric>().is_err());
    }
}
