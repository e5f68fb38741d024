// File: src/core/window.rs
use crate::error::{CollocationError, Result};
use crate::core::types::Offset;
use serde::{Deserialize, Serialize};

/// Range of distances around a pivot occurrence in which targets are paired.
///
/// Both forms describe positions on either side of the pivot; the distance
/// `d` is always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Window {
    /// Targets at distance `min <= d <= max`, before or after the pivot.
    Offsets { min: Offset, max: Offset },
    /// Targets up to `left` positions before or `right` positions after the
    /// pivot.
    Span { left: Offset, right: Offset },
}

impl Window {
    /// Inclusive offset range. Fails if either bound is zero or `min > max`.
    pub fn offsets(min: Offset, max: Offset) -> Result<Self> {
        let window = Window::Offsets { min, max };
        window.validate()?;
        Ok(window)
    }

    /// Left/right span. Either side may be zero, but not both.
    pub fn span(left: Offset, right: Offset) -> Result<Self> {
        let window = Window::Span { left, right };
        window.validate()?;
        Ok(window)
    }

    /// Checks the bounds. Deserialized windows skip the constructors, so the
    /// finder calls this again before scanning.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Window::Offsets { min, max } => {
                if min == 0 || max == 0 {
                    return Err(CollocationError::Configuration(format!(
                        "offset bounds must be positive, got ({min}, {max})"
                    )));
                }
                if min > max {
                    return Err(CollocationError::Configuration(format!(
                        "min offset {min} exceeds max offset {max}"
                    )));
                }
                Ok(())
            }
            Window::Span { left, right } => {
                if left == 0 && right == 0 {
                    return Err(CollocationError::Configuration(
                        "span window (0, 0) admits no positions".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }

    /// Farthest distance scanned before the pivot.
    pub(crate) fn reach_before(&self) -> Offset {
        match *self {
            Window::Offsets { max, .. } => max,
            Window::Span { left, .. } => left,
        }
    }

    /// Farthest distance scanned after the pivot.
    pub(crate) fn reach_after(&self) -> Offset {
        match *self {
            Window::Offsets { max, .. } => max,
            Window::Span { right, .. } => right,
        }
    }

    pub(crate) fn admits_before(&self, d: Offset) -> bool {
        match *self {
            Window::Offsets { min, max } => d >= min && d <= max,
            Window::Span { left, .. } => d >= 1 && d <= left,
        }
    }

    pub(crate) fn admits_after(&self, d: Offset) -> bool {
        match *self {
            Window::Offsets { min, max } => d >= min && d <= max,
            Window::Span { right, .. } => d >= 1 && d <= right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_rejects_inverted_bounds() {
        let err = Window::offsets(4, 3).unwrap_err();
        assert!(matches!(err, CollocationError::Configuration(_)));
    }

    #[test]
    fn offsets_rejects_zero() {
        assert!(Window::offsets(0, 3).is_err());
        assert!(Window::offsets(2, 0).is_err());
    }

    #[test]
    fn span_allows_one_sided_windows() {
        let right_only = Window::span(0, 3).unwrap();
        assert!(!right_only.admits_before(1));
        assert!(right_only.admits_after(3));
        assert!(!right_only.admits_after(4));
        assert!(Window::span(0, 0).is_err());
    }

    #[test]
    fn offsets_are_symmetric() {
        let w = Window::offsets(2, 3).unwrap();
        for d in 0..6 {
            assert_eq!(w.admits_before(d), w.admits_after(d));
        }
        assert!(!w.admits_before(1));
        assert!(w.admits_before(2));
        assert!(w.admits_before(3));
        assert_eq!(w.reach_before(), 3);
    }

    #[test]
    fn window_deserializes_from_tagged_json() {
        let w: Window = serde_json::from_str(r#"{"kind":"span","left":4,"right":2}"#).unwrap();
        assert_eq!(w, Window::Span { left: 4, right: 2 });
    }
}
