//! Row partitioning over a set of allowed segment widths.
//!
//! [`partition_exact`] answers "which catalog widths add up to this row?"
//! with the sequence a largest-first depth-first search would find first.
//! The search runs over a reachability table instead of recursing, so
//! adversarial catalogs cost `O(target / gcd × widths)` rather than an
//! exponential backtrack.
//!
//! [`partition_with_missing`] falls back to a greedy fill and reports the
//! uncovered remainder, unless the remainder is a sliver under the module
//! tolerance, which is folded into the last segment instead.

use alloc::vec;
use alloc::vec::Vec;

use num_traits::float::FloatCore;

/// Parts per million, the fixed-point scale of [`Tolerance`].
const PPM: u64 = 1_000_000;

/// Fraction of a module dimension below which a residual is merged, not reported.
///
/// Stored as integer parts per million so threshold comparisons are exact:
/// with 10% of a 280 mm module, 27 mm is merged and 28 mm is not.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tolerance {
    ppm: u32,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::from_fraction(crate::catalog::DEFAULT_MISSING_TOLERANCE)
    }
}

impl Tolerance {
    /// Convert a fraction (clamped to `0.0..=1.0`, NaN as zero).
    pub fn from_fraction(fraction: f64) -> Self {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        let ppm = FloatCore::round(fraction * PPM as f64) as u32;
        Self { ppm }
    }

    pub fn ppm(self) -> u32 {
        self.ppm
    }

    pub fn fraction(self) -> f64 {
        f64::from(self.ppm) / PPM as f64
    }

    /// Whether `remainder` is positive and strictly below the tolerated share of `unit`.
    pub fn admits(self, remainder: u32, unit: u32) -> bool {
        remainder > 0 && u64::from(remainder) * PPM < u64::from(self.ppm) * u64::from(unit)
    }
}

/// Result of [`partition_with_missing`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Partition {
    /// Segment widths, left to right.
    pub segments: Vec<u32>,
    /// Uncovered width at the end of the row.
    pub missing: u32,
}

impl Partition {
    /// Total width of the segments.
    pub fn covered(&self) -> u32 {
        self.segments.iter().sum()
    }

    pub fn is_complete(&self) -> bool {
        self.missing == 0
    }
}

/// Find widths from `allowed` (repeats permitted) that sum exactly to `target`.
///
/// Returns the first sequence in largest-first depth-first order, or `None`.
/// Zero and duplicate widths are ignored; `target == 0` is the empty sequence.
pub fn partition_exact(target: u32, allowed: &[u32]) -> Option<Vec<u32>> {
    if target == 0 {
        return Some(Vec::new());
    }
    let widths = normalize(allowed);
    if widths.is_empty() {
        return None;
    }

    // Work in units of the common divisor to keep the table small.
    let unit = widths.iter().fold(0, |acc, &w| gcd(acc, w));
    if target % unit != 0 {
        return None;
    }
    let goal = (target / unit) as usize;
    let steps: Vec<usize> = widths.iter().map(|&w| (w / unit) as usize).collect();

    // reachable[r]: r units can be composed exactly.
    let mut reachable = vec![false; goal + 1];
    reachable[0] = true;
    for r in 1..=goal {
        reachable[r] = steps.iter().any(|&s| s <= r && reachable[r - s]);
    }
    if !reachable[goal] {
        return None;
    }

    // Largest-first walk: a DFS would descend into the first width whose
    // remainder is still composable, which is exactly this choice.
    let mut segments = Vec::new();
    let mut remaining = goal;
    while remaining > 0 {
        let (&step, &width) = steps
            .iter()
            .zip(&widths)
            .find(|&(&s, _)| s <= remaining && reachable[remaining - s])?;
        segments.push(width);
        remaining -= step;
    }
    Some(segments)
}

/// Partition `target` exactly if possible, else greedily with a remainder.
///
/// A positive remainder strictly below `tolerance` of `module_width` is
/// folded into the last segment. Anything else (including a remainder with
/// no segment to absorb it) is reported as [`Partition::missing`].
pub fn partition_with_missing(
    target: u32,
    allowed: &[u32],
    module_width: u32,
    tolerance: Tolerance,
) -> Partition {
    if let Some(segments) = partition_exact(target, allowed) {
        return Partition {
            segments,
            missing: 0,
        };
    }

    let mut segments = Vec::new();
    let mut remaining = target;
    for width in normalize(allowed) {
        while remaining >= width {
            segments.push(width);
            remaining -= width;
        }
    }

    if let Some(last) = segments.last_mut()
        && tolerance.admits(remaining, module_width)
    {
        tracing::trace!(target, folded = remaining, "merged sub-tolerance remainder");
        *last += remaining;
        remaining = 0;
    }

    Partition {
        segments,
        missing: remaining,
    }
}

/// Positive, distinct widths, largest first.
fn normalize(allowed: &[u32]) -> Vec<u32> {
    let mut widths: Vec<u32> = allowed.iter().copied().filter(|&w| w > 0).collect();
    widths.sort_unstable_by(|a, b| b.cmp(a));
    widths.dedup();
    widths
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 { a } else { gcd(b, a % b) }
}
