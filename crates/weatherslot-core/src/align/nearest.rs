//! Nearest-neighbor lookup over a time-ordered sample slice.

use chrono::{DateTime, FixedOffset, TimeDelta};

use crate::forecast::ForecastSample;

/// The sample closest to `target`, with its absolute distance.
///
/// `samples` must be in non-decreasing time order. The scan stops once it has
/// passed the target and distances stop improving, which yields the same
/// answer as a full scan. On ties the earliest sample wins.
pub fn nearest_sample(
    samples: &[ForecastSample],
    target: DateTime<FixedOffset>,
) -> Option<(&ForecastSample, TimeDelta)> {
    let mut best: Option<(&ForecastSample, TimeDelta)> = None;

    for sample in samples {
        let distance = (sample.timestamp - target).abs();
        match best {
            Some((_, best_distance)) if distance >= best_distance => {
                if sample.timestamp > target {
                    break;
                }
            }
            _ => best = Some((sample, distance)),
        }
    }

    best
}
