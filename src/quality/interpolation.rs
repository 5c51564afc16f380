//! Linear interpolation over missing values
//!
//! Values are treated as equally spaced. Interior gaps are filled on the
//! straight line between the surrounding measurements and trailing gaps
//! carry the last measurement forward. Leading gaps have no anchor and stay
//! missing.

use crate::models::Observation;
use tracing::debug;

/// Fill missing values after the first measurement in place, returning how
/// many were filled
pub fn interpolate_linear(series: &mut [Observation]) -> usize {
    let mut filled = 0;
    let mut previous: Option<(usize, f64)> = None;

    for index in 0..series.len() {
        let Some(value) = series[index].value else {
            continue;
        };

        if let Some((anchor, anchor_value)) = previous {
            let steps = index - anchor;
            for (offset, observation) in series[anchor + 1..index].iter_mut().enumerate() {
                let fraction = (offset + 1) as f64 / steps as f64;
                observation.value = Some(anchor_value + (value - anchor_value) * fraction);
                filled += 1;
            }
        }

        previous = Some((index, value));
    }

    if let Some((anchor, anchor_value)) = previous {
        for observation in &mut series[anchor + 1..] {
            observation.value = Some(anchor_value);
            filled += 1;
        }
    }

    debug!("Interpolated {} missing values", filled);
    filled
}
