//! Rejection subsampling that keeps every instance id.
//!
//! Indices are drawn without replacement, or with replacement when the
//! scene has fewer points than requested. A draw is accepted only if the set
//! of distinct instance ids it contains (background id 0 included) equals
//! that of the full scene. The loop is bounded by `max_attempts`.

use std::collections::BTreeSet;

use log::{debug, warn};
use rand::Rng;
use rand::seq::index;

use crate::error::{LabelError, Result};

/// An accepted subsample.
#[derive(Clone, Debug, PartialEq)]
pub struct Subsample {
    /// Selected point indices (length = target)
    pub indices: Vec<usize>,
    /// Draws made, including the accepted one
    pub attempts: usize,
}

/// Draw `target` point indices preserving the instance-id set.
///
/// Fails fast if `target` is smaller than the number of distinct ids, and
/// with [`ResamplingExhausted`](LabelError::ResamplingExhausted) if no draw
/// qualifies within `max_attempts`.
pub fn subsample<R: Rng + ?Sized>(
    instance_ids: &[u32],
    target: usize,
    max_attempts: usize,
    rng: &mut R,
) -> Result<Subsample> {
    let n = instance_ids.len();
    if n == 0 {
        return Err(LabelError::EmptyScene);
    }

    let required: BTreeSet<u32> = instance_ids.iter().copied().collect();
    if target < required.len() {
        return Err(LabelError::ResamplingExhausted {
            attempts: 0,
            missing: required.len() - target,
        });
    }

    let with_replacement = n < target;
    let mut missing = required.len();

    for attempt in 1..=max_attempts {
        let indices: Vec<usize> = if with_replacement {
            (0..target).map(|_| rng.random_range(0..n)).collect()
        } else {
            index::sample(rng, n, target).into_vec()
        };

        let present: BTreeSet<u32> = indices.iter().map(|&i| instance_ids[i]).collect();
        if present == required {
            if attempt > max_attempts / 2 {
                warn!(
                    "[Sampling] Needed {} of {} attempts to keep {} instance ids",
                    attempt,
                    max_attempts,
                    required.len()
                );
            } else {
                debug!("[Sampling] Accepted after {} attempts", attempt);
            }
            return Ok(Subsample {
                indices,
                attempts: attempt,
            });
        }
        missing = required.difference(&present).count();
    }

    Err(LabelError::ResamplingExhausted {
        attempts: max_attempts,
        missing,
    })
}
