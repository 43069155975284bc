//! Velocity estimation from completed iterations.

use crate::iteration::Iteration;

/// How many of the most recent done iterations feed the average.
pub const VELOCITY_SAMPLE_SIZE: usize = 3;

/// Sustainable per-iteration point capacity.
///
/// With no history this is the configured default. Otherwise it is the
/// floored average of the last [`VELOCITY_SAMPLE_SIZE`] done iterations'
/// points, clamped to a minimum of 1 so scheduling can never stall on a
/// zero-capacity iteration.
pub fn estimate(done_iterations: &[Iteration], default_velocity: u32) -> u32 {
    if done_iterations.is_empty() {
        return default_velocity;
    }

    let sample_start = done_iterations.len().saturating_sub(VELOCITY_SAMPLE_SIZE);
    let sample = &done_iterations[sample_start..];
    let sum: u32 = sample.iter().map(|iteration| iteration.points()).sum();
    let velocity = sum / sample.len() as u32;
    velocity.max(1)
}
