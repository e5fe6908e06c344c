//! Sound-cue derivation
//!
//! Cues are always derived from the timer value *after* it was decremented,
//! so each countdown second produces at most one "almost" cue.

use super::event::Sound;
use super::Exercise;

/// Last countdown seconds that carry an "almost" cue.
pub const ALMOST_WINDOW: std::ops::RangeInclusive<u32> = 1..=3;

/// Returns `true` if `remaining` falls inside the final-seconds window.
#[must_use]
pub fn in_almost_window(remaining: u32) -> bool {
    ALMOST_WINDOW.contains(&remaining)
}

/// Cue for a lead-in or rest countdown that just reached `remaining`.
#[must_use]
pub fn rest_cue(remaining: u32) -> Option<Sound> {
    in_almost_window(remaining).then_some(Sound::AlmostStart)
}

/// Cues for a work countdown that just reached `remaining`.
///
/// `AlmostPause` precedes `Intermediate` when both apply.
#[must_use]
pub fn work_cues(exercise: &Exercise, remaining: u32) -> (Option<Sound>, Option<Sound>) {
    let almost = in_almost_window(remaining).then_some(Sound::AlmostPause);
    let intermediate = exercise
        .intermediate_beep_offsets
        .contains(&remaining)
        .then_some(Sound::Intermediate);
    (almost, intermediate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise_with_offsets(offsets: &[u32]) -> Exercise {
        Exercise {
            intermediate_beep_offsets: offsets.iter().copied().collect(),
            ..Exercise::new("Burpees", 20, 10, 1)
        }
    }

    #[test]
    fn test_almost_window_bounds() {
        assert!(!in_almost_window(0));
        assert!(in_almost_window(1));
        assert!(in_almost_window(2));
        assert!(in_almost_window(3));
        assert!(!in_almost_window(4));
    }

    #[test]
    fn test_rest_cue() {
        assert_eq!(rest_cue(5), None);
        assert_eq!(rest_cue(3), Some(Sound::AlmostStart));
        assert_eq!(rest_cue(1), Some(Sound::AlmostStart));
    }

    #[test]
    fn test_work_cues_intermediate_only() {
        let exercise = exercise_with_offsets(&[10]);
        assert_eq!(work_cues(&exercise, 10), (None, Some(Sound::Intermediate)));
        assert_eq!(work_cues(&exercise, 11), (None, None));
    }

    #[test]
    fn test_work_cues_overlap_keeps_both() {
        let exercise = exercise_with_offsets(&[2]);
        assert_eq!(
            work_cues(&exercise, 2),
            (Some(Sound::AlmostPause), Some(Sound::Intermediate))
        );
    }
}
