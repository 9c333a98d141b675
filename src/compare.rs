//! Frame-by-frame comparison of a reference and a test F0 track.

use serde::Serialize;

use crate::config::{ComparisonConfig, ReconcileConfig};
use crate::error::EvalError;
use crate::f0::F0Track;

/// Voicing and pitch accuracy counters for one reference/test pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ComparisonResult {
    /// Reference frames with nonzero F0
    pub num_voiced: u32,
    /// Reference frames with zero F0
    pub num_unvoiced: u32,
    /// Voiced in reference, unvoiced in test
    pub num_voiced_unvoiced: u32,
    /// Unvoiced in reference, voiced in test
    pub num_unvoiced_voiced: u32,
    /// Voiced in both
    pub num_voiced_voiced: u32,
    /// Voiced-voiced frames whose relative error exceeds the gross threshold
    pub num_gross_errors: u32,
    /// RMS relative error over the remaining voiced-voiced frames
    pub fine_error: f32,
}

impl ComparisonResult {
    pub fn num_frames(&self) -> u32 {
        self.num_voiced + self.num_unvoiced
    }
}

/// Classify every frame pair and accumulate the counters.
///
/// Both slices must have the same length; when they do not, an all-zero
/// result is returned and nothing is inspected.
pub fn compare(reference: &[f32], test: &[f32], config: &ComparisonConfig) -> ComparisonResult {
    let mut result = ComparisonResult::default();
    if reference.len() != test.len() {
        log::debug!(
            "[Compare] Length mismatch ({} vs {}), returning empty result",
            reference.len(),
            test.len()
        );
        return result;
    }

    let mut fine_sum = 0.0_f32;
    let mut fine_frames = 0_u32;

    for (&r, &t) in reference.iter().zip(test) {
        if r == 0.0 {
            result.num_unvoiced += 1;
        } else {
            result.num_voiced += 1;
        }

        match (r != 0.0, t != 0.0) {
            (false, false) => {}
            (false, true) => result.num_unvoiced_voiced += 1,
            (true, false) => result.num_voiced_unvoiced += 1,
            (true, true) => {
                result.num_voiced_voiced += 1;
                let f = ((r - t) / r).abs();
                if f > config.gross_threshold {
                    result.num_gross_errors += 1;
                } else {
                    fine_frames += 1;
                    fine_sum += f * f;
                }
            }
        }
    }

    if fine_frames > 0 {
        result.fine_error = (fine_sum / fine_frames as f32).sqrt();
    }
    result
}

/// Bring both tracks to a common length before comparison.
///
/// Differences up to `frame_tolerance` are absorbed by dropping the trailing
/// frames of the longer track. Anything larger is a [`EvalError::FrameCountMismatch`].
pub fn reconcile_lengths(
    item: &str,
    reference: &mut F0Track,
    test: &mut F0Track,
    config: &ReconcileConfig,
) -> Result<(), EvalError> {
    let reference_frames = reference.len();
    let test_frames = test.len();

    if reference_frames.abs_diff(test_frames) > config.frame_tolerance {
        return Err(EvalError::FrameCountMismatch {
            item: item.to_string(),
            reference_frames,
            test_frames,
            tolerance: config.frame_tolerance,
        });
    }

    if reference_frames > test_frames {
        reference.truncate(test_frames);
    } else if test_frames > reference_frames {
        test.truncate(reference_frames);
    }

    if reference_frames != test_frames {
        log::debug!(
            "[Compare] {}: reconciled {} ref / {} test frames to {}",
            item,
            reference_frames,
            test_frames,
            reference.len()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn default_compare(reference: &[f32], test: &[f32]) -> ComparisonResult {
        compare(reference, test, &ComparisonConfig::default())
    }

    #[test]
    fn classifies_every_frame_kind() {
        let result = default_compare(&[0.0, 100.0, 120.0, 0.0], &[0.0, 0.0, 150.0, 5.0]);
        assert_eq!(result.num_unvoiced, 2);
        assert_eq!(result.num_voiced, 2);
        assert_eq!(result.num_unvoiced_voiced, 1);
        assert_eq!(result.num_voiced_unvoiced, 1);
        assert_eq!(result.num_voiced_voiced, 1);
        assert_eq!(result.num_gross_errors, 1);
        assert_eq!(result.fine_error, 0.0);
        assert_eq!(result.num_frames(), 4);
    }

    #[test]
    fn identical_voiced_tracks_have_no_error() {
        let track = [110.0, 112.5, 130.0, 98.25];
        let result = default_compare(&track, &track);
        assert_eq!(result.num_voiced_voiced, 4);
        assert_eq!(result.num_gross_errors, 0);
        assert_eq!(result.fine_error, 0.0);
    }

    #[test]
    fn unvoiced_reference_only_counts_false_voicing() {
        let test = [0.0, 150.0, 0.0, 80.0, 90.0];
        let result = default_compare(&[0.0; 5], &test);
        assert_eq!(result.num_voiced, 0);
        assert_eq!(result.num_unvoiced, 5);
        assert_eq!(result.num_voiced_unvoiced, 0);
        assert_eq!(result.num_unvoiced_voiced, 3);
        assert_eq!(result.fine_error, 0.0);
    }

    #[test]
    fn threshold_boundary_is_not_gross() {
        let at = default_compare(&[100.0], &[120.0]);
        assert_eq!(at.num_gross_errors, 0);
        assert!((at.fine_error - 0.2).abs() < 1e-6);

        let above = default_compare(&[100.0], &[120.01]);
        assert_eq!(above.num_gross_errors, 1);
        assert_eq!(above.fine_error, 0.0);
    }

    #[test]
    fn fine_error_is_rms_of_relative_errors() {
        // relative errors 0.1 and 0.05 -> sqrt((0.01 + 0.0025) / 2)
        let result = default_compare(&[100.0, 200.0, 100.0], &[110.0, 190.0, 300.0]);
        assert_eq!(result.num_gross_errors, 1);
        let expected = ((0.01_f32 + 0.0025) / 2.0).sqrt();
        assert!((result.fine_error - expected).abs() < 1e-6);
    }

    #[test]
    fn threshold_comes_from_config() {
        let config = ComparisonConfig {
            gross_threshold: 0.05,
        };
        let result = compare(&[100.0], &[110.0], &config);
        assert_eq!(result.num_gross_errors, 1);
    }

    #[test]
    fn mismatched_lengths_give_empty_result() {
        let result = default_compare(&[100.0, 0.0], &[100.0]);
        assert_eq!(result, ComparisonResult::default());
    }

    #[test]
    fn randomized_tracks_keep_counter_invariants() {
        let mut rng = rand::thread_rng();
        for _ in 0..50 {
            let len = rng.gen_range(0..200);
            let draw = |rng: &mut rand::rngs::ThreadRng| -> f32 {
                if rng.gen_bool(0.3) {
                    0.0
                } else {
                    rng.gen_range(60.0..400.0)
                }
            };
            let reference: Vec<f32> = (0..len).map(|_| draw(&mut rng)).collect();
            let test: Vec<f32> = (0..len).map(|_| draw(&mut rng)).collect();
            let result = default_compare(&reference, &test);

            assert_eq!(result.num_frames() as usize, len);
            assert_eq!(
                result.num_voiced,
                result.num_voiced_unvoiced + result.num_voiced_voiced
            );
            assert!(result.num_unvoiced_voiced <= result.num_unvoiced);
            assert!(result.num_gross_errors <= result.num_voiced_voiced);
            assert!(result.fine_error >= 0.0 && result.fine_error <= 0.2 + 1e-6);

            let identical = default_compare(&reference, &reference);
            assert_eq!(identical.num_gross_errors, 0);
            assert_eq!(identical.fine_error, 0.0);
        }
    }

    #[test]
    fn reconcile_truncates_longer_reference() {
        let mut reference = F0Track::from(vec![100.0; 100]);
        let mut test = F0Track::from(vec![100.0; 97]);
        reconcile_lengths("item", &mut reference, &mut test, &ReconcileConfig::default())
            .unwrap();
        assert_eq!(reference.len(), 97);
        assert_eq!(test.len(), 97);
    }

    #[test]
    fn reconcile_truncates_longer_test() {
        let mut reference = F0Track::from(vec![0.0; 95]);
        let mut test = F0Track::from(vec![0.0; 100]);
        reconcile_lengths("item", &mut reference, &mut test, &ReconcileConfig::default())
            .unwrap();
        assert_eq!(reference.len(), 95);
        assert_eq!(test.len(), 95);
    }

    #[test]
    fn reconcile_rejects_large_difference() {
        let mut reference = F0Track::from(vec![100.0; 100]);
        let mut test = F0Track::from(vec![100.0; 94]);
        let err = reconcile_lengths("rl001", &mut reference, &mut test, &ReconcileConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            EvalError::FrameCountMismatch {
                item: "rl001".to_string(),
                reference_frames: 100,
                test_frames: 94,
                tolerance: 5,
            }
        );
        assert_eq!(reference.len(), 100);
    }
}
