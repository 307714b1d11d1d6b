// Host-side tests for tuning constants and their relationships.

#![allow(dead_code)]
mod constants {
    include!("../src/core/constants.rs");
}

use constants::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn note_range_is_a_full_keyboard() {
    assert_eq!(NOTE_MIN, 21);
    assert_eq!(NOTE_MAX, 108);
    assert_eq!(NOTE_COUNT, 88);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn physics_constants_are_positive() {
    assert!(GRAVITY_BASE > 0.0);
    assert!(GRAVITY_BPM_MAX > 0.0);
    assert!(AIR_DRAG > 0.0 && AIR_DRAG * MAX_FRAME_DT_SEC < 1.0);
    assert!(DEPTH_DRAG * MAX_FRAME_DT_SEC < 1.0);
    assert!(NOTE_GROW_PX_PER_SEC > 0.0);
    assert!(DECAY_ALPHA_PER_SEC > 0.0 && DECAY_HEIGHT_PX_PER_SEC > 0.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn constants_have_logical_relationships() {
    // Base bar height for a full-velocity note is 22 + 36.
    assert_eq!(NOTE_BASE_HEIGHT_PX + NOTE_VELOCITY_HEIGHT_PX, 58.0);
    assert!(NOTE_MIN_HEIGHT_PX < NOTE_BASE_HEIGHT_PX);
    assert!(BPM_MIN < BPM_DEFAULT && BPM_DEFAULT < BPM_MAX);
    assert!(LANE_FILL_RATIO > 0.0 && LANE_FILL_RATIO <= 1.0);
    assert!(NEAR_DEPTH_LIMIT < 0.0 && NEAR_DEPTH_LIMIT > -FOCAL_LENGTH);
    assert!(SHIMMER_AMPLITUDE < 0.5);
    assert!(PUFF_LIFE_SEC < 1.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn compositor_alphas_are_fractions() {
    for a in [
        TRAIL_FADE_ALPHA,
        LANE_GUIDE_ALPHA,
        LANE_GUIDE_OCTAVE_ALPHA,
        FLOOR_LINE_ALPHA,
        BLOOM_ALPHA,
        HALO_ALPHA,
    ] {
        assert!(a > 0.0 && a <= 1.0);
    }
    assert!(LANE_GUIDE_OCTAVE_ALPHA > LANE_GUIDE_ALPHA);
}
