// Tuning constants for the note visualizer core.
//
// Physics values are in device pixels and seconds unless a name says
// otherwise. Keeping them here keeps magic numbers out of the simulation.

// Note range (88-key piano, A0..C8)
pub const NOTE_MIN: i32 = 21;
pub const NOTE_MAX: i32 = 108;
pub const NOTE_COUNT: usize = (NOTE_MAX - NOTE_MIN + 1) as usize;

// Lane layout
pub const LANE_SIDE_MARGIN_PX: f32 = 8.0; // provisional layout keeps this free on both sides
pub const LANE_FILL_RATIO: f32 = 0.82; // bar width relative to lane pitch
pub const FLOOR_BIAS_PX: f32 = 2.0; // pushes the floor into the key tops to hide the seam

// Falling-note sizing
pub const NOTE_BASE_HEIGHT_PX: f32 = 22.0;
pub const NOTE_VELOCITY_HEIGHT_PX: f32 = 36.0;
pub const NOTE_GROW_PX_PER_SEC: f32 = 140.0;
pub const NOTE_MIN_HEIGHT_PX: f32 = 2.0;
pub const HOLD_FACTOR_CAP: f32 = 2.0; // duration factor = 1 + min(cap, held_ms / HOLD_FACTOR_MS)
pub const HOLD_FACTOR_MS: f64 = 2000.0;

// Falling-note motion
pub const GRAVITY_BASE: f32 = 400.0;
pub const GRAVITY_BPM_COEFF: f32 = 2.6;
pub const GRAVITY_BPM_MAX: f32 = 600.0;
pub const AIR_DRAG: f32 = 0.35;
pub const AIR_DRAG_SCALE: f32 = 1.0;
pub const WIND_PERIOD_MS: f64 = 900.0;
pub const WIND_BPM_COEFF: f32 = 0.3;
pub const WIND_DRIFT_SCALE: f32 = 0.15;
pub const NOTE_LAUNCH_VY_BASE: f32 = 60.0;
pub const NOTE_LAUNCH_VY_VELOCITY: f32 = 240.0;

// Landed-note behavior
pub const SHIMMER_AMPLITUDE: f32 = 0.04; // fraction of bar height
pub const SHIMMER_HZ: f32 = 3.5;
pub const DECAY_ALPHA_PER_SEC: f32 = 2.2;
pub const DECAY_HEIGHT_PX_PER_SEC: f32 = 180.0;

// Tempo clamp
pub const BPM_MIN: f32 = 20.0;
pub const BPM_MAX: f32 = 400.0;
pub const BPM_DEFAULT: f32 = 120.0;

// Particle pool
pub const DEFAULT_PARTICLE_BUDGET: usize = 16_000;
pub const PARTICLE_BOUNDS_MARGIN_PX: f32 = 64.0;
pub const DEPTH_DRAG: f32 = 1.2;
pub const FOCAL_LENGTH: f32 = 600.0;
pub const NEAR_DEPTH_LIMIT: f32 = -0.8 * FOCAL_LENGTH; // closer than this is behind the eye

// Key-press puff (explosions disabled)
pub const PUFF_COUNT: usize = 8;
pub const PUFF_LIFE_SEC: f32 = 0.35;

// Frame driver
pub const MAX_FRAME_DT_SEC: f32 = 0.05;

// Compositor
pub const TRAIL_FADE_ALPHA: f32 = 0.22;
pub const LANE_GUIDE_ALPHA: f32 = 0.035;
pub const LANE_GUIDE_OCTAVE_ALPHA: f32 = 0.08;
pub const FLOOR_LINE_ALPHA: f32 = 0.3;
pub const BLOOM_PAD_PX: f32 = 6.0;
pub const BLOOM_ALPHA: f32 = 0.35;
pub const HELD_STRIP_HEIGHT_PX: f32 = 3.0;
pub const HALO_SCALE: f32 = 2.5;
pub const HALO_ALPHA: f32 = 0.25;
pub const RING_LINE_WIDTH_PX: f32 = 1.2;
