//! Constants used throughout the library

/// Number of keys on the instrument
pub const KEY_COUNT: usize = 7;

/// Solfège labels, one per key
pub const KEY_LABELS: [&str; KEY_COUNT] = ["Do", "Re", "Mi", "Fa", "Sol", "La", "Si"];

/// Melody value marking a rest
pub const REST_NOTE: u8 = 0;

/// Time a triggered key stays active
pub const DEFAULT_DEBOUNCE_INTERVAL_MS: u64 = 200;

/// Minimum |score| for a trajectory to count as a stroke
pub const DEFAULT_STROKE_CONFIDENCE: f32 = 0.7;

/// Points kept per limb trajectory
pub const DEFAULT_TRAJECTORY_WINDOW: usize = 5;

/// Upcoming notes shown per hint group
pub const DEFAULT_HINT_GROUP_SIZE: usize = 4;

/// Persons scoring at or below this are ignored
pub const DEFAULT_MIN_PERSON_SCORE: f32 = 0.4;

/// Key row layout: keys sit on row 6 of an 11-row grid
pub const DEFAULT_KEY_ROW: u32 = 6;
pub const DEFAULT_ROW_COUNT: u32 = 11;

/// Key inset margins as a fraction of the cell size
pub const DEFAULT_MARGIN_X_FRACTION: f32 = 0.05;
pub const DEFAULT_MARGIN_Y_FRACTION: f32 = 0.05;

/// Vertical margin multiplier while a key is held active
pub const DEFAULT_ACTIVE_MARGIN_MULTIPLIER: f32 = -2.0;

/// Floor applied to the stroke distance threshold (display pixels)
pub const MIN_STROKE_THRESHOLD: f32 = 1.0;

/// Rotation used for the two diagonal stroke tests
pub const DIAGONAL_ANGLE_DEG: f64 = 45.0;

/// Head rotation smoothing window and quantisation steps
pub const DEFAULT_HEAD_ROTATION_WINDOW: usize = 5;
pub const HEAD_ROTATION_HORIZONTAL_STEPS: f32 = 6.0;
pub const HEAD_ROTATION_VERTICAL_STEPS: f32 = 3.0;

/// Window used by `average` wrist smoothing when none is given
pub const DEFAULT_SMOOTHING_WINDOW: usize = 3;

/// Default display and detector sizes
pub const DEFAULT_DISPLAY_WIDTH: f32 = 1920.0;
pub const DEFAULT_DISPLAY_HEIGHT: f32 = 1080.0;
pub const DEFAULT_DETECT_WIDTH: f32 = 1280.0;
pub const DEFAULT_DETECT_HEIGHT: f32 = 720.0;

/// "Twinkle Twinkle Little Star", rests between phrases
pub const DEFAULT_MELODY: [u8; 48] = [
    1, 1, 5, 5, 6, 6, 5, 0, 4, 4, 3, 3, 2, 2, 1, 0, //
    5, 5, 4, 4, 3, 3, 2, 0, 5, 5, 4, 4, 3, 3, 2, 0, //
    1, 1, 5, 5, 6, 6, 5, 0, 4, 4, 3, 3, 2, 2, 1, 0,
];
