//! Shared numeric constants for the editor engine.

// ── Page ────────────────────────────────────────────────────────

/// Logical page width in points (US Letter).
pub const PAGE_WIDTH: f64 = 612.0;

/// Logical page height in points (US Letter).
pub const PAGE_HEIGHT: f64 = 792.0;

// ── Field geometry ──────────────────────────────────────────────

/// Smallest width a resize may leave a field with, in page units.
pub const MIN_FIELD_WIDTH: f64 = 10.0;

/// Smallest height a resize may leave a field with, in page units.
pub const MIN_FIELD_HEIGHT: f64 = 5.0;

/// Size and position of a field created by `add_field`.
pub const DEFAULT_FIELD_X: f64 = 100.0;
pub const DEFAULT_FIELD_Y: f64 = 100.0;
pub const DEFAULT_FIELD_WIDTH: f64 = 150.0;
pub const DEFAULT_FIELD_HEIGHT: f64 = 20.0;

// ── Snapping / hit-testing ──────────────────────────────────────

/// Snap distance in screen pixels; divided by the viewport scale to get page units.
pub const SNAP_THRESHOLD_PX: f64 = 5.0;

/// Screen-space slop around a corner resize handle.
pub const HANDLE_RADIUS_PX: f64 = 6.0;

/// Screen-space slop around a guide line.
pub const GUIDE_HIT_PX: f64 = 4.0;

/// Pointer travel (screen pixels) below which a gesture counts as a click.
pub const CLICK_SLOP_PX: f64 = 3.0;

// ── Interaction ─────────────────────────────────────────────────

/// Movement multiplier while precision mode is held.
pub const PRECISION_FACTOR: f64 = 0.1;

/// Split position must stay this far inside the field for a vertical cut.
pub const SPLIT_MARGIN_VERTICAL: f64 = 10.0;

/// Split position must stay this far inside the field for a horizontal cut.
pub const SPLIT_MARGIN_HORIZONTAL: f64 = 5.0;

/// Key-repeat cadence for arrow nudges.
pub const NUDGE_REPEAT_MS: u64 = 50;

/// Hold duration after which the nudge step grows by one base step.
pub const NUDGE_ACCEL_MS: u64 = 250;

/// Upper bound on the nudge step multiplier.
pub const NUDGE_MAX_MULTIPLIER: f64 = 10.0;

/// Most repeat steps a single late frame may apply.
pub const NUDGE_MAX_CATCHUP_STEPS: usize = 4;

/// Base nudge step in page units.
pub const NUDGE_BASE_STEP: f64 = 1.0;

// ── Guides / history ────────────────────────────────────────────

/// Offset at which `add_guide` places a new guide.
pub const DEFAULT_GUIDE_OFFSET: f64 = 100.0;

/// Maximum number of retained history snapshots.
pub const HISTORY_LIMIT: usize = 50;
