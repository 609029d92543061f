//! Size → tracking lookup for SF Pro text.
//!
//! Values are letter-spacing deltas in pixels, keyed by integer point size.
//! Sizes missing from the table get no adjustment; there is no interpolation.

/// `(font size, tracking in px)`, sorted by size.
pub static TRACKING_TABLE: &[(u32, f64)] = &[
    (6, 0.24),
    (7, 0.23),
    (8, 0.21),
    (9, 0.17),
    (10, 0.12),
    (11, 0.06),
    (12, 0.0),
    (13, -0.08),
    (14, -0.15),
    (15, -0.23),
    (16, -0.31),
    (17, -0.43),
    (18, -0.44),
    (19, -0.45),
    (20, -0.45),
    (21, -0.36),
    (22, -0.26),
    (23, -0.10),
    (24, 0.07),
    (25, 0.15),
    (26, 0.22),
    (27, 0.29),
    (28, 0.38),
    (29, 0.40),
    (30, 0.40),
    (31, 0.39),
    (32, 0.41),
    (33, 0.40),
    (34, 0.40),
    (35, 0.38),
    (36, 0.37),
    (37, 0.36),
    (38, 0.37),
    (39, 0.38),
    (40, 0.37),
    (41, 0.36),
    (42, 0.37),
    (43, 0.38),
    (44, 0.37),
    (45, 0.35),
    (46, 0.36),
    (47, 0.37),
    (48, 0.35),
    (49, 0.33),
    (50, 0.35),
    (51, 0.38),
    (52, 0.33),
    (53, 0.32),
    (54, 0.32),
    (56, 0.30),
    (58, 0.28),
    (60, 0.26),
    (62, 0.24),
    (64, 0.22),
    (66, 0.19),
    (68, 0.17),
    (70, 0.14),
    (72, 0.14),
    (76, 0.07),
    (80, 0.0),
    (88, 0.0),
    (96, 0.0),
];

/// Look up the tracking delta for an (already rounded) font size.
///
/// Exact match only: fractional, negative and non-finite sizes return `None`.
pub fn tracking_for(size: f64) -> Option<f64> {
    if !size.is_finite() || size < 0.0 || size.fract() != 0.0 || size > u32::MAX as f64 {
        return None;
    }
    let key = size as u32;
    TRACKING_TABLE
        .binary_search_by_key(&key, |&(s, _)| s)
        .ok()
        .map(|idx| TRACKING_TABLE[idx].1)
}
