//! Binary script classification: Korean (Hangul) or not.

/// Hangul jamo and syllable blocks.
const HANGUL_RANGES: &[(u32, u32)] = &[
    (0x1100, 0x11FF), // Hangul Jamo
    (0x3131, 0x318E), // Hangul Compatibility Jamo
    (0xA960, 0xA97F), // Hangul Jamo Extended-A
    (0xAC00, 0xD7A3), // Hangul Syllables
    (0xD7B0, 0xD7FF), // Hangul Jamo Extended-B
];

/// Returns `true` if `c` is a Hangul jamo or syllable.
pub fn is_korean(c: char) -> bool {
    let cp = c as u32;
    HANGUL_RANGES
        .iter()
        .any(|&(start, end)| cp >= start && cp <= end)
}
