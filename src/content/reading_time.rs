//! Reading-time estimation

/// Assumed reading speed used unless the site config overrides it
pub const DEFAULT_WORDS_PER_MINUTE: u32 = 200;

/// Estimate minutes needed to read `text`, rounded up.
///
/// Never returns less than 1, including for empty input.
pub fn reading_time(text: &str, words_per_minute: u32) -> u32 {
    let words = text.split_whitespace().count() as u64;
    let wpm = u64::from(words_per_minute.max(1));
    let minutes = words.div_ceil(wpm);
    minutes.clamp(1, u64::from(u32::MAX)) as u32
}
