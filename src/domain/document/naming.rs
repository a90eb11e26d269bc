//! File naming for chunk artifacts and final segments.
//!
//! Both use `<document>_<n>_of_<total>.mp3` with `n` and `total` zero-padded to the
//! number of digits in `total`, so names sort lexicographically in index order.

pub const AUDIO_EXTENSION: &str = "mp3";

/// Digits needed to print `total`.
pub fn padding_width(total: usize) -> usize {
    total.max(1).to_string().len()
}

/// Name of the `index`-th (0-based) part out of `total`.
pub fn part_file_name(document: &str, index: usize, total: usize) -> String {
    let width = padding_width(total);
    format!(
        "{doc}_{n:0width$}_of_{total:0width$}.{ext}",
        doc = document,
        n = index + 1,
        total = total,
        width = width,
        ext = AUDIO_EXTENSION
    )
}

/// Provisional name of a merged segment while the segment count is still unknown.
pub fn provisional_segment_name(document: &str, index: usize) -> String {
    format!("{}_merged_part{}.{}", document, index + 1, AUDIO_EXTENSION)
}
