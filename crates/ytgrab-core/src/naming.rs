//! Filename derivation from video titles.
//!
//! Titles regularly carry characters that are not allowed (or not wanted) in
//! filenames; stripping them can leave doubled spaces, which are collapsed.

/// Characters stripped from titles before use as filenames.
const DISALLOWED: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Linux NAME_MAX.
const NAME_MAX: usize = 255;

/// Fallback when sanitization leaves nothing usable.
const DEFAULT_STEM: &str = "video";

/// Sanitizes a video title into a filename stem.
///
/// - Drops `< > : " / \ | ? *` and control characters
/// - Collapses runs of whitespace left behind into a single space
/// - Trims leading/trailing spaces and dots
/// - Caps the result at 255 bytes on a char boundary
pub fn sanitize_title(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut prev_space = false;

    for c in title.chars() {
        if DISALLOWED.contains(&c) || c.is_control() {
            continue;
        }
        if c == ' ' || c == '\t' {
            if !prev_space {
                out.push(' ');
            }
            prev_space = true;
        } else {
            out.push(c);
            prev_space = false;
        }
    }

    let trimmed = out.trim_matches(|c| c == ' ' || c == '.');
    if trimmed.is_empty() {
        return DEFAULT_STEM.to_string();
    }

    if trimmed.len() > NAME_MAX {
        let mut take = NAME_MAX;
        while take > 0 && !trimmed.is_char_boundary(take) {
            take -= 1;
        }
        trimmed[..take].to_string()
    } else {
        trimmed.to_string()
    }
}
