//! Leading emoji detection for heading text.
//!
//! A "glyph" here is one user-perceived emoji: a pictographic base
//! character plus any variation selectors, skin-tone modifiers, keycap
//! marks and ZWJ-joined pictographs that follow it.

const ZWJ: char = '\u{200D}';
const KEYCAP: char = '\u{20E3}';

/// Whether `c` is a non-ASCII pictographic character
pub fn is_pictographic(c: char) -> bool {
    matches!(c as u32,
        0x00A9 | 0x00AE | 0x203C | 0x2049 | 0x2122 | 0x2139 | 0x24C2
        | 0x2190..=0x21FF
        | 0x2300..=0x23FF
        | 0x25AA..=0x25FE
        | 0x2600..=0x27BF
        | 0x2934 | 0x2935
        | 0x2B00..=0x2BFF
        | 0x3030 | 0x303D | 0x3297 | 0x3299
        | 0x1F000..=0x1F1E5
        | 0x1F200..=0x1FAFF
    )
}

fn is_regional_indicator(c: char) -> bool {
    matches!(c as u32, 0x1F1E6..=0x1F1FF)
}

fn is_modifier(c: char) -> bool {
    matches!(c as u32, 0xFE0E | 0xFE0F | 0x1F3FB..=0x1F3FF | 0xE0020..=0xE007F) || c == KEYCAP
}

/// Split a single leading emoji glyph off `text`.
///
/// Returns `(emoji, rest)` where `rest` is untrimmed, or `None` when the
/// text does not start with a pictographic glyph.
pub fn split_leading_emoji(text: &str) -> Option<(&str, &str)> {
    let mut chars = text.char_indices().peekable();
    let (_, first) = chars.next()?;

    if is_regional_indicator(first) {
        // Flags are pairs of regional indicators
        let (idx, second) = chars.next()?;
        if !is_regional_indicator(second) {
            return None;
        }
        let end = idx + second.len_utf8();
        return Some((&text[..end], &text[end..]));
    }

    if !is_pictographic(first) {
        return None;
    }

    let mut end = first.len_utf8();
    while let Some(&(idx, c)) = chars.peek() {
        if is_modifier(c) {
            chars.next();
            end = idx + c.len_utf8();
        } else if c == ZWJ {
            chars.next();
            match chars.next() {
                Some((next_idx, next)) if is_pictographic(next) => {
                    end = next_idx + next.len_utf8();
                }
                _ => break,
            }
        } else {
            break;
        }
    }

    Some((&text[..end], &text[end..]))
}

/// Normalize an emoji for table lookup by dropping variation selectors
pub fn normalize(emoji: &str) -> String {
    emoji
        .chars()
        .filter(|c| !matches!(*c as u32, 0xFE0E | 0xFE0F))
        .collect()
}

/// Remove a leading emoji glyph and the whitespace after it
pub fn strip_leading_emoji(text: &str) -> &str {
    match split_leading_emoji(text) {
        Some((_, rest)) => rest.trim_start(),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_emoji() {
        assert_eq!(split_leading_emoji("🏠 Home"), Some(("🏠", " Home")));
        assert_eq!(split_leading_emoji("📚About"), Some(("📚", "About")));
    }

    #[test]
    fn test_variation_selector_is_part_of_glyph() {
        assert_eq!(
            split_leading_emoji("⚙️ Operations"),
            Some(("⚙️", " Operations"))
        );
        assert_eq!(normalize("⚙️"), "⚙");
    }

    #[test]
    fn test_zwj_sequence() {
        let family = "👨\u{200D}👩\u{200D}👧 Team";
        let (emoji, rest) = split_leading_emoji(family).unwrap();
        assert_eq!(emoji, "👨\u{200D}👩\u{200D}👧");
        assert_eq!(rest, " Team");
    }

    #[test]
    fn test_flag() {
        assert_eq!(
            split_leading_emoji("🇰🇷 Korea"),
            Some(("🇰🇷", " Korea"))
        );
    }

    #[test]
    fn test_no_emoji() {
        assert_eq!(split_leading_emoji("Home"), None);
        assert_eq!(split_leading_emoji("Überblick"), None);
        assert_eq!(split_leading_emoji(""), None);
        assert_eq!(strip_leading_emoji("Plain"), "Plain");
        assert_eq!(strip_leading_emoji("❓  FAQ"), "FAQ");
    }
}
