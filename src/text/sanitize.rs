//! Allow-list plain-text filter.
//!
//! Each character is classified once against a fixed allowed set and everything else is
//! dropped. Markdown markup, emoji and decorative symbols never reach the poster.

const PUNCTUATION: &[char] = &[
    '.', ',', ';', ':', '!', '?', '\'', '"', '(', ')', '-', '/', '&', '%', '+', '@', '~',
];

const CURRENCY: &[char] = &['£', '$', '€', '¥'];

/// `true` when `c` may appear in rendered poster text.
pub fn is_allowed(c: char) -> bool {
    c.is_alphanumeric()
        || c == ' '
        || c == '\t'
        || PUNCTUATION.contains(&c)
        || CURRENCY.contains(&c)
        || is_cjk_punctuation(c)
}

fn is_cjk_punctuation(c: char) -> bool {
    matches!(c,
        // CJK symbols and punctuation: 、。「」『』【】 and friends.
        '\u{3001}'..='\u{303F}'
        // Fullwidth ASCII punctuation: ！，：；？（）
        | '\u{FF01}'..='\u{FF0F}'
        | '\u{FF1A}'..='\u{FF20}'
        | '\u{FF3B}'..='\u{FF40}'
        | '\u{FF5B}'..='\u{FF65}'
        | '\u{2018}'..='\u{201D}'
        | '\u{2026}'
    )
}

/// Keep only allowed characters, in order.
pub fn retain_allowed(s: &str) -> String {
    s.chars().filter(|c| is_allowed(*c)).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/text/sanitize.rs"]
mod tests;
