//! Line splitting, bullet classification and pixel-measured wrapping.

use std::ops::Range;

use crate::text::sanitize::retain_allowed;

/// Leading markers that turn a line into a bulleted line.
///
/// `-` and `*` only count when followed by whitespace or the end of the line, so ordinary
/// hyphenated or starred text is left alone.
pub const BULLET_MARKERS: &[char] = &['√', '✓', '✔', '•', '·', '▪', '●', '-', '*'];

const SPACED_MARKERS: &[char] = &['-', '*'];

/// Pixel budgets for plain and bulleted lines.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WrapWidths {
    pub plain: f32,
    pub bulleted: f32,
}

impl WrapWidths {
    pub fn for_line(&self, bulleted: bool) -> f32 {
        if bulleted { self.bulleted } else { self.plain }
    }
}

/// One logical line of poster text.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct TextLine {
    /// The trimmed input line.
    pub raw: String,
    pub is_bulleted: bool,
    /// `raw` without its marker, sanitized and trimmed.
    pub content: String,
    /// Byte ranges into `content`; concatenated in order they reproduce `content`.
    pub segments: Vec<Range<usize>>,
}

impl TextLine {
    /// Classify and clean one raw line. The line is not wrapped yet.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let (is_bulleted, rest) = strip_marker(raw);
        let content = retain_allowed(rest).trim().to_owned();
        Self {
            raw: raw.to_owned(),
            is_bulleted,
            content,
            segments: Vec::new(),
        }
    }

    /// Wrap `content` so no segment measures wider than `max_width`.
    pub fn wrap(&mut self, max_width: f32, measure: impl FnMut(&str) -> f32) {
        self.segments = wrap_segments(&self.content, max_width, measure);
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> + '_ {
        self.segments.iter().map(|r| &self.content[r.clone()])
    }
}

fn strip_marker(line: &str) -> (bool, &str) {
    let mut chars = line.chars();
    let Some(first) = chars.next() else {
        return (false, line);
    };
    if !BULLET_MARKERS.contains(&first) {
        return (false, line);
    }
    let rest = chars.as_str();
    if SPACED_MARKERS.contains(&first) && !rest.is_empty() && !rest.starts_with(char::is_whitespace)
    {
        return (false, line);
    }
    (true, rest)
}

/// Greedy word wrap over whitespace-delimited tokens.
///
/// A token is a run of non-whitespace characters plus the whitespace that follows it; breaks
/// only happen between tokens, so no token is ever split. Each candidate segment is measured
/// without its trailing whitespace. A token that is wider than `max_width` on its own becomes
/// a single overlong segment. Empty content yields one empty segment so the line still
/// occupies a line box.
pub fn wrap_segments(
    content: &str,
    max_width: f32,
    mut measure: impl FnMut(&str) -> f32,
) -> Vec<Range<usize>> {
    if content.is_empty() {
        return vec![0..0];
    }

    let mut out = Vec::new();
    let mut start = 0usize;
    for token in tokens(content) {
        if token.start == start {
            continue;
        }
        if measure(content[start..token.end].trim_end()) > max_width {
            out.push(start..token.start);
            start = token.start;
        }
    }
    out.push(start..content.len());
    out
}

/// Byte ranges of `word + trailing whitespace` tokens. Leading whitespace joins the first token.
fn tokens(s: &str) -> Vec<Range<usize>> {
    let mut out = Vec::new();
    let mut start = 0usize;
    let mut in_space = false;
    let mut seen_word = false;
    for (i, c) in s.char_indices() {
        if c.is_whitespace() {
            in_space = true;
        } else {
            if in_space && seen_word {
                out.push(start..i);
                start = i;
            }
            in_space = false;
            seen_word = true;
        }
    }
    if start < s.len() {
        out.push(start..s.len());
    }
    out
}

/// Split on line boundaries, dropping blank lines and lines that contain a suppressed keyword.
pub fn split_lines<'a>(text: &'a str, suppressed: &[String]) -> Vec<&'a str> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .filter(|l| !suppressed.iter().any(|k| l.contains(k.as_str())))
        .collect()
}

/// Full text pipeline: split, classify, sanitize and wrap every surviving line.
pub fn reflow(
    text: &str,
    suppressed: &[String],
    widths: WrapWidths,
    mut measure: impl FnMut(&str) -> f32,
) -> Vec<TextLine> {
    split_lines(text, suppressed)
        .into_iter()
        .map(|raw| {
            let mut line = TextLine::parse(raw);
            line.wrap(widths.for_line(line.is_bulleted), &mut measure);
            line
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/text/reflow.rs"]
mod tests;
