//! Greedy line breaker.
//!
//! Packs as many space-separated tokens onto a line as fit `max_width`, never
//! looking ahead. Explicit newlines in the input always start a new line. A
//! token wider than the line is never split; it is placed alone on its own line.

use crate::layout::font_metrics::FontHandle;

/// Wraps `text` into lines no wider than `max_width` (except single over-wide tokens).
///
/// `measure` returns the rendered width of a string at a font size and weight,
/// normally [`crate::layout::font_metrics::measure_text`].
///
/// An empty input yields exactly one empty line.
pub fn wrap_text<M>(
    text: &str,
    max_width: f32,
    font_size: f32,
    font: FontHandle,
    measure: M,
) -> Vec<String>
where
    M: Fn(&str, f32, FontHandle) -> f32,
{
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for (token, hard_break) in tokens(&normalized) {
        let candidate = if current.is_empty() {
            token.to_string()
        } else {
            format!("{current} {token}")
        };

        if !current.is_empty() && measure(&candidate, font_size, font) > max_width {
            lines.push(std::mem::replace(&mut current, token.to_string()));
        } else {
            current = candidate;
        }

        if hard_break {
            lines.push(std::mem::take(&mut current));
        }
    }
    lines.push(current);

    lines
}

/// Splits on spaces and newlines. The flag is true when the token is followed by a newline.
fn tokens(text: &str) -> impl Iterator<Item = (&str, bool)> {
    text.split(' ').flat_map(|word| {
        let mut parts = word.split('\n').peekable();
        std::iter::from_fn(move || {
            let part = parts.next()?;
            Some((part, parts.peek().is_some()))
        })
    })
}
