//! Text measurement for the builtin Helvetica faces.
//!
//! Only the PDF builtin fonts are used, so widths come from the usual
//! proportional-font heuristic (average advance ≈ 0.5 × font size, bold
//! ~10 % wider) rather than parsed glyph tables. Good enough for column
//! clipping and word wrap at catalog font sizes.

/// Width of `text` at `font_size`, in points.
pub fn measure(text: &str, font_size: f32, bold: bool) -> f32 {
    text.chars().count() as f32 * char_width(font_size, bold)
}

fn char_width(font_size: f32, bold: bool) -> f32 {
    let avg = if bold { 0.55 } else { 0.5 };
    font_size * avg
}

/// Word-wrap `text` to fit within `max_width` points. Never returns an
/// empty vec.
pub fn wrap(text: &str, font_size: f32, bold: bool, max_width: f32) -> Vec<String> {
    if max_width <= 0.0 || text.is_empty() {
        return vec![text.to_string()];
    }

    let mut lines: Vec<String> = Vec::new();
    for paragraph in text.split('\n') {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        if words.is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        for word in &words {
            let candidate = if current.is_empty() {
                (*word).to_string()
            } else {
                format!("{current} {word}")
            };
            if measure(&candidate, font_size, bold) > max_width && !current.is_empty() {
                lines.push(current);
                current = (*word).to_string();
            } else {
                current = candidate;
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Clip `text` to `max_width` points, appending an ellipsis when anything
/// was cut. Keeps table rows at their fixed height: a cell never wraps.
pub fn clip(text: &str, font_size: f32, bold: bool, max_width: f32) -> String {
    if measure(text, font_size, bold) <= max_width {
        return text.to_string();
    }

    let cw = char_width(font_size, bold);
    let mut out = String::new();
    let mut width = 0.0f32;
    for ch in text.chars() {
        if width + 2.0 * cw > max_width {
            break;
        }
        out.push(ch);
        width += cw;
    }
    out.push('…');
    out
}
