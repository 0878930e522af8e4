use crate::primitives::TextStyle;

#[derive(Debug, Clone, Copy)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub ascent: f64,
}

/// Per-character advance in em units for a generic sans-serif face.
fn advance_em(ch: char) -> f64 {
    match ch {
        'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '!' | '|' => 0.28,
        ' ' | 'f' | 't' | 'r' | '(' | ')' | '[' | ']' | '-' => 0.36,
        'm' | 'w' | 'M' | 'W' => 0.86,
        '0'..='9' => 0.56,
        c if c.is_ascii_uppercase() => 0.68,
        _ => 0.55,
    }
}

/// Estimate text extent in points without loading font outlines.
pub fn measure_text(text: &str, style: &TextStyle) -> TextMetrics {
    let bold = if style.bold { 1.07 } else { 1.0 };
    let em: f64 = text.chars().map(advance_em).sum();
    let ascent = style.size * 0.76;
    TextMetrics { width: em * style.size * bold, height: style.size * 1.2, ascent }
}
