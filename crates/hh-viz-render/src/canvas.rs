use std::fmt::Write as FmtWrite;

use crate::primitives::{LineStyle, Style, TextStyle};
use crate::text::{TextMetrics, measure_text};

#[derive(Debug, Clone)]
enum Element {
    Rect { x: f64, y: f64, w: f64, h: f64, style: Style },
    Line { from: (f64, f64), to: (f64, f64), style: LineStyle },
    Text { at: (f64, f64), content: String, style: TextStyle, angle: Option<f64> },
}

/// Retained SVG canvas in points (1pt = 1/72"), painted in insertion order.
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    font_family: String,
    elements: Vec<Element>,
}

impl Canvas {
    pub fn new(width: f64, height: f64, font_family: &str) -> Self {
        Self { width, height, font_family: font_family.to_string(), elements: Vec::new() }
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, style: &Style) {
        self.elements.push(Element::Rect { x, y, w, h, style: *style });
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, style: &LineStyle) {
        self.elements.push(Element::Line { from: (x1, y1), to: (x2, y2), style: *style });
    }

    pub fn text(&mut self, x: f64, y: f64, content: &str, style: &TextStyle) {
        self.push_text(x, y, content, style, None);
    }

    /// Text rotated by `angle` degrees (clockwise) around its anchor point.
    pub fn text_rotated(&mut self, x: f64, y: f64, content: &str, style: &TextStyle, angle: f64) {
        self.push_text(x, y, content, style, Some(angle));
    }

    fn push_text(&mut self, x: f64, y: f64, content: &str, style: &TextStyle, angle: Option<f64>) {
        if content.is_empty() {
            return;
        }
        self.elements.push(Element::Text {
            at: (x, y),
            content: content.to_string(),
            style: *style,
            angle,
        });
    }

    /// Outline of an axis-aligned box drawn as four lines.
    pub fn frame(&mut self, x: f64, y: f64, w: f64, h: f64, style: &LineStyle) {
        let (x2, y2) = (x + w, y + h);
        let edges = [
            ((x, y), (x2, y)),
            ((x, y2), (x2, y2)),
            ((x, y), (x, y2)),
            ((x2, y), (x2, y2)),
        ];
        for (a, b) in edges {
            self.line(a.0, a.1, b.0, b.1, style);
        }
    }

    pub fn measure_text(&self, content: &str, style: &TextStyle) -> TextMetrics {
        measure_text(content, style)
    }

    pub fn finish_svg(&self) -> String {
        let mut out = String::with_capacity(256 + 160 * self.elements.len());
        let _ = writeln!(
            out,
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" "#,
                r#"width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            ),
            w = self.width,
            h = self.height,
        );
        let _ = writeln!(
            out,
            r#"<rect width="{}" height="{}" fill="white" />"#,
            self.width, self.height
        );
        for element in &self.elements {
            self.write_element(&mut out, element);
        }
        out.push_str("</svg>\n");
        out
    }

    fn write_element(&self, out: &mut String, element: &Element) {
        match element {
            Element::Rect { x, y, w, h, style } => {
                let _ = write!(
                    out,
                    r#"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}""#
                );
                match style.fill {
                    Some(fill) => {
                        let _ = write!(out, r#" fill="{}""#, fill.to_hex());
                    }
                    None => out.push_str(r#" fill="none""#),
                }
                if let Some((stroke, width)) = style.stroke {
                    let _ = write!(
                        out,
                        r#" stroke="{}" stroke-width="{width:.2}""#,
                        stroke.to_hex()
                    );
                }
                out.push_str(" />\n");
            }
            Element::Line { from, to, style } => {
                let _ = writeln!(
                    out,
                    concat!(
                        r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" "#,
                        r#"stroke="{}" stroke-width="{:.2}" />"#,
                    ),
                    from.0,
                    from.1,
                    to.0,
                    to.1,
                    style.color.to_hex(),
                    style.width,
                );
            }
            Element::Text { at: (x, y), content, style, angle } => {
                let _ = write!(out, r#"<text x="{x:.2}" y="{y:.2}" font-family=""#);
                push_escaped(out, &self.font_family);
                let _ = write!(
                    out,
                    r#"" font-size="{:.1}" fill="{}" text-anchor="{}" dominant-baseline="{}""#,
                    style.size,
                    style.color.to_hex(),
                    style.anchor.svg_value(),
                    style.baseline.svg_value(),
                );
                if style.bold {
                    out.push_str(r#" font-weight="bold""#);
                }
                if style.italic {
                    out.push_str(r#" font-style="italic""#);
                }
                if let Some(angle) = angle {
                    let _ = write!(out, r#" transform="rotate({angle:.1},{x:.2},{y:.2})""#);
                }
                out.push('>');
                push_escaped(out, content);
                out.push_str("</text>\n");
            }
        }
    }
}

fn push_escaped(out: &mut String, content: &str) {
    for ch in content.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}
