use crate::color::Color;

const BLACK: Color = Color::rgb(0, 0, 0);

/// Fill and outline of a rectangle. `None` leaves that part unpainted.
#[derive(Debug, Clone, Copy, Default)]
pub struct Style {
    pub fill: Option<Color>,
    pub stroke: Option<(Color, f64)>,
}

impl Style {
    pub fn fill(color: Color) -> Self {
        Self { fill: Some(color), stroke: None }
    }

    pub fn outline(color: Color, width: f64) -> Self {
        Self { fill: None, stroke: Some((color, width)) }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LineStyle {
    pub color: Color,
    pub width: f64,
}

impl LineStyle {
    pub fn new(color: Color, width: f64) -> Self {
        Self { color, width }
    }

    pub fn black(width: f64) -> Self {
        Self::new(BLACK, width)
    }
}

/// Horizontal alignment relative to the text anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    #[default]
    Start,
    Middle,
    End,
}

/// Vertical alignment relative to the text anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Baseline {
    #[default]
    Alphabetic,
    Central,
    Hanging,
}

impl Anchor {
    pub fn svg_value(self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

impl Baseline {
    pub fn svg_value(self) -> &'static str {
        match self {
            Baseline::Alphabetic => "auto",
            Baseline::Central => "central",
            Baseline::Hanging => "hanging",
        }
    }
}

/// Text appearance; start from [`TextStyle::new`] and chain modifiers.
#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    pub size: f64,
    pub color: Color,
    pub bold: bool,
    pub italic: bool,
    pub anchor: Anchor,
    pub baseline: Baseline,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new(10.0)
    }
}

impl TextStyle {
    pub fn new(size: f64) -> Self {
        Self {
            size,
            color: BLACK,
            bold: false,
            italic: false,
            anchor: Anchor::Start,
            baseline: Baseline::Alphabetic,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn baseline(mut self, baseline: Baseline) -> Self {
        self.baseline = baseline;
        self
    }

    /// Centred on the anchor point in both directions.
    pub fn centered(self) -> Self {
        self.anchor(Anchor::Middle).baseline(Baseline::Central)
    }
}
