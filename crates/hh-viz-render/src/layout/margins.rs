/// Space reserved around the plot area, in points.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Margins {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

/// Smallest plot side kept when margins exceed the canvas.
pub const MIN_PLOT_SIDE: f64 = 50.0;

/// Rectangle the cells are drawn into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    /// Canvas minus `margins`, clamped to [`MIN_PLOT_SIDE`].
    pub fn within(canvas_w: f64, canvas_h: f64, margins: &Margins) -> Self {
        Self {
            left: margins.left,
            top: margins.top,
            width: (canvas_w - margins.left - margins.right).max(MIN_PLOT_SIDE),
            height: (canvas_h - margins.top - margins.bottom).max(MIN_PLOT_SIDE),
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.top + self.height / 2.0
    }
}
