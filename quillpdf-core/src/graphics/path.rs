use crate::geometry::Rectangle;
use crate::graphics::{Color, Graphic};

#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(u8)]
pub enum LineCap {
    Butt = 0,
    Round = 1,
    Square = 2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(u8)]
pub enum LineJoin {
    Miter = 0,
    Round = 1,
    Bevel = 2,
}

/// Dash pattern applied when stroking (`d` operator).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashPattern {
    pub dash: i32,
    pub gap: i32,
    pub phase: i32,
}

impl DashPattern {
    pub fn new(dash: i32, gap: i32, phase: i32) -> Self {
        Self { dash, gap, phase }
    }

    fn operator(&self) -> String {
        if self.dash == self.gap {
            format!("[{}] {} d", self.dash, self.phase)
        } else {
            format!("[{} {}] {} d", self.dash, self.gap, self.phase)
        }
    }
}

/// A stroked polyline. Coordinates are offsets from the top-left corner of
/// the page's crop box, with y growing downwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    start: (i32, i32),
    points: Vec<(i32, i32)>,
    width: i32,
    color: Option<Color>,
    dash: Option<DashPattern>,
    cap: Option<LineCap>,
    join: Option<LineJoin>,
}

impl Line {
    pub fn new(start_x: i32, start_y: i32, end_x: i32, end_y: i32, width: i32) -> Self {
        Self {
            start: (start_x, start_y),
            points: vec![(end_x, end_y)],
            width,
            color: None,
            dash: None,
            cap: None,
            join: None,
        }
    }

    /// Continues the line to another point.
    pub fn line_to(mut self, x: i32, y: i32) -> Self {
        self.points.push((x, y));
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn dash_pattern(mut self, dash: i32, gap: i32, phase: i32) -> Self {
        self.dash = Some(DashPattern::new(dash, gap, phase));
        self
    }

    pub fn cap(mut self, cap: LineCap) -> Self {
        self.cap = Some(cap);
        self
    }

    pub fn join(mut self, join: LineJoin) -> Self {
        self.join = Some(join);
        self
    }
}

impl Graphic for Line {
    fn render(&self, frame: &Rectangle) -> String {
        let mut ops = vec![
            "q".to_string(),
            format!(
                "{} {} m",
                frame.left() + self.start.0,
                frame.top() - self.start.1
            ),
        ];
        for (x, y) in &self.points {
            ops.push(format!("{} {} l", frame.left() + x, frame.top() - y));
        }
        ops.push(format!("{} w", self.width));
        if let Some(color) = self.color {
            ops.push(color.stroke_operator());
        }
        if let Some(dash) = self.dash {
            ops.push(dash.operator());
        }
        if let Some(cap) = self.cap {
            ops.push(format!("{} J", cap as u8));
        }
        if let Some(join) = self.join {
            ops.push(format!("{} j", join as u8));
        }
        ops.push("S Q\n".to_string());
        ops.join(" ")
    }
}

/// An axis-aligned rectangle, stroked and/or filled depending on which
/// colors are set. Positioned like [`Line`], from the crop box's top-left.
#[derive(Debug, Clone, PartialEq)]
pub struct RectangleShape {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    stroke: Option<Color>,
    fill: Option<Color>,
}

impl RectangleShape {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            stroke: None,
            fill: None,
        }
    }

    pub fn stroke_color(mut self, color: Color) -> Self {
        self.stroke = Some(color);
        self
    }

    pub fn fill_color(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }

    fn paint_operator(&self) -> &'static str {
        match (self.stroke.is_some(), self.fill.is_some()) {
            (true, true) => "B",
            (true, false) => "S",
            (false, true) => "f",
            (false, false) => "n",
        }
    }
}

impl Graphic for RectangleShape {
    fn render(&self, frame: &Rectangle) -> String {
        let mut ops = vec!["q".to_string()];
        if let Some(stroke) = self.stroke {
            ops.push(stroke.stroke_operator());
        }
        if let Some(fill) = self.fill {
            ops.push(fill.fill_operator());
        }
        ops.push(format!(
            "{} {} {} {} re",
            frame.left() + self.x,
            frame.top() - self.y - self.height,
            self.width,
            self.height
        ));
        ops.push(format!("{} Q\n", self.paint_operator()));
        ops.join(" ")
    }
}
