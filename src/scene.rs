/// Retained scene: pen state plus an ordered shape list.
///
/// This is the headless implementation of [`Graphical`] — shapes are
/// recorded, never rasterized.  The CLI prints a summary of the shape
/// list; the interpreter tests inspect it directly.
use crate::graphics::{Argb, Graphical};

/// Default pen: black, 3 units wide, outline only, at the origin.
pub const DEFAULT_COLOR: Argb = [255, 0, 0, 0];
pub const DEFAULT_PEN_WIDTH: f32 = 3.0;

// ─── Shapes ───────────────────────────────────────────────────────────────────

/// One drawn shape, captured with the pen state at draw time.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Circle {
        x: i32,
        y: i32,
        radius: i32,
        color: Argb,
        width: f32,
        fill: bool,
    },
    Rect {
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        color: Argb,
        width: f32,
        fill: bool,
    },
    Line {
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: Argb,
        width: f32,
    },
}

impl Shape {
    /// One-line human-readable description, used by the CLI summary.
    pub fn describe(&self) -> String {
        match self {
            Shape::Circle { x, y, radius, .. } => {
                format!("circle r={radius} at ({x}, {y})")
            }
            Shape::Rect { x, y, w, h, .. } => {
                format!("rectangle {w}x{h} at ({x}, {y})")
            }
            Shape::Line { x1, y1, x2, y2, .. } => {
                format!("line ({x1}, {y1}) -> ({x2}, {y2})")
            }
        }
    }
}

// ─── Scene ────────────────────────────────────────────────────────────────────

pub struct Scene {
    color: Argb,
    pen_width: f32,
    fill: bool,
    coords: (i32, i32),
    shapes: Vec<Shape>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            color: DEFAULT_COLOR,
            pen_width: DEFAULT_PEN_WIDTH,
            fill: false,
            coords: (0, 0),
            shapes: Vec::new(),
        }
    }

    /// All shapes drawn so far, in draw order.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Graphical for Scene {
    fn set_color(&mut self, color: Argb) {
        self.color = color;
    }

    fn get_color(&self) -> Argb {
        self.color
    }

    fn circle(&mut self, x: i32, y: i32, radius: i32) {
        self.shapes.push(Shape::Circle {
            x,
            y,
            radius,
            color: self.color,
            width: self.pen_width,
            fill: self.fill,
        });
    }

    fn rectangle(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.shapes.push(Shape::Rect {
            x,
            y,
            w: width,
            h: height,
            color: self.color,
            width: self.pen_width,
            fill: self.fill,
        });
    }

    fn clear(&mut self) {
        self.shapes.clear();
    }

    fn get_fill(&self) -> bool {
        self.fill
    }

    fn set_fill(&mut self, fill: bool) {
        self.fill = fill;
    }

    fn get_coords(&self) -> (i32, i32) {
        self.coords
    }

    fn set_coords(&mut self, x: i32, y: i32) {
        self.coords = (x, y);
    }

    fn move_to(&mut self, x: i32, y: i32) {
        self.coords = (x, y);
    }

    fn draw_to(&mut self, x: i32, y: i32) {
        let (x1, y1) = self.coords;
        self.shapes.push(Shape::Line {
            x1,
            y1,
            x2: x,
            y2: y,
            color: self.color,
            width: self.pen_width,
        });
        self.move_to(x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_to_records_line_and_moves_cursor() {
        let mut scene = Scene::new();
        scene.set_coords(10, 20);
        scene.draw_to(30, 40);
        assert_eq!(scene.get_coords(), (30, 40));
        match &scene.shapes()[0] {
            Shape::Line { x1, y1, x2, y2, .. } => {
                assert_eq!((*x1, *y1, *x2, *y2), (10, 20, 30, 40));
            }
            other => panic!("expected line, got {other:?}"),
        }
    }

    #[test]
    fn shapes_capture_pen_state_at_draw_time() {
        let mut scene = Scene::new();
        scene.set_fill(true);
        scene.set_color([255, 255, 0, 0]);
        scene.circle(0, 0, 5);
        scene.set_fill(false);
        match &scene.shapes()[0] {
            Shape::Circle { color, fill, .. } => {
                assert_eq!(*color, [255, 255, 0, 0]);
                assert!(*fill);
            }
            other => panic!("expected circle, got {other:?}"),
        }
    }

    #[test]
    fn clear_empties_the_scene() {
        let mut scene = Scene::new();
        scene.circle(0, 0, 1);
        scene.rectangle(0, 0, 2, 2);
        scene.clear();
        assert!(scene.shapes().is_empty());
    }
}
