/// Rendering capability consumed by the interpreter.
///
/// The interpreter never touches pixels or widgets; every visible effect
/// goes through this trait.  [`crate::scene::Scene`] is the retained-shape
/// implementation used by the CLI and the tests; a windowing shell would
/// provide its own implementation and marshal calls onto its UI thread.

/// ARGB color, one byte per channel: `[alpha, red, green, blue]`.
pub type Argb = [u8; 4];

pub trait Graphical {
    /// Sets the current drawing color.
    fn set_color(&mut self, color: Argb);

    /// Returns the current drawing color.
    fn get_color(&self) -> Argb;

    /// Draws a circle centered at `(x, y)` with the given radius.
    fn circle(&mut self, x: i32, y: i32, radius: i32);

    /// Draws a rectangle with `(x, y)` as its corner.
    fn rectangle(&mut self, x: i32, y: i32, width: i32, height: i32);

    /// Removes every previously drawn shape.
    fn clear(&mut self);

    /// Returns whether subsequent shapes are filled.
    fn get_fill(&self) -> bool;

    /// Sets whether subsequent shapes are filled.
    fn set_fill(&mut self, fill: bool);

    /// Returns the current cursor position.
    fn get_coords(&self) -> (i32, i32);

    /// Moves the cursor without drawing.
    fn set_coords(&mut self, x: i32, y: i32);

    /// Moves the cursor without drawing (alias used by positioning paths).
    fn move_to(&mut self, x: i32, y: i32);

    /// Draws a line from the current cursor to `(x, y)` and moves the
    /// cursor there.
    fn draw_to(&mut self, x: i32, y: i32);
}
