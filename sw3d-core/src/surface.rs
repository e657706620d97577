/// The immediate-mode 2D drawing surface the renderer emits to
use crate::affine::Affine2D;
use crate::geometry::Rgba;

/// A 2D canvas-like target.
///
/// Paths are built with `new_path`/`move_to`/`line_to`/curves and then
/// filled or stroked with the current paint. `store`/`restore` save and
/// reload paint, transform and clip state. Coordinates are surface units
/// with y pointing down.
pub trait Surface {
    /// Opaque handle for images drawn with `draw_image`
    type Image;

    fn new_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn quadratic_curve_to(&mut self, cx: f64, cy: f64, x: f64, y: f64);
    fn bezier_curve_to(&mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64);
    fn close_path(&mut self);

    fn fill_color(&mut self, color: Rgba);
    fn stroke_color(&mut self, color: Rgba);
    fn fill(&mut self);
    fn stroke(&mut self);

    fn store(&mut self);
    fn restore(&mut self);

    /// Restricts further drawing to the current path
    fn clip(&mut self);

    /// Multiplies the current transform by `transform` (applied first)
    fn transform(&mut self, transform: Affine2D);

    /// Draws `image` with its pixel coordinates mapped through the current
    /// transform and clipped to the current clip region
    fn draw_image(&mut self, image: &Self::Image);
}

/// A recorded surface call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand<I> {
    NewPath,
    Move(f64, f64),
    Line(f64, f64),
    QuadraticCurve(f64, f64, f64, f64),
    BezierCurve(f64, f64, f64, f64, f64, f64),
    ClosePath,
    FillColor(Rgba),
    StrokeColor(Rgba),
    Fill,
    Stroke,
    Store,
    Restore,
    Clip,
    Transform(Affine2D),
    DrawImage(I),
}

/// A surface that records every call as a `DrawCommand`, for display lists
/// and tests
#[derive(Debug, Clone)]
pub struct CommandRecorder<I> {
    commands: Vec<DrawCommand<I>>,
}

impl<I> CommandRecorder<I> {
    pub fn new() -> Self {
        Self { commands: Vec::new() }
    }

    pub fn commands(&self) -> &[DrawCommand<I>] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand<I>> {
        std::mem::take(&mut self.commands)
    }

    /// Replays the recorded commands onto another surface
    pub fn replay<S>(&self, target: &mut S)
    where
        S: Surface<Image = I>,
    {
        for command in &self.commands {
            match command {
                DrawCommand::NewPath => target.new_path(),
                DrawCommand::Move(x, y) => target.move_to(*x, *y),
                DrawCommand::Line(x, y) => target.line_to(*x, *y),
                DrawCommand::QuadraticCurve(cx, cy, x, y) => {
                    target.quadratic_curve_to(*cx, *cy, *x, *y)
                }
                DrawCommand::BezierCurve(c1x, c1y, c2x, c2y, x, y) => {
                    target.bezier_curve_to(*c1x, *c1y, *c2x, *c2y, *x, *y)
                }
                DrawCommand::ClosePath => target.close_path(),
                DrawCommand::FillColor(color) => target.fill_color(*color),
                DrawCommand::StrokeColor(color) => target.stroke_color(*color),
                DrawCommand::Fill => target.fill(),
                DrawCommand::Stroke => target.stroke(),
                DrawCommand::Store => target.store(),
                DrawCommand::Restore => target.restore(),
                DrawCommand::Clip => target.clip(),
                DrawCommand::Transform(transform) => target.transform(*transform),
                DrawCommand::DrawImage(image) => target.draw_image(image),
            }
        }
    }
}

impl<I> Default for CommandRecorder<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Clone> Surface for CommandRecorder<I> {
    type Image = I;

    fn new_path(&mut self) {
        self.commands.push(DrawCommand::NewPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::Move(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::Line(x, y));
    }

    fn close_path(&mut self) {
        self.commands.push(DrawCommand::ClosePath);
    }

    fn quadratic_curve_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) {
        self.commands.push(DrawCommand::QuadraticCurve(cx, cy, x, y));
    }

    fn bezier_curve_to(&mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64) {
        self.commands.push(DrawCommand::BezierCurve(c1x, c1y, c2x, c2y, x, y));
    }

    fn fill_color(&mut self, color: Rgba) {
        self.commands.push(DrawCommand::FillColor(color));
    }

    fn stroke_color(&mut self, color: Rgba) {
        self.commands.push(DrawCommand::StrokeColor(color));
    }

    fn fill(&mut self) {
        self.commands.push(DrawCommand::Fill);
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
    }

    fn store(&mut self) {
        self.commands.push(DrawCommand::Store);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
    }

    fn clip(&mut self) {
        self.commands.push(DrawCommand::Clip);
    }

    fn transform(&mut self, transform: Affine2D) {
        self.commands.push(DrawCommand::Transform(transform));
    }

    fn draw_image(&mut self, image: &I) {
        self.commands.push(DrawCommand::DrawImage(image.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_replays_in_order() {
        let mut recorder = CommandRecorder::<&str>::new();
        recorder.new_path();
        recorder.move_to(1.0, 2.0);
        recorder.quadratic_curve_to(3.0, 4.0, 5.0, 6.0);
        recorder.fill_color(Rgba::WHITE);
        recorder.fill();
        recorder.draw_image(&"brick");

        let mut copy = CommandRecorder::<&str>::new();
        recorder.replay(&mut copy);
        assert_eq!(copy.commands(), recorder.commands());
        assert_eq!(copy.take_commands().len(), 6);
        assert!(copy.commands().is_empty());
    }
}
