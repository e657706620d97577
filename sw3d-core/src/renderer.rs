/// Buffered painter's-algorithm renderer for shapes, and direct path drawing
use log::{debug, warn};
use std::rc::Rc;

use crate::affine::{Affine2D, AffineMatrix};
use crate::config::RenderConfig;
use crate::geometry::{Rgba, Shape, TextureInfo};
use crate::path::{Curve, Path};
use crate::projection::{Camera, Viewport};
use crate::surface::Surface;
use crate::transform::Transform;
use crate::vector::{push_apart, unit, Vec2, Vec3};

/// Faces whose camera-space centroid has `z` at or above this are dropped
pub const NEAR_CULL_Z: f64 = -1.0;

/// How far each projected corner is pushed along its edges when overdraw
/// is enabled, in surface units
pub const OVERDRAW_DISTANCE: f64 = 1.0;

/// What a per-face callback wants done with the face it was shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceAction {
    Buffer,
    Skip,
}

/// Paint applied to faces as they are buffered.
///
/// Each buffered face keeps its own copy, so changing the state afterwards
/// only affects faces buffered later. Textures are shared and immutable.
pub struct RenderState<I> {
    pub fill_rgba: Option<Rgba>,
    pub stroke_rgba: Option<Rgba>,
    pub normal1_rgba: Option<Rgba>,
    pub normal2_rgba: Option<Rgba>,
    pub texture: Option<Rc<TextureInfo<I>>>,
    pub draw_overdraw: bool,
}

impl<I> Clone for RenderState<I> {
    fn clone(&self) -> Self {
        Self {
            fill_rgba: self.fill_rgba,
            stroke_rgba: self.stroke_rgba,
            normal1_rgba: self.normal1_rgba,
            normal2_rgba: self.normal2_rgba,
            texture: self.texture.clone(),
            draw_overdraw: self.draw_overdraw,
        }
    }
}

impl<I> Default for RenderState<I> {
    fn default() -> Self {
        let config = RenderConfig::default();
        Self {
            fill_rgba: config.fill_rgba,
            stroke_rgba: config.stroke_rgba,
            normal1_rgba: config.normal1_rgba,
            normal2_rgba: config.normal2_rgba,
            texture: None,
            draw_overdraw: config.draw_overdraw,
        }
    }
}

/// One face waiting in the draw buffer, in camera space
pub struct DrawRecord<I> {
    vertices: [Vec3; 4],
    corner_count: usize,
    pub centroid: Vec3,
    pub normal1: Vec3,
    pub normal2: Vec3,
    pub intensity: f64,
    pub state: RenderState<I>,
}

impl<I> DrawRecord<I> {
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices[..self.corner_count]
    }
}

/// Options for `Renderer::draw_path`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PathOptions {
    /// Fill the path instead of stroking it
    pub fill: bool,
}

/// Per-frame rendering state plus the pending draw buffer.
///
/// `I` is the surface's image handle type, used for textured faces.
pub struct Renderer<I = ()> {
    pub camera: Camera,
    /// Object-to-world transform applied to everything buffered or drawn
    pub transform: Transform,
    pub state: RenderState<I>,
    pub draw_backfaces: bool,
    pub perform_z_sorting: bool,
    viewport: Viewport,
    transform_stack: Vec<Transform>,
    buffer: Vec<DrawRecord<I>>,
}

impl<I> Renderer<I> {
    /// A renderer for a surface of the given size in surface units
    pub fn new(width: f64, height: f64) -> Self {
        let config = RenderConfig::default();
        Self {
            camera: Camera::new(config.focal_length),
            transform: Transform::new(),
            state: RenderState::default(),
            draw_backfaces: config.draw_backfaces,
            perform_z_sorting: config.perform_z_sorting,
            viewport: Viewport::new(width, height),
            transform_stack: Vec::new(),
            buffer: Vec::new(),
        }
    }

    pub fn from_config(width: f64, height: f64, config: &RenderConfig) -> Self {
        let mut renderer = Self::new(width, height);
        renderer.apply_config(config);
        renderer
    }

    pub fn apply_config(&mut self, config: &RenderConfig) {
        self.camera.focal_length = config.focal_length;
        self.draw_backfaces = config.draw_backfaces;
        self.perform_z_sorting = config.perform_z_sorting;
        self.state.draw_overdraw = config.draw_overdraw;
        self.state.fill_rgba = config.fill_rgba;
        self.state.stroke_rgba = config.stroke_rgba;
        self.state.normal1_rgba = config.normal1_rgba;
        self.state.normal2_rgba = config.normal2_rgba;
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Saves a copy of the current object transform
    pub fn push_transform(&mut self) {
        self.transform_stack.push(self.transform);
    }

    /// Restores the most recently pushed transform and returns the one it
    /// replaced. Popping an empty stack leaves the transform alone.
    pub fn pop_transform(&mut self) -> Option<Transform> {
        match self.transform_stack.pop() {
            Some(saved) => Some(std::mem::replace(&mut self.transform, saved)),
            None => {
                warn!("pop_transform called with an empty transform stack");
                None
            }
        }
    }

    /// Object space to camera space
    pub fn combined_matrix(&self) -> AffineMatrix {
        self.camera.transform.matrix() * self.transform.matrix()
    }

    pub fn buffered(&self) -> &[DrawRecord<I>] {
        &self.buffer
    }

    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    pub fn empty_buffer(&mut self) {
        self.buffer.clear();
    }

    /// Culls and buffers every face of `shape`; returns how many were kept
    pub fn buffer_shape(&mut self, shape: &Shape) -> usize {
        self.buffer_shape_with(shape, |_, _, _| FaceAction::Buffer)
    }

    /// As `buffer_shape`, calling `on_face` with the render state, shape
    /// and face index before each face. The callback may change the state
    /// the face is buffered with, or skip the face.
    pub fn buffer_shape_with<F>(&mut self, shape: &Shape, mut on_face: F) -> usize
    where
        F: FnMut(&mut RenderState<I>, &Shape, usize) -> FaceAction,
    {
        let combined = self.combined_matrix();
        let adjoint = combined.trans_adjoint();

        let mut centroid = Vec3::zeros();
        let (mut skipped, mut near, mut backfacing, mut buffered) = (0, 0, 0, 0);

        for (index, face) in shape.faces().iter().enumerate() {
            if on_face(&mut self.state, shape, index) == FaceAction::Skip {
                skipped += 1;
                continue;
            }

            let meta = shape.face_meta(index);
            combined.transform_point_to(&meta.centroid, &mut centroid);
            if centroid.z >= NEAR_CULL_Z {
                near += 1;
                continue;
            }

            let normal1 = unit(&adjoint.transform_point(&meta.normal1));
            let normal2 = adjoint.transform_point(&meta.normal2);

            if !self.draw_backfaces
                && centroid.dot(&normal1) > 0.0
                && centroid.dot(&normal2) > 0.0
            {
                backfacing += 1;
                continue;
            }

            // Dot product with the (0, 0, 1) light direction
            let intensity = normal1.z.max(0.0);

            let mut vertices = [Vec3::zeros(); 4];
            for (slot, vertex_index) in vertices.iter_mut().zip(face.indices()) {
                combined.transform_point_to(&shape.vertices()[vertex_index], slot);
            }

            self.buffer.push(DrawRecord {
                vertices,
                corner_count: face.corner_count(),
                centroid,
                normal1,
                normal2,
                intensity,
                state: self.state.clone(),
            });
            buffered += 1;
        }

        debug!(
            "buffered {} of {} faces ({} skipped, {} near, {} backfacing)",
            buffered,
            shape.faces().len(),
            skipped,
            near,
            backfacing
        );
        buffered
    }

    /// Draws and empties the buffer, farthest faces first when z-sorting is
    /// on. Returns the number of faces drawn.
    pub fn draw_buffer<S>(&mut self, surface: &mut S) -> usize
    where
        S: Surface<Image = I>,
    {
        if self.perform_z_sorting {
            self.buffer.sort_by(|a, b| a.centroid.z.total_cmp(&b.centroid.z));
        }

        let records = std::mem::take(&mut self.buffer);
        for record in &records {
            self.draw_record(surface, record);
        }

        debug!("drew {} buffered faces", records.len());
        records.len()
    }

    fn draw_record<S>(&self, surface: &mut S, record: &DrawRecord<I>)
    where
        S: Surface<Image = I>,
    {
        let count = record.corner_count;
        let mut screen = [Vec2::zeros(); 4];
        for (projected, vertex) in screen.iter_mut().zip(record.vertices()) {
            *projected = self.project(vertex);
        }
        let screen = &mut screen[..count];

        if record.state.draw_overdraw {
            for i in 0..count {
                let j = (i + 1) % count;
                let (mut a, mut b) = (screen[i], screen[j]);
                push_apart(&mut a, &mut b, OVERDRAW_DISTANCE);
                screen[i] = a;
                screen[j] = b;
            }
        }

        if let Some(fill) = record.state.fill_rgba {
            surface.fill_color(fill.tinted(record.intensity));
            trace_polygon(surface, screen);
            surface.fill();
        }

        if let Some(texture) = &record.state.texture {
            let uv = &texture.coords;
            draw_texture_triangle(
                surface,
                &texture.image,
                [uv[0], uv[1], uv[2]],
                [screen[0], screen[1], screen[2]],
            );
            if count == 4 {
                draw_texture_triangle(
                    surface,
                    &texture.image,
                    [uv[0], uv[2], uv[3]],
                    [screen[0], screen[2], screen[3]],
                );
            }
        }

        if let Some(stroke) = record.state.stroke_rgba {
            surface.stroke_color(stroke);
            trace_polygon(surface, screen);
            surface.stroke();
        }

        if let Some(color) = record.state.normal1_rgba {
            self.draw_normal(surface, &record.centroid, &record.normal1, color);
        }
        if let Some(color) = record.state.normal2_rgba {
            self.draw_normal(surface, &record.centroid, &unit(&record.normal2), color);
        }
    }

    fn draw_normal<S: Surface>(
        &self,
        surface: &mut S,
        centroid: &Vec3,
        normal: &Vec3,
        color: Rgba,
    ) {
        let start = self.project(centroid);
        let end = self.project(&(centroid + normal));
        surface.stroke_color(color);
        surface.new_path();
        surface.move_to(start.x, start.y);
        surface.line_to(end.x, end.y);
        surface.stroke();
    }

    /// Projects and draws `path` immediately, with no culling or sorting.
    ///
    /// Nothing guards against points at or behind the camera plane.
    pub fn draw_path<S: Surface>(&self, surface: &mut S, path: &Path, options: PathOptions) {
        let combined = self.combined_matrix();
        let screen: Vec<Vec2> = path
            .points
            .iter()
            .map(|point| self.project(&combined.transform_point(point)))
            .collect();

        let start = match path.starting_point {
            Some(index) => screen[index],
            None => self.project(&combined.transform_point(&Vec3::zeros())),
        };

        surface.new_path();
        surface.move_to(start.x, start.y);
        for curve in &path.curves {
            match *curve {
                Curve::Quadratic { control, end } => {
                    let (c, e) = (screen[control], screen[end]);
                    surface.quadratic_curve_to(c.x, c.y, e.x, e.y);
                }
                Curve::Cubic { control1, control2, end } => {
                    let (c1, c2, e) = (screen[control1], screen[control2], screen[end]);
                    surface.bezier_curve_to(c1.x, c1.y, c2.x, c2.y, e.x, e.y);
                }
            }
        }

        if options.fill {
            if let Some(fill) = self.state.fill_rgba {
                surface.fill_color(fill);
            }
            surface.fill();
        } else {
            if let Some(stroke) = self.state.stroke_rgba {
                surface.stroke_color(stroke);
            }
            surface.stroke();
        }
    }

    /// Fills the whole surface with `color`
    pub fn draw_background<S: Surface>(&self, surface: &mut S, color: Rgba) {
        let (w, h) = (self.viewport.width(), self.viewport.height());
        surface.fill_color(color);
        trace_polygon(
            surface,
            &[Vec2::new(0.0, 0.0), Vec2::new(w, 0.0), Vec2::new(w, h), Vec2::new(0.0, h)],
        );
        surface.fill();
    }

    fn project(&self, point: &Vec3) -> Vec2 {
        self.viewport.project(point, self.camera.focal_length)
    }
}

fn trace_polygon<S: Surface>(surface: &mut S, points: &[Vec2]) {
    surface.new_path();
    surface.move_to(points[0].x, points[0].y);
    for point in &points[1..] {
        surface.line_to(point.x, point.y);
    }
    surface.close_path();
}

/// Draws the part of `image` under the `src` triangle onto the `dst`
/// triangle
fn draw_texture_triangle<S: Surface>(
    surface: &mut S,
    image: &S::Image,
    src: [Vec2; 3],
    dst: [Vec2; 3],
) {
    surface.store();
    trace_polygon(surface, &dst);
    surface.clip();
    surface.transform(Affine2D::map_triangle(src, dst));
    surface.draw_image(image);
    surface.restore();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::QuadFace;
    use crate::surface::{CommandRecorder, DrawCommand};
    use approx::assert_relative_eq;

    const RED: Rgba = Rgba::new(1.0, 0.0, 0.0, 1.0);
    const BLUE: Rgba = Rgba::new(0.0, 0.0, 1.0, 1.0);

    /// A square at depth `z`, facing the camera unless `flipped`
    fn square_at(z: f64, flipped: bool) -> Shape {
        let face = if flipped {
            QuadFace::quad(0, 3, 2, 1)
        } else {
            QuadFace::quad(0, 1, 2, 3)
        };
        Shape::from_parts(
            vec![
                Vec3::new(-1.0, -1.0, z),
                Vec3::new(1.0, -1.0, z),
                Vec3::new(1.0, 1.0, z),
                Vec3::new(-1.0, 1.0, z),
            ],
            vec![face],
        )
    }

    fn fill_colors(commands: &[DrawCommand<()>]) -> Vec<Rgba> {
        commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::FillColor(color) => Some(*color),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_backface_culling() {
        let mut renderer: Renderer = Renderer::new(200.0, 100.0);
        assert_eq!(renderer.buffer_shape(&square_at(-5.0, false)), 1);
        assert_eq!(renderer.buffer_shape(&square_at(-5.0, true)), 0);

        renderer.draw_backfaces = true;
        assert_eq!(renderer.buffer_shape(&square_at(-5.0, true)), 1);
        assert_eq!(renderer.buffered_len(), 2);
    }

    #[test]
    fn test_near_faces_are_culled() {
        let mut renderer: Renderer = Renderer::new(200.0, 100.0);
        renderer.draw_backfaces = true;
        assert_eq!(renderer.buffer_shape(&square_at(-0.5, false)), 0);
        assert_eq!(renderer.buffer_shape(&square_at(-1.0, false)), 0);
        assert_eq!(renderer.buffer_shape(&square_at(3.0, false)), 0);
        assert_eq!(renderer.buffer_shape(&square_at(-1.5, false)), 1);
    }

    #[test]
    fn test_camera_sees_only_front_of_cube() {
        let mut renderer: Renderer = Renderer::new(200.0, 100.0);
        renderer.camera.look_at(
            &Vec3::new(0.0, 0.0, 5.0),
            &Vec3::zeros(),
            &Vec3::new(0.0, 1.0, 0.0),
        );
        let cube = crate::shapes::make_cube(1.0);
        assert_eq!(renderer.buffer_shape(&cube), 1);
        assert_relative_eq!(
            renderer.buffered()[0].centroid,
            Vec3::new(0.0, 0.0, -4.0),
            epsilon = 1e-12
        );
        assert_relative_eq!(renderer.buffered()[0].intensity, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_draw_buffer_sorts_back_to_front() {
        let mut renderer: Renderer = Renderer::new(200.0, 100.0);
        renderer.state.fill_rgba = Some(RED);
        renderer.buffer_shape(&square_at(-3.0, false));
        renderer.state.fill_rgba = Some(BLUE);
        renderer.buffer_shape(&square_at(-10.0, false));

        let mut surface = CommandRecorder::<()>::new();
        assert_eq!(renderer.draw_buffer(&mut surface), 2);
        assert_eq!(fill_colors(surface.commands()), vec![BLUE, RED]);
        assert_eq!(renderer.buffered_len(), 0);
    }

    #[test]
    fn test_draw_buffer_keeps_order_without_sorting() {
        let mut renderer: Renderer = Renderer::new(200.0, 100.0);
        renderer.perform_z_sorting = false;
        renderer.state.fill_rgba = Some(RED);
        renderer.buffer_shape(&square_at(-3.0, false));
        renderer.state.fill_rgba = Some(BLUE);
        renderer.buffer_shape(&square_at(-10.0, false));

        let mut surface = CommandRecorder::<()>::new();
        renderer.draw_buffer(&mut surface);
        assert_eq!(fill_colors(surface.commands()), vec![RED, BLUE]);
    }

    #[test]
    fn test_buffered_state_is_a_snapshot() {
        let mut renderer: Renderer = Renderer::new(200.0, 100.0);
        renderer.state.fill_rgba = Some(RED);
        renderer.buffer_shape(&square_at(-3.0, false));

        if let Some(fill) = renderer.state.fill_rgba.as_mut() {
            fill.invert();
        }
        renderer.state.stroke_rgba = Some(BLUE);

        let mut surface = CommandRecorder::<()>::new();
        renderer.draw_buffer(&mut surface);
        assert_eq!(fill_colors(surface.commands()), vec![RED]);
        assert!(!surface.commands().contains(&DrawCommand::Stroke));
    }

    #[test]
    fn test_fill_polygon_commands() {
        let mut renderer: Renderer = Renderer::new(200.0, 100.0);
        renderer.state.draw_overdraw = false;
        renderer.buffer_shape(&square_at(-2.0, false));

        let mut surface = CommandRecorder::<()>::new();
        renderer.draw_buffer(&mut surface);
        // focal length 1, depth 2, scale 50, offsets (100, 50)
        assert_eq!(
            surface.commands(),
            &[
                DrawCommand::FillColor(Rgba::WHITE),
                DrawCommand::NewPath,
                DrawCommand::Move(75.0, 75.0),
                DrawCommand::Line(125.0, 75.0),
                DrawCommand::Line(125.0, 25.0),
                DrawCommand::Line(75.0, 25.0),
                DrawCommand::ClosePath,
                DrawCommand::Fill,
            ]
        );
    }

    #[test]
    fn test_overdraw_inflates_polygon() {
        let mut renderer: Renderer = Renderer::new(200.0, 100.0);
        renderer.buffer_shape(&square_at(-2.0, false));

        let mut surface = CommandRecorder::<()>::new();
        renderer.draw_buffer(&mut surface);
        match surface.commands()[2] {
            DrawCommand::Move(x, y) => {
                // Corner (75, 75) is pushed away along both of its edges
                assert_relative_eq!(x, 74.0, epsilon = 1e-3);
                assert_relative_eq!(y, 76.0, epsilon = 1e-3);
            }
            ref other => panic!("expected a move, got {:?}", other),
        }
    }

    #[test]
    fn test_intensity_tints_fill() {
        let mut renderer: Renderer = Renderer::new(200.0, 100.0);
        renderer.transform.translate(0.0, 0.0, -5.0);
        renderer.transform.rotate_x(std::f64::consts::FRAC_PI_3);
        renderer.buffer_shape(&square_at(0.0, false));
        assert_relative_eq!(renderer.buffered()[0].intensity, 0.5, epsilon = 1e-12);

        let mut surface = CommandRecorder::<()>::new();
        renderer.draw_buffer(&mut surface);
        let fill = fill_colors(surface.commands())[0];
        assert_relative_eq!(fill.r, 0.5, epsilon = 1e-12);
        assert_eq!(fill.a, 1.0);
    }

    #[test]
    fn test_non_uniform_scale_keeps_normals_facing() {
        let mut renderer: Renderer = Renderer::new(200.0, 100.0);
        renderer.transform.translate(0.0, 0.0, -5.0);
        renderer.transform.scale(3.0, 0.2, 1.0);
        renderer.transform.rotate_x(0.4);
        assert_eq!(renderer.buffer_shape(&square_at(0.0, false)), 1);
        let normal = renderer.buffered()[0].normal1;
        assert_relative_eq!(normal.norm(), 1.0, epsilon = 1e-12);
        assert!(normal.z > 0.0);
    }

    #[test]
    fn test_callback_can_skip_and_restyle() {
        let mut renderer: Renderer = Renderer::new(200.0, 100.0);
        renderer.draw_backfaces = true;
        renderer.camera.look_at(
            &Vec3::new(0.0, 0.0, 6.0),
            &Vec3::zeros(),
            &Vec3::new(0.0, 1.0, 0.0),
        );
        let cube = crate::shapes::make_cube(1.0);

        let mut seen = Vec::new();
        let kept = renderer.buffer_shape_with(&cube, |state, _, index| {
            seen.push(index);
            if index % 2 == 1 {
                return FaceAction::Skip;
            }
            state.fill_rgba = Some(if index == 0 { RED } else { BLUE });
            FaceAction::Buffer
        });

        assert_eq!(seen, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(kept, 3);
        assert_eq!(renderer.buffered()[0].state.fill_rgba, Some(RED));
        assert_eq!(renderer.buffered()[1].state.fill_rgba, Some(BLUE));
        assert_eq!(renderer.state.fill_rgba, Some(BLUE));
    }

    #[test]
    fn test_textured_quad_draws_two_mapped_triangles() {
        let mut renderer: Renderer<&str> = Renderer::new(200.0, 100.0);
        renderer.state.fill_rgba = None;
        renderer.state.draw_overdraw = false;
        renderer.state.texture = Some(Rc::new(TextureInfo::new(
            "brick",
            [
                Vec2::new(0.0, 64.0),
                Vec2::new(64.0, 64.0),
                Vec2::new(64.0, 0.0),
                Vec2::new(0.0, 0.0),
            ],
        )));
        renderer.buffer_shape(&square_at(-2.0, false));

        let mut surface = CommandRecorder::<&str>::new();
        renderer.draw_buffer(&mut surface);
        let commands = surface.commands();

        let images = commands.iter().filter(|c| **c == DrawCommand::DrawImage("brick")).count();
        assert_eq!(images, 2);
        assert_eq!(commands.iter().filter(|c| **c == DrawCommand::Clip).count(), 2);
        assert_eq!(commands.first(), Some(&DrawCommand::Store));
        assert_eq!(commands.last(), Some(&DrawCommand::Restore));

        let transforms: Vec<Affine2D> = commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Transform(t) => Some(*t),
                _ => None,
            })
            .collect();
        assert_eq!(transforms.len(), 2);
        // Texture corners land on the projected face corners
        assert_relative_eq!(
            transforms[0].apply(&Vec2::new(0.0, 64.0)),
            Vec2::new(75.0, 75.0),
            epsilon = 1e-9
        );
        assert_relative_eq!(
            transforms[0].apply(&Vec2::new(64.0, 0.0)),
            Vec2::new(125.0, 25.0),
            epsilon = 1e-9
        );
        assert_relative_eq!(
            transforms[1].apply(&Vec2::new(0.0, 0.0)),
            Vec2::new(75.0, 25.0),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_normal_lines() {
        let mut renderer: Renderer = Renderer::new(200.0, 100.0);
        renderer.state.fill_rgba = None;
        renderer.state.normal1_rgba = Some(RED);
        renderer.state.normal2_rgba = Some(BLUE);
        renderer.transform.translate(0.0, 0.0, -4.0);
        renderer.transform.rotate_y(0.3);
        renderer.buffer_shape(&square_at(0.0, false));

        let mut surface = CommandRecorder::<()>::new();
        renderer.draw_buffer(&mut surface);
        let strokes = surface.commands().iter().filter(|c| **c == DrawCommand::Stroke).count();
        assert_eq!(strokes, 2);
        assert!(surface.commands().contains(&DrawCommand::StrokeColor(RED)));
        assert!(surface.commands().contains(&DrawCommand::StrokeColor(BLUE)));
    }

    #[test]
    fn test_draw_path_strokes_circle() {
        let mut renderer: Renderer = Renderer::new(200.0, 100.0);
        renderer.state.stroke_rgba = Some(RED);
        renderer.transform.translate(0.0, 0.0, -2.0);
        let circle = crate::path_utils::make_circle();

        let mut surface = CommandRecorder::<()>::new();
        renderer.draw_path(&mut surface, &circle, PathOptions::default());
        let commands = surface.commands();
        assert_eq!(commands.len(), 6);
        assert_eq!(commands[0], DrawCommand::NewPath);
        assert!(matches!(commands[1], DrawCommand::Move(..)));
        assert!(matches!(commands[2], DrawCommand::BezierCurve(..)));
        assert!(matches!(commands[3], DrawCommand::BezierCurve(..)));
        assert_eq!(commands[4], DrawCommand::StrokeColor(RED));
        assert_eq!(commands[5], DrawCommand::Stroke);

        // The loop closes on the point it started from
        match (&commands[1], &commands[3]) {
            (DrawCommand::Move(sx, sy), DrawCommand::BezierCurve(_, _, _, _, ex, ey)) => {
                assert_relative_eq!(*sx, *ex, epsilon = 1e-9);
                assert_relative_eq!(*sy, *ey, epsilon = 1e-9);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_draw_path_fill_and_implicit_origin() {
        let mut renderer: Renderer = Renderer::new(200.0, 100.0);
        renderer.transform.translate(0.0, 0.0, -2.0);
        let path = Path {
            points: vec![Vec3::new(1.0, 1.0, 0.0), Vec3::new(2.0, 0.0, 0.0)],
            curves: vec![Curve::quadratic(0, 1)],
            starting_point: None,
        };

        let mut surface = CommandRecorder::<()>::new();
        renderer.draw_path(&mut surface, &path, PathOptions { fill: true });
        assert_eq!(
            surface.commands(),
            &[
                DrawCommand::NewPath,
                DrawCommand::Move(100.0, 50.0),
                DrawCommand::QuadraticCurve(125.0, 25.0, 150.0, 50.0),
                DrawCommand::FillColor(Rgba::WHITE),
                DrawCommand::Fill,
            ]
        );
    }

    #[test]
    fn test_transform_stack() {
        let mut renderer: Renderer = Renderer::new(200.0, 100.0);
        renderer.transform.translate(1.0, 0.0, 0.0);
        renderer.push_transform();
        renderer.transform.scale(2.0, 2.0, 2.0);
        let scaled = renderer.transform;

        assert_eq!(renderer.pop_transform(), Some(scaled));
        assert_relative_eq!(
            renderer.transform.transform_point(&Vec3::new(1.0, 0.0, 0.0)),
            Vec3::new(2.0, 0.0, 0.0),
            epsilon = 1e-12
        );
        assert_eq!(renderer.pop_transform(), None);
    }

    #[test]
    fn test_draw_background_covers_surface() {
        let renderer: Renderer = Renderer::new(200.0, 100.0);
        let mut surface = CommandRecorder::<()>::new();
        renderer.draw_background(&mut surface, Rgba::BLACK);
        assert_eq!(surface.commands()[0], DrawCommand::FillColor(Rgba::BLACK));
        assert!(surface.commands().contains(&DrawCommand::Line(200.0, 100.0)));
        assert_eq!(surface.commands().last(), Some(&DrawCommand::Fill));
    }

    #[test]
    fn test_apply_config() {
        let mut config = RenderConfig::default();
        config.focal_length = 3.0;
        config.draw_backfaces = true;
        config.fill_rgba = None;
        config.stroke_rgba = Some(RED);

        let renderer: Renderer = Renderer::from_config(10.0, 10.0, &config);
        assert_eq!(renderer.camera.focal_length, 3.0);
        assert!(renderer.draw_backfaces);
        assert_eq!(renderer.state.fill_rgba, None);
        assert_eq!(renderer.state.stroke_rgba, Some(RED));
    }
}
