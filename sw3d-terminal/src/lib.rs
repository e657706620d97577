/// Terminal front end for the SW3D rendering pipeline
///
/// Builds a shape or path from a name or an STL file, optionally runs mesh
/// operators over it, and renders a single frame into a `TerminalSurface`.
use log::info;
use std::path::PathBuf;
use sw3d_core::{
    mesh_ops, path_utils, shapes, stl, ConfigError, Extruder, Path, PathOptions, RenderConfig,
    Renderer, Rgba, Shape, StlError,
};

pub mod renderer;

pub use renderer::TerminalSurface;

/// Terminal cells are roughly twice as tall as they are wide
pub const CELL_ASPECT: f64 = 2.0;

/// How far in front of the camera subjects are placed
pub const VIEW_DISTANCE: f64 = 4.0;

/// Extrusion steps used by `--extrude`
const EXTRUDE_STEPS: usize = 2;

/// Application errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Unknown subject '{0}'")]
    UnknownSubject(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("STL error: {0}")]
    Stl(#[from] StlError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Something to render
#[derive(Debug, Clone)]
pub enum Subject {
    Shape(Shape),
    Path(Path),
}

/// Command line options
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// A builder name or an `.stl` file
    pub subject: String,
    pub config: Option<PathBuf>,
    pub subdivide: usize,
    pub smooth: Option<f64>,
    pub extrude: Option<f64>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            subject: "cube".to_string(),
            config: None,
            subdivide: 0,
            smooth: None,
            extrude: None,
        }
    }
}

impl Options {
    /// Parses arguments, excluding the program name
    pub fn parse<I>(args: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut options = Options::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => options.config = Some(PathBuf::from(value_for(&arg, args.next())?)),
                "--subdivide" => options.subdivide = parse_value(&arg, args.next())?,
                "--smooth" => options.smooth = Some(parse_value(&arg, args.next())?),
                "--extrude" => options.extrude = Some(parse_value(&arg, args.next())?),
                flag if flag.starts_with("--") => {
                    return Err(AppError::InvalidArgument(format!("unknown option {}", flag)))
                }
                _ => options.subject = arg,
            }
        }

        Ok(options)
    }

    /// Builds the subject and applies the requested mesh operators
    pub fn build_subject(&self) -> Result<Subject, AppError> {
        let mut subject = subject_from_name(&self.subject)?;

        if let Subject::Shape(shape) = &mut subject {
            for _ in 0..self.subdivide {
                mesh_ops::linear_subdivide(shape);
            }
            if let Some(distance) = self.extrude {
                Extruder::new().count(EXTRUDE_STEPS).distance(distance).extrude(shape);
            }
            if let Some(amount) = self.smooth {
                mesh_ops::average_smooth(shape, amount);
            }
        }

        Ok(subject)
    }
}

fn value_for(flag: &str, value: Option<String>) -> Result<String, AppError> {
    value.ok_or_else(|| AppError::InvalidArgument(format!("{} needs a value", flag)))
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<String>) -> Result<T, AppError> {
    let value = value_for(flag, value)?;
    value
        .parse()
        .map_err(|_| AppError::InvalidArgument(format!("{} {}", flag, value)))
}

/// A built-in shape or path by name, or an STL file by path
pub fn subject_from_name(name: &str) -> Result<Subject, AppError> {
    let subject = match name {
        "cube" => Subject::Shape(shapes::make_cube(1.0)),
        "box-with-hole" => Subject::Shape(shapes::make_box_with_hole(1.2, 1.2, 0.4, 0.6, 0.6)),
        "sphere" => Subject::Shape(shapes::make_sphere(1.3, 8, 12)),
        "octahedron" => Subject::Shape(shapes::make_octahedron()),
        "ripple" => Subject::Shape(shapes::make_xy_function(
            |x, y| 0.3 * (3.0 * (x * x + y * y).sqrt()).cos(),
            (-1.5, 1.5),
            (-1.5, 1.5),
            16,
        )),
        "circle" => Subject::Path(path_utils::make_circle()),
        "spiral" => Subject::Path(path_utils::make_spiral(4)),
        _ if name.to_ascii_lowercase().ends_with(".stl") => Subject::Shape(stl::load_stl(name)?),
        _ => return Err(AppError::UnknownSubject(name.to_string())),
    };
    Ok(subject)
}

/// Renders one frame of `subject` onto a fresh `width` x `height` surface
pub fn render(
    subject: &Subject,
    config: &RenderConfig,
    width: usize,
    height: usize,
) -> TerminalSurface {
    let mut surface = TerminalSurface::new(width, height);
    let mut renderer: Renderer<char> = Renderer::from_config(width as f64, height as f64, config);

    renderer.transform.translate(0.0, 0.0, -VIEW_DISTANCE);
    renderer.transform.rotate_x(0.5);
    renderer.transform.rotate_y(0.6);
    renderer.transform.scale_pre(CELL_ASPECT, 1.0, 1.0);

    renderer.draw_background(&mut surface, Rgba::BLACK);

    match subject {
        Subject::Shape(shape) => {
            let buffered = renderer.buffer_shape(shape);
            renderer.draw_buffer(&mut surface);
            info!("rendered {} of {} faces", buffered, shape.faces().len());
        }
        Subject::Path(path) => {
            // Shrink tall paths such as spirals into view, centred on the origin
            if path.points.iter().any(|p| p.y < -1.0) {
                let depth = path.points.iter().fold(0.0_f64, |lowest, p| lowest.min(p.y));
                let scale = 2.0 / -depth;
                renderer.transform.translate(0.0, 1.0, 0.0);
                renderer.transform.scale(scale, scale, scale);
            }
            if renderer.state.stroke_rgba.is_none() {
                renderer.state.stroke_rgba = Some(Rgba::WHITE);
            }
            renderer.draw_path(&mut surface, path, PathOptions::default());
            info!("rendered path of {} curves", path.curves.len());
        }
    }

    surface
}
