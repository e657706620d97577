/// SW3D Terminal - render one frame of a shape, path or STL file
///
/// Usage: sw3d-terminal [SUBJECT] [--config FILE] [--subdivide N]
///                      [--smooth AMOUNT] [--extrude DISTANCE]
///
/// SUBJECT is one of cube, box-with-hole, sphere, octahedron, ripple,
/// circle, spiral, or a path to an `.stl` file. Logging goes to stderr and
/// is controlled with RUST_LOG.
use crossterm::terminal;
use std::io::{self, Write};
use sw3d_core::RenderConfig;
use sw3d_terminal::{render, AppError, Options};

/// Used when the output is not a terminal
const FALLBACK_SIZE: (u16, u16) = (80, 24);

fn main() -> Result<(), AppError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let options = Options::parse(std::env::args().skip(1))?;
    let config = match &options.config {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::default(),
    };
    let subject = options.build_subject()?;

    let (columns, rows) = terminal::size().unwrap_or(FALLBACK_SIZE);
    // Leave the last row for the shell prompt
    let rows = rows.saturating_sub(1).max(1);
    let surface = render(&subject, &config, columns as usize, rows as usize);

    let mut stdout = io::stdout();
    surface.draw(&mut stdout)?;
    stdout.flush()?;
    Ok(())
}
