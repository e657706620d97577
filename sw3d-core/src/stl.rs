/// STL import for binary and ASCII files
///
/// Facets are welded on exact position into an indexed triangle shape, so
/// mesh operators see shared edges.
use log::{debug, info};
use nom::{
    bytes::complete::{tag, take},
    character::complete::{multispace0, multispace1, not_line_ending},
    multi::{count, many0},
    number::complete::{float, le_f32, le_u16, le_u32},
    sequence::{preceded, tuple},
    IResult,
};
use std::collections::HashMap;
use std::path::Path;

use crate::geometry::{QuadFace, Shape};
use crate::vector::Vec3;

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

type Facet = [[f32; 3]; 3];

/// STL import errors
#[derive(thiserror::Error, Debug)]
pub enum StlError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File too small to be a valid STL: {0} bytes")]
    TooShort(usize),

    #[error("STL declares {declared} facets but only {available} are present")]
    Truncated { declared: usize, available: usize },

    #[error("Failed to parse STL: {0}")]
    Parse(String),
}

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> Result<Shape, StlError> {
    if data.len() < HEADER_LEN + 4 {
        return Err(StlError::TooShort(data.len()));
    }

    let declared = u32::from_le_bytes([data[80], data[81], data[82], data[83]]) as usize;
    let available = (data.len() - HEADER_LEN - 4) / FACET_LEN;
    if available < declared {
        return Err(StlError::Truncated { declared, available });
    }

    let (_, facets) = binary_stl(data).map_err(|e| StlError::Parse(format!("{:?}", e)))?;
    Ok(weld(&facets))
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<Shape, StlError> {
    match ascii_stl(input) {
        Ok((_, facets)) => Ok(weld(&facets)),
        Err(e) => Err(StlError::Parse(format!("{:?}", e))),
    }
}

/// Detect and parse STL file (binary or ASCII)
pub fn parse_stl(data: &[u8]) -> Result<Shape, StlError> {
    // Binary headers may also start with "solid"
    if data.starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(data) {
            match parse_ascii_stl(text) {
                Ok(shape) => return Ok(shape),
                Err(e) => debug!("not ASCII STL, trying binary: {}", e),
            }
        }
    }

    parse_binary_stl(data)
}

/// Read and parse an STL file from disk
pub fn load_stl<P: AsRef<Path>>(path: P) -> Result<Shape, StlError> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    let shape = parse_stl(&data)?;
    info!(
        "loaded {}: {} vertices, {} faces",
        path.display(),
        shape.vertices().len(),
        shape.faces().len()
    );
    Ok(shape)
}

/// Merges facet corners with bit-identical positions
fn weld(facets: &[Facet]) -> Shape {
    let mut indices: HashMap<[u32; 3], usize> = HashMap::new();
    let mut vertices = Vec::new();
    let mut faces = Vec::with_capacity(facets.len());

    for facet in facets {
        let mut corners = [0usize; 3];
        for (corner, position) in corners.iter_mut().zip(facet) {
            // + 0.0 folds -0.0 into 0.0
            let key = position.map(|c| (c + 0.0).to_bits());
            *corner = *indices.entry(key).or_insert_with(|| {
                vertices.push(Vec3::new(
                    position[0] as f64,
                    position[1] as f64,
                    position[2] as f64,
                ));
                vertices.len() - 1
            });
        }
        faces.push(QuadFace::triangle(corners[0], corners[1], corners[2]));
    }

    debug!("welded {} facet corners into {} vertices", facets.len() * 3, vertices.len());
    Shape::from_parts(vertices, faces)
}

fn binary_stl(input: &[u8]) -> IResult<&[u8], Vec<Facet>> {
    let (input, _header) = take(HEADER_LEN)(input)?;
    let (input, facet_count) = le_u32(input)?;
    count(binary_facet, facet_count as usize)(input)
}

fn binary_facet(input: &[u8]) -> IResult<&[u8], Facet> {
    // The stored normal is ignored; it is rebuilt from the winding
    let (input, _normal) = take(12usize)(input)?;
    let (input, (a, b, c)) = tuple((binary_vector, binary_vector, binary_vector))(input)?;
    let (input, _attributes) = le_u16(input)?;
    Ok((input, [a, b, c]))
}

fn binary_vector(input: &[u8]) -> IResult<&[u8], [f32; 3]> {
    let (input, (x, y, z)) = tuple((le_f32, le_f32, le_f32))(input)?;
    Ok((input, [x, y, z]))
}

fn ascii_stl(input: &str) -> IResult<&str, Vec<Facet>> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, _name) = not_line_ending(input)?;
    let (input, facets) = many0(ascii_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    let (input, _name) = not_line_ending(input)?;
    let (input, _) = multispace0(input)?;
    Ok((input, facets))
}

fn ascii_facet(input: &str) -> IResult<&str, Facet> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, _normal) = ascii_vector(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, a) = ascii_vertex(input)?;
    let (input, b) = ascii_vertex(input)?;
    let (input, c) = ascii_vertex(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;
    Ok((input, [a, b, c]))
}

fn ascii_vertex(input: &str) -> IResult<&str, [f32; 3]> {
    let (input, _) = preceded(multispace0, tag("vertex"))(input)?;
    ascii_vector(input)
}

fn ascii_vector(input: &str) -> IResult<&str, [f32; 3]> {
    let (input, _) = multispace0(input)?;
    let (input, x) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = float(input)?;
    Ok((input, [x, y, z]))
}
