//! CPU-side vertex data of the quad.
//!
//! The quad is stored as one interleaved `f32` buffer with the exact layout uploaded to the
//! GPU:
//!
//! | field      | floats | byte offset |
//! |------------|--------|-------------|
//! | position   | 3      | 0           |
//! | color      | 3      | 12          |
//! | tex coords | 2      | 24          |

use gl_wrapper::geometry::VertexAttribute;

use crate::color::Rgb;

pub const VERTEX_COUNT: usize = 4;
pub const FLOATS_PER_VERTEX: usize = 8;
pub const STRIDE: usize = FLOATS_PER_VERTEX * std::mem::size_of::<f32>();

pub const POSITION_OFFSET: usize = 0;
pub const COLOR_OFFSET: usize = 3;
pub const TEX_COORD_OFFSET: usize = 6;

/// Attribute list matching the interleaved layout, in shader location order.
pub const ATTRIBUTES: [VertexAttribute; 3] = [
    VertexAttribute::Vec3,
    VertexAttribute::Vec3,
    VertexAttribute::Vec2,
];

/// Two triangles, counter-clockwise.
#[rustfmt::skip]
pub const INDICES: [u32; 6] = [
    0, 1, 3,
    1, 2, 3,
];

/// Corners in vertex order: top right, bottom right, bottom left, top left.
#[rustfmt::skip]
const CORNERS: [([f32; 3], [f32; 2]); VERTEX_COUNT] = [
    ([ 0.8,  0.8, 0.0], [1.0, 1.0]),
    ([ 0.8, -0.8, 0.0], [1.0, 0.0]),
    ([-0.8, -0.8, 0.0], [0.0, 0.0]),
    ([-0.8,  0.8, 0.0], [0.0, 1.0]),
];

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub tex_coord: [f32; 2],
}

impl Vertex {
    fn write_to(&self, record: &mut [f32]) {
        record[POSITION_OFFSET..COLOR_OFFSET].copy_from_slice(&self.position);
        record[COLOR_OFFSET..TEX_COORD_OFFSET].copy_from_slice(&self.color);
        record[TEX_COORD_OFFSET..FLOATS_PER_VERTEX].copy_from_slice(&self.tex_coord);
    }

    fn read_from(record: &[f32]) -> Self {
        let mut v = Vertex {
            position: [0.0; 3],
            color: [0.0; 3],
            tex_coord: [0.0; 2],
        };

        v.position.copy_from_slice(&record[POSITION_OFFSET..COLOR_OFFSET]);
        v.color.copy_from_slice(&record[COLOR_OFFSET..TEX_COORD_OFFSET]);
        v.tex_coord.copy_from_slice(&record[TEX_COORD_OFFSET..FLOATS_PER_VERTEX]);

        v
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuadVertices {
    data: [f32; FLOATS_PER_VERTEX * VERTEX_COUNT],
}

impl QuadVertices {
    pub fn new(colors: &[Rgb; VERTEX_COUNT]) -> Self {
        let mut data = [0.0; FLOATS_PER_VERTEX * VERTEX_COUNT];

        for ((record, (position, tex_coord)), color) in data
            .chunks_exact_mut(FLOATS_PER_VERTEX)
            .zip(CORNERS)
            .zip(colors)
        {
            Vertex {
                position,
                color: color.to_f32_array(),
                tex_coord,
            }
            .write_to(record);
        }

        Self { data }
    }

    /// Overwrites the color fields of every vertex. Positions and texture coordinates are
    /// left untouched.
    pub fn set_colors(&mut self, colors: &[Rgb; VERTEX_COUNT]) {
        for (record, color) in self.data.chunks_exact_mut(FLOATS_PER_VERTEX).zip(colors) {
            record[COLOR_OFFSET..TEX_COORD_OFFSET].copy_from_slice(&color.to_f32_array());
        }
    }

    pub fn vertex(&self, i: usize) -> Vertex {
        Vertex::read_from(&self.data[i * FLOATS_PER_VERTEX..(i + 1) * FLOATS_PER_VERTEX])
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}
