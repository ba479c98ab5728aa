use std::ffi::c_void;
use thiserror::Error;

pub struct GeometryBuilder<'a> {
    attributes: Vec<VertexAttribute>,
    data: &'a [f32],
    indices: Option<&'a [u32]>,
    usage: BufferUsage,
}

impl<'a> GeometryBuilder<'a> {
    pub fn new(data: &'a [f32]) -> Self {
        Self {
            data,
            attributes: Vec::new(),
            indices: None,
            usage: BufferUsage::StaticDraw,
        }
    }

    pub fn with_attribute(mut self, attr: VertexAttribute) -> Self {
        self.attributes.push(attr);
        self
    }

    pub fn with_indices(mut self, indices: &'a [u32]) -> Self {
        self.indices = Some(indices);
        self
    }

    pub fn with_usage(mut self, usage: BufferUsage) -> Self {
        self.usage = usage;
        self
    }

    fn validate(&self) -> Result<(VertexLayout, usize), GBError> {
        if self.attributes.is_empty() {
            return Err(GBError::NoAttributes);
        }

        let layout = VertexLayout::new(&self.attributes);

        if self.data.len() % layout.components() != 0 {
            return Err(GBError::InvalidDataLength);
        }

        let vertices = self.data.len() / layout.components();

        if let Some(indices) = self.indices {
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices) {
                return Err(GBError::IndexOutOfRange { index, vertices });
            }
        }

        Ok((layout, vertices))
    }

    pub fn build(self) -> Result<Geometry, GBError> {
        let (layout, vertices) = self.validate()?;

        let mut vao = 0;
        let mut vbo = 0;
        let mut ebo = 0;

        unsafe {
            gl::GenVertexArrays(1, (&mut vao) as *mut u32);
            gl::GenBuffers(1, (&mut vbo) as *mut u32);

            gl::BindVertexArray(vao);
            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);

            gl::BufferData(
                gl::ARRAY_BUFFER,
                std::mem::size_of_val(self.data) as isize,
                self.data.as_ptr() as *const c_void,
                self.usage.gl_enum(),
            );

            // the element buffer binding is recorded in the VAO, so it has to be bound while
            // the VAO is
            if let Some(indices) = self.indices {
                gl::GenBuffers(1, (&mut ebo) as *mut u32);
                gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, ebo);

                gl::BufferData(
                    gl::ELEMENT_ARRAY_BUFFER,
                    std::mem::size_of_val(indices) as isize,
                    indices.as_ptr() as *const c_void,
                    self.usage.gl_enum(),
                );
            }

            for pointer in layout.pointers() {
                gl::VertexAttribPointer(
                    pointer.location,
                    pointer.components as i32,
                    gl::FLOAT,
                    gl::FALSE,
                    layout.stride() as i32,
                    pointer.offset as *const c_void,
                );
                gl::EnableVertexAttribArray(pointer.location);
            }

            gl::BindVertexArray(0);
            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
        }

        Ok(Geometry {
            vao,
            vbo,
            ebo: (ebo != 0).then_some(ebo),
            vertices,
            indices: self.indices.map_or(0, |i| i.len()),
            floats: self.data.len(),
            usage: self.usage,
        })
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GBError {
    #[error("Invalid data length for given attributes")]
    InvalidDataLength,
    #[error("Geometry needs at least one vertex attribute")]
    NoAttributes,
    #[error("Index {index} is out of range for {vertices} vertices")]
    IndexOutOfRange { index: u32, vertices: usize },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VertexAttribute {
    Float,
    Vec2,
    Vec3,
}

impl VertexAttribute {
    pub fn size(&self) -> usize {
        match self {
            VertexAttribute::Float => 1,
            VertexAttribute::Vec2 => 2,
            VertexAttribute::Vec3 => 3,
        }
    }
}

/// Usage hint passed to the driver with every buffer upload.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BufferUsage {
    StaticDraw,
    DynamicDraw,
}

impl BufferUsage {
    fn gl_enum(&self) -> u32 {
        match self {
            BufferUsage::StaticDraw => gl::STATIC_DRAW,
            BufferUsage::DynamicDraw => gl::DYNAMIC_DRAW,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AttributePointer {
    pub location: u32,
    pub components: usize,
    /// Offset from the start of a vertex record, in bytes.
    pub offset: usize,
}

/// Byte layout of one interleaved vertex record. Attribute `i` is bound to location `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexLayout {
    pointers: Vec<AttributePointer>,
    components: usize,
}

impl VertexLayout {
    pub fn new(attributes: &[VertexAttribute]) -> Self {
        let mut pointers = Vec::with_capacity(attributes.len());
        let mut components = 0;

        for (i, attr) in attributes.iter().enumerate() {
            pointers.push(AttributePointer {
                location: i as u32,
                components: attr.size(),
                offset: components * std::mem::size_of::<f32>(),
            });
            components += attr.size();
        }

        Self {
            pointers,
            components,
        }
    }

    pub fn pointers(&self) -> &[AttributePointer] {
        &self.pointers
    }

    /// Floats per vertex.
    pub fn components(&self) -> usize {
        self.components
    }

    /// Bytes per vertex.
    pub fn stride(&self) -> usize {
        self.components * std::mem::size_of::<f32>()
    }
}

pub struct Geometry {
    vao: u32,
    vbo: u32,
    ebo: Option<u32>,
    vertices: usize,
    indices: usize,
    floats: usize,
    usage: BufferUsage,
}

impl Geometry {
    pub fn vao(&self) -> u32 {
        self.vao
    }

    pub fn vertices(&self) -> usize {
        self.vertices
    }

    /// Number of indices, 0 for non-indexed geometry.
    pub fn indices(&self) -> usize {
        self.indices
    }

    pub fn is_indexed(&self) -> bool {
        self.ebo.is_some()
    }

    /// Replaces the whole vertex buffer. The new data must have the same length as the data
    /// the geometry was built with.
    pub fn update(&self, data: &[f32]) -> Result<(), GBError> {
        if data.len() != self.floats {
            return Err(GBError::InvalidDataLength);
        }

        unsafe {
            gl::BindBuffer(gl::ARRAY_BUFFER, self.vbo);
            gl::BufferData(
                gl::ARRAY_BUFFER,
                std::mem::size_of_val(data) as isize,
                data.as_ptr() as *const c_void,
                self.usage.gl_enum(),
            );
            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
        }

        Ok(())
    }
}

impl Drop for Geometry {
    fn drop(&mut self) {
        unsafe {
            if let Some(ebo) = &self.ebo {
                gl::DeleteBuffers(1, ebo as *const u32);
            }
            gl::DeleteBuffers(1, (&self.vbo) as *const u32);
            gl::DeleteVertexArrays(1, (&self.vao) as *const u32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interleaved_layout_offsets() {
        let layout = VertexLayout::new(&[
            VertexAttribute::Vec3,
            VertexAttribute::Vec3,
            VertexAttribute::Vec2,
        ]);

        assert_eq!(layout.components(), 8);
        assert_eq!(layout.stride(), 32);

        let offsets: Vec<_> = layout
            .pointers()
            .iter()
            .map(|p| (p.location, p.components, p.offset))
            .collect();
        assert_eq!(offsets, vec![(0, 3, 0), (1, 3, 12), (2, 2, 24)]);
    }

    #[test]
    fn usage_hint() {
        let data = [0.0; 8];
        let builder = GeometryBuilder::new(&data);
        assert_eq!(builder.usage.gl_enum(), gl::STATIC_DRAW);

        let builder = builder.with_usage(BufferUsage::DynamicDraw);
        assert_eq!(builder.usage.gl_enum(), gl::DYNAMIC_DRAW);
    }

    #[test]
    fn rejects_partial_vertices() {
        let data = [0.0; 7];
        let builder = GeometryBuilder::new(&data).with_attribute(VertexAttribute::Vec2);

        assert_eq!(builder.validate().unwrap_err(), GBError::InvalidDataLength);
    }

    #[test]
    fn rejects_missing_attributes() {
        let data = [0.0; 4];
        let builder = GeometryBuilder::new(&data);

        assert_eq!(builder.validate().unwrap_err(), GBError::NoAttributes);
    }

    #[test]
    fn rejects_out_of_range_indices() {
        let data = [0.0; 8];
        let indices = [0, 1, 4];
        let builder = GeometryBuilder::new(&data)
            .with_attribute(VertexAttribute::Vec2)
            .with_indices(&indices);

        assert_eq!(
            builder.validate().unwrap_err(),
            GBError::IndexOutOfRange {
                index: 4,
                vertices: 4
            }
        );
    }

    #[test]
    fn counts_vertices() {
        let data = [0.0; 32];
        let indices = [0, 1, 3, 1, 2, 3];
        let builder = GeometryBuilder::new(&data)
            .with_attribute(VertexAttribute::Vec3)
            .with_attribute(VertexAttribute::Vec3)
            .with_attribute(VertexAttribute::Vec2)
            .with_indices(&indices);

        let (_, vertices) = builder.validate().unwrap();
        assert_eq!(vertices, 4);
    }
}
