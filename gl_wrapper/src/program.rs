use gl::types::{GLenum, GLint, GLuint};
use std::ffi::{c_char, CString};
use thiserror::Error;

pub struct ProgramBuilder<'a> {
    vert: &'a str,
    frag: &'a str,
}

impl<'a> ProgramBuilder<'a> {
    pub fn new(vert_src: &'a str, frag_src: &'a str) -> Self {
        Self {
            vert: vert_src,
            frag: frag_src,
        }
    }

    /// Compiles both stages and links them.
    ///
    /// Failures do not abort the build: each one is recorded in [`ProgramBuild::errors`]
    /// and the program object is returned regardless. A stage that failed to compile is
    /// not attached, so the link step will report it as well.
    pub fn build(self) -> ProgramBuild {
        let mut errors = Vec::new();

        let program = unsafe { gl::CreateProgram() };

        let mut shaders = Vec::with_capacity(2);

        for stage in [ShaderStage::Vertex, ShaderStage::Fragment] {
            let src = match stage {
                ShaderStage::Vertex => self.vert,
                ShaderStage::Fragment => self.frag,
            };

            match compile_shader(stage, src) {
                Ok(shader) => {
                    unsafe { gl::AttachShader(program, shader) };
                    shaders.push(shader);
                }
                Err(e) => errors.push(e),
            }
        }

        let mut success: GLint = 0;

        unsafe {
            gl::LinkProgram(program);
            gl::GetProgramiv(program, gl::LINK_STATUS, (&mut success) as *mut GLint);
        }

        let linked = success == gl::TRUE as GLint;

        if !linked {
            errors.push(PBError::Linking(program_info_log(program)));
        }

        for shader in shaders {
            unsafe {
                gl::DetachShader(program, shader);
                gl::DeleteShader(shader);
            }
        }

        ProgramBuild {
            program: Program {
                id: program,
                linked,
            },
            errors,
        }
    }
}

pub struct ProgramBuild {
    pub program: Program,
    pub errors: Vec<PBError>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn gl_enum(&self) -> GLenum {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

fn compile_shader(stage: ShaderStage, src: &str) -> Result<GLuint, PBError> {
    let src = CString::new(src).map_err(|_| PBError::InvalidSource(stage))?;
    let mut success: GLint = 0;

    unsafe {
        let shader = gl::CreateShader(stage.gl_enum());

        gl::ShaderSource(
            shader,
            1,
            (&src.as_ptr()) as *const *const c_char,
            std::ptr::null(),
        );

        gl::CompileShader(shader);
        gl::GetShaderiv(shader, gl::COMPILE_STATUS, (&mut success) as *mut GLint);

        if success != gl::TRUE as GLint {
            let log = shader_info_log(shader);
            gl::DeleteShader(shader);

            return Err(PBError::Compilation(stage, log));
        }

        Ok(shader)
    }
}

fn shader_info_log(shader: GLuint) -> String {
    let mut len: GLint = 0;

    unsafe {
        gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, (&mut len) as *mut GLint);
    }

    let mut buf = vec![0_u8; len.max(1) as usize];

    unsafe {
        gl::GetShaderInfoLog(
            shader,
            buf.len() as i32,
            std::ptr::null_mut(),
            buf.as_mut_ptr() as *mut c_char,
        );
    }

    log_to_string(&buf)
}

fn program_info_log(program: GLuint) -> String {
    let mut len: GLint = 0;

    unsafe {
        gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, (&mut len) as *mut GLint);
    }

    let mut buf = vec![0_u8; len.max(1) as usize];

    unsafe {
        gl::GetProgramInfoLog(
            program,
            buf.len() as i32,
            std::ptr::null_mut(),
            buf.as_mut_ptr() as *mut c_char,
        );
    }

    log_to_string(&buf)
}

fn log_to_string(buf: &[u8]) -> String {
    let data = buf.split(|a| *a == 0).next().unwrap_or(buf);

    String::from_utf8_lossy(data).trim_end().to_string()
}

#[derive(Debug, Error)]
pub enum PBError {
    #[error("{0} shader source contains a nul byte")]
    InvalidSource(ShaderStage),
    #[error("{0} shader errors:\n{1}")]
    Compilation(ShaderStage, String),
    #[error("Shader linker errors:\n{0}")]
    Linking(String),
}

pub struct Program {
    id: GLuint,
    linked: bool,
}

impl Program {
    pub fn get_id(&self) -> GLuint {
        self.id
    }

    /// Whether the last link succeeded. An unlinked program can still be bound, but draws
    /// with it produce nothing useful.
    pub fn is_linked(&self) -> bool {
        self.linked
    }

    pub fn uniform_location(&self, name: &str) -> Option<GLint> {
        let name = CString::new(name).ok()?;
        let loc = unsafe { gl::GetUniformLocation(self.id, name.as_ptr()) };

        (loc >= 0).then_some(loc)
    }

    /// Sets an integer uniform, binding the program first.
    pub fn set_uniform_i32(&self, location: GLint, value: i32) {
        unsafe {
            gl::UseProgram(self.id);
            gl::Uniform1i(location, value);
        }
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        unsafe { gl::DeleteProgram(self.id) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_log_stops_at_nul() {
        let buf = b"0:1(1): error: syntax error\n\0garbage";

        assert_eq!(log_to_string(buf), "0:1(1): error: syntax error");
    }

    #[test]
    fn info_log_without_nul() {
        assert_eq!(log_to_string(b"warning"), "warning");
    }

    #[test]
    fn error_messages_name_the_stage() {
        let err = PBError::Compilation(ShaderStage::Fragment, "bad".into());

        assert_eq!(err.to_string(), "fragment shader errors:\nbad");
    }
}
