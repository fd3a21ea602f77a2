/// Renderbuffers and the surfaces a framebuffer attachment can point at

use std::rc::Rc;
use galaxy_3d_engine::galaxy3d::render::PixelFormat;
use galaxy_3d_engine::galaxy3d::Result;
use crate::gles2_consts::*;
use crate::gles2_driver::GlDriver;

/// A GL renderbuffer with allocated storage
///
/// Plain data: deletion is owned by `RenderBufferCache`, which deletes the
/// GL object exactly once when the last reference is released.
#[derive(Debug, PartialEq, Eq)]
pub struct Gles2RenderBuffer {
    handle: GLuint,
    gl_format: GLenum,
    width: u32,
    height: u32,
    num_samples: u32,
}

impl Gles2RenderBuffer {
    /// Create a renderbuffer and allocate its storage
    ///
    /// Multisampled storage is used when `num_samples > 0`.
    pub(crate) fn allocate(
        driver: &dyn GlDriver,
        gl_format: GLenum,
        width: u32,
        height: u32,
        num_samples: u32,
    ) -> Result<Self> {
        let handle = driver.gen_renderbuffer()?;
        driver.bind_renderbuffer(GL_RENDERBUFFER, handle);
        if num_samples > 0 {
            driver.renderbuffer_storage_multisample(
                GL_RENDERBUFFER,
                num_samples as GLsizei,
                gl_format,
                width as GLsizei,
                height as GLsizei,
            );
        } else {
            driver.renderbuffer_storage(GL_RENDERBUFFER, gl_format, width as GLsizei, height as GLsizei);
        }
        driver.bind_renderbuffer(GL_RENDERBUFFER, 0);

        Ok(Self { handle, gl_format, width, height, num_samples })
    }

    pub fn handle(&self) -> GLuint {
        self.handle
    }

    pub fn gl_format(&self) -> GLenum {
        self.gl_format
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn num_samples(&self) -> u32 {
        self.num_samples
    }
}

/// Level of a texture owned by the texture manager, used as a render surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gles2TextureSurface {
    pub texture: GLuint,
    /// `GL_TEXTURE_2D` or a cube map face
    pub target: GLenum,
    pub level: GLint,
    pub format: PixelFormat,
    pub width: u32,
    pub height: u32,
}

/// Image backing a surface
#[derive(Debug, Clone)]
pub enum SurfaceBuffer {
    RenderBuffer(Rc<Gles2RenderBuffer>),
    Texture(Gles2TextureSurface),
}

/// One framebuffer attachment: a buffer (or nothing) plus slice/sample info
#[derive(Debug, Clone, Default)]
pub struct SurfaceDesc {
    pub buffer: Option<SurfaceBuffer>,
    pub z_offset: u32,
    pub num_samples: u32,
}

impl SurfaceDesc {
    /// Surface with no buffer
    pub fn none() -> Self {
        Self::default()
    }

    pub fn texture(surface: Gles2TextureSurface) -> Self {
        Self { buffer: Some(SurfaceBuffer::Texture(surface)), z_offset: 0, num_samples: 0 }
    }

    pub(crate) fn render_buffer(buffer: Rc<Gles2RenderBuffer>) -> Self {
        let num_samples = buffer.num_samples();
        Self { buffer: Some(SurfaceBuffer::RenderBuffer(buffer)), z_offset: 0, num_samples }
    }

    pub fn is_null(&self) -> bool {
        self.buffer.is_none()
    }

    /// The renderbuffer behind this surface, if any
    pub fn as_render_buffer(&self) -> Option<&Rc<Gles2RenderBuffer>> {
        match &self.buffer {
            Some(SurfaceBuffer::RenderBuffer(buffer)) => Some(buffer),
            _ => None,
        }
    }

    pub fn width(&self) -> u32 {
        match &self.buffer {
            Some(SurfaceBuffer::RenderBuffer(buffer)) => buffer.width(),
            Some(SurfaceBuffer::Texture(texture)) => texture.width,
            None => 0,
        }
    }

    pub fn height(&self) -> u32 {
        match &self.buffer {
            Some(SurfaceBuffer::RenderBuffer(buffer)) => buffer.height(),
            Some(SurfaceBuffer::Texture(texture)) => texture.height,
            None => 0,
        }
    }

    /// Attach this surface to `attachment` of the framebuffer bound to `GL_FRAMEBUFFER`
    pub(crate) fn attach(&self, driver: &dyn GlDriver, attachment: GLenum) {
        match &self.buffer {
            Some(SurfaceBuffer::RenderBuffer(buffer)) => {
                driver.framebuffer_renderbuffer(GL_FRAMEBUFFER, attachment, GL_RENDERBUFFER, buffer.handle())
            }
            Some(SurfaceBuffer::Texture(texture)) => driver.framebuffer_texture_2d(
                GL_FRAMEBUFFER,
                attachment,
                texture.target,
                texture.texture,
                texture.level,
            ),
            None => {}
        }
    }
}
