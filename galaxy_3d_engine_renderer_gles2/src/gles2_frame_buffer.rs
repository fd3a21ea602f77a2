/// Gles2FrameBufferObject - GL framebuffer(s) behind one render texture
///
/// Holds the framebuffer the color surface is attached to and, when
/// multisampling, a second framebuffer rendered into and resolved with a
/// blit. The GL framebuffers are deleted when the object is dropped; the
/// attached surfaces are owned by the FBO manager and released by it.

use std::rc::Rc;
use galaxy_3d_engine::galaxy3d::render::PixelFormat;
use galaxy_3d_engine::galaxy3d::{Error, Result};
use galaxy_3d_engine::{engine_bail, engine_err};
use crate::gles2_consts::*;
use crate::gles2_driver::GlDriver;
use crate::gles2_render_buffer::SurfaceDesc;

const SOURCE: &str = "galaxy3d::gles2::FBO";

/// Depth/stencil (and multisample color) surfaces attached to a framebuffer
#[derive(Debug, Clone, Default)]
pub struct FboAttachments {
    /// Multisample color renderbuffer, null unless the FBO is multisampled
    pub multisample_color: SurfaceDesc,
    pub depth: SurfaceDesc,
    /// Null when `packed_depth_stencil` is set: the depth surface serves both
    pub stencil: SurfaceDesc,
    pub packed_depth_stencil: bool,
}

impl FboAttachments {
    /// Every surface held, packed depth counted once
    pub fn surfaces(&self) -> [&SurfaceDesc; 3] {
        [&self.multisample_color, &self.depth, &self.stencil]
    }
}

pub struct Gles2FrameBufferObject {
    driver: Rc<dyn GlDriver>,
    /// Framebuffer the color surface is attached to (resolve target when multisampled)
    fb: GLuint,
    /// Framebuffer rendered into when multisampled, 0 otherwise
    multisample_fb: GLuint,
    num_samples: u32,
    color: SurfaceDesc,
    format: PixelFormat,
    attachments: FboAttachments,
}

impl Gles2FrameBufferObject {
    /// Create the GL framebuffer(s); nothing is attached yet
    pub fn new(driver: Rc<dyn GlDriver>, num_samples: u32) -> Result<Self> {
        let fb = driver.gen_framebuffer()?;
        let multisample_fb = if num_samples > 0 {
            match driver.gen_framebuffer() {
                Ok(name) => name,
                Err(e) => {
                    driver.delete_framebuffers(&[fb]);
                    return Err(e);
                }
            }
        } else {
            0
        };

        Ok(Self {
            driver,
            fb,
            multisample_fb,
            num_samples,
            color: SurfaceDesc::none(),
            format: PixelFormat::Unknown,
            attachments: FboAttachments::default(),
        })
    }

    /// Set the color surface; only attachment 0 exists on GLES2
    pub fn bind_surface(&mut self, attachment: usize, surface: SurfaceDesc, format: PixelFormat) -> Result<()> {
        if attachment != 0 {
            return Err(Error::InvalidUsage(format!(
                "Color attachment {} requested, only attachment 0 is available",
                attachment
            )));
        }
        self.color = surface;
        self.format = format;
        Ok(())
    }

    /// Attach the color surface and `attachments`, then check completeness
    ///
    /// The FBO keeps `attachments` whatever the outcome so the caller can
    /// take them back with `take_attachments`. Leaves framebuffer 0 bound.
    pub fn initialise(&mut self, attachments: FboAttachments) -> Result<()> {
        self.attachments = attachments;

        if self.color.is_null() {
            engine_bail!(SOURCE, "Render target has no color surface");
        }

        let driver = self.driver.clone();
        let color_attachment = if self.format.is_depth() {
            GL_DEPTH_ATTACHMENT
        } else {
            GL_COLOR_ATTACHMENT0
        };

        driver.bind_framebuffer(GL_FRAMEBUFFER, self.fb);
        self.color.attach(driver.as_ref(), color_attachment);

        if self.multisample_fb != 0 {
            driver.bind_framebuffer(GL_FRAMEBUFFER, self.multisample_fb);
            self.attachments.multisample_color.attach(driver.as_ref(), color_attachment);
        }

        // Depth and stencil go where rendering happens
        self.attachments.depth.attach(driver.as_ref(), GL_DEPTH_ATTACHMENT);
        if self.attachments.packed_depth_stencil {
            self.attachments.depth.attach(driver.as_ref(), GL_STENCIL_ATTACHMENT);
        } else {
            self.attachments.stencil.attach(driver.as_ref(), GL_STENCIL_ATTACHMENT);
        }

        let mut result = Self::check_status(driver.as_ref(), self.render_fb());
        if result.is_ok() && self.multisample_fb != 0 {
            driver.bind_framebuffer(GL_FRAMEBUFFER, self.fb);
            result = Self::check_status(driver.as_ref(), self.fb);
        }

        driver.bind_framebuffer(GL_FRAMEBUFFER, 0);
        result
    }

    fn check_status(driver: &dyn GlDriver, fb: GLuint) -> Result<()> {
        match driver.check_framebuffer_status(GL_FRAMEBUFFER) {
            GL_FRAMEBUFFER_COMPLETE => Ok(()),
            GL_FRAMEBUFFER_UNSUPPORTED => Err(engine_err!(
                SOURCE,
                "All framebuffer formats with this texture internal format unsupported (framebuffer {})",
                fb
            )),
            status => Err(engine_err!(
                SOURCE,
                "Framebuffer {} incomplete or other FBO status error: {}",
                fb,
                framebuffer_status_name(status)
            )),
        }
    }

    /// Hand the attached surfaces back to the caller (for release)
    pub fn take_attachments(&mut self) -> FboAttachments {
        std::mem::take(&mut self.attachments)
    }

    /// Hand the color surface back to the caller (for release)
    pub fn take_color(&mut self) -> SurfaceDesc {
        std::mem::take(&mut self.color)
    }

    /// Bind for drawing: the multisample framebuffer when there is one
    pub fn bind(&self) {
        self.driver.bind_framebuffer(GL_FRAMEBUFFER, self.render_fb());
    }

    /// Resolve the multisample framebuffer into the color surface
    ///
    /// No-op for single-sample FBOs. The previous framebuffer binding is restored.
    pub fn swap_buffers(&self) {
        if self.multisample_fb == 0 {
            return;
        }

        let previous = self.driver.get_integer(GL_FRAMEBUFFER_BINDING) as GLuint;
        let (width, height) = (self.width() as GLint, self.height() as GLint);

        self.driver.bind_framebuffer(GL_READ_FRAMEBUFFER, self.multisample_fb);
        self.driver.bind_framebuffer(GL_DRAW_FRAMEBUFFER, self.fb);
        self.driver.blit_framebuffer(
            [0, 0, width, height],
            [0, 0, width, height],
            GL_COLOR_BUFFER_BIT,
            GL_NEAREST as GLenum,
        );
        self.driver.bind_framebuffer(GL_FRAMEBUFFER, previous);
    }

    /// The context is gone: forget the framebuffer names without deleting them
    ///
    /// Attached surfaces are dropped too; the cache forgets their names on its side.
    pub fn notify_on_context_lost(&mut self) {
        self.fb = 0;
        self.multisample_fb = 0;
        self.attachments = FboAttachments::default();
    }

    /// Recreate the framebuffer names in the new context
    pub fn notify_on_context_reset(&mut self) -> Result<()> {
        let fb = self.driver.gen_framebuffer()?;
        let multisample_fb = if self.num_samples > 0 {
            match self.driver.gen_framebuffer() {
                Ok(name) => name,
                Err(e) => {
                    self.driver.delete_framebuffers(&[fb]);
                    return Err(e);
                }
            }
        } else {
            0
        };
        self.fb = fb;
        self.multisample_fb = multisample_fb;
        Ok(())
    }

    /// Framebuffer drawing goes to
    pub fn render_fb(&self) -> GLuint {
        if self.multisample_fb != 0 {
            self.multisample_fb
        } else {
            self.fb
        }
    }

    pub fn gl_fbo_handle(&self) -> GLuint {
        self.fb
    }

    pub fn gl_multisample_fbo_handle(&self) -> GLuint {
        self.multisample_fb
    }

    pub fn num_samples(&self) -> u32 {
        self.num_samples
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn width(&self) -> u32 {
        self.color.width()
    }

    pub fn height(&self) -> u32 {
        self.color.height()
    }

    pub fn color_surface(&self) -> &SurfaceDesc {
        &self.color
    }

    pub fn attachments(&self) -> &FboAttachments {
        &self.attachments
    }
}

impl Drop for Gles2FrameBufferObject {
    fn drop(&mut self) {
        // Names are 0 after a context loss; delete ignores them
        self.driver.delete_framebuffers(&[self.fb, self.multisample_fb]);
    }
}

#[cfg(test)]
#[path = "gles2_frame_buffer_tests.rs"]
mod tests;
