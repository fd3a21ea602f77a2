/// FBO capability probing
///
/// Builds throwaway framebuffers for every depth/stencil candidate pair and
/// every color format, asks the driver which ones are complete, and turns
/// the answers into a `FormatPropertyTable`. Incomplete framebuffers and
/// failed allocations are the expected "unsupported" signal, never errors.

use std::time::{Duration, Instant};
use galaxy_3d_engine::galaxy3d::render::PixelFormat;
use galaxy_3d_engine::{engine_debug, engine_info, engine_trace};
use crate::gles2_consts::*;
use crate::gles2_depth_stencil::{
    FormatProperties, FormatPropertyTable, Mode, DEPTH_FORMATS, STENCIL_FORMATS,
};
use crate::gles2_driver::GlDriver;
use crate::gles2_pixel_format::{is_packed_depth_stencil, Gles2PixelUtil};

const SOURCE: &str = "galaxy3d::gles2::FBOManager";
const MAX_DRAINED_ERRORS: usize = 64;

/// Every GL object created while probing
///
/// Dropping the scope unbinds the probe framebuffer, deletes everything in
/// bulk and clears the driver error state, whichever way probing ended.
struct ProbeScope<'a> {
    driver: &'a dyn GlDriver,
    framebuffers: Vec<GLuint>,
    renderbuffers: Vec<GLuint>,
    textures: Vec<GLuint>,
}

impl<'a> ProbeScope<'a> {
    fn new(driver: &'a dyn GlDriver) -> Self {
        Self {
            driver,
            framebuffers: Vec::new(),
            renderbuffers: Vec::new(),
            textures: Vec::new(),
        }
    }

    /// Create and bind a framebuffer
    fn framebuffer(&mut self) -> Option<GLuint> {
        match self.driver.gen_framebuffer() {
            Ok(fb) => {
                self.framebuffers.push(fb);
                self.driver.bind_framebuffer(GL_FRAMEBUFFER, fb);
                Some(fb)
            }
            Err(e) => {
                engine_debug!(SOURCE, "Probe framebuffer creation failed: {}", e);
                None
            }
        }
    }

    /// Create a renderbuffer with `format` storage
    fn renderbuffer(&mut self, format: GLenum, size: GLsizei) -> Option<GLuint> {
        match self.driver.gen_renderbuffer() {
            Ok(rb) => {
                self.renderbuffers.push(rb);
                self.driver.bind_renderbuffer(GL_RENDERBUFFER, rb);
                self.driver.renderbuffer_storage(GL_RENDERBUFFER, format, size, size);
                Some(rb)
            }
            Err(e) => {
                engine_debug!(SOURCE, "Probe renderbuffer creation failed: {}", e);
                None
            }
        }
    }

    /// Create a nearest-filtered, edge-clamped texture with level 0 storage
    fn texture(
        &mut self,
        internal_format: GLenum,
        origin_format: GLenum,
        data_type: GLenum,
        size: GLsizei,
    ) -> Option<GLuint> {
        match self.driver.gen_texture() {
            Ok(tex) => {
                self.textures.push(tex);
                let driver = self.driver;
                driver.bind_texture(GL_TEXTURE_2D, tex);
                driver.tex_parameter_i32(GL_TEXTURE_2D, GL_TEXTURE_MIN_FILTER, GL_NEAREST);
                driver.tex_parameter_i32(GL_TEXTURE_2D, GL_TEXTURE_MAG_FILTER, GL_NEAREST);
                driver.tex_parameter_i32(GL_TEXTURE_2D, GL_TEXTURE_WRAP_S, GL_CLAMP_TO_EDGE);
                driver.tex_parameter_i32(GL_TEXTURE_2D, GL_TEXTURE_WRAP_T, GL_CLAMP_TO_EDGE);
                driver.tex_image_2d(
                    GL_TEXTURE_2D,
                    0,
                    internal_format as GLint,
                    size,
                    size,
                    origin_format,
                    data_type,
                );
                Some(tex)
            }
            Err(e) => {
                engine_debug!(SOURCE, "Probe texture creation failed: {}", e);
                None
            }
        }
    }
}

impl Drop for ProbeScope<'_> {
    fn drop(&mut self) {
        self.driver.bind_framebuffer(GL_FRAMEBUFFER, 0);
        self.driver.bind_renderbuffer(GL_RENDERBUFFER, 0);
        self.driver.bind_texture(GL_TEXTURE_2D, 0);
        self.driver.delete_framebuffers(&self.framebuffers);
        self.driver.delete_renderbuffers(&self.renderbuffers);
        self.driver.delete_textures(&self.textures);

        // Unsupported probes leave errors behind; none of them matter
        for _ in 0..MAX_DRAINED_ERRORS {
            if self.driver.get_error() == GL_NO_ERROR {
                break;
            }
        }
    }
}

/// Outcome of one probing pass
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub table: FormatPropertyTable,
    /// Working depth/stencil modes, in probe order
    pub modes: Vec<Mode>,
    pub elapsed: Duration,
}

impl ProbeReport {
    /// Log the elapsed time, the color-renderable formats and the modes at INFO
    pub fn log_summary(&self) {
        engine_info!(
            SOURCE,
            "FBO probing took {:.3} ms",
            self.elapsed.as_secs_f64() * 1000.0
        );

        let formats: Vec<&str> = self.table.valid_formats().map(|format| format.name()).collect();
        engine_info!(
            SOURCE,
            "Formats supported when used as color attachment: {}",
            formats.join(" ")
        );

        let modes: String = self
            .modes
            .iter()
            .map(|mode| format!(" D{}S{}", mode.depth_bits(), mode.stencil_bits()))
            .collect();
        engine_info!(SOURCE, "Depth/stencil modes supported:{}", modes);
    }
}

/// One probing pass against a driver
pub struct Gles2FboProber<'a> {
    driver: &'a dyn GlDriver,
    pixel_util: Gles2PixelUtil,
    probe_size: GLsizei,
}

impl<'a> Gles2FboProber<'a> {
    pub fn new(driver: &'a dyn GlDriver, pixel_util: Gles2PixelUtil, probe_size: u32) -> Self {
        let probe_size = GLsizei::try_from(probe_size).unwrap_or(GLsizei::MAX);
        Self { driver, pixel_util, probe_size }
    }

    /// Edge of the square probe surfaces, clamped to what GL accepts
    pub fn probe_size(&self) -> GLsizei {
        self.probe_size
    }

    /// Probe every depth/stencil pair and color format
    ///
    /// Blocks for as long as the driver takes to answer a few hundred
    /// completeness queries. Every object created is released before
    /// returning, even when allocations fail halfway.
    pub fn detect_formats(&self) -> ProbeReport {
        let start = Instant::now();
        let caps = *self.pixel_util.capabilities();

        // GLES3: float depth and packed formats natively, no 1/4-bit stencil
        let (depth_count, stencil_step) = if caps.is_gles3() {
            (DEPTH_FORMATS.len(), 3)
        } else {
            (DEPTH_FORMATS.len() - 1, 1)
        };

        let mut scope = ProbeScope::new(self.driver);

        let mut depth_probes: Vec<(Mode, GLuint)> = Vec::new();
        for depth in 0..depth_count {
            let depth_format = DEPTH_FORMATS[depth];
            if !is_packed_depth_stencil(depth_format) {
                for stencil in (0..STENCIL_FORMATS.len()).step_by(stencil_step) {
                    let probe = self.depth_stencil_probe(&mut scope, depth_format, STENCIL_FORMATS[stencil]);
                    if let Some(fb) = probe {
                        depth_probes.push((Mode::new(depth, stencil), fb));
                    }
                }
            } else if caps.supports_packed_depth_stencil() {
                if let Some(fb) = self.packed_depth_stencil_probe(&mut scope, depth_format) {
                    depth_probes.push((Mode::new(depth, 0), fb));
                }
            }
        }

        let mut color_probes: Vec<(PixelFormat, GLuint)> = Vec::new();
        for format in PixelFormat::ALL {
            if let Some(fb) = self.color_probe(&mut scope, format) {
                color_probes.push((format, fb));
            }
        }

        let modes: Vec<Mode> = depth_probes
            .iter()
            .filter(|(_, fb)| self.is_complete(*fb))
            .map(|(mode, _)| *mode)
            .collect();

        let mut table = FormatPropertyTable::new();
        for (format, fb) in color_probes {
            if self.is_complete(fb) {
                table.set(format, FormatProperties { valid: true, modes: modes.clone() });
            }
        }

        drop(scope);

        ProbeReport { table, modes, elapsed: start.elapsed() }
    }

    fn is_complete(&self, fb: GLuint) -> bool {
        self.driver.bind_framebuffer(GL_FRAMEBUFFER, fb);
        let status = self.driver.check_framebuffer_status(GL_FRAMEBUFFER);
        if status != GL_FRAMEBUFFER_COMPLETE {
            engine_trace!(SOURCE, "Probe framebuffer {} incomplete: {}", fb, framebuffer_status_name(status));
        }
        status == GL_FRAMEBUFFER_COMPLETE
    }

    /// RGB byte color texture every depth/stencil probe renders into
    fn attach_probe_color(&self, scope: &mut ProbeScope<'_>) -> Option<()> {
        let mapping = self.pixel_util.mapping(PixelFormat::R8G8B8_UNORM);
        let tex = scope.texture(
            mapping.internal_format,
            mapping.origin_format,
            mapping.data_type,
            self.probe_size,
        )?;
        self.driver
            .framebuffer_texture_2d(GL_FRAMEBUFFER, GL_COLOR_ATTACHMENT0, GL_TEXTURE_2D, tex, 0);
        Some(())
    }

    fn depth_stencil_probe(
        &self,
        scope: &mut ProbeScope<'_>,
        depth_format: GLenum,
        stencil_format: GLenum,
    ) -> Option<GLuint> {
        let fb = scope.framebuffer()?;
        self.attach_probe_color(scope)?;

        if depth_format != GL_NONE {
            let rb = scope.renderbuffer(depth_format, self.probe_size)?;
            self.driver
                .framebuffer_renderbuffer(GL_FRAMEBUFFER, GL_DEPTH_ATTACHMENT, GL_RENDERBUFFER, rb);
        }
        if stencil_format != GL_NONE {
            let rb = scope.renderbuffer(stencil_format, self.probe_size)?;
            self.driver
                .framebuffer_renderbuffer(GL_FRAMEBUFFER, GL_STENCIL_ATTACHMENT, GL_RENDERBUFFER, rb);
        }
        Some(fb)
    }

    fn packed_depth_stencil_probe(&self, scope: &mut ProbeScope<'_>, packed_format: GLenum) -> Option<GLuint> {
        let fb = scope.framebuffer()?;
        self.attach_probe_color(scope)?;

        let rb = scope.renderbuffer(packed_format, self.probe_size)?;
        self.driver
            .framebuffer_renderbuffer(GL_FRAMEBUFFER, GL_DEPTH_ATTACHMENT, GL_RENDERBUFFER, rb);
        self.driver
            .framebuffer_renderbuffer(GL_FRAMEBUFFER, GL_STENCIL_ATTACHMENT, GL_RENDERBUFFER, rb);
        Some(fb)
    }

    /// Framebuffer with a `format` texture attached, `None` when the format is skipped
    fn color_probe(&self, scope: &mut ProbeScope<'_>, format: PixelFormat) -> Option<GLuint> {
        let mapping = self.pixel_util.mapping(format);

        // Unknown stays: an attachment-less framebuffer stands for depth/stencil-only targets
        if format != PixelFormat::Unknown && mapping.has_none() {
            engine_trace!(SOURCE, "Skipping {}: not available on this driver", format.name());
            return None;
        }
        if mapping.origin_format == GL_BGRA_EXT || format.is_compressed() {
            return None;
        }

        let fb = scope.framebuffer()?;
        if mapping.internal_format != GL_NONE {
            let tex = scope.texture(
                mapping.internal_format,
                mapping.origin_format,
                mapping.data_type,
                self.probe_size,
            )?;
            let attachment = if mapping.origin_format == GL_DEPTH_COMPONENT {
                GL_DEPTH_ATTACHMENT
            } else {
                GL_COLOR_ATTACHMENT0
            };
            self.driver.framebuffer_texture_2d(GL_FRAMEBUFFER, attachment, GL_TEXTURE_2D, tex, 0);
        }
        Some(fb)
    }
}

#[cfg(test)]
#[path = "gles2_fbo_probe_tests.rs"]
mod tests;
