/// Gles2FboManager - framebuffer object management for the GLES2 render system
///
/// Owns everything FBO related for one GL context:
/// - the format property table filled by probing the driver
/// - the shared renderbuffer cache (depth, stencil, multisample color)
/// - the render textures and their framebuffer objects
/// - a temporary framebuffer for copies
///
/// All methods must be called from the thread the context is current on.

use std::rc::Rc;
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use galaxy_3d_engine::galaxy3d::render::{PixelComponentType, PixelFormat, RenderTarget};
use galaxy_3d_engine::galaxy3d::{Error, Result};
use galaxy_3d_engine::{engine_bail, engine_debug, engine_info, engine_warn};
use crate::gles2_config::Gles2FboConfig;
use crate::gles2_consts::*;
use crate::gles2_depth_stencil::{FormatProperties, FormatPropertyTable, Mode};
use crate::gles2_driver::{GlDriver, Gles2Capabilities};
use crate::gles2_fbo_probe::Gles2FboProber;
use crate::gles2_frame_buffer::{FboAttachments, Gles2FrameBufferObject};
use crate::gles2_pixel_format::{is_packed_depth_stencil, Gles2PixelUtil};
use crate::gles2_render_buffer::{SurfaceBuffer, SurfaceDesc};
use crate::gles2_render_buffer_cache::{RenderBufferCache, RenderBufferKey};
use crate::gles2_render_target::{Gles2FboRenderTexture, Gles2RenderTarget};

const SOURCE: &str = "galaxy3d::gles2::FBOManager";

new_key_type! {
    /// Handle of a render texture owned by `Gles2FboManager`
    pub struct RenderTextureKey;
}

pub struct Gles2FboManager {
    driver: Rc<dyn GlDriver>,
    config: Gles2FboConfig,
    pixel_util: Gles2PixelUtil,
    props: FormatPropertyTable,
    modes: Vec<Mode>,
    render_buffers: RenderBufferCache,
    render_textures: SlotMap<RenderTextureKey, Gles2FboRenderTexture>,
    render_texture_names: FxHashMap<String, RenderTextureKey>,
    temp_fbo: GLuint,
    max_fsaa_samples: u32,
    context_lost: bool,
}

impl Gles2FboManager {
    /// Probe the driver with the default configuration
    pub fn new(driver: Rc<dyn GlDriver>) -> Result<Self> {
        Self::with_config(driver, Gles2FboConfig::default())
    }

    /// Probe the driver and create the temporary framebuffer
    pub fn with_config(driver: Rc<dyn GlDriver>, config: Gles2FboConfig) -> Result<Self> {
        if config.probe_size == 0 || GLsizei::try_from(config.probe_size).is_err() {
            return Err(Error::InvalidUsage(format!(
                "FBO probe size must be between 1 and {}, got {}",
                GLsizei::MAX,
                config.probe_size
            )));
        }

        let pixel_util = Gles2PixelUtil::new(Gles2Capabilities::query(driver.as_ref()));
        let mut manager = Self {
            render_buffers: RenderBufferCache::new(driver.clone()),
            driver,
            config,
            pixel_util,
            props: FormatPropertyTable::new(),
            modes: Vec::new(),
            render_textures: SlotMap::with_key(),
            render_texture_names: FxHashMap::default(),
            temp_fbo: 0,
            max_fsaa_samples: 0,
            context_lost: false,
        };

        manager.detect_formats();
        manager.temp_fbo = manager.driver.gen_framebuffer()?;
        manager.max_fsaa_samples = manager.query_max_fsaa_samples();

        engine_debug!(
            SOURCE,
            "FBO manager ready (GL {}, max FSAA {})",
            manager.pixel_util.capabilities().version,
            manager.max_fsaa_samples
        );
        Ok(manager)
    }

    // ===== CAPABILITIES =====

    /// Re-probe the driver and replace the format property table
    ///
    /// The previous table stays in place until probing has finished.
    pub fn detect_formats(&mut self) {
        let pixel_util = Gles2PixelUtil::new(Gles2Capabilities::query(self.driver.as_ref()));
        let report =
            Gles2FboProber::new(self.driver.as_ref(), pixel_util, self.config.probe_size).detect_formats();

        if self.config.log_probe_summary {
            report.log_summary();
        }

        self.pixel_util = pixel_util;
        self.props = report.table;
        self.modes = report.modes;
    }

    /// Recreate the temporary framebuffer around a fresh probe
    ///
    /// Refused while the context is lost; use `notify_context_reset` instead.
    pub fn reload(&mut self) -> Result<()> {
        if self.context_lost {
            return Err(Error::InvalidUsage("Cannot reload the FBO manager while the context is lost".to_string()));
        }
        self.driver.delete_framebuffers(&[self.temp_fbo]);
        self.temp_fbo = 0;

        self.detect_formats();
        self.temp_fbo = self.driver.gen_framebuffer()?;
        self.max_fsaa_samples = self.query_max_fsaa_samples();
        Ok(())
    }

    fn query_max_fsaa_samples(&self) -> u32 {
        if self.pixel_util.capabilities().is_gles3() {
            self.driver.get_integer(GL_MAX_SAMPLES).max(0) as u32
        } else {
            0
        }
    }

    pub fn format_properties(&self, format: PixelFormat) -> &FormatProperties {
        self.props.get(format)
    }

    /// True when `format` can be rendered to
    pub fn check_format(&self, format: PixelFormat) -> bool {
        self.props.is_valid(format)
    }

    /// `format` if renderable, else the closest renderable stand-in
    ///
    /// Depth formats fall back to a single-channel float format, color
    /// formats to the RGBA format of their component type, and anything
    /// still unsupported to 8-bit RGBA.
    pub fn supported_alternative(&self, format: PixelFormat) -> PixelFormat {
        if self.check_format(format) {
            return format;
        }

        let fallback = if format.is_depth() {
            match format {
                PixelFormat::D16_UNORM => PixelFormat::R16_SFLOAT,
                _ => PixelFormat::R32_SFLOAT,
            }
        } else {
            match format.component_type() {
                PixelComponentType::Byte => PixelFormat::R8G8B8A8_UNORM,
                PixelComponentType::Float16 => PixelFormat::R16G16B16A16_SFLOAT,
                PixelComponentType::Float32 => PixelFormat::R32G32B32A32_SFLOAT,
                _ => format,
            }
        };

        if self.check_format(fallback) {
            fallback
        } else {
            PixelFormat::R8G8B8A8_UNORM
        }
    }

    /// Best (depth, stencil) renderbuffer formats for a `format` color surface
    ///
    /// `(GL_NONE, GL_NONE)` when no depth/stencil attachment works with it.
    pub fn best_depth_stencil(&self, format: PixelFormat) -> (GLenum, GLenum) {
        self.props.best_depth_stencil(format)
    }

    /// Depth/stencil modes found by the last probe
    pub fn modes(&self) -> &[Mode] {
        &self.modes
    }

    pub fn max_fsaa_samples(&self) -> u32 {
        self.max_fsaa_samples
    }

    pub fn temp_fbo(&self) -> GLuint {
        self.temp_fbo
    }

    pub fn pixel_util(&self) -> &Gles2PixelUtil {
        &self.pixel_util
    }

    pub fn config(&self) -> &Gles2FboConfig {
        &self.config
    }

    pub fn is_context_lost(&self) -> bool {
        self.context_lost
    }

    // ===== RENDERBUFFERS =====

    /// Shared renderbuffer of the given key (null surface for `GL_NONE`)
    pub fn request_render_buffer(
        &mut self,
        format: GLenum,
        width: u32,
        height: u32,
        num_samples: u32,
    ) -> Result<SurfaceDesc> {
        self.render_buffers.request(format, width, height, num_samples)
    }

    /// Give back a surface from `request_render_buffer`
    pub fn release_render_buffer(&mut self, surface: &SurfaceDesc) {
        self.render_buffers.release(surface);
    }

    pub fn render_buffer_refcount(&self, key: &RenderBufferKey) -> usize {
        self.render_buffers.refcount(key)
    }

    pub fn render_buffer_cache(&self) -> &RenderBufferCache {
        &self.render_buffers
    }

    fn release_attachments(&mut self, attachments: &FboAttachments) {
        for surface in attachments.surfaces() {
            self.render_buffers.release(surface);
        }
    }

    /// Depth, stencil and multisample color surfaces for a framebuffer
    ///
    /// Depth texture targets carry their own depth and get nothing else.
    fn request_attachments(
        &mut self,
        format: PixelFormat,
        width: u32,
        height: u32,
        num_samples: u32,
    ) -> Result<FboAttachments> {
        let mut attachments = FboAttachments::default();
        match self.fill_attachments(&mut attachments, format, width, height, num_samples) {
            Ok(()) => Ok(attachments),
            Err(e) => {
                self.release_attachments(&attachments);
                Err(e)
            }
        }
    }

    fn fill_attachments(
        &mut self,
        attachments: &mut FboAttachments,
        format: PixelFormat,
        width: u32,
        height: u32,
        num_samples: u32,
    ) -> Result<()> {
        if format.is_depth() {
            return Ok(());
        }

        if num_samples > 0 {
            let color_format = self.pixel_util.gl_internal_format(format);
            attachments.multisample_color =
                self.render_buffers.request(color_format, width, height, num_samples)?;
        }

        let (depth_format, stencil_format) = self.best_depth_stencil(format);
        attachments.depth = self.render_buffers.request(depth_format, width, height, num_samples)?;
        if is_packed_depth_stencil(depth_format) {
            attachments.packed_depth_stencil = true;
        } else {
            attachments.stencil = self.render_buffers.request(stencil_format, width, height, num_samples)?;
        }
        Ok(())
    }

    // ===== RENDER TEXTURES =====

    /// Pixel format of a color surface
    fn surface_format(&self, surface: &SurfaceDesc) -> PixelFormat {
        match &surface.buffer {
            Some(SurfaceBuffer::Texture(texture)) => texture.format,
            Some(SurfaceBuffer::RenderBuffer(buffer)) => {
                self.pixel_util.closest_pixel_format(buffer.gl_format())
            }
            None => PixelFormat::Unknown,
        }
    }

    fn effective_samples(&self, format: PixelFormat, fsaa: u32) -> u32 {
        if !self.config.enable_multisampling || format.is_depth() {
            0
        } else {
            fsaa.min(self.max_fsaa_samples)
        }
    }

    /// Create a render texture drawing into `color`
    ///
    /// Picks the best depth/stencil pair for the color format, takes them
    /// from the renderbuffer cache and checks the framebuffer is complete.
    /// `fsaa` is clamped to `max_fsaa_samples`.
    ///
    /// A renderbuffer color surface is adopted: it is released with the
    /// render texture, or right away when creation fails. Anything allocated
    /// for a failed creation is released before returning the error.
    pub fn create_render_texture(
        &mut self,
        name: &str,
        color: SurfaceDesc,
        hardware_gamma: bool,
        fsaa: u32,
    ) -> Result<RenderTextureKey> {
        match self.build_frame_buffer(name, color.clone(), fsaa) {
            Ok(fb) => {
                engine_debug!(
                    SOURCE,
                    "Created render texture '{}' ({}x{} {}, {} samples)",
                    name,
                    fb.width(),
                    fb.height(),
                    fb.format().name(),
                    fb.num_samples()
                );
                let render_texture =
                    Gles2FboRenderTexture::new(name.to_string(), fb, hardware_gamma, fsaa);
                let key = self.render_textures.insert(render_texture);
                self.render_texture_names.insert(name.to_string(), key);
                Ok(key)
            }
            Err(e) => {
                self.render_buffers.release(&color);
                Err(e)
            }
        }
    }

    fn build_frame_buffer(
        &mut self,
        name: &str,
        color: SurfaceDesc,
        fsaa: u32,
    ) -> Result<Gles2FrameBufferObject> {
        if self.context_lost {
            return Err(Error::InvalidUsage(format!(
                "Cannot create render texture '{}' while the context is lost",
                name
            )));
        }
        if self.render_texture_names.contains_key(name) {
            return Err(Error::InvalidUsage(format!("Render texture '{}' already exists", name)));
        }
        if color.is_null() {
            return Err(Error::InvalidUsage(format!("Render texture '{}' has no color surface", name)));
        }

        let format = self.surface_format(&color);
        if !self.check_format(format) {
            engine_bail!(
                SOURCE,
                "Render texture '{}': {} is not supported as a render target format",
                name,
                format.name()
            );
        }

        let num_samples = self.effective_samples(format, fsaa);
        let mut fb = Gles2FrameBufferObject::new(self.driver.clone(), num_samples)?;
        fb.bind_surface(0, color, format)?;

        let attachments = self.request_attachments(format, fb.width(), fb.height(), num_samples)?;
        if let Err(e) = fb.initialise(attachments) {
            let attachments = fb.take_attachments();
            self.release_attachments(&attachments);
            return Err(e);
        }
        Ok(fb)
    }

    /// Destroy a render texture and release its surfaces; false if `key` is stale
    pub fn destroy_render_texture(&mut self, key: RenderTextureKey) -> bool {
        let Some(mut render_texture) = self.render_textures.remove(key) else {
            return false;
        };
        self.render_texture_names.remove(render_texture.name());

        let fb = render_texture.frame_buffer_mut();
        let attachments = fb.take_attachments();
        let color = fb.take_color();
        // After a context loss the cache has already forgotten these
        if !self.context_lost {
            self.release_attachments(&attachments);
            self.render_buffers.release(&color);
        }
        true
    }

    pub fn render_texture(&self, key: RenderTextureKey) -> Option<&Gles2FboRenderTexture> {
        self.render_textures.get(key)
    }

    pub fn render_texture_by_name(&self, name: &str) -> Option<RenderTextureKey> {
        self.render_texture_names.get(name).copied()
    }

    pub fn render_texture_count(&self) -> usize {
        self.render_textures.len()
    }

    // ===== BINDING =====

    /// Bind `target` for drawing
    ///
    /// Targets with a framebuffer object bind it; window surfaces bind their
    /// default framebuffer name.
    pub fn bind(&self, target: &dyn Gles2RenderTarget) {
        match target.fbo() {
            Some(fbo) => fbo.bind(),
            None => self.driver.bind_framebuffer(GL_FRAMEBUFFER, target.default_framebuffer()),
        }
    }

    pub fn bind_render_texture(&self, key: RenderTextureKey) -> Result<()> {
        let render_texture = self
            .render_textures
            .get(key)
            .ok_or_else(|| Error::InvalidResource("Unknown render texture".to_string()))?;
        self.bind(render_texture);
        Ok(())
    }

    // ===== CONTEXT LOSS =====

    /// The GL context is gone: forget every GL name without deleting anything
    pub fn notify_context_lost(&mut self) {
        self.context_lost = true;
        self.temp_fbo = 0;
        for render_texture in self.render_textures.values_mut() {
            render_texture.frame_buffer_mut().notify_on_context_lost();
        }
        let forgotten = self.render_buffers.forget_all();
        engine_info!(
            SOURCE,
            "Context lost: dropped {} render textures' framebuffers and {} renderbuffers",
            self.render_textures.len(),
            forgotten
        );
    }

    /// A new context is current: re-probe and rebuild every render texture
    ///
    /// Texture color surfaces must already have been restored by their
    /// owner; renderbuffer color surfaces are recreated here. Only valid
    /// after `notify_context_lost`.
    pub fn notify_context_reset(&mut self) -> Result<()> {
        if !self.context_lost {
            return Err(Error::InvalidUsage("Context reset without a prior context loss".to_string()));
        }
        self.context_lost = false;
        self.detect_formats();
        self.temp_fbo = self.driver.gen_framebuffer()?;
        self.max_fsaa_samples = self.query_max_fsaa_samples();

        let keys: Vec<RenderTextureKey> = self.render_textures.keys().collect();
        for key in keys {
            self.rebuild_render_texture(key)?;
        }
        engine_info!(SOURCE, "Context reset: rebuilt {} render textures", self.render_textures.len());
        Ok(())
    }

    fn rebuild_render_texture(&mut self, key: RenderTextureKey) -> Result<()> {
        let Some(render_texture) = self.render_textures.get_mut(key) else {
            return Ok(());
        };
        let fb = render_texture.frame_buffer_mut();
        fb.notify_on_context_reset()?;

        let format = fb.format();
        let num_samples = fb.num_samples();
        let (width, height) = (fb.width(), fb.height());
        let lost_render_buffer =
            fb.color_surface().as_render_buffer().map(|buffer| (buffer.gl_format(), buffer.num_samples()));

        if let Some((gl_format, samples)) = lost_render_buffer {
            let color = self.render_buffers.request(gl_format, width, height, samples)?;
            // Owned by the FBO from here on, destroy releases it
            match self.render_textures.get_mut(key) {
                Some(render_texture) => render_texture.frame_buffer_mut().bind_surface(0, color, format)?,
                None => {
                    self.render_buffers.release(&color);
                    return Ok(());
                }
            }
        }
        let attachments = self.request_attachments(format, width, height, num_samples)?;

        let Some(render_texture) = self.render_textures.get_mut(key) else {
            self.release_attachments(&attachments);
            return Ok(());
        };
        let fb = render_texture.frame_buffer_mut();
        if let Err(e) = fb.initialise(attachments) {
            let attachments = fb.take_attachments();
            self.release_attachments(&attachments);
            return Err(e);
        }
        Ok(())
    }
}

impl Drop for Gles2FboManager {
    fn drop(&mut self) {
        let keys: Vec<RenderTextureKey> = self.render_textures.keys().collect();
        if !keys.is_empty() {
            engine_debug!(SOURCE, "Destroying {} render textures at shutdown", keys.len());
        }
        for key in keys {
            self.destroy_render_texture(key);
        }

        if !self.render_buffers.is_empty() {
            engine_warn!(
                SOURCE,
                "Not all renderbuffers were released: {} still referenced",
                self.render_buffers.len()
            );
            for (key, refcount) in self.render_buffers.outstanding() {
                engine_warn!(
                    SOURCE,
                    "Leaked renderbuffer: format 0x{:04X}, {}x{}, {} samples, {} references",
                    key.format,
                    key.width,
                    key.height,
                    key.num_samples,
                    refcount
                );
            }
        }

        if !self.context_lost {
            self.driver.delete_framebuffers(&[self.temp_fbo]);
        }
    }
}

#[cfg(test)]
#[path = "gles2_fbo_manager_tests.rs"]
mod tests;
