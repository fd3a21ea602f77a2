/*!
# Galaxy 3D Engine - OpenGL ES 2 Renderer Backend

Framebuffer object management for the OpenGL ES 2/3 render system.

On creation the `Gles2FboManager` probes the driver for every pixel format
that can be rendered to and every depth/stencil combination that works
with it. Render textures then get the best depth/stencil attachments the
driver offers, shared between targets of the same size through a
refcounted renderbuffer cache.

All GL traffic goes through the `GlDriver` trait; `GlowDriver` implements
it on top of a glow context.

## Example

```no_run
use std::rc::Rc;
use galaxy_3d_engine_renderer_gles2::{GlowDriver, Gles2FboManager};

# fn run(gl: glow::Context) -> galaxy_3d_engine::galaxy3d::Result<()> {
let driver = Rc::new(unsafe { GlowDriver::new(gl) });
let mut fbo_manager = Gles2FboManager::new(driver)?;
let color = fbo_manager.request_render_buffer(0x8058 /* GL_RGBA8 */, 512, 512, 0)?;
let target = fbo_manager.create_render_texture("offscreen", color, false, 4)?;
fbo_manager.bind_render_texture(target)?;
# Ok(())
# }
```
*/

pub mod gles2_consts;
mod gles2_config;
mod gles2_driver;
mod gles2_glow_driver;
mod gles2_pixel_format;
mod gles2_depth_stencil;
mod gles2_fbo_probe;
mod gles2_render_buffer;
mod gles2_render_buffer_cache;
mod gles2_frame_buffer;
mod gles2_render_target;
mod gles2_fbo_manager;

#[cfg(test)]
mod mock_gl_driver;

pub use gles2_config::Gles2FboConfig;
pub use gles2_driver::{GlDriver, GlExtensions, GlVersion, Gles2Capabilities};
pub use gles2_glow_driver::GlowDriver;
pub use gles2_pixel_format::{is_packed_depth_stencil, GlFormatMapping, Gles2PixelUtil};
pub use gles2_depth_stencil::{FormatProperties, FormatPropertyTable, Mode};
pub use gles2_fbo_probe::{Gles2FboProber, ProbeReport};
pub use gles2_render_buffer::{Gles2RenderBuffer, Gles2TextureSurface, SurfaceBuffer, SurfaceDesc};
pub use gles2_render_buffer_cache::{RenderBufferCache, RenderBufferKey};
pub use gles2_frame_buffer::{FboAttachments, Gles2FrameBufferObject};
pub use gles2_render_target::{Gles2FboRenderTexture, Gles2RenderTarget, Gles2WindowSurface};
pub use gles2_fbo_manager::{Gles2FboManager, RenderTextureKey};
