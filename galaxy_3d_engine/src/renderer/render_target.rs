/// RenderTarget trait - a surface the engine renders into
///
/// Implemented by backend types for offscreen render textures and for the
/// window-provided surface. Backends extend it with their own binding data.

use crate::renderer::PixelFormat;

/// Render target trait
pub trait RenderTarget {
    /// Unique name of the target
    fn name(&self) -> &str;

    /// Width of the render target in pixels
    fn width(&self) -> u32;

    /// Height of the render target in pixels
    fn height(&self) -> u32;

    /// Pixel format of the color surface (`PixelFormat::Unknown` for
    /// depth/stencil-only targets)
    fn format(&self) -> PixelFormat;

    /// Effective multisample count (0 = no multisampling)
    fn fsaa(&self) -> u32 {
        0
    }

    /// True when writes are converted to sRGB by the hardware
    fn is_hardware_gamma_enabled(&self) -> bool {
        false
    }
}
