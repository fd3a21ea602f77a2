/*!
# Galaxy 3D Engine

Core traits and types for the Galaxy 3D rendering engine.

This crate provides the platform-agnostic pieces every render-system backend
builds on. Backend implementations (OpenGL ES 2/3, ...) live in their own
crates and depend on this one.

## Architecture

- **Error / Result**: shared error type and the `engine_err!` macro family
- **Engine**: global logging facade (`engine_info!`, `engine_warn!`, ...)
- **PixelFormat**: semantic pixel formats and their static properties
- **RenderTarget**: trait implemented by every backend surface
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod renderer;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine logging facade
    pub use crate::engine::Engine;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{DefaultLogger, LogEntry, LogSeverity, Logger};
    }

    // Render sub-module with all rendering types
    pub mod render {
        pub use crate::renderer::*;
    }
}
