/// Renderer module - backend-independent rendering types and traits

// Module declarations
pub mod pixel_format;
pub mod render_target;

// Re-export from modules
pub use pixel_format::*;
pub use render_target::*;
