/// FBO manager configuration

/// Tunables of `Gles2FboManager`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gles2FboConfig {
    /// Width and height of the textures and renderbuffers used while probing
    pub probe_size: u32,
    /// When false, render textures never get a multisample framebuffer
    pub enable_multisampling: bool,
    /// Log the probe summary at INFO after every probing pass
    pub log_probe_summary: bool,
}

impl Default for Gles2FboConfig {
    fn default() -> Self {
        Self {
            probe_size: 16,
            enable_multisampling: true,
            log_probe_summary: true,
        }
    }
}
