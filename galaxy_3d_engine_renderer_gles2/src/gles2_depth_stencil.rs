/// Depth/stencil candidate tables, per-format properties and mode selection
///
/// Probing records, for every engine pixel format, whether it can be a color
/// attachment and which depth/stencil combinations ("modes") work with it.
/// A mode stores indices into the two fixed candidate tables below.

use galaxy_3d_engine::galaxy3d::render::PixelFormat;
use crate::gles2_consts::*;

/// Stencil renderbuffer candidates, index 0 meaning "no stencil"
pub const STENCIL_FORMATS: [GLenum; 4] = [
    GL_NONE,
    GL_STENCIL_INDEX1_OES,
    GL_STENCIL_INDEX4_OES,
    GL_STENCIL_INDEX8,
];

/// Bits per stencil candidate
pub const STENCIL_BITS: [u32; 4] = [0, 1, 4, 8];

/// Depth renderbuffer candidates, index 0 meaning "no depth"
///
/// The last two entries are packed depth/stencil formats.
pub const DEPTH_FORMATS: [GLenum; 6] = [
    GL_NONE,
    GL_DEPTH_COMPONENT16,
    GL_DEPTH_COMPONENT24_OES,
    GL_DEPTH_COMPONENT32F,
    GL_DEPTH24_STENCIL8_OES,
    GL_DEPTH32F_STENCIL8,
];

/// Bits per depth candidate
pub const DEPTH_BITS: [u32; 6] = [0, 16, 24, 32, 24, 32];

/// A working (depth, stencil) candidate pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mode {
    /// Index into `DEPTH_FORMATS`
    pub depth: usize,
    /// Index into `STENCIL_FORMATS`
    pub stencil: usize,
}

impl Mode {
    pub const fn new(depth: usize, stencil: usize) -> Self {
        Self { depth, stencil }
    }

    pub fn depth_format(&self) -> GLenum {
        DEPTH_FORMATS[self.depth]
    }

    pub fn stencil_format(&self) -> GLenum {
        STENCIL_FORMATS[self.stencil]
    }

    pub fn depth_bits(&self) -> u32 {
        DEPTH_BITS[self.depth]
    }

    pub fn stencil_bits(&self) -> u32 {
        STENCIL_BITS[self.stencil]
    }

    /// Desirability of this mode for a color attachment of the given kind
    ///
    /// Stencil is worth 1000 (ignored for depth-only targets), any depth
    /// 2000, 24-bit depth another 500, packed D24S8 5000 and 32-bit float
    /// depth 6000. Raw bit counts break the remaining ties.
    pub fn desirability(&self, depth_only_target: bool) -> u32 {
        let depth_format = self.depth_format();
        let mut score = 0;

        if self.stencil != 0 && !depth_only_target {
            score += 1000;
        }
        if self.depth != 0 {
            score += 2000;
        }
        if self.depth_bits() == 24 {
            score += 500;
        }
        if depth_format == GL_DEPTH24_STENCIL8_OES {
            score += 5000;
        }
        if depth_format == GL_DEPTH32F_STENCIL8 || depth_format == GL_DEPTH_COMPONENT32F {
            score += 6000;
        }

        score + self.stencil_bits() + self.depth_bits()
    }
}

/// Probe results for one pixel format
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatProperties {
    /// Usable as a color (or depth texture) attachment
    pub valid: bool,
    /// Working depth/stencil modes, in probe order
    pub modes: Vec<Mode>,
}

/// Probe results for every pixel format, indexed by `PixelFormat::index()`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatPropertyTable {
    props: Vec<FormatProperties>,
}

impl Default for FormatPropertyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatPropertyTable {
    /// Table with every format invalid
    pub fn new() -> Self {
        Self { props: vec![FormatProperties::default(); PixelFormat::COUNT] }
    }

    pub fn get(&self, format: PixelFormat) -> &FormatProperties {
        &self.props[format.index()]
    }

    pub(crate) fn set(&mut self, format: PixelFormat, properties: FormatProperties) {
        self.props[format.index()] = properties;
    }

    pub fn is_valid(&self, format: PixelFormat) -> bool {
        self.get(format).valid
    }

    /// Formats usable as color attachment, in format order
    pub fn valid_formats(&self) -> impl Iterator<Item = PixelFormat> + '_ {
        PixelFormat::ALL.iter().copied().filter(|&format| self.is_valid(format))
    }

    /// Best (depth, stencil) internal formats to pair with `format`
    ///
    /// The first mode with the strictly highest desirability wins. Depth-only
    /// targets never get a stencil format. `(GL_NONE, GL_NONE)` when the
    /// format has no working mode.
    pub fn best_depth_stencil(&self, format: PixelFormat) -> (GLenum, GLenum) {
        let depth_only_target = format.is_depth();
        let best = self
            .get(format)
            .modes
            .iter()
            .fold(None::<(Mode, u32)>, |best, mode| {
                let score = mode.desirability(depth_only_target);
                match best {
                    Some((_, best_score)) if score <= best_score => best,
                    _ => Some((*mode, score)),
                }
            });

        match best {
            Some((mode, _)) => {
                let stencil = if depth_only_target { GL_NONE } else { mode.stencil_format() };
                (mode.depth_format(), stencil)
            }
            None => (GL_NONE, GL_NONE),
        }
    }
}

#[cfg(test)]
#[path = "gles2_depth_stencil_tests.rs"]
mod tests;
