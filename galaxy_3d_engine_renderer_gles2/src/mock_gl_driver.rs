/// Mock GL driver for unit tests (no GL context required)
///
/// Emulates the object model of an OpenGL ES context closely enough for the
/// FBO manager: names are handed out sequentially, storage formats are
/// remembered, and `glCheckFramebufferStatus` applies per-profile
/// renderability rules. Every create/delete is tracked so tests can assert
/// that nothing leaks and nothing is freed twice.

use std::cell::RefCell;
use rustc_hash::FxHashMap;
use galaxy_3d_engine::galaxy3d::{Error, Result};
use crate::gles2_consts::*;
use crate::gles2_driver::{GlDriver, GlVersion};

// ============================================================================
// Profile
// ============================================================================

/// What the emulated driver supports
#[derive(Debug, Clone)]
pub struct MockGlProfile {
    pub version: GlVersion,
    pub extensions: Vec<&'static str>,
    pub max_samples: GLint,
    /// Internal formats accepted on COLOR_ATTACHMENT0
    pub color_renderable: Vec<GLenum>,
    /// Internal formats accepted on DEPTH_ATTACHMENT
    pub depth_formats: Vec<GLenum>,
    /// Internal formats accepted on STENCIL_ATTACHMENT
    pub stencil_formats: Vec<GLenum>,
    /// Packed formats accepted on both DEPTH and STENCIL attachments
    pub packed_formats: Vec<GLenum>,
    /// Whether distinct depth and stencil renderbuffers may be combined
    pub separate_depth_stencil: bool,
}

impl MockGlProfile {
    /// Typical GLES 3.0 mobile driver with EXT_color_buffer_float
    pub fn gles3() -> Self {
        Self {
            version: GlVersion::new(3, 0),
            extensions: vec!["GL_EXT_texture_format_BGRA8888", "GL_EXT_color_buffer_float"],
            max_samples: 4,
            color_renderable: vec![
                GL_R8,
                GL_RG8,
                GL_RGB8,
                GL_RGBA8,
                GL_SRGB8_ALPHA8,
                GL_RGB565,
                GL_RGBA4,
                GL_RGB5_A1,
                GL_RGB10_A2,
                GL_R11F_G11F_B10F,
                GL_R16F,
                GL_RG16F,
                GL_RGBA16F,
                GL_R32F,
                GL_RG32F,
                GL_RGBA32F,
            ],
            depth_formats: vec![GL_DEPTH_COMPONENT16, GL_DEPTH_COMPONENT24_OES, GL_DEPTH_COMPONENT32F],
            stencil_formats: vec![GL_STENCIL_INDEX8],
            packed_formats: vec![GL_DEPTH24_STENCIL8_OES, GL_DEPTH32F_STENCIL8],
            separate_depth_stencil: false,
        }
    }

    /// Typical GLES 2.0 driver: unsized formats, 16/24-bit depth, packed depth extension
    pub fn gles2() -> Self {
        Self {
            version: GlVersion::new(2, 0),
            extensions: vec!["GL_OES_packed_depth_stencil", "GL_OES_depth24"],
            max_samples: 0,
            color_renderable: vec![GL_RGB, GL_RGBA, GL_RGB565, GL_RGBA4, GL_RGB5_A1],
            depth_formats: vec![GL_DEPTH_COMPONENT16, GL_DEPTH_COMPONENT24_OES],
            stencil_formats: vec![GL_STENCIL_INDEX8],
            packed_formats: vec![GL_DEPTH24_STENCIL8_OES],
            separate_depth_stencil: false,
        }
    }

    fn accepts_storage(&self, format: GLenum) -> bool {
        self.color_renderable.contains(&format)
            || self.depth_formats.contains(&format)
            || self.stencil_formats.contains(&format)
            || self.packed_formats.contains(&format)
    }
}

// ============================================================================
// State
// ============================================================================

/// Image bound to a framebuffer attachment point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockAttachment {
    Texture(GLuint),
    Renderbuffer(GLuint),
}

/// Storage allocated for a texture level 0 or a renderbuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockStorage {
    pub format: GLenum,
    pub width: GLsizei,
    pub height: GLsizei,
    pub samples: GLsizei,
}

#[derive(Debug, Default)]
struct MockState {
    next_name: GLuint,
    framebuffers: FxHashMap<GLuint, FxHashMap<GLenum, MockAttachment>>,
    renderbuffers: FxHashMap<GLuint, Option<MockStorage>>,
    textures: FxHashMap<GLuint, Option<MockStorage>>,
    draw_framebuffer: GLuint,
    read_framebuffer: GLuint,
    bound_renderbuffer: GLuint,
    bound_texture: GLuint,
    errors: Vec<GLenum>,
    gens: usize,
    fail_gen_after: Option<usize>,
    double_deletes: usize,
    deleted_renderbuffers: Vec<GLuint>,
    framebuffer_binds: Vec<GLuint>,
    blits: usize,
}

impl MockState {
    fn gen_name(&mut self) -> Result<GLuint> {
        if self.fail_gen_after.is_some_and(|limit| self.gens >= limit) {
            self.errors.push(GL_OUT_OF_MEMORY);
            return Err(Error::OutOfMemory);
        }
        self.gens += 1;
        self.next_name += 1;
        Ok(self.next_name)
    }

    fn record_error(&mut self, error: GLenum) {
        self.errors.push(error);
    }

    fn storage_of(&self, attachment: MockAttachment) -> Option<MockStorage> {
        match attachment {
            MockAttachment::Texture(name) => self.textures.get(&name).copied().flatten(),
            MockAttachment::Renderbuffer(name) => self.renderbuffers.get(&name).copied().flatten(),
        }
    }

    fn bound_for(&self, target: GLenum) -> GLuint {
        if target == GL_READ_FRAMEBUFFER {
            self.read_framebuffer
        } else {
            self.draw_framebuffer
        }
    }
}

// ============================================================================
// MockGlDriver
// ============================================================================

pub struct MockGlDriver {
    profile: MockGlProfile,
    state: RefCell<MockState>,
}

impl MockGlDriver {
    pub fn with_profile(profile: MockGlProfile) -> Self {
        Self { profile, state: RefCell::new(MockState::default()) }
    }

    pub fn gles3() -> Self {
        Self::with_profile(MockGlProfile::gles3())
    }

    pub fn gles2() -> Self {
        Self::with_profile(MockGlProfile::gles2())
    }

    /// Make every `gen_*` call fail once `count` objects have been created
    pub fn fail_gen_after(&self, count: usize) {
        let mut state = self.state.borrow_mut();
        state.fail_gen_after = Some(state.gens + count);
    }

    /// Forget every object, as a lost context does
    pub fn lose_context(&self) {
        let mut state = self.state.borrow_mut();
        let next_name = state.next_name;
        *state = MockState::default();
        state.next_name = next_name;
    }

    /// Create a texture with level 0 storage (test helper)
    pub fn create_texture(&self, internal_format: GLenum, width: GLsizei, height: GLsizei) -> GLuint {
        let mut state = self.state.borrow_mut();
        let name = state.gen_name().unwrap();
        state.textures.insert(
            name,
            Some(MockStorage { format: internal_format, width, height, samples: 0 }),
        );
        name
    }

    // ===== INSPECTION =====

    /// Names created since the last context loss
    pub fn gen_count(&self) -> usize {
        self.state.borrow().gens
    }

    pub fn live_framebuffers(&self) -> usize {
        self.state.borrow().framebuffers.len()
    }

    pub fn live_renderbuffers(&self) -> usize {
        self.state.borrow().renderbuffers.len()
    }

    pub fn live_textures(&self) -> usize {
        self.state.borrow().textures.len()
    }

    pub fn live_objects(&self) -> usize {
        self.live_framebuffers() + self.live_renderbuffers() + self.live_textures()
    }

    pub fn is_framebuffer(&self, name: GLuint) -> bool {
        self.state.borrow().framebuffers.contains_key(&name)
    }

    pub fn is_renderbuffer(&self, name: GLuint) -> bool {
        self.state.borrow().renderbuffers.contains_key(&name)
    }

    /// Deletes of names that were not alive
    pub fn double_deletes(&self) -> usize {
        self.state.borrow().double_deletes
    }

    /// Every renderbuffer name ever deleted, in order
    pub fn deleted_renderbuffers(&self) -> Vec<GLuint> {
        self.state.borrow().deleted_renderbuffers.clone()
    }

    pub fn renderbuffer_storage_of(&self, name: GLuint) -> Option<MockStorage> {
        self.state.borrow().renderbuffers.get(&name).copied().flatten()
    }

    pub fn attachment(&self, framebuffer: GLuint, attachment: GLenum) -> Option<MockAttachment> {
        self.state
            .borrow()
            .framebuffers
            .get(&framebuffer)
            .and_then(|points| points.get(&attachment).copied())
    }

    /// Framebuffer currently bound for drawing
    pub fn bound_framebuffer(&self) -> GLuint {
        self.state.borrow().draw_framebuffer
    }

    /// Names passed to every GL_FRAMEBUFFER / GL_DRAW_FRAMEBUFFER bind, in order
    pub fn framebuffer_binds(&self) -> Vec<GLuint> {
        self.state.borrow().framebuffer_binds.clone()
    }

    pub fn blit_count(&self) -> usize {
        self.state.borrow().blits
    }

    /// Errors recorded but not yet popped by `get_error`
    pub fn pending_errors(&self) -> usize {
        self.state.borrow().errors.len()
    }
}

impl GlDriver for MockGlDriver {
    fn version(&self) -> GlVersion {
        self.profile.version
    }

    fn check_extension(&self, name: &str) -> bool {
        self.profile.extensions.iter().any(|ext| *ext == name)
    }

    fn get_integer(&self, pname: GLenum) -> GLint {
        match pname {
            GL_MAX_SAMPLES if self.profile.version >= GlVersion::new(3, 0) => self.profile.max_samples,
            GL_FRAMEBUFFER_BINDING => self.state.borrow().draw_framebuffer as GLint,
            _ => {
                self.state.borrow_mut().record_error(GL_INVALID_ENUM);
                0
            }
        }
    }

    fn get_error(&self) -> GLenum {
        let mut state = self.state.borrow_mut();
        if state.errors.is_empty() {
            GL_NO_ERROR
        } else {
            state.errors.remove(0)
        }
    }

    // ===== FRAMEBUFFERS =====

    fn gen_framebuffer(&self) -> Result<GLuint> {
        let mut state = self.state.borrow_mut();
        let name = state.gen_name()?;
        state.framebuffers.insert(name, FxHashMap::default());
        Ok(name)
    }

    fn delete_framebuffers(&self, framebuffers: &[GLuint]) {
        let mut state = self.state.borrow_mut();
        for &name in framebuffers.iter().filter(|&&name| name != 0) {
            if state.framebuffers.remove(&name).is_none() {
                state.double_deletes += 1;
                continue;
            }
            if state.draw_framebuffer == name {
                state.draw_framebuffer = 0;
            }
            if state.read_framebuffer == name {
                state.read_framebuffer = 0;
            }
        }
    }

    fn bind_framebuffer(&self, target: GLenum, framebuffer: GLuint) {
        let mut state = self.state.borrow_mut();
        if framebuffer != 0 && !state.framebuffers.contains_key(&framebuffer) {
            state.record_error(GL_INVALID_OPERATION);
            return;
        }
        match target {
            GL_READ_FRAMEBUFFER => state.read_framebuffer = framebuffer,
            GL_DRAW_FRAMEBUFFER => {
                state.draw_framebuffer = framebuffer;
                state.framebuffer_binds.push(framebuffer);
            }
            _ => {
                state.draw_framebuffer = framebuffer;
                state.read_framebuffer = framebuffer;
                state.framebuffer_binds.push(framebuffer);
            }
        }
    }

    fn check_framebuffer_status(&self, target: GLenum) -> GLenum {
        let state = self.state.borrow();
        let name = state.bound_for(target);
        if name == 0 {
            return GL_FRAMEBUFFER_COMPLETE;
        }
        let Some(points) = state.framebuffers.get(&name) else {
            return GL_FRAMEBUFFER_UNSUPPORTED;
        };
        if points.is_empty() {
            return GL_FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT;
        }

        let mut reference: Option<MockStorage> = None;
        for point in [GL_COLOR_ATTACHMENT0, GL_DEPTH_ATTACHMENT, GL_STENCIL_ATTACHMENT] {
            let Some(&attachment) = points.get(&point) else {
                continue;
            };
            let Some(storage) = state.storage_of(attachment) else {
                return GL_FRAMEBUFFER_INCOMPLETE_ATTACHMENT;
            };
            let packed = self.profile.packed_formats.contains(&storage.format);
            let accepted = match point {
                GL_COLOR_ATTACHMENT0 => self.profile.color_renderable.contains(&storage.format),
                GL_DEPTH_ATTACHMENT => packed || self.profile.depth_formats.contains(&storage.format),
                _ => packed || self.profile.stencil_formats.contains(&storage.format),
            };
            if !accepted {
                return GL_FRAMEBUFFER_INCOMPLETE_ATTACHMENT;
            }
            match reference {
                None => reference = Some(storage),
                Some(first) => {
                    if (first.width, first.height) != (storage.width, storage.height) {
                        return GL_FRAMEBUFFER_INCOMPLETE_DIMENSIONS;
                    }
                    if first.samples != storage.samples {
                        return GL_FRAMEBUFFER_INCOMPLETE_MULTISAMPLE;
                    }
                }
            }
        }

        if let (Some(depth), Some(stencil)) =
            (points.get(&GL_DEPTH_ATTACHMENT), points.get(&GL_STENCIL_ATTACHMENT))
        {
            if depth != stencil && !self.profile.separate_depth_stencil {
                return GL_FRAMEBUFFER_UNSUPPORTED;
            }
        }

        GL_FRAMEBUFFER_COMPLETE
    }

    fn framebuffer_texture_2d(
        &self,
        target: GLenum,
        attachment: GLenum,
        _texture_target: GLenum,
        texture: GLuint,
        _level: GLint,
    ) {
        let mut state = self.state.borrow_mut();
        let bound = state.bound_for(target);
        let Some(points) = state.framebuffers.get_mut(&bound) else {
            state.record_error(GL_INVALID_OPERATION);
            return;
        };
        if texture == 0 {
            points.remove(&attachment);
        } else {
            points.insert(attachment, MockAttachment::Texture(texture));
        }
    }

    fn framebuffer_renderbuffer(
        &self,
        target: GLenum,
        attachment: GLenum,
        _renderbuffer_target: GLenum,
        renderbuffer: GLuint,
    ) {
        let mut state = self.state.borrow_mut();
        let bound = state.bound_for(target);
        let Some(points) = state.framebuffers.get_mut(&bound) else {
            state.record_error(GL_INVALID_OPERATION);
            return;
        };
        if renderbuffer == 0 {
            points.remove(&attachment);
        } else {
            points.insert(attachment, MockAttachment::Renderbuffer(renderbuffer));
        }
    }

    fn blit_framebuffer(&self, _src: [GLint; 4], _dst: [GLint; 4], _mask: GLbitfield, _filter: GLenum) {
        let mut state = self.state.borrow_mut();
        if state.read_framebuffer == state.draw_framebuffer {
            state.record_error(GL_INVALID_OPERATION);
            return;
        }
        state.blits += 1;
    }

    // ===== RENDERBUFFERS =====

    fn gen_renderbuffer(&self) -> Result<GLuint> {
        let mut state = self.state.borrow_mut();
        let name = state.gen_name()?;
        state.renderbuffers.insert(name, None);
        Ok(name)
    }

    fn delete_renderbuffers(&self, renderbuffers: &[GLuint]) {
        let mut state = self.state.borrow_mut();
        for &name in renderbuffers.iter().filter(|&&name| name != 0) {
            if state.renderbuffers.remove(&name).is_none() {
                state.double_deletes += 1;
                continue;
            }
            state.deleted_renderbuffers.push(name);
            if state.bound_renderbuffer == name {
                state.bound_renderbuffer = 0;
            }
        }
    }

    fn bind_renderbuffer(&self, _target: GLenum, renderbuffer: GLuint) {
        let mut state = self.state.borrow_mut();
        if renderbuffer != 0 && !state.renderbuffers.contains_key(&renderbuffer) {
            state.record_error(GL_INVALID_OPERATION);
            return;
        }
        state.bound_renderbuffer = renderbuffer;
    }

    fn renderbuffer_storage(&self, target: GLenum, internal_format: GLenum, width: GLsizei, height: GLsizei) {
        self.renderbuffer_storage_multisample(target, 0, internal_format, width, height);
    }

    fn renderbuffer_storage_multisample(
        &self,
        _target: GLenum,
        samples: GLsizei,
        internal_format: GLenum,
        width: GLsizei,
        height: GLsizei,
    ) {
        let mut state = self.state.borrow_mut();
        let bound = state.bound_renderbuffer;
        if bound == 0 {
            state.record_error(GL_INVALID_OPERATION);
            return;
        }
        if !self.profile.accepts_storage(internal_format) {
            state.record_error(GL_INVALID_ENUM);
            return;
        }
        if samples > self.profile.max_samples {
            state.record_error(GL_INVALID_VALUE);
            return;
        }
        state.renderbuffers.insert(
            bound,
            Some(MockStorage { format: internal_format, width, height, samples }),
        );
    }

    // ===== TEXTURES =====

    fn gen_texture(&self) -> Result<GLuint> {
        let mut state = self.state.borrow_mut();
        let name = state.gen_name()?;
        state.textures.insert(name, None);
        Ok(name)
    }

    fn delete_textures(&self, textures: &[GLuint]) {
        let mut state = self.state.borrow_mut();
        for &name in textures.iter().filter(|&&name| name != 0) {
            if state.textures.remove(&name).is_none() {
                state.double_deletes += 1;
                continue;
            }
            if state.bound_texture == name {
                state.bound_texture = 0;
            }
        }
    }

    fn bind_texture(&self, _target: GLenum, texture: GLuint) {
        let mut state = self.state.borrow_mut();
        if texture != 0 && !state.textures.contains_key(&texture) {
            state.record_error(GL_INVALID_OPERATION);
            return;
        }
        state.bound_texture = texture;
    }

    fn tex_parameter_i32(&self, _target: GLenum, _pname: GLenum, _param: GLint) {}

    fn tex_image_2d(
        &self,
        _target: GLenum,
        level: GLint,
        internal_format: GLint,
        width: GLsizei,
        height: GLsizei,
        _format: GLenum,
        _data_type: GLenum,
    ) {
        let mut state = self.state.borrow_mut();
        let bound = state.bound_texture;
        if bound == 0 {
            state.record_error(GL_INVALID_OPERATION);
            return;
        }
        if level == 0 {
            state.textures.insert(
                bound,
                Some(MockStorage { format: internal_format as GLenum, width, height, samples: 0 }),
            );
        }
    }
}
