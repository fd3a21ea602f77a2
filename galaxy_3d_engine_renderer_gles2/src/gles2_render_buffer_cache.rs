/// RenderBufferCache - shared, reference-counted renderbuffers
///
/// Render targets of the same size and sample count share their depth and
/// stencil renderbuffers. Each `request` takes one reference, each `release`
/// gives one back; the GL renderbuffer is deleted when the count reaches 0.

use std::rc::Rc;
use rustc_hash::FxHashMap;
use galaxy_3d_engine::galaxy3d::Result;
use galaxy_3d_engine::{engine_trace, engine_warn};
use crate::gles2_consts::*;
use crate::gles2_driver::GlDriver;
use crate::gles2_render_buffer::{Gles2RenderBuffer, SurfaceDesc};

const SOURCE: &str = "galaxy3d::gles2::FBOManager";

/// Identity of a shareable renderbuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderBufferKey {
    pub format: GLenum,
    pub width: u32,
    pub height: u32,
    pub num_samples: u32,
}

impl RenderBufferKey {
    pub fn new(format: GLenum, width: u32, height: u32, num_samples: u32) -> Self {
        Self { format, width, height, num_samples }
    }

    fn of(buffer: &Gles2RenderBuffer) -> Self {
        Self::new(buffer.gl_format(), buffer.width(), buffer.height(), buffer.num_samples())
    }
}

struct RenderBufferEntry {
    buffer: Rc<Gles2RenderBuffer>,
    refcount: usize,
}

pub struct RenderBufferCache {
    driver: Rc<dyn GlDriver>,
    entries: FxHashMap<RenderBufferKey, RenderBufferEntry>,
}

impl RenderBufferCache {
    pub fn new(driver: Rc<dyn GlDriver>) -> Self {
        Self { driver, entries: FxHashMap::default() }
    }

    /// Take a reference to a renderbuffer matching the key, allocating it on a miss
    ///
    /// `GL_NONE` yields a null surface and allocates nothing.
    pub fn request(
        &mut self,
        format: GLenum,
        width: u32,
        height: u32,
        num_samples: u32,
    ) -> Result<SurfaceDesc> {
        if format == GL_NONE {
            return Ok(SurfaceDesc::none());
        }

        let key = RenderBufferKey::new(format, width, height, num_samples);
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.refcount += 1;
            return Ok(SurfaceDesc::render_buffer(entry.buffer.clone()));
        }

        let buffer = Rc::new(Gles2RenderBuffer::allocate(
            self.driver.as_ref(),
            format,
            width,
            height,
            num_samples,
        )?);
        engine_trace!(
            SOURCE,
            "Created renderbuffer {} (format 0x{:04X}, {}x{}, {} samples)",
            buffer.handle(),
            format,
            width,
            height,
            num_samples
        );
        self.entries.insert(key, RenderBufferEntry { buffer: buffer.clone(), refcount: 1 });
        Ok(SurfaceDesc::render_buffer(buffer))
    }

    /// Give back one reference; returns true when the GL renderbuffer was deleted
    ///
    /// Null and texture surfaces are ignored. A renderbuffer this cache does
    /// not own (stale after a context loss, or released too often) is
    /// reported and left alone.
    pub fn release(&mut self, surface: &SurfaceDesc) -> bool {
        let Some(buffer) = surface.as_render_buffer() else {
            return false;
        };

        let key = RenderBufferKey::of(buffer);
        let Some(entry) = self.entries.get_mut(&key).filter(|entry| Rc::ptr_eq(&entry.buffer, buffer)) else {
            engine_warn!(
                SOURCE,
                "Released renderbuffer {} is not owned by the cache (format 0x{:04X}, {}x{})",
                buffer.handle(),
                key.format,
                key.width,
                key.height
            );
            return false;
        };

        entry.refcount -= 1;
        if entry.refcount > 0 {
            return false;
        }

        if let Some(entry) = self.entries.remove(&key) {
            self.driver.delete_renderbuffers(&[entry.buffer.handle()]);
            engine_trace!(SOURCE, "Deleted renderbuffer {}", entry.buffer.handle());
        }
        true
    }

    /// References currently held on `key` (0 when absent)
    pub fn refcount(&self, key: &RenderBufferKey) -> usize {
        self.entries.get(key).map_or(0, |entry| entry.refcount)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Live entries with their reference counts, sorted by key
    pub fn outstanding(&self) -> Vec<(RenderBufferKey, usize)> {
        let mut outstanding: Vec<(RenderBufferKey, usize)> = self
            .entries
            .iter()
            .map(|(key, entry)| (*key, entry.refcount))
            .collect();
        outstanding.sort_unstable();
        outstanding
    }

    /// Drop every entry without touching GL (the context that owned them is gone)
    ///
    /// Returns the number of entries forgotten.
    pub fn forget_all(&mut self) -> usize {
        let forgotten = self.entries.len();
        self.entries.clear();
        forgotten
    }
}

#[cfg(test)]
#[path = "gles2_render_buffer_cache_tests.rs"]
mod tests;
