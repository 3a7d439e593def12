//! Texture handles and the GUI library's texture descriptors

use std::fmt;
use std::num::NonZeroU32;

/// Opaque, 1-based texture handle.
///
/// Handle `h` names registry slot `h - 1`. The null handle (raw value 0) is
/// represented as `Option::<TextureId>::None`, so a `TextureId` is always a
/// real slot reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct TextureId(NonZeroU32);

impl TextureId {
    /// Handle for the registry slot at `index`
    #[inline]
    pub fn from_index(index: usize) -> Self {
        let index = u32::try_from(index).unwrap_or(u32::MAX);
        Self(NonZeroU32::MIN.saturating_add(index))
    }

    /// Registry slot index this handle refers to
    #[inline]
    pub fn index(self) -> usize {
        self.0.get() as usize - 1
    }

    /// Convert the GUI library's raw texture id; zero (and ids wider than
    /// 32 bits) map to `None`
    #[inline]
    pub fn from_raw(raw: u64) -> Option<Self> {
        u32::try_from(raw).ok().and_then(NonZeroU32::new).map(Self)
    }

    /// Raw id as stored by the GUI library, 0 for the null handle
    #[inline]
    pub fn to_raw(id: Option<Self>) -> u64 {
        id.map_or(0, |id| u64::from(id.0.get()))
    }

    /// The 1-based handle value
    #[inline]
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle status the GUI library attaches to each texture it owns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureStatus {
    /// Texture is up to date on the GPU
    Ok,
    /// GPU copy has been released
    Destroyed,
    /// Texture needs a GPU allocation and a full upload
    WantCreate,
    /// Texture needs its dirty rectangles re-uploaded
    WantUpdates,
    /// Texture should be released once no longer in flight
    WantDestroy,
}

/// Pixel layout of a descriptor's CPU-side buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    /// 4 bytes per pixel, RGBA order
    Rgba32,
    /// 1 byte per pixel, coverage only
    Alpha8,
}

impl TextureFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            TextureFormat::Rgba32 => 4,
            TextureFormat::Alpha8 => 1,
        }
    }
}

/// Pixel rectangle inside a texture
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TextureRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl TextureRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether the rectangle lies within a `width` x `height` texture
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x.checked_add(self.width).is_some_and(|r| r <= width)
            && self.y.checked_add(self.height).is_some_and(|b| b <= height)
    }
}

/// A texture owned by the GUI library (font atlas or dynamic image).
///
/// The GUI library fills in the pixels and requests state changes through
/// `status`; the bridge performs the GPU work and acknowledges by moving the
/// status forward and assigning `tex_id`.
#[derive(Debug, Clone)]
pub struct TextureData {
    /// Stable identifier used in logs
    pub unique_id: u32,
    pub status: TextureStatus,
    pub format: TextureFormat,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
    /// Bounding box of all pending updates
    pub update_rect: TextureRect,
    /// Individual pending updates, when the GUI library tracks them separately
    pub updates: Vec<TextureRect>,
    /// Number of frames the texture went unreferenced by draw commands
    pub unused_frames: u32,
    tex_id: Option<TextureId>,
}

impl TextureData {
    /// A descriptor awaiting its first upload
    pub fn new(unique_id: u32, format: TextureFormat, width: u32, height: u32) -> Self {
        let len = width as usize * height as usize * format.bytes_per_pixel();
        Self {
            unique_id,
            status: TextureStatus::WantCreate,
            format,
            width,
            height,
            pixels: vec![0; len],
            update_rect: TextureRect::default(),
            updates: Vec::new(),
            unused_frames: 0,
            tex_id: None,
        }
    }

    /// Handle assigned by the backend, if the texture lives on the GPU
    pub fn tex_id(&self) -> Option<TextureId> {
        self.tex_id
    }

    pub fn set_tex_id(&mut self, id: Option<TextureId>) {
        self.tex_id = id;
    }

    pub fn set_status(&mut self, status: TextureStatus) {
        self.status = status;
    }

    /// Mark a region dirty and request an update
    pub fn mark_dirty(&mut self, rect: TextureRect) {
        self.updates.push(rect);
        self.update_rect = if self.update_rect.is_empty() {
            rect
        } else {
            let x0 = self.update_rect.x.min(rect.x);
            let y0 = self.update_rect.y.min(rect.y);
            let x1 = (self.update_rect.x.saturating_add(self.update_rect.width))
                .max(rect.x.saturating_add(rect.width));
            let y1 = (self.update_rect.y.saturating_add(self.update_rect.height))
                .max(rect.y.saturating_add(rect.height));
            TextureRect::new(x0, y0, x1 - x0, y1 - y0)
        };
        if self.status == TextureStatus::Ok {
            self.status = TextureStatus::WantUpdates;
        }
    }

    /// Take the pending update rectangles, falling back to the bounding box
    pub fn take_updates(&mut self) -> Vec<TextureRect> {
        let updates = std::mem::take(&mut self.updates);
        let bounds = std::mem::take(&mut self.update_rect);
        if updates.is_empty() {
            if bounds.is_empty() {
                Vec::new()
            } else {
                vec![bounds]
            }
        } else {
            updates
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_index_mapping() {
        let id = TextureId::from_index(0);
        assert_eq!(id.get(), 1);
        assert_eq!(id.index(), 0);
        assert_eq!(TextureId::from_index(41).get(), 42);
    }

    #[test]
    fn test_raw_conversions() {
        assert_eq!(TextureId::from_raw(0), None);
        assert_eq!(TextureId::from_raw(u64::MAX), None);
        let id = TextureId::from_raw(5).unwrap();
        assert_eq!(id.index(), 4);
        assert_eq!(TextureId::to_raw(Some(id)), 5);
        assert_eq!(TextureId::to_raw(None), 0);
    }

    #[test]
    fn test_new_descriptor_wants_create() {
        let tex = TextureData::new(1, TextureFormat::Alpha8, 8, 4);
        assert_eq!(tex.status, TextureStatus::WantCreate);
        assert_eq!(tex.pixels.len(), 32);
        assert_eq!(tex.tex_id(), None);
    }

    #[test]
    fn test_mark_dirty_saturates_far_edges() {
        let mut tex = TextureData::new(1, TextureFormat::Rgba32, 4, 4);
        tex.mark_dirty(TextureRect::new(0, 0, 1, 1));
        tex.mark_dirty(TextureRect::new(u32::MAX - 1, u32::MAX - 1, 8, 8));

        assert_eq!(tex.update_rect, TextureRect::new(0, 0, u32::MAX, u32::MAX));
        assert_eq!(tex.updates.len(), 2);
    }

    #[test]
    fn test_mark_dirty_grows_bounds() {
        let mut tex = TextureData::new(1, TextureFormat::Rgba32, 64, 64);
        tex.set_status(TextureStatus::Ok);
        tex.mark_dirty(TextureRect::new(4, 4, 8, 8));
        tex.mark_dirty(TextureRect::new(20, 2, 4, 4));

        assert_eq!(tex.status, TextureStatus::WantUpdates);
        assert_eq!(tex.update_rect, TextureRect::new(4, 2, 20, 10));
        assert_eq!(tex.take_updates().len(), 2);
        assert!(tex.take_updates().is_empty());
    }

    #[test]
    fn test_rect_fits_within() {
        assert!(TextureRect::new(0, 0, 16, 16).fits_within(16, 16));
        assert!(!TextureRect::new(1, 0, 16, 16).fits_within(16, 16));
        assert!(!TextureRect::new(u32::MAX, 0, 2, 1).fits_within(16, 16));
    }
}
