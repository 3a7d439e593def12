//! Slot-based texture registry
//!
//! Maps 1-based [`TextureId`] handles to exclusively owned GPU textures.
//! Handles are dense: a freed slot is handed out again before the slot array
//! grows, and the array doubles when it runs out.

use imbridge_core::{bridge_debug, BridgeError, LogCategory, Result, TextureId};

use crate::backend::GpuTexture;

/// Owns every GPU texture the bridge can draw with
#[derive(Debug)]
pub struct TextureRegistry<T: GpuTexture> {
    slots: Vec<Option<T>>,
    /// Lowest vacant slot, or `slots.len()` when full
    free_index: usize,
}

impl<T: GpuTexture> Default for TextureRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: GpuTexture> TextureRegistry<T> {
    pub fn new() -> Self {
        Self::with_capacity(1)
    }

    /// Registry with `capacity` vacant slots (at least one)
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::new();
        slots.resize_with(capacity.max(1), || None);
        Self {
            slots,
            free_index: 0,
        }
    }

    /// Take ownership of `texture` and return its handle
    pub fn register(&mut self, texture: T) -> TextureId {
        if self.free_index >= self.slots.len() {
            let new_len = (self.slots.len() * 2).max(1);
            bridge_debug!(
                LogCategory::Texture,
                "texture registry grows {} -> {} slots",
                self.slots.len(),
                new_len
            );
            self.slots.resize_with(new_len, || None);
        }

        let index = self.free_index;
        if let Some(mut stale) = self.slots[index].replace(texture) {
            stale.release_gpu();
        }
        self.rescan();
        TextureId::from_index(index)
    }

    /// Release the GPU resource behind `id` and vacate its slot
    pub fn release(&mut self, id: TextureId) -> Result<()> {
        let mut texture = self
            .slots
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or_else(|| BridgeError::not_registered(Some(id)))?;
        texture.release_gpu();
        self.rescan();
        Ok(())
    }

    pub fn get(&self, id: TextureId) -> Option<&T> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: TextureId) -> Option<&mut T> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Lookup through the GUI library's nullable handle
    pub fn resolve(&self, id: Option<TextureId>) -> Option<&T> {
        id.and_then(|id| self.get(id))
    }

    pub fn contains(&self, id: TextureId) -> bool {
        self.get(id).is_some()
    }

    /// Number of slots, occupied or not
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Slot the next `register` will fill; equal to `capacity()` when the
    /// registry must grow first
    pub fn next_free_index(&self) -> usize {
        self.free_index
    }

    pub fn iter(&self) -> impl Iterator<Item = (TextureId, &T)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|t| (TextureId::from_index(index), t)))
    }

    /// Release every held texture; returns how many were released
    pub fn release_all(&mut self) -> usize {
        let mut released = 0;
        for slot in &mut self.slots {
            if let Some(mut texture) = slot.take() {
                texture.release_gpu();
                released += 1;
            }
        }
        self.free_index = 0;
        released
    }

    /// Point the cursor at the first slot that is vacant or whose resource
    /// has been freed behind the registry's back
    fn rescan(&mut self) {
        self.free_index = self
            .slots
            .iter()
            .position(|slot| slot.as_ref().map_or(true, |t| !t.is_allocated()))
            .unwrap_or(self.slots.len());
    }
}
