use core::fmt;

use hashbrown::HashMap;

use crate::texture::{Allocator as _, TextureImage};
use crate::{ClusterMeshes, MeshError, MeshTypes};

/// Outcome of offering a texture image or a textured group to a [`TextureResolver`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[expect(clippy::exhaustive_enums)]
#[must_use]
pub enum TextureBinding {
    /// The slot's texture is now attached to every textured group that uses the slot.
    Bound,
    /// Either the image or the groups using the slot are not known yet. Whichever is present
    /// has been kept, and binding will happen when the other arrives.
    Deferred,
}

enum SlotState<T> {
    /// Image received, no group uses the slot yet.
    Pending(TextureImage),
    /// Texture created and attached to the groups that use the slot. The image is no longer
    /// needed.
    Bound(T),
}

/// Matches texture images to the textured cluster groups that draw from them, regardless of
/// which of the two arrives first.
///
/// Each slot is allocated at most once per image: the resulting texture handle is shared by
/// every group using the slot, and binding an already bound slot again only reattaches the
/// same handle.
pub struct TextureResolver<M: MeshTypes> {
    slots: HashMap<usize, SlotState<M::Texture>>,
}

impl<M: MeshTypes> TextureResolver<M> {
    /// Creates a resolver with no images.
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }

    /// Forgets all images and releases all textures held by the resolver.
    ///
    /// Textures already attached to groups are released when those groups are dropped.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Stores `image` as the contents of `slot`, replacing any previous image, and binds it
    /// if `clusters` has a textured group using that slot.
    ///
    /// If no group uses the slot, the image is kept for a later [`Self::bind_ready()`] and
    /// [`TextureBinding::Deferred`] is returned; this is not an error.
    ///
    /// Fails with [`MeshError::ResourceExhausted`] if the allocator refuses the texture.
    pub fn submit_image(
        &mut self,
        slot: usize,
        image: TextureImage,
        clusters: Option<&mut ClusterMeshes<M>>,
        allocator: &M::Alloc,
    ) -> Result<TextureBinding, MeshError> {
        self.slots.insert(slot, SlotState::Pending(image));
        match clusters {
            Some(clusters) if clusters.uses_slot(slot) => {
                self.bind_if_ready(slot, clusters, allocator)
            }
            _ => {
                log::warn!("no textured cluster uses texture slot {slot} yet; keeping the image");
                Ok(TextureBinding::Deferred)
            }
        }
    }

    /// Binds `slot` to the groups of `clusters` using it, if its image has been submitted.
    ///
    /// Repeating this with no new image in between does not allocate again.
    pub fn bind_if_ready(
        &mut self,
        slot: usize,
        clusters: &mut ClusterMeshes<M>,
        allocator: &M::Alloc,
    ) -> Result<TextureBinding, MeshError> {
        if !clusters.uses_slot(slot) {
            return Ok(TextureBinding::Deferred);
        }
        let texture = match self.slots.get(&slot) {
            None => {
                log::info!("texture for slot {slot} not received yet");
                return Ok(TextureBinding::Deferred);
            }
            Some(SlotState::Bound(texture)) => texture.clone(),
            Some(SlotState::Pending(image)) => {
                let Some(texture) = allocator.allocate(slot, image) else {
                    log::error!(
                        "could not allocate a {}×{} texture for slot {slot}",
                        image.width(),
                        image.height()
                    );
                    return Err(MeshError::ResourceExhausted { slot });
                };
                log::debug!("bound texture slot {slot}");
                self.slots.insert(slot, SlotState::Bound(texture.clone()));
                texture
            }
        };
        for group in clusters.textured.iter_mut().filter(|group| group.slot == slot) {
            group.texture = Some(texture.clone());
        }
        Ok(TextureBinding::Bound)
    }

    /// Binds every slot used by `clusters` whose image has been submitted.
    ///
    /// Returns the number of slots bound.
    pub fn bind_ready(
        &mut self,
        clusters: &mut ClusterMeshes<M>,
        allocator: &M::Alloc,
    ) -> Result<usize, MeshError> {
        let mut slots: Vec<usize> = clusters.textured.iter().map(|group| group.slot).collect();
        slots.sort_unstable();
        slots.dedup();

        let mut bound = 0;
        for slot in slots {
            if self.bind_if_ready(slot, clusters, allocator)? == TextureBinding::Bound {
                bound += 1;
            }
        }
        Ok(bound)
    }

    /// Returns whether an image for `slot` is waiting for a group to use it.
    pub fn is_pending(&self, slot: usize) -> bool {
        matches!(self.slots.get(&slot), Some(SlotState::Pending(_)))
    }

    /// Returns whether `slot` has been allocated a texture.
    pub fn is_bound(&self, slot: usize) -> bool {
        matches!(self.slots.get(&slot), Some(SlotState::Bound(_)))
    }
}

impl<M: MeshTypes> Default for TextureResolver<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: MeshTypes> fmt::Debug for TextureResolver<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut slots: Vec<(usize, &str)> = self
            .slots
            .iter()
            .map(|(&slot, state)| {
                (slot, match state {
                    SlotState::Pending(_) => "pending",
                    SlotState::Bound(_) => "bound",
                })
            })
            .collect();
        slots.sort_unstable();
        f.debug_struct("TextureResolver")
            .field("slots", &slots)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{TestMt, quad, quad_textured_materials};
    use crate::texture::{PixelEncoding, TestAllocator};
    use crate::{ClusterMeshes, assemble_clusters};

    fn image() -> TextureImage {
        TextureImage::packed(4, 4, PixelEncoding::Rgba8, vec![255; 64]).unwrap()
    }

    /// Two textured clusters sharing slot 0 and one flat cluster.
    fn clusters() -> ClusterMeshes<TestMt> {
        assemble_clusters::<TestMt>(&quad(), &quad_textured_materials()).unwrap()
    }

    #[test]
    fn image_before_groups() {
        let allocator = TestAllocator::new();
        let mut resolver = TextureResolver::<TestMt>::new();
        assert_eq!(
            resolver.submit_image(0, image(), None, &allocator).unwrap(),
            TextureBinding::Deferred
        );
        assert!(resolver.is_pending(0));
        assert_eq!(allocator.count_allocated(), 0);

        let mut clusters = clusters();
        assert_eq!(resolver.bind_ready(&mut clusters, &allocator).unwrap(), 1);
        assert!(resolver.is_bound(0));
        assert_eq!(allocator.count_allocated(), 1);
        assert!(clusters.textured().iter().all(|g| g.texture().is_some()));
    }

    #[test]
    fn image_after_groups() {
        let allocator = TestAllocator::new();
        let mut resolver = TextureResolver::<TestMt>::new();
        let mut clusters = clusters();
        assert_eq!(resolver.bind_ready(&mut clusters, &allocator).unwrap(), 0);

        assert_eq!(
            resolver
                .submit_image(0, image(), Some(&mut clusters), &allocator)
                .unwrap(),
            TextureBinding::Bound
        );
        let [a, b] = [0, 1].map(|i| clusters.textured()[i].texture().unwrap().clone());
        assert_eq!(a, b, "groups sharing a slot share one texture");
        assert_eq!(allocator.count_allocated(), 1);
    }

    #[test]
    fn unused_slot_is_deferred() {
        let allocator = TestAllocator::new();
        let mut resolver = TextureResolver::<TestMt>::new();
        let mut clusters = clusters();
        assert_eq!(
            resolver
                .submit_image(5, image(), Some(&mut clusters), &allocator)
                .unwrap(),
            TextureBinding::Deferred
        );
        assert!(resolver.is_pending(5));
        assert!(clusters.textured().iter().all(|g| g.texture().is_none()));
    }

    #[test]
    fn rebinding_is_idempotent() {
        let allocator = TestAllocator::new();
        let mut resolver = TextureResolver::<TestMt>::new();
        let mut clusters = clusters();
        resolver
            .submit_image(0, image(), Some(&mut clusters), &allocator)
            .unwrap();
        let first = clusters.textured()[0].texture().cloned();
        for _ in 0..3 {
            assert_eq!(
                resolver.bind_if_ready(0, &mut clusters, &allocator).unwrap(),
                TextureBinding::Bound
            );
        }
        assert_eq!(clusters.textured()[0].texture().cloned(), first);
        assert_eq!(allocator.count_allocated(), 1);
        assert_eq!(allocator.count_live(), 1);
    }

    #[test]
    fn replacement_image_releases_old_texture() {
        let allocator = TestAllocator::new();
        let mut resolver = TextureResolver::<TestMt>::new();
        let mut clusters = clusters();
        resolver
            .submit_image(0, image(), Some(&mut clusters), &allocator)
            .unwrap();
        resolver
            .submit_image(0, image(), Some(&mut clusters), &allocator)
            .unwrap();
        assert_eq!(allocator.count_allocated(), 2);
        assert_eq!(allocator.count_live(), 1);

        drop(clusters);
        resolver.clear();
        assert_eq!(allocator.count_live(), 0);
    }

    #[test]
    fn allocation_failure() {
        let mut allocator = TestAllocator::new();
        allocator.set_capacity(0);
        let mut resolver = TextureResolver::<TestMt>::new();
        let mut clusters = clusters();
        assert_eq!(
            resolver.submit_image(0, image(), Some(&mut clusters), &allocator),
            Err(MeshError::ResourceExhausted { slot: 0 })
        );
    }
}
