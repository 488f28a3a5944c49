use crate::core::geo::{classify_overlap, Overlap, WorldPoint, WorldRect};

/// Axis-aligned culling of world geometry against the visible rectangle.
pub struct Culling;

impl Culling {
    /// How an object's bounds relate to the view: skip, clip, or draw as is
    pub fn classify(view: &WorldRect, object: &WorldRect) -> Overlap {
        classify_overlap(object, view)
    }

    /// Returns `true` if a point lies inside the view rectangle.
    pub fn point_visible(view: &WorldRect, p: &WorldPoint) -> bool {
        view.contains(p)
    }

    /// Cull a slice of bounding boxes, collecting the indices of the visible ones.
    pub fn visible_indices<'a>(
        view: &WorldRect,
        objects: impl Iterator<Item = &'a WorldRect>,
    ) -> Vec<usize> {
        objects
            .enumerate()
            .filter_map(|(idx, b)| {
                if view.intersects(b) {
                    Some(idx)
                } else {
                    None
                }
            })
            .collect()
    }
}
