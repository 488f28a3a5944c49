use crate::core::geo::{WorldPoint, WorldRect};

use rstar::{RTree, RTreeObject, AABB};

/// A spatial item that can be indexed via an R-tree
#[derive(Debug, Clone)]
pub struct SpatialItem<T> {
    pub id: u64,
    pub bounds: WorldRect,
    pub data: T,
}

impl<T> SpatialItem<T> {
    pub fn new(id: u64, bounds: WorldRect, data: T) -> Self {
        Self { id, bounds, data }
    }

    pub fn from_point(id: u64, point: WorldPoint, data: T) -> Self {
        Self::new(id, WorldRect::new(point, point), data)
    }
}

impl<T> PartialEq for SpatialItem<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for SpatialItem<T> {}

// --- rstar integration -------------------------------------------------------------------------
// Envelopes are [longitude, latitude]

fn envelope_of(rect: &WorldRect) -> AABB<[f64; 2]> {
    AABB::from_corners(
        [rect.a.longitude, rect.a.latitude],
        [rect.b.longitude, rect.b.latitude],
    )
}

impl<T> RTreeObject for SpatialItem<T> {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        envelope_of(&self.bounds)
    }
}

/// R-tree based spatial index over world rectangles
pub struct SpatialIndex<T> {
    rtree: RTree<SpatialItem<T>>,
    bounds: Option<WorldRect>,
}

impl<T> SpatialIndex<T> {
    pub fn new() -> Self {
        Self {
            rtree: RTree::new(),
            bounds: None,
        }
    }

    pub fn insert(&mut self, item: SpatialItem<T>) {
        match self.bounds.as_mut() {
            Some(b) => {
                b.extend(&item.bounds.a);
                b.extend(&item.bounds.b);
            }
            None => self.bounds = Some(item.bounds),
        }

        self.rtree.insert(item);
    }

    /// Items whose bounds intersect `rect`
    pub fn query(&self, rect: &WorldRect) -> Vec<&SpatialItem<T>> {
        self.rtree
            .locate_in_envelope_intersecting(&envelope_of(rect))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpatialItem<T>> {
        self.rtree.iter()
    }

    /// Union of all inserted bounds
    pub fn bounds(&self) -> Option<WorldRect> {
        self.bounds
    }

    pub fn is_empty(&self) -> bool {
        self.rtree.size() == 0
    }

    pub fn len(&self) -> usize {
        self.rtree.size()
    }
}

impl<T> Default for SpatialIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}
