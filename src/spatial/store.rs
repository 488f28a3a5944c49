//! Geometry sources.
//!
//! [`SpatialStore`] is the seam to whatever database holds the map. The map
//! keeps a [`TileStore`] snapshot of the objects fetched for the current
//! view and replaces it wholesale when the view moves.

use crate::core::geo::{WorldPoint, WorldRect};
use crate::data::object::{
    Location, LocationAttribute, MapObject, ObjectAttributes, ObjectType, SideAttributes,
};
use crate::data::wkb::decode_point;
use crate::search::location::{location_matches, LocationDirectory};
use crate::search::query::MemoryGazetteer;
use crate::search::road::RoadDirectory;
use crate::spatial::index::{SpatialIndex, SpatialItem};
use crate::{MapError, Result};
use fxhash::FxHashMap as HashMap;
use serde::{Deserialize, Serialize};

/// Read access to stored map geometry
pub trait SpatialStore {
    /// Objects of one type whose bounds intersect `rect`, at the resolution
    /// prepared for a style bucket
    fn query(&self, object_type: ObjectType, rect: &WorldRect, bucket: u8)
        -> Result<Vec<MapObject>>;

    /// Location pins inside `rect`
    fn query_locations(&self, rect: &WorldRect) -> Result<Vec<Location>>;
}

/// One object in a store document.
///
/// Geometry is either `points`, as `[latitude, longitude]` pairs, or a
/// linestring blob in `geometry`; the blob wins when both are present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub id: u64,
    #[serde(rename = "type")]
    pub object_type: ObjectType,
    #[serde(default)]
    pub points: Vec<[f64; 2]>,
    #[serde(default)]
    pub geometry: Option<Vec<u8>>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub suffix: Option<String>,
    #[serde(default)]
    pub left: SideAttributes,
    #[serde(default)]
    pub right: SideAttributes,
}

impl ObjectRecord {
    pub fn into_object(self) -> Result<MapObject> {
        let attributes = ObjectAttributes {
            name: self.name,
            suffix: self.suffix,
            left: self.left,
            right: self.right,
        };
        if let Some(blob) = self.geometry.as_deref() {
            return MapObject::from_blob(self.id, self.object_type, blob, attributes);
        }
        let points = self
            .points
            .iter()
            .map(|&[lat, lon]| WorldPoint::new(lat, lon))
            .collect();
        MapObject::new(self.id, self.object_type, points, attributes)
    }
}

/// One location in a store document, placed by `point` or a point blob
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationRecord {
    pub id: u64,
    #[serde(default)]
    pub location_set_id: u64,
    #[serde(default)]
    pub point: Option<WorldPoint>,
    #[serde(default)]
    pub geometry: Option<Vec<u8>>,
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<LocationAttribute>,
}

impl LocationRecord {
    pub fn into_location(self) -> Result<Location> {
        let point = match (self.geometry.as_deref(), self.point) {
            (Some(blob), _) => decode_point(blob)?,
            (None, Some(point)) => point,
            (None, None) => {
                return Err(MapError::DegenerateGeometry(format!(
                    "location {} has no point",
                    self.id
                )))
            }
        };
        Ok(Location {
            id: self.id,
            location_set_id: self.location_set_id,
            point,
            name: self.name,
            attributes: self.attributes,
        })
    }
}

/// JSON layout accepted by [`MemoryStore::from_json`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreDocument {
    pub objects: Vec<ObjectRecord>,
    pub locations: Vec<LocationRecord>,
    /// Lowest style bucket at which a type is returned at all
    pub min_buckets: HashMap<ObjectType, u8>,
    pub gazetteer: MemoryGazetteer,
}

/// In-memory [`SpatialStore`] backed by one R-tree per object type
#[derive(Default)]
pub struct MemoryStore {
    layers: HashMap<ObjectType, SpatialIndex<MapObject>>,
    min_buckets: HashMap<ObjectType, u8>,
    locations: SpatialIndex<Location>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from a document; invalid records are skipped and logged
    pub fn from_document(document: StoreDocument) -> Self {
        let mut store = Self::new();
        for record in document.objects {
            let id = record.id;
            match record.into_object() {
                Ok(object) => store.insert_object(object),
                Err(e) => log::warn!("skipping object {}: {}", id, e),
            }
        }
        for record in document.locations {
            let id = record.id;
            match record.into_location() {
                Ok(location) => store.insert_location(location),
                Err(e) => log::warn!("skipping location {}: {}", id, e),
            }
        }
        store.min_buckets = document.min_buckets;
        store
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let document: StoreDocument = serde_json::from_str(json)?;
        Ok(Self::from_document(document))
    }

    pub fn insert_object(&mut self, object: MapObject) {
        self.layers
            .entry(object.object_type)
            .or_default()
            .insert(SpatialItem::new(object.id, object.bounds, object));
    }

    pub fn insert_location(&mut self, location: Location) {
        self.locations
            .insert(SpatialItem::from_point(location.id, location.point, location));
    }

    /// Hides a type below the given style bucket, e.g. minor roads when zoomed out
    pub fn set_min_bucket(&mut self, object_type: ObjectType, bucket: u8) {
        self.min_buckets.insert(object_type, bucket);
    }

    pub fn object_count(&self) -> usize {
        self.layers.values().map(SpatialIndex::len).sum()
    }

    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    /// Union of the bounds of everything stored
    pub fn bounds(&self) -> Option<WorldRect> {
        self.layers
            .values()
            .filter_map(SpatialIndex::bounds)
            .chain(self.locations.bounds())
            .reduce(|mut acc, rect| {
                acc.extend(&rect.a);
                acc.extend(&rect.b);
                acc
            })
    }
}

impl SpatialStore for MemoryStore {
    fn query(
        &self,
        object_type: ObjectType,
        rect: &WorldRect,
        bucket: u8,
    ) -> Result<Vec<MapObject>> {
        if let Some(&min) = self.min_buckets.get(&object_type) {
            if bucket < min {
                return Ok(Vec::new());
            }
        }
        Ok(self
            .layers
            .get(&object_type)
            .map(|index| index.query(rect).into_iter().map(|item| item.data.clone()).collect())
            .unwrap_or_default())
    }

    fn query_locations(&self, rect: &WorldRect) -> Result<Vec<Location>> {
        Ok(self
            .locations
            .query(rect)
            .into_iter()
            .map(|item| item.data.clone())
            .collect())
    }
}

impl RoadDirectory for MemoryStore {
    fn roads_named(&self, name: &str) -> Result<Vec<MapObject>> {
        let mut roads: Vec<MapObject> = self
            .layers
            .iter()
            .filter(|(object_type, _)| object_type.is_road())
            .flat_map(|(_, index)| index.iter())
            .filter(|item| {
                item.data
                    .name()
                    .map_or(false, |n| n.trim().eq_ignore_ascii_case(name.trim()))
            })
            .map(|item| item.data.clone())
            .collect();
        roads.sort_by_key(|road| road.id);
        Ok(roads)
    }
}

impl LocationDirectory for MemoryStore {
    fn locations_matching(&self, words: &[String]) -> Result<Vec<Location>> {
        let mut locations: Vec<Location> = self
            .locations
            .iter()
            .filter(|item| location_matches(&item.data, words))
            .map(|item| item.data.clone())
            .collect();
        locations.sort_by_key(|location| location.id);
        Ok(locations)
    }
}

/// The objects fetched for one view region.
///
/// Never edited in place: a moved view fetches a fresh snapshot.
#[derive(Debug, Clone, Default)]
pub struct TileStore {
    region: Option<WorldRect>,
    bucket: u8,
    objects: HashMap<ObjectType, Vec<MapObject>>,
    locations: Vec<Location>,
}

impl TileStore {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Fetches every requested type for a region.
    ///
    /// A failing type is logged and left empty so the rest of the map still draws.
    pub fn load(
        store: &dyn SpatialStore,
        types: &[ObjectType],
        region: WorldRect,
        bucket: u8,
        with_locations: bool,
    ) -> Self {
        let mut objects = HashMap::default();
        for &object_type in types {
            if objects.contains_key(&object_type) {
                continue;
            }
            let fetched = store.query(object_type, &region, bucket).unwrap_or_else(|e| {
                log::warn!("query for {} failed: {}", object_type, e);
                Vec::new()
            });
            log::trace!("fetched {} {} object(s)", fetched.len(), object_type);
            objects.insert(object_type, fetched);
        }

        let locations = if with_locations {
            store.query_locations(&region).unwrap_or_else(|e| {
                log::warn!("location query failed: {}", e);
                Vec::new()
            })
        } else {
            Vec::new()
        };

        Self {
            region: Some(region),
            bucket,
            objects,
            locations,
        }
    }

    /// The region this snapshot was fetched for
    pub fn region(&self) -> Option<&WorldRect> {
        self.region.as_ref()
    }

    pub fn bucket(&self) -> u8 {
        self.bucket
    }

    pub fn objects(&self, object_type: ObjectType) -> &[MapObject] {
        self.objects
            .get(&object_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All fetched object types
    pub fn object_types(&self) -> impl Iterator<Item = ObjectType> + '_ {
        self.objects.keys().copied()
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn location(&self, id: u64) -> Option<&Location> {
        self.locations.iter().find(|l| l.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MapError;

    const DOC: &str = r#"{
        "objects": [
            { "id": 1, "type": "minor-road", "points": [[42.0, -71.0], [42.01, -71.0]],
              "name": "Main", "suffix": "St",
              "right": { "range": { "start": 100, "end": 200 }, "city": "Boston" } },
            { "id": 2, "type": "lake", "points": [[10.0, 10.0], [10.5, 10.0], [10.5, 10.5]] },
            { "id": 3, "type": "river", "points": [] }
        ],
        "locations": [
            { "id": 9, "point": { "latitude": 42.005, "longitude": -71.001 }, "name": "Cafe" }
        ],
        "min_buckets": { "minor-road": 3 }
    }"#;

    fn store() -> MemoryStore {
        MemoryStore::from_json(DOC).unwrap()
    }

    #[test]
    fn test_load_document_skips_invalid_records() {
        let store = store();
        assert_eq!(store.object_count(), 2);
        assert_eq!(store.location_count(), 1);
        assert!(store.bounds().unwrap().contains(&WorldPoint::new(10.2, 10.2)));
    }

    #[test]
    fn test_query_by_type_and_region() {
        let store = store();
        let rect = WorldRect::from_coords(41.9, -71.1, 42.1, -70.9);
        let roads = store.query(ObjectType::MinorRoad, &rect, 5).unwrap();
        assert_eq!(roads.len(), 1);
        assert_eq!(roads[0].attributes.right.city.as_deref(), Some("Boston"));
        assert!(store.query(ObjectType::Lake, &rect, 5).unwrap().is_empty());
        assert_eq!(store.query_locations(&rect).unwrap().len(), 1);
    }

    #[test]
    fn test_min_bucket_hides_layer() {
        let store = store();
        let rect = WorldRect::from_coords(41.9, -71.1, 42.1, -70.9);
        assert!(store.query(ObjectType::MinorRoad, &rect, 2).unwrap().is_empty());
        assert_eq!(store.query(ObjectType::MinorRoad, &rect, 3).unwrap().len(), 1);
    }

    #[test]
    fn test_roads_named() {
        let store = store();
        assert_eq!(store.roads_named("main").unwrap().len(), 1);
        assert!(store.roads_named("Elm").unwrap().is_empty());
    }

    fn blob(geometry: u32, points: &[(f64, f64)]) -> Vec<u8> {
        let mut out = vec![1u8];
        out.extend_from_slice(&geometry.to_le_bytes());
        if geometry == 2 {
            out.extend_from_slice(&(points.len() as i32).to_le_bytes());
        }
        for &(lat, lon) in points {
            out.extend_from_slice(&lat.to_le_bytes());
            out.extend_from_slice(&lon.to_le_bytes());
        }
        out
    }

    #[test]
    fn test_load_blob_geometry() {
        let document = StoreDocument {
            objects: vec![
                ObjectRecord {
                    id: 5,
                    object_type: ObjectType::Railroad,
                    points: Vec::new(),
                    geometry: Some(blob(2, &[(1.0, 1.0), (1.5, 2.0)])),
                    name: None,
                    suffix: None,
                    left: SideAttributes::default(),
                    right: SideAttributes::default(),
                },
                ObjectRecord {
                    id: 6,
                    object_type: ObjectType::Railroad,
                    points: Vec::new(),
                    geometry: Some(blob(2, &[])),
                    name: None,
                    suffix: None,
                    left: SideAttributes::default(),
                    right: SideAttributes::default(),
                },
            ],
            locations: vec![
                LocationRecord {
                    id: 1,
                    location_set_id: 0,
                    point: None,
                    geometry: Some(blob(1, &[(1.2, 1.2)])),
                    name: "Depot".into(),
                    attributes: Vec::new(),
                },
                LocationRecord {
                    id: 2,
                    location_set_id: 0,
                    point: None,
                    geometry: None,
                    name: "Nowhere".into(),
                    attributes: Vec::new(),
                },
            ],
            ..StoreDocument::default()
        };

        let store = MemoryStore::from_document(document);
        assert_eq!(store.object_count(), 1);
        assert_eq!(store.location_count(), 1);

        let rect = WorldRect::from_coords(0.0, 0.0, 3.0, 3.0);
        let rails = store.query(ObjectType::Railroad, &rect, 5).unwrap();
        assert_eq!(rails[0].bounds, WorldRect::from_coords(1.0, 1.0, 1.5, 2.0));
        let depots = store.query_locations(&rect).unwrap();
        assert_eq!(depots[0].point, WorldPoint::new(1.2, 1.2));
    }

    #[test]
    fn test_blob_type_mismatch_is_an_error() {
        let record: ObjectRecord = serde_json::from_str(
            r#"{ "id": 1, "type": "river", "geometry": [1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0] }"#,
        )
        .unwrap();
        assert!(matches!(record.into_object(), Err(MapError::Decode(_))));
    }

    #[test]
    fn test_locations_matching_by_word() {
        let store = store();
        let words = vec!["cafe".to_string()];
        let found = store.locations_matching(&words).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 9);
        assert!(store.locations_matching(&["caf".to_string()]).unwrap().is_empty());
    }

    struct FailingStore;

    impl SpatialStore for FailingStore {
        fn query(&self, object_type: ObjectType, _: &WorldRect, _: u8) -> Result<Vec<MapObject>> {
            if object_type == ObjectType::Lake {
                Err(MapError::NotFound("lake table".into()))
            } else {
                Ok(Vec::new())
            }
        }

        fn query_locations(&self, _: &WorldRect) -> Result<Vec<Location>> {
            Err(MapError::NotFound("locations".into()))
        }
    }

    #[test]
    fn test_tile_store_tolerates_failures() {
        let region = WorldRect::from_coords(0.0, 0.0, 1.0, 1.0);
        let tiles = TileStore::load(
            &FailingStore,
            &[ObjectType::Lake, ObjectType::Park],
            region,
            2,
            true,
        );
        assert!(tiles.objects(ObjectType::Lake).is_empty());
        assert!(tiles.locations().is_empty());
        assert_eq!(tiles.region(), Some(&region));
        assert_eq!(tiles.bucket(), 2);
        assert_eq!(tiles.object_types().count(), 2);
    }

    #[test]
    fn test_tile_store_snapshot() {
        let store = store();
        let region = WorldRect::from_coords(41.9, -71.1, 42.1, -70.9);
        let tiles = TileStore::load(&store, &[ObjectType::MinorRoad], region, 4, true);
        assert_eq!(tiles.objects(ObjectType::MinorRoad).len(), 1);
        assert!(tiles.objects(ObjectType::Park).is_empty());
        assert_eq!(tiles.location(9).map(|l| l.name.as_str()), Some("Cafe"));
    }
}
