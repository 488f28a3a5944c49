use crate::core::geo::{WorldPoint, WorldRect};
use crate::data::wkb::decode_linestring;
use crate::search::address::AddressRange;
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of geometry stored in a layer.
///
/// The numeric codes match the values used by the backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum ObjectType {
    None = 0,
    MinorRoad = 1,
    MajorRoad = 2,
    MinorHighway = 3,
    MinorHighwayRamp = 4,
    MajorHighway = 5,
    MajorHighwayRamp = 6,
    Railroad = 7,
    Park = 8,
    River = 9,
    Lake = 10,
    MiscArea = 11,
    UrbanArea = 12,
}

impl ObjectType {
    pub const ALL: [ObjectType; 13] = [
        ObjectType::None,
        ObjectType::MinorRoad,
        ObjectType::MajorRoad,
        ObjectType::MinorHighway,
        ObjectType::MinorHighwayRamp,
        ObjectType::MajorHighway,
        ObjectType::MajorHighwayRamp,
        ObjectType::Railroad,
        ObjectType::Park,
        ObjectType::River,
        ObjectType::Lake,
        ObjectType::MiscArea,
        ObjectType::UrbanArea,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Name used in style documents
    pub fn name(self) -> &'static str {
        match self {
            ObjectType::None => "none",
            ObjectType::MinorRoad => "minor-road",
            ObjectType::MajorRoad => "major-road",
            ObjectType::MinorHighway => "minor-highway",
            ObjectType::MinorHighwayRamp => "minor-highway-ramp",
            ObjectType::MajorHighway => "major-highway",
            ObjectType::MajorHighwayRamp => "major-highway-ramp",
            ObjectType::Railroad => "railroad",
            ObjectType::Park => "park",
            ObjectType::River => "river",
            ObjectType::Lake => "lake",
            ObjectType::MiscArea => "misc-area",
            ObjectType::UrbanArea => "urban-area",
        }
    }

    /// Roads are addressable and hit-testable
    pub fn is_road(self) -> bool {
        matches!(
            self,
            ObjectType::MinorRoad
                | ObjectType::MajorRoad
                | ObjectType::MinorHighway
                | ObjectType::MinorHighwayRamp
                | ObjectType::MajorHighway
                | ObjectType::MajorHighwayRamp
        )
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ObjectType {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name() == wanted)
            .ok_or_else(|| MapError::Style(format!("unknown object type '{}'", s)))
    }
}

/// Address and place data for one side of a road
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SideAttributes {
    pub range: AddressRange,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

impl SideAttributes {
    /// A `0-0` range means the side has no addresses
    pub fn has_addresses(&self) -> bool {
        !self.range.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectAttributes {
    pub name: Option<String>,
    /// Road suffix abbreviation, e.g. `"St"`
    pub suffix: Option<String>,
    pub left: SideAttributes,
    pub right: SideAttributes,
}

impl ObjectAttributes {
    /// Road name with its suffix, e.g. `"Main St"`
    pub fn display_name(&self) -> Option<String> {
        let name = self.name.as_deref()?.trim();
        if name.is_empty() {
            return None;
        }
        Some(match self.suffix.as_deref().map(str::trim) {
            Some(suffix) if !suffix.is_empty() => format!("{} {}", name, suffix),
            _ => name.to_string(),
        })
    }
}

/// A geometry record fetched from the spatial store.
///
/// Immutable once built; a new view region fetches new objects.
#[derive(Debug, Clone, PartialEq)]
pub struct MapObject {
    pub id: u64,
    pub object_type: ObjectType,
    pub bounds: WorldRect,
    pub points: Vec<WorldPoint>,
    pub attributes: ObjectAttributes,
}

impl MapObject {
    /// Builds an object, deriving its bounding box from the points
    pub fn new(
        id: u64,
        object_type: ObjectType,
        points: Vec<WorldPoint>,
        attributes: ObjectAttributes,
    ) -> Result<Self> {
        let bounds = WorldRect::from_points(&points).ok_or_else(|| {
            MapError::DegenerateGeometry(format!("object {} has no points", id))
        })?;
        Ok(Self {
            id,
            object_type,
            bounds,
            points,
            attributes,
        })
    }

    /// Builds an object from a stored linestring blob
    pub fn from_blob(
        id: u64,
        object_type: ObjectType,
        blob: &[u8],
        attributes: ObjectAttributes,
    ) -> Result<Self> {
        let (points, bounds) = decode_linestring(blob)?;
        let bounds = bounds.ok_or_else(|| {
            MapError::DegenerateGeometry(format!("object {} has an empty linestring", id))
        })?;
        Ok(Self {
            id,
            object_type,
            bounds,
            points,
            attributes,
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.attributes.name.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationAttribute {
    pub name: String,
    pub value: String,
}

impl LocationAttribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn is_url(&self) -> bool {
        let value = self.value.trim();
        value.starts_with("http://") || value.starts_with("https://")
    }
}

/// A point of interest shown as a pin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: u64,
    #[serde(default)]
    pub location_set_id: u64,
    pub point: WorldPoint,
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<LocationAttribute>,
}

impl Location {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }
}
