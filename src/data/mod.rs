pub mod object;
pub mod wkb;

pub use object::{
    Location, LocationAttribute, MapObject, ObjectAttributes, ObjectType, SideAttributes,
};
pub use wkb::{decode_linestring, decode_point, DecodeError};
