//! Editable JSON form of a physical shape.  Key names match the documents written by earlier
//! releases of the converter.
use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use crate::error::Result;
use crate::math::{Quat, Vec3, QUAT_IDENTITY};
use crate::shape::AxleGeometry;
use crate::wheel::{Side, WheelSlot};

/// Version tag written into every document.  Documents with any other tag are refused on
/// import, since the field layout they assume may differ.
pub const DOCUMENT_VERSION: &str = "0.0.2";

pub const ELLIPSOID_TYPE: &str = "Ellipsoid";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PhyModelDocument {
    pub version: Option<String>,
    pub chassis: Option<Chassis>,
    pub body_surfs: Option<Vec<BodySurface>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Chassis {
    pub ground_height: f32,
    pub axle_front: Option<Axle>,
    pub axle_rear: Option<Axle>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Axle {
    pub position_z: f32,
    pub wheel_position_x: f32,
    pub wheel_radius: f32,
    pub wheel_width_half: f32,
    pub flags_left: Option<WheelFlags>,
    pub flags_right: Option<WheelFlags>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct WheelFlags {
    pub is_driving: bool,
    pub is_steering: bool,
}

/// A named body part: one joint plus the primitive it places.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct BodySurface {
    pub name: Option<String>,
    pub position: Option<CoordMap>,
    pub rotation: Option<CoordMap>,
    #[serde(rename = "Type")]
    pub kind: Option<String>,
    pub parameters: Option<CoordMap>,
}

/// Named coordinates such as `{"x": 1, "y": 2, "z": 3}`.
pub type CoordMap = BTreeMap<String, Coord>;

/// A coordinate leaf.  Anything that isn't a number is kept so a bad document still loads;
/// lookups treat it as missing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coord {
    Number(f32),
    Other(serde_json::Value),
}

impl PhyModelDocument {
    pub fn from_json(s: &str) -> Result<PhyModelDocument> {
        Ok(serde_json::from_str(s)?)
    }

    /// Pretty-printed JSON with two-space indentation.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Chassis {
    pub fn axle(&self, slot: WheelSlot) -> Option<&Axle> {
        if slot.is_front() { self.axle_front.as_ref() } else { self.axle_rear.as_ref() }
    }
}

impl Axle {
    pub fn from_geometry(g: &AxleGeometry) -> Axle {
        Axle {
            position_z: g.position_z,
            wheel_position_x: g.wheel_position_x,
            wheel_radius: g.wheel_radius,
            wheel_width_half: g.wheel_half_width,
            flags_left: None,
            flags_right: None,
        }
    }

    pub fn geometry(&self) -> AxleGeometry {
        AxleGeometry {
            position_z: self.position_z,
            wheel_position_x: self.wheel_position_x,
            wheel_radius: self.wheel_radius,
            wheel_half_width: self.wheel_width_half,
        }
    }

    pub fn flags(&self, side: Side) -> Option<&WheelFlags> {
        match side {
            Side::Left => self.flags_left.as_ref(),
            Side::Right => self.flags_right.as_ref(),
        }
    }

    pub fn flags_mut(&mut self, side: Side) -> &mut Option<WheelFlags> {
        match side {
            Side::Left => &mut self.flags_left,
            Side::Right => &mut self.flags_right,
        }
    }
}

fn coord_map<const N: usize>(keys: [&str; N], values: [f32; N]) -> CoordMap {
    keys.iter()
        .zip(values.iter())
        .map(|(k, &v)| (k.to_string(), Coord::Number(v)))
        .collect()
}

pub fn vector_map(v: Vec3) -> CoordMap {
    coord_map(["x", "y", "z"], v)
}

pub fn quaternion_map(q: Quat) -> CoordMap {
    coord_map(["x", "y", "z", "w"], q)
}

fn lookup<const N: usize>(map: &CoordMap, keys: [&str; N]) -> Option<[f32; N]> {
    let mut out = [0.0; N];
    for (x, key) in out.iter_mut().zip(keys.iter()) {
        match map.get(*key)? {
            Coord::Number(v) => *x = *v,
            Coord::Other(_) => return None,
        }
    }
    Some(out)
}

/// Reads `x`, `y`, `z`.  If any is missing or not a number the result is the origin and the
/// flag is `true`.
pub fn parse_vector(map: &CoordMap) -> (Vec3, bool) {
    match lookup(map, ["x", "y", "z"]) {
        Some(v) => (v, false),
        None => ([0.0; 3], true),
    }
}

/// Reads `x`, `y`, `z`, `w`.  If any is missing or not a number the result is the identity
/// and the flag is `true`.
pub fn parse_quaternion(map: &CoordMap) -> (Quat, bool) {
    match lookup(map, ["x", "y", "z", "w"]) {
        Some(q) => (q, false),
        None => (QUAT_IDENTITY, true),
    }
}
