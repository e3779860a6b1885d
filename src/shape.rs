//! The vehicle physical-shape chunk (`0x0910E000`).
//!
//! Field presence depends on the chunk version and, in two places, on whether an earlier field
//! was null:
//!
//! ```text
//! always        unk01, solid
//! v >= 1        surface                 (only if solid is null)
//! always        wheels, bounds, chassis scalars, fixed opaque block
//! v >= 2        unk30 (3 floats)
//! v >= 3        name, name_surface      (surface only if name is empty)
//! v >= 4        unk35 (vec3 array)
//! v >= 5        unk36
//! v >= 6        unk37, unk38
//! ```
use crate::archive::Archive;
use crate::error::{Error, Result};
use crate::math::{BoxF, Vec3, Vec4};
use crate::node::NodeRef;
use crate::surface::SurfaceNode;

pub const CHUNK_ID: u32 = 0x0910_E000;
pub const NEWEST_VERSION: u32 = 6;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PhysicsShapeRecord {
    pub version: u32,
    pub unk01: f32,
    pub solid: Option<NodeRef>,
    /// Collision surface holding the skeleton and compound shape.  Only stored when `solid` is
    /// null.
    pub surface: Option<NodeRef>,
    /// Front-left, front-right, rear-right, rear-left.
    pub wheels: Vec<WheelModel>,
    pub bounds: BoxF,
    pub unk06: bool,
    pub ground_height: f32,
    pub front: AxleGeometry,
    pub rear: AxleGeometry,
    pub unk16: Vec<Vec4>,
    pub unk17: BoxF,
    pub unk18: bool,
    pub unk19: bool,
    pub tail: OpaqueTail,
    pub unk30: Option<[f32; 3]>,
    pub name: Option<String>,
    pub name_surface: Option<NodeRef>,
    pub unk35: Option<Vec<Vec3>>,
    pub unk36: Option<NodeRef>,
    pub unk37: Option<NodeRef>,
    pub unk38: Option<NodeRef>,
}

/// Per-axle wheel geometry.  `position_z` is the axle's longitudinal offset and
/// `wheel_position_x` the lateral offset of its left wheel; right wheels mirror it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AxleGeometry {
    pub position_z: f32,
    pub wheel_position_x: f32,
    pub wheel_radius: f32,
    pub wheel_half_width: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct WheelModel {
    /// Name of the skeleton joint this wheel is attached to.
    pub id: String,
    pub is_driving: bool,
    pub is_steering: bool,
}

/// The interleaved scalars and flags after `unk19`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OpaqueTail {
    pub unk20: f32,
    pub unk21: f32,
    pub unk22: bool,
    pub unk23: f32,
    pub unk24: bool,
    pub unk25: f32,
    pub unk26: bool,
    pub unk27: f32,
    pub unk28: f32,
    pub unk29: f32,
}

impl PhysicsShapeRecord {
    pub fn archive<A: Archive>(&mut self, ar: &mut A) -> Result<()> {
        ar.u32(&mut self.version)?;
        if self.version > NEWEST_VERSION {
            return Err(Error::UnsupportedVersion {
                version: self.version,
                newest: NEWEST_VERSION,
            });
        }
        let version = self.version;

        ar.f32(&mut self.unk01)?;
        ar.node_ref(&mut self.solid)?;
        if version >= 1 && self.solid.is_none() {
            ar.node_ref(&mut self.surface)?;
        }

        ar.array(&mut self.wheels, |ar, w| w.archive(ar))?;

        ar.box6(&mut self.bounds)?;
        ar.bool(&mut self.unk06)?;
        ar.f32(&mut self.ground_height)?;
        let (front, rear) = (&mut self.front, &mut self.rear);
        ar.f32(&mut front.position_z)?;
        ar.f32(&mut rear.position_z)?;
        ar.f32(&mut front.wheel_position_x)?;
        ar.f32(&mut rear.wheel_position_x)?;
        ar.f32(&mut front.wheel_radius)?;
        ar.f32(&mut rear.wheel_radius)?;
        ar.f32(&mut front.wheel_half_width)?;
        ar.f32(&mut rear.wheel_half_width)?;
        ar.array(&mut self.unk16, |ar, v| ar.vec4(v))?;
        ar.box6(&mut self.unk17)?;
        ar.bool(&mut self.unk18)?;
        ar.bool(&mut self.unk19)?;
        self.tail.archive(ar)?;

        if version < 2 {
            return Ok(());
        }
        let unk30 = self.unk30.get_or_insert_with(Default::default);
        for x in unk30 {
            ar.f32(x)?;
        }

        if version < 3 {
            return Ok(());
        }
        ar.string(self.name.get_or_insert_with(String::new))?;
        if self.name.as_deref().map_or(true, str::is_empty) {
            ar.node_ref(&mut self.name_surface)?;
        }

        if version < 4 {
            return Ok(());
        }
        ar.array(self.unk35.get_or_insert_with(Vec::new), |ar, v| ar.vec3(v))?;

        if version < 5 {
            return Ok(());
        }
        ar.node_ref(&mut self.unk36)?;

        if version < 6 {
            return Ok(());
        }
        ar.node_ref(&mut self.unk37)?;
        ar.node_ref(&mut self.unk38)
    }

    pub fn surface_node(&self) -> Option<&SurfaceNode> {
        self.surface.as_ref()?.surface()
    }

    pub fn surface_node_mut(&mut self) -> Option<&mut SurfaceNode> {
        self.surface.as_mut()?.surface_mut()
    }
}

impl WheelModel {
    pub fn archive<A: Archive>(&mut self, ar: &mut A) -> Result<()> {
        ar.string(&mut self.id)?;
        ar.bool(&mut self.is_driving)?;
        ar.bool(&mut self.is_steering)
    }
}

impl OpaqueTail {
    fn archive<A: Archive>(&mut self, ar: &mut A) -> Result<()> {
        ar.f32(&mut self.unk20)?;
        ar.f32(&mut self.unk21)?;
        ar.bool(&mut self.unk22)?;
        ar.f32(&mut self.unk23)?;
        ar.bool(&mut self.unk24)?;
        ar.f32(&mut self.unk25)?;
        ar.bool(&mut self.unk26)?;
        ar.f32(&mut self.unk27)?;
        ar.f32(&mut self.unk28)?;
        ar.f32(&mut self.unk29)
    }
}
