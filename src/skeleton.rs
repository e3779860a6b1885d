use crate::archive::Archive;
use crate::error::Result;
use crate::math::{Iso4, Quat, Vec3};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Skeleton {
    pub version: u32,
    pub name: String,
    pub joints: Vec<Joint>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Joint {
    pub name: String,
    /// Index of the parent joint, or `-1` for a root.
    pub parent_index: i16,
    pub rotation: Option<Quat>,
    pub position: Option<Vec3>,
    pub transform: Option<Iso4>,
}

impl Default for Joint {
    fn default() -> Joint {
        Joint {
            name: String::new(),
            parent_index: -1,
            rotation: None,
            position: None,
            transform: None,
        }
    }
}

impl Skeleton {
    pub fn archive<A: Archive>(&mut self, ar: &mut A) -> Result<()> {
        ar.u32(&mut self.version)?;
        ar.string(&mut self.name)?;
        ar.array(&mut self.joints, |ar, j| j.archive(ar))
    }
}

impl Joint {
    /// A root joint at `position` rotated by `rotation`, with its transform derived from both.
    pub fn placed(name: impl Into<String>, rotation: Quat, position: Vec3) -> Joint {
        Joint {
            name: name.into(),
            parent_index: -1,
            rotation: Some(rotation),
            position: Some(position),
            transform: Some(Iso4::from_rotation_translation(rotation, position)),
        }
    }

    pub fn translation(&self) -> Option<Vec3> {
        self.transform.map(|t| t.translation)
    }

    pub fn archive<A: Archive>(&mut self, ar: &mut A) -> Result<()> {
        ar.string(&mut self.name)?;
        ar.i16(&mut self.parent_index)?;
        ar.optional(&mut self.rotation, |ar, q| ar.quat(q))?;
        ar.optional(&mut self.position, |ar, p| ar.vec3(p))?;
        ar.optional(&mut self.transform, |ar, t| ar.iso4(t))
    }
}
