use std::slice;
use crate::archive::Archive;
use crate::error::Result;
use crate::math::{Iso4, Vec3};
use crate::node::NodeRef;
use crate::skeleton::Skeleton;

pub const ELLIPSOID_ID: u32 = 1;
pub const COMPOUND_ID: u32 = 13;
const NO_SURFACE: u32 = 0xffff_ffff;

/// Collision surface with its optional skeleton.  When both are present, joint `i` of the
/// skeleton places primitive `i` of `surf.primitives()`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SurfaceNode {
    pub version: u32,
    pub skeleton: Option<NodeRef>,
    pub surf: Option<Surface>,
    /// Materials and whatever else follows the surface; passed through untouched.
    pub unk_tail: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Surface {
    Compound(Compound),
    Ellipsoid(Ellipsoid),
    Unsupported { id: u32, body: Vec<u8> },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Compound {
    pub surfaces: Vec<Surface>,
    pub unk01: Option<Vec3>,
    /// One per child, in child order.
    pub transforms: Vec<Iso4>,
    /// One per child, in child order.
    pub indices: Vec<u16>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Ellipsoid {
    /// Half-extents along each axis.
    pub size: Vec3,
    pub unk01: Option<Vec3>,
    pub unk02: u16,
}

impl Default for Surface {
    fn default() -> Surface {
        Surface::Ellipsoid(Ellipsoid::default())
    }
}

impl SurfaceNode {
    pub fn skeleton(&self) -> Option<&Skeleton> {
        self.skeleton.as_ref()?.skeleton()
    }

    pub fn skeleton_mut(&mut self) -> Option<&mut Skeleton> {
        self.skeleton.as_mut()?.skeleton_mut()
    }

    pub fn archive<A: Archive>(&mut self, ar: &mut A) -> Result<()> {
        ar.u32(&mut self.version)?;
        ar.node_ref(&mut self.skeleton)?;
        archive_root_surface(ar, &mut self.surf)?;
        ar.bytes(&mut self.unk_tail)
    }
}

fn archive_root_surface<A: Archive>(ar: &mut A, v: &mut Option<Surface>) -> Result<()> {
    let mut id = v.as_ref().map_or(NO_SURFACE, Surface::id);
    ar.u32(&mut id)?;
    if ar.is_reading() {
        *v = if id == NO_SURFACE { None } else { Some(Surface::empty(id)) };
    }
    match v {
        Some(s) => s.archive_body(ar),
        None => Ok(()),
    }
}

impl Surface {
    fn empty(id: u32) -> Surface {
        match id {
            ELLIPSOID_ID => Surface::Ellipsoid(Ellipsoid::default()),
            COMPOUND_ID => Surface::Compound(Compound::default()),
            _ => Surface::Unsupported { id, body: Vec::new() },
        }
    }

    pub fn id(&self) -> u32 {
        match self {
            Surface::Compound(_) => COMPOUND_ID,
            Surface::Ellipsoid(_) => ELLIPSOID_ID,
            Surface::Unsupported { id, .. } => *id,
        }
    }

    /// Archives the surface id followed by the body.
    pub fn archive<A: Archive>(&mut self, ar: &mut A) -> Result<()> {
        let mut id = self.id();
        ar.u32(&mut id)?;
        if ar.is_reading() {
            *self = Surface::empty(id);
        }
        self.archive_body(ar)
    }

    fn archive_body<A: Archive>(&mut self, ar: &mut A) -> Result<()> {
        match self {
            Surface::Compound(c) => c.archive(ar),
            Surface::Ellipsoid(e) => e.archive(ar),
            Surface::Unsupported { body, .. } => ar.bytes(body),
        }
    }

    /// Leaf primitives in depth-first order, numbered from zero.  Compounds expand in place and
    /// don't take an index of their own.  Each call starts a fresh traversal.
    pub fn primitives(&self) -> Primitives<'_> {
        Primitives {
            root: Some(self),
            stack: Vec::new(),
            next_index: 0,
        }
    }
}

impl Compound {
    pub fn archive<A: Archive>(&mut self, ar: &mut A) -> Result<()> {
        ar.array(&mut self.surfaces, |ar, s| s.archive(ar))?;
        ar.optional(&mut self.unk01, |ar, v| ar.vec3(v))?;
        ar.array(&mut self.transforms, |ar, t| ar.iso4(t))?;
        ar.array(&mut self.indices, |ar, i| ar.u16(i))
    }
}

impl Ellipsoid {
    pub fn new(size: Vec3) -> Ellipsoid {
        Ellipsoid {
            size,
            unk01: None,
            unk02: 0,
        }
    }

    pub fn archive<A: Archive>(&mut self, ar: &mut A) -> Result<()> {
        ar.vec3(&mut self.size)?;
        ar.optional(&mut self.unk01, |ar, v| ar.vec3(v))?;
        ar.u16(&mut self.unk02)
    }
}


pub struct Primitives<'a> {
    root: Option<&'a Surface>,
    stack: Vec<slice::Iter<'a, Surface>>,
    next_index: usize,
}

impl<'a> Iterator for Primitives<'a> {
    type Item = (usize, &'a Surface);

    fn next(&mut self) -> Option<(usize, &'a Surface)> {
        loop {
            let surface = match self.root.take() {
                Some(root) => root,
                None => {
                    let children = self.stack.last_mut()?;
                    match children.next() {
                        Some(s) => s,
                        None => {
                            self.stack.pop();
                            continue;
                        },
                    }
                },
            };

            match surface {
                Surface::Compound(c) => self.stack.push(c.surfaces.iter()),
                leaf => {
                    let index = self.next_index;
                    self.next_index += 1;
                    return Some((index, leaf));
                },
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use super::*;
    use crate::archive::{ArchiveReader, ArchiveWriter};

    fn ellipsoid(x: f32) -> Surface {
        Surface::Ellipsoid(Ellipsoid::new([x, x, x]))
    }

    fn compound(surfaces: Vec<Surface>) -> Surface {
        Surface::Compound(Compound {
            surfaces,
            ..Compound::default()
        })
    }

    fn sizes(s: &Surface) -> Vec<(usize, f32)> {
        s.primitives()
            .map(|(i, p)| match p {
                Surface::Ellipsoid(e) => (i, e.size[0]),
                Surface::Unsupported { id, .. } => (i, -(*id as f32)),
                Surface::Compound(_) => panic!("compound yielded as a primitive"),
            })
            .collect()
    }

    #[test]
    fn flat_compound_numbers_children_from_zero() {
        let s = compound(vec![ellipsoid(1.0), ellipsoid(2.0), ellipsoid(3.0)]);
        assert_eq!(sizes(&s), vec![(0, 1.0), (1, 2.0), (2, 3.0)]);
    }

    #[test]
    fn nested_compounds_expand_in_place() {
        let s = compound(vec![
            ellipsoid(1.0),
            compound(vec![ellipsoid(2.0), compound(vec![]), ellipsoid(3.0)]),
            Surface::Unsupported { id: 6, body: vec![] },
            ellipsoid(4.0),
        ]);
        assert_eq!(sizes(&s), vec![(0, 1.0), (1, 2.0), (2, 3.0), (3, -6.0), (4, 4.0)]);
    }

    #[test]
    fn root_primitive_takes_index_zero() {
        assert_eq!(sizes(&ellipsoid(5.0)), vec![(0, 5.0)]);
    }

    #[test]
    fn traversal_restarts() {
        let s = compound(vec![ellipsoid(1.0), ellipsoid(2.0)]);
        assert_eq!(s.primitives().count(), 2);
        assert_eq!(s.primitives().count(), 2);
    }

    #[test]
    fn surface_node_round_trip() {
        let mut node = SurfaceNode {
            version: 2,
            skeleton: None,
            surf: Some(Surface::Compound(Compound {
                surfaces: vec![
                    ellipsoid(1.0),
                    Surface::Unsupported { id: 6, body: vec![1, 2, 3, 4] },
                ],
                unk01: Some([0.5, 0.5, 0.5]),
                transforms: vec![Iso4::IDENTITY, Iso4::IDENTITY],
                indices: vec![0, 1],
            })),
            unk_tail: vec![0xaa, 0xbb],
        };

        let mut w = ArchiveWriter::new(Vec::new());
        node.archive(&mut w).unwrap();
        let bytes = w.into_inner();

        let mut r = ArchiveReader::new(Cursor::new(&bytes[..]));
        let mut back = SurfaceNode::default();
        back.archive(&mut r).unwrap();
        assert_eq!(back, node);
        assert_eq!(r.into_inner().position() as usize, bytes.len());
    }

    #[test]
    fn missing_surface_is_encoded_as_sentinel() {
        let mut node = SurfaceNode::default();
        let mut w = ArchiveWriter::new(Vec::new());
        node.archive(&mut w).unwrap();
        let bytes = w.into_inner();
        // version, null skeleton, no surface, empty tail
        assert_eq!(bytes, [
            0, 0, 0, 0,
            0xff, 0xff, 0xff, 0xff,
            0xff, 0xff, 0xff, 0xff,
            0, 0, 0, 0,
        ]);
    }
}
