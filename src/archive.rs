//! Symmetric field channel.  Every record in the crate has a single `archive` method that both
//! reads and writes, so the two directions can't drift apart.
use std::collections::HashSet;
use std::io::{self, Read, Write};
use std::mem;
use byteorder::{ReadBytesExt, WriteBytesExt, LE};
use crate::error::{Error, Result};
use crate::math::{BoxF, Iso4, Quat, Vec3, Vec4};
use crate::node::{Node, NodeRef};

/// Upper bound on element counts accepted while reading.
pub const MAX_ARRAY_LEN: u32 = 1 << 20;
/// Upper bound on opaque byte blobs accepted while reading.
pub const MAX_BYTES_LEN: u32 = 1 << 28;

const NULL_NODE: i32 = -1;

pub trait Archive: Sized {
    fn is_reading(&self) -> bool;

    fn u16(&mut self, v: &mut u16) -> Result<()>;
    fn i16(&mut self, v: &mut i16) -> Result<()>;
    fn u32(&mut self, v: &mut u32) -> Result<()>;
    fn i32(&mut self, v: &mut i32) -> Result<()>;
    fn f32(&mut self, v: &mut f32) -> Result<()>;

    /// Reads exactly `len` bytes into `v`, or writes all of `v`.
    fn raw(&mut self, v: &mut Vec<u8>, len: usize) -> Result<()>;

    /// Marks a node index as seen.  Returns `true` the first time an index is visited.
    fn visit_node(&mut self, index: u32) -> bool;

    fn bool(&mut self, v: &mut bool) -> Result<()> {
        let mut raw = *v as u32;
        self.u32(&mut raw)?;
        *v = match raw {
            0 => false,
            1 => true,
            _ => return Err(Error::invalid_data(format!("bad boolean value {}", raw))),
        };
        Ok(())
    }

    /// Length-prefixed opaque bytes.
    fn bytes(&mut self, v: &mut Vec<u8>) -> Result<()> {
        let mut len = len_u32(v.len())?;
        self.u32(&mut len)?;
        if len > MAX_BYTES_LEN {
            return Err(Error::invalid_data(format!("byte blob of {} bytes is too long", len)));
        }
        self.raw(v, len as usize)
    }

    /// Length-prefixed UTF-8.  An absent string and an empty one are the same on the wire.
    fn string(&mut self, v: &mut String) -> Result<()> {
        let mut buf = mem::take(v).into_bytes();
        let res = self.bytes(&mut buf);
        // The writer never touches `buf`, so a failed write still hands the string back.
        match String::from_utf8(buf) {
            Ok(s) => *v = s,
            Err(e) => {
                res?;
                return Err(Error::invalid_data(format!("bad string: {}", e)));
            },
        }
        res
    }

    fn vec3(&mut self, v: &mut Vec3) -> Result<()> {
        for x in v {
            self.f32(x)?;
        }
        Ok(())
    }

    fn vec4(&mut self, v: &mut Vec4) -> Result<()> {
        for x in v {
            self.f32(x)?;
        }
        Ok(())
    }

    fn quat(&mut self, v: &mut Quat) -> Result<()> {
        self.vec4(v)
    }

    fn box6(&mut self, v: &mut BoxF) -> Result<()> {
        for x in v {
            self.f32(x)?;
        }
        Ok(())
    }

    fn iso4(&mut self, v: &mut Iso4) -> Result<()> {
        for x in &mut v.rotation {
            self.f32(x)?;
        }
        self.vec3(&mut v.translation)
    }

    /// Count-prefixed sequence, each element archived with `f`.
    fn array<T, F>(&mut self, v: &mut Vec<T>, mut f: F) -> Result<()>
    where
        T: Default,
        F: FnMut(&mut Self, &mut T) -> Result<()>,
    {
        let mut len = len_u32(v.len())?;
        self.u32(&mut len)?;
        if self.is_reading() {
            if len > MAX_ARRAY_LEN {
                return Err(Error::invalid_data(format!("array of {} elements is too long", len)));
            }
            v.clear();
            v.resize_with(len as usize, T::default);
        }
        for x in v.iter_mut() {
            f(self, x)?;
        }
        Ok(())
    }

    /// Presence flag followed by the value.
    fn optional<T, F>(&mut self, v: &mut Option<T>, f: F) -> Result<()>
    where
        T: Default,
        F: FnOnce(&mut Self, &mut T) -> Result<()>,
    {
        let mut present = v.is_some();
        self.bool(&mut present)?;
        if self.is_reading() {
            *v = if present { Some(T::default()) } else { None };
        }
        match v {
            Some(x) => f(self, x),
            None => Ok(()),
        }
    }

    /// Reference to a node in the file's node graph.  `-1` is null; the first occurrence of an
    /// index carries the node's class id and body, later ones are back-references.
    fn node_ref(&mut self, v: &mut Option<NodeRef>) -> Result<()> {
        let mut index = match v {
            Some(r) => i32::try_from(r.index())
                .map_err(|_| Error::invalid_data(format!("node index {} out of range", r.index())))?,
            None => NULL_NODE,
        };
        self.i32(&mut index)?;
        if index == NULL_NODE {
            *v = None;
            return Ok(());
        }
        if index < 0 {
            return Err(Error::invalid_data(format!("bad node index {}", index)));
        }
        let index = index as u32;

        if self.is_reading() {
            if !self.visit_node(index) {
                *v = Some(NodeRef::Shared(index));
                return Ok(());
            }
            let mut class_id = 0;
            self.u32(&mut class_id)?;
            let mut node = Node::empty(class_id);
            node.archive(self)?;
            *v = Some(NodeRef::Inline { index, node: Box::new(node) });
        } else if let Some(NodeRef::Inline { node, .. }) = v {
            self.visit_node(index);
            let mut class_id = node.class_id();
            self.u32(&mut class_id)?;
            node.archive(self)?;
        }
        Ok(())
    }
}

fn len_u32(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| Error::invalid_data(format!("length {} does not fit in u32", len)))
}


pub struct ArchiveReader<R> {
    inner: R,
    seen: HashSet<u32>,
}

impl<R: Read> ArchiveReader<R> {
    pub fn new(inner: R) -> ArchiveReader<R> {
        ArchiveReader {
            inner,
            seen: HashSet::new(),
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

macro_rules! read_byteorder {
    ($($name:ident, $ty:ty, $read_one:ident;)*) => {
        $(
            fn $name(&mut self, v: &mut $ty) -> Result<()> {
                *v = self.inner.$read_one::<LE>()?;
                Ok(())
            }
        )*
    };
}

impl<R: Read> Archive for ArchiveReader<R> {
    fn is_reading(&self) -> bool {
        true
    }

    read_byteorder! {
        u16, u16, read_u16;
        i16, i16, read_i16;
        u32, u32, read_u32;
        i32, i32, read_i32;
        f32, f32, read_f32;
    }

    /// Grows `v` only as bytes arrive, so a bogus length on a short stream can't force a large
    /// allocation up front.
    fn raw(&mut self, v: &mut Vec<u8>, len: usize) -> Result<()> {
        v.clear();
        let got = (&mut self.inner).take(len as u64).read_to_end(v)?;
        if got != len {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("expected {} bytes, found {}", len, got),
            ).into());
        }
        Ok(())
    }

    fn visit_node(&mut self, index: u32) -> bool {
        self.seen.insert(index)
    }
}


pub struct ArchiveWriter<W> {
    inner: W,
    seen: HashSet<u32>,
}

impl<W: Write> ArchiveWriter<W> {
    pub fn new(inner: W) -> ArchiveWriter<W> {
        ArchiveWriter {
            inner,
            seen: HashSet::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

macro_rules! write_byteorder {
    ($($name:ident, $ty:ty, $write_one:ident;)*) => {
        $(
            fn $name(&mut self, v: &mut $ty) -> Result<()> {
                self.inner.$write_one::<LE>(*v)?;
                Ok(())
            }
        )*
    };
}

impl<W: Write> Archive for ArchiveWriter<W> {
    fn is_reading(&self) -> bool {
        false
    }

    write_byteorder! {
        u16, u16, write_u16;
        i16, i16, write_i16;
        u32, u32, write_u32;
        i32, i32, write_i32;
        f32, f32, write_f32;
    }

    fn raw(&mut self, v: &mut Vec<u8>, len: usize) -> Result<()> {
        debug_assert_eq!(v.len(), len);
        self.inner.write_all(v)?;
        Ok(())
    }

    fn visit_node(&mut self, index: u32) -> bool {
        self.seen.insert(index)
    }
}
