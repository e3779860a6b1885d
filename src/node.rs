use crate::archive::Archive;
use crate::error::Result;
use crate::skeleton::Skeleton;
use crate::surface::SurfaceNode;

pub const SURFACE_CLASS_ID: u32 = 0x0900_C000;
pub const SKELETON_CLASS_ID: u32 = 0x090B_A000;

/// A node reachable through a `NodeRef`.  Only the classes the mapper needs are decoded; the
/// rest are carried as raw bytes.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Surface(SurfaceNode),
    Skeleton(Skeleton),
    Opaque(OpaqueNode),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct OpaqueNode {
    pub class_id: u32,
    pub body: Vec<u8>,
}

impl Node {
    /// An empty node of the given class, ready to be filled by `archive`.
    pub fn empty(class_id: u32) -> Node {
        match class_id {
            SURFACE_CLASS_ID => Node::Surface(SurfaceNode::default()),
            SKELETON_CLASS_ID => Node::Skeleton(Skeleton::default()),
            _ => Node::Opaque(OpaqueNode { class_id, body: Vec::new() }),
        }
    }

    pub fn class_id(&self) -> u32 {
        match self {
            Node::Surface(_) => SURFACE_CLASS_ID,
            Node::Skeleton(_) => SKELETON_CLASS_ID,
            Node::Opaque(o) => o.class_id,
        }
    }

    pub fn archive<A: Archive>(&mut self, ar: &mut A) -> Result<()> {
        match self {
            Node::Surface(s) => s.archive(ar),
            Node::Skeleton(s) => s.archive(ar),
            Node::Opaque(o) => ar.bytes(&mut o.body),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeRef {
    /// First occurrence of `index`; owns the node.
    Inline { index: u32, node: Box<Node> },
    /// Back-reference to a node that was stored earlier in the file.
    Shared(u32),
}

impl NodeRef {
    pub fn inline(index: u32, node: Node) -> NodeRef {
        NodeRef::Inline { index, node: Box::new(node) }
    }

    pub fn index(&self) -> u32 {
        match *self {
            NodeRef::Inline { index, .. } => index,
            NodeRef::Shared(index) => index,
        }
    }

    pub fn node(&self) -> Option<&Node> {
        match self {
            NodeRef::Inline { node, .. } => Some(node.as_ref()),
            NodeRef::Shared(_) => None,
        }
    }

    pub fn node_mut(&mut self) -> Option<&mut Node> {
        match self {
            NodeRef::Inline { node, .. } => Some(node.as_mut()),
            NodeRef::Shared(_) => None,
        }
    }

    pub fn surface(&self) -> Option<&SurfaceNode> {
        match self.node()? {
            Node::Surface(s) => Some(s),
            _ => None,
        }
    }

    pub fn surface_mut(&mut self) -> Option<&mut SurfaceNode> {
        match self.node_mut()? {
            Node::Surface(s) => Some(s),
            _ => None,
        }
    }

    pub fn skeleton(&self) -> Option<&Skeleton> {
        match self.node()? {
            Node::Skeleton(s) => Some(s),
            _ => None,
        }
    }

    pub fn skeleton_mut(&mut self) -> Option<&mut Skeleton> {
        match self.node_mut()? {
            Node::Skeleton(s) => Some(s),
            _ => None,
        }
    }
}
