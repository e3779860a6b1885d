//! Non-fatal findings from export and import.  Each one is logged as it happens and kept, in
//! order, for the caller.
use std::fmt;
use crate::math::Vec3;

#[derive(Clone, Debug, PartialEq)]
pub enum Diagnostic {
    MissingWheels,
    ExtraWheel { index: usize, id: String },
    MissingSurface,
    MissingSkeleton,
    MissingSurfaceTree,
    /// Skeleton and flattened surface tree have different lengths.
    CorrespondenceMismatch { joints: usize, primitives: usize },
    UnsupportedPrimitive { joint: String, id: u32 },
    /// A wheel ellipsoid doesn't match the size derived from the chassis scalars.
    WheelGeometryDiffers { joint: String, stored: Vec3, derived: Vec3 },
    MissingChassis,
    MissingAxle { axle: &'static str },
    DefaultRotation { part: String },
    DefaultPosition { part: String },
    DefaultParameters { part: String },
    UnsupportedType { part: String, kind: Option<String> },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Diagnostic::MissingWheels => write!(f, "record has no wheel models"),
            Diagnostic::ExtraWheel { index, id } => {
                write!(f, "ignoring wheel #{} ({:?}): only 4 wheels are mapped", index, id)
            },
            Diagnostic::MissingSurface => write!(f, "record has no surface node"),
            Diagnostic::MissingSkeleton => write!(f, "surface has no skeleton"),
            Diagnostic::MissingSurfaceTree => write!(f, "surface has no shape"),
            Diagnostic::CorrespondenceMismatch { joints, primitives } => write!(
                f,
                "skeleton has {} joints but the shape has {} primitives",
                joints, primitives,
            ),
            Diagnostic::UnsupportedPrimitive { joint, id } => {
                write!(f, "joint {:?}: surface type {} is not supported", joint, id)
            },
            Diagnostic::WheelGeometryDiffers { joint, stored, derived } => write!(
                f,
                "wheel {:?}: stored ellipsoid {:?} differs from chassis-derived {:?}",
                joint, stored, derived,
            ),
            Diagnostic::MissingChassis => write!(f, "document has no chassis, keeping base values"),
            Diagnostic::MissingAxle { axle } => {
                write!(f, "document has no {} axle, keeping base values", axle)
            },
            Diagnostic::DefaultRotation { part } => {
                write!(f, "{:?}: incomplete rotation, using identity", part)
            },
            Diagnostic::DefaultPosition { part } => {
                write!(f, "{:?}: incomplete position, using origin", part)
            },
            Diagnostic::DefaultParameters { part } => {
                write!(f, "{:?}: incorrect parameters for Ellipsoid, using zero size", part)
            },
            Diagnostic::UnsupportedType { part, kind } => write!(
                f,
                "{:?}: unsupported surface type {:?}, using an empty Ellipsoid",
                part, kind,
            ),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Diagnostics {
        Diagnostics::default()
    }

    pub fn push(&mut self, d: Diagnostic) {
        tracing::warn!("{}", d);
        self.items.push(d);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, d: &Diagnostic) -> bool {
        self.items.contains(d)
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}
