//! Editable document -> physical shape record, merged over a base record.
use crate::diag::{Diagnostic, Diagnostics};
use crate::document::{self, BodySurface, Chassis, PhyModelDocument, DOCUMENT_VERSION, ELLIPSOID_TYPE};
use crate::error::{Error, Result};
use crate::math::{Iso4, Quat, Vec3, QUAT_IDENTITY};
use crate::shape::{AxleGeometry, PhysicsShapeRecord, WheelModel};
use crate::skeleton::Joint;
use crate::surface::{Compound, Ellipsoid, Surface};
use crate::wheel::WheelSlot;

/// Compound child indices are `u16`, which bounds the number of parts.
pub const MAX_PARTS: usize = u16::MAX as usize + 1;

/// One skeleton joint together with the primitive it places.  Joints and primitives are built
/// as pairs so the skeleton and the compound can't drift apart.
#[derive(Clone, Debug, PartialEq)]
pub struct RigPart {
    pub joint: Joint,
    pub transform: Iso4,
    pub primitive: Surface,
}

impl RigPart {
    pub fn new(name: impl Into<String>, rotation: Quat, position: Vec3, primitive: Surface) -> RigPart {
        let transform = Iso4::from_rotation_translation(rotation, position);
        RigPart {
            joint: Joint {
                name: name.into(),
                parent_index: -1,
                rotation: Some(rotation),
                position: Some(position),
                transform: Some(transform),
            },
            transform,
            primitive,
        }
    }
}

/// Chassis scalars after applying the document over the base.
#[derive(Clone, Copy, Debug, PartialEq)]
struct ChassisGeometry {
    ground_height: f32,
    front: AxleGeometry,
    rear: AxleGeometry,
}

impl ChassisGeometry {
    fn axle(&self, slot: WheelSlot) -> &AxleGeometry {
        if slot.is_front() { &self.front } else { &self.rear }
    }
}

pub fn check_version(doc: &PhyModelDocument) -> Result<()> {
    if doc.version.as_deref() != Some(DOCUMENT_VERSION) {
        return Err(Error::VersionMismatch {
            expected: DOCUMENT_VERSION.to_owned(),
            found: doc.version.clone(),
        });
    }
    Ok(())
}

/// Applies `doc` to `record`.  The chassis scalars, the wheel models, the skeleton joints and
/// the surface tree are replaced; everything else in `record` is kept as is.
///
/// On error, `record` is left untouched.
pub fn merge_document(doc: &PhyModelDocument, record: &mut PhysicsShapeRecord) -> Result<Diagnostics> {
    check_version(doc)?;
    let surface = record.surface_node().ok_or(Error::MissingSurface)?;
    surface.skeleton().ok_or(Error::MissingSkeleton)?;

    let mut diags = Diagnostics::new();
    let chassis = resolve_chassis(doc.chassis.as_ref(), record, &mut diags);
    let wheels = synthesize_wheels(doc.chassis.as_ref());

    let mut parts = wheel_parts(&chassis);
    for body in doc.body_surfs.iter().flatten() {
        parts.push(body_part(body, &mut diags));
    }
    if parts.len() > MAX_PARTS {
        return Err(Error::TooManyParts { count: parts.len(), max: MAX_PARTS });
    }
    tracing::debug!("rebuilt rig: {} joints", parts.len());
    let (joints, compound) = assemble(parts);

    // Only the joints are replaced; the skeleton keeps its name and version.
    let surface = record.surface_node_mut().ok_or(Error::MissingSurface)?;
    surface.skeleton_mut().ok_or(Error::MissingSkeleton)?.joints = joints;
    surface.surf = Some(Surface::Compound(compound));

    record.ground_height = chassis.ground_height;
    record.front = chassis.front;
    record.rear = chassis.rear;
    record.wheels = wheels;
    Ok(diags)
}

fn resolve_chassis(
    chassis: Option<&Chassis>,
    record: &PhysicsShapeRecord,
    diags: &mut Diagnostics,
) -> ChassisGeometry {
    let mut g = ChassisGeometry {
        ground_height: record.ground_height,
        front: record.front,
        rear: record.rear,
    };
    let chassis = match chassis {
        Some(c) => c,
        None => {
            diags.push(Diagnostic::MissingChassis);
            return g;
        },
    };

    g.ground_height = chassis.ground_height;
    match &chassis.axle_front {
        Some(a) => g.front = a.geometry(),
        None => diags.push(Diagnostic::MissingAxle { axle: "front" }),
    }
    match &chassis.axle_rear {
        Some(a) => g.rear = a.geometry(),
        None => diags.push(Diagnostic::MissingAxle { axle: "rear" }),
    }
    g
}

/// Four wheels in canonical order.  Missing flags count as `false`.
fn synthesize_wheels(chassis: Option<&Chassis>) -> Vec<WheelModel> {
    WheelSlot::ALL.iter()
        .map(|&slot| {
            let flags = chassis
                .and_then(|c| c.axle(slot))
                .and_then(|a| a.flags(slot.side()))
                .copied()
                .unwrap_or_default();
            WheelModel {
                id: slot.default_id().to_owned(),
                is_driving: flags.is_driving,
                is_steering: flags.is_steering,
            }
        })
        .collect()
}

fn wheel_parts(chassis: &ChassisGeometry) -> Vec<RigPart> {
    WheelSlot::ALL.iter()
        .map(|&slot| {
            let p = slot.placement(chassis.ground_height, chassis.axle(slot));
            RigPart::new(
                slot.default_id(),
                QUAT_IDENTITY,
                p.position,
                Surface::Ellipsoid(Ellipsoid::new(p.half_extents)),
            )
        })
        .collect()
}

fn body_part(body: &BodySurface, diags: &mut Diagnostics) -> RigPart {
    let name = body.name.clone().unwrap_or_default();

    let rotation = match &body.rotation {
        Some(m) => {
            let (q, defaulted) = document::parse_quaternion(m);
            if defaulted {
                diags.push(Diagnostic::DefaultRotation { part: name.clone() });
            }
            q
        },
        None => QUAT_IDENTITY,
    };
    let position = match &body.position {
        Some(m) => {
            let (v, defaulted) = document::parse_vector(m);
            if defaulted {
                diags.push(Diagnostic::DefaultPosition { part: name.clone() });
            }
            v
        },
        None => [0.0; 3],
    };

    let primitive = body_primitive(body, &name, diags);
    RigPart::new(name, rotation, position, primitive)
}

fn body_primitive(body: &BodySurface, name: &str, diags: &mut Diagnostics) -> Surface {
    match body.kind.as_deref() {
        Some(ELLIPSOID_TYPE) => {
            let (size, defaulted) = match &body.parameters {
                Some(m) => document::parse_vector(m),
                None => ([0.0; 3], true),
            };
            if defaulted {
                diags.push(Diagnostic::DefaultParameters { part: name.to_owned() });
            }
            Surface::Ellipsoid(Ellipsoid::new(size))
        },
        kind => {
            diags.push(Diagnostic::UnsupportedType {
                part: name.to_owned(),
                kind: kind.map(str::to_owned),
            });
            Surface::Ellipsoid(Ellipsoid::new([0.0; 3]))
        },
    }
}

/// Splits parts into the skeleton's joint list and a flat compound with one child per joint.
fn assemble(parts: Vec<RigPart>) -> (Vec<Joint>, Compound) {
    let mut joints = Vec::with_capacity(parts.len());
    let mut compound = Compound {
        surfaces: Vec::with_capacity(parts.len()),
        unk01: None,
        transforms: Vec::with_capacity(parts.len()),
        indices: Vec::with_capacity(parts.len()),
    };
    for (i, part) in parts.into_iter().enumerate() {
        compound.surfaces.push(part.primitive);
        compound.transforms.push(part.transform);
        compound.indices.push(i as u16);
        joints.push(part.joint);
    }
    (joints, compound)
}
