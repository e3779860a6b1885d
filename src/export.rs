//! Physical shape record -> editable document.
use std::collections::HashMap;
use crate::diag::{Diagnostic, Diagnostics};
use crate::document::{
    self, Axle, BodySurface, Chassis, PhyModelDocument, WheelFlags, DOCUMENT_VERSION,
    ELLIPSOID_TYPE,
};
use crate::shape::PhysicsShapeRecord;
use crate::skeleton::Joint;
use crate::surface::{Ellipsoid, Surface, SurfaceNode};
use crate::wheel::WheelSlot;

const WHEEL_SIZE_TOLERANCE: f32 = 1e-4;

pub struct Export {
    pub document: PhyModelDocument,
    pub diagnostics: Diagnostics,
}

/// What a skeleton joint turned into.
#[derive(Clone, Copy, Debug)]
enum JointRole {
    Wheel(WheelSlot),
    /// Index into the body part list.
    Body(usize),
}

/// Builds the document for `record`.  Missing pieces leave their section empty and add a
/// diagnostic; export itself never fails.
pub fn export_record(record: &PhysicsShapeRecord) -> Export {
    let mut diags = Diagnostics::new();

    let mut front = Axle::from_geometry(&record.front);
    let mut rear = Axle::from_geometry(&record.rear);
    let wheel_ids = collect_wheels(record, &mut front, &mut rear, &mut diags);

    let body_surfs = match record.surface_node() {
        Some(surface) => export_body(record, surface, &wheel_ids, &mut diags),
        None => {
            diags.push(Diagnostic::MissingSurface);
            Vec::new()
        },
    };

    let document = PhyModelDocument {
        version: Some(DOCUMENT_VERSION.to_owned()),
        chassis: Some(Chassis {
            ground_height: record.ground_height,
            axle_front: Some(front),
            axle_rear: Some(rear),
        }),
        body_surfs: Some(body_surfs),
    };
    Export {
        document,
        diagnostics: diags,
    }
}

/// Files each wheel's flags under its axle and side, going by position in the wheel array, and
/// returns the wheel identifiers for matching against joint names.
fn collect_wheels<'a>(
    record: &'a PhysicsShapeRecord,
    front: &mut Axle,
    rear: &mut Axle,
    diags: &mut Diagnostics,
) -> HashMap<&'a str, WheelSlot> {
    if record.wheels.is_empty() {
        diags.push(Diagnostic::MissingWheels);
    }

    let mut ids = HashMap::with_capacity(record.wheels.len());
    for (i, wheel) in record.wheels.iter().enumerate() {
        let slot = match WheelSlot::from_index(i) {
            Some(slot) => slot,
            None => {
                diags.push(Diagnostic::ExtraWheel { index: i, id: wheel.id.clone() });
                continue;
            },
        };

        let axle = if slot.is_front() { &mut *front } else { &mut *rear };
        *axle.flags_mut(slot.side()) = Some(WheelFlags {
            is_driving: wheel.is_driving,
            is_steering: wheel.is_steering,
        });
        ids.insert(wheel.id.as_str(), slot);
    }
    ids
}

fn export_body(
    record: &PhysicsShapeRecord,
    surface: &SurfaceNode,
    wheel_ids: &HashMap<&str, WheelSlot>,
    diags: &mut Diagnostics,
) -> Vec<BodySurface> {
    let skeleton = match surface.skeleton() {
        Some(s) => s,
        None => {
            diags.push(Diagnostic::MissingSkeleton);
            if surface.surf.is_none() {
                diags.push(Diagnostic::MissingSurfaceTree);
            }
            return Vec::new();
        },
    };
    tracing::debug!("skeleton {:?}: {} joints", skeleton.name, skeleton.joints.len());

    let mut bodies = Vec::new();
    let mut roles = Vec::with_capacity(skeleton.joints.len());
    for joint in &skeleton.joints {
        tracing::debug!(
            "  joint {:?}: parent {}, rotation {:?}, position {:?}, transform {:?}",
            joint.name, joint.parent_index, joint.rotation, joint.position, joint.transform,
        );

        if let Some(&slot) = wheel_ids.get(joint.name.as_str()) {
            roles.push(JointRole::Wheel(slot));
            continue;
        }
        roles.push(JointRole::Body(bodies.len()));
        bodies.push(BodySurface {
            name: Some(joint.name.clone()),
            position: joint.translation().map(document::vector_map),
            rotation: joint.rotation.map(document::quaternion_map),
            kind: None,
            parameters: None,
        });
    }

    match &surface.surf {
        Some(tree) => attach_primitives(record, tree, &skeleton.joints, &roles, &mut bodies, diags),
        None => diags.push(Diagnostic::MissingSurfaceTree),
    }
    bodies
}

/// Walks the flattened surface tree in lock-step with the joints and fills in the shape of
/// each body part.
fn attach_primitives(
    record: &PhysicsShapeRecord,
    tree: &Surface,
    joints: &[Joint],
    roles: &[JointRole],
    bodies: &mut [BodySurface],
    diags: &mut Diagnostics,
) {
    let primitives = tree.primitives().count();
    if primitives != joints.len() {
        diags.push(Diagnostic::CorrespondenceMismatch {
            joints: joints.len(),
            primitives,
        });
    }

    for ((index, primitive), (joint, &role)) in tree.primitives().zip(joints.iter().zip(roles)) {
        tracing::debug!("  surface #{} (id {}) -> joint {:?}", index, primitive.id(), joint.name);
        match (primitive, role) {
            (Surface::Ellipsoid(e), JointRole::Body(b)) => {
                bodies[b].kind = Some(ELLIPSOID_TYPE.to_owned());
                bodies[b].parameters = Some(document::vector_map(e.size));
            },
            // Wheel shapes are rebuilt from the chassis scalars, so the stored copy is dropped.
            (Surface::Ellipsoid(e), JointRole::Wheel(slot)) => {
                check_wheel_ellipsoid(record, slot, joint, e, diags);
            },
            (Surface::Unsupported { id, .. }, _) => {
                diags.push(Diagnostic::UnsupportedPrimitive {
                    joint: joint.name.clone(),
                    id: *id,
                });
            },
            (Surface::Compound(_), _) => {},
        }
    }
}

fn check_wheel_ellipsoid(
    record: &PhysicsShapeRecord,
    slot: WheelSlot,
    joint: &Joint,
    e: &Ellipsoid,
    diags: &mut Diagnostics,
) {
    let derived = slot.placement(record.ground_height, slot.axle(record)).half_extents;
    let differs = e.size.iter()
        .zip(derived.iter())
        .any(|(a, b)| (a - b).abs() > WHEEL_SIZE_TOLERANCE);
    if differs {
        diags.push(Diagnostic::WheelGeometryDiffers {
            joint: joint.name.clone(),
            stored: e.size,
            derived,
        });
    }
}
