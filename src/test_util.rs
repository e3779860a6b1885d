//! Shared fixtures for unit tests.
use crate::math::{Quat, QUAT_IDENTITY};
use crate::node::{Node, NodeRef};
use crate::shape::{AxleGeometry, PhysicsShapeRecord, WheelModel};
use crate::skeleton::{Joint, Skeleton};
use crate::surface::{Compound, Ellipsoid, Surface, SurfaceNode};
use crate::wheel::{self, WheelSlot};

/// 30 degrees about +y.
pub const NOSE_ROTATION: Quat = [0.0, 0.258_819_04, 0.0, 0.965_925_8];

/// A rig in the shape the game ships: four wheel joints, then the body parts, with one
/// ellipsoid per joint in a flat compound.
pub fn rig_record() -> PhysicsShapeRecord {
    let mut record = PhysicsShapeRecord {
        version: 3,
        unk01: 1.0,
        wheels: WheelSlot::ALL.iter()
            .map(|slot| WheelModel {
                id: slot.default_id().to_owned(),
                is_driving: true,
                is_steering: slot.is_front(),
            })
            .collect(),
        bounds: [-1.0, 0.0, -2.5, 1.0, 1.2, 2.5],
        ground_height: 0.05,
        front: AxleGeometry {
            position_z: 1.6,
            wheel_position_x: 0.85,
            wheel_radius: 0.35,
            wheel_half_width: 0.18,
        },
        rear: AxleGeometry {
            position_z: -1.3,
            wheel_position_x: 0.9,
            wheel_radius: 0.4,
            wheel_half_width: 0.22,
        },
        unk16: vec![[0.0, 1.0, 0.0, 0.5]],
        unk30: Some([1.0, 2.0, 3.0]),
        name: Some(String::new()),
        ..PhysicsShapeRecord::default()
    };

    let mut parts: Vec<(Joint, Surface)> = wheel::placements(&record)
        .iter()
        .map(|p| (
            Joint::placed(p.slot.default_id(), QUAT_IDENTITY, p.position),
            Surface::Ellipsoid(Ellipsoid::new(p.half_extents)),
        ))
        .collect();
    parts.push((
        Joint::placed("Body", QUAT_IDENTITY, [0.0, 0.5, 0.0]),
        Surface::Ellipsoid(Ellipsoid::new([0.9, 0.4, 2.2])),
    ));
    parts.push((
        Joint::placed("Nose", NOSE_ROTATION, [0.0, 0.3, 2.0]),
        Surface::Ellipsoid(Ellipsoid::new([0.4, 0.3, 0.5])),
    ));

    let mut compound = Compound::default();
    let mut joints = Vec::new();
    for (i, (joint, surface)) in parts.into_iter().enumerate() {
        compound.transforms.push(joint.transform.unwrap());
        compound.indices.push(i as u16);
        compound.surfaces.push(surface);
        joints.push(joint);
    }

    let skeleton = Skeleton {
        version: 19,
        name: "CarSkel".to_owned(),
        joints,
    };
    let surface = SurfaceNode {
        version: 2,
        skeleton: Some(NodeRef::inline(1, Node::Skeleton(skeleton))),
        surf: Some(Surface::Compound(compound)),
        unk_tail: vec![1, 0, 0, 0, 42, 0],
    };
    record.surface = Some(NodeRef::inline(0, Node::Surface(surface)));
    record
}
