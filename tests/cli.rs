//! End-to-end runs of the `vpm-convert` binary: export a shape file, edit the document, merge
//! it back.

use std::path::Path;
use std::process::Command;
use tempfile::tempdir;
use vpm_convert::container::ShapeFile;
use vpm_convert::document::{vector_map, BodySurface, PhyModelDocument, ELLIPSOID_TYPE};
use vpm_convert::math::QUAT_IDENTITY;
use vpm_convert::node::{Node, NodeRef};
use vpm_convert::shape::{AxleGeometry, PhysicsShapeRecord, WheelModel, CHUNK_ID};
use vpm_convert::skeleton::{Joint, Skeleton};
use vpm_convert::surface::{Compound, Ellipsoid, Surface, SurfaceNode};
use vpm_convert::wheel::{self, WheelSlot};

fn base_record() -> PhysicsShapeRecord {
    let mut record = PhysicsShapeRecord {
        version: 6,
        wheels: WheelSlot::ALL.iter()
            .map(|slot| WheelModel {
                id: slot.default_id().to_owned(),
                is_driving: !slot.is_front(),
                is_steering: slot.is_front(),
            })
            .collect(),
        ground_height: 0.0,
        front: AxleGeometry { position_z: 1.4, wheel_position_x: 0.8, wheel_radius: 0.3, wheel_half_width: 0.15 },
        rear: AxleGeometry { position_z: -1.2, wheel_position_x: 0.8, wheel_radius: 0.35, wheel_half_width: 0.2 },
        name: Some("Stadium".to_owned()),
        unk35: Some(vec![[1.0, 2.0, 3.0]]),
        ..PhysicsShapeRecord::default()
    };

    let mut joints = Vec::new();
    let mut compound = Compound::default();
    let mut push = |joint: Joint, size| {
        compound.transforms.push(joint.transform.unwrap());
        compound.indices.push(joints.len() as u16);
        compound.surfaces.push(Surface::Ellipsoid(Ellipsoid::new(size)));
        joints.push(joint);
    };
    for p in wheel::placements(&record).iter() {
        push(Joint::placed(p.slot.default_id(), QUAT_IDENTITY, p.position), p.half_extents);
    }
    push(Joint::placed("Body", QUAT_IDENTITY, [0.0, 0.6, 0.0]), [0.9, 0.5, 2.0]);

    let surface = SurfaceNode {
        version: 2,
        skeleton: Some(NodeRef::inline(1, Node::Skeleton(Skeleton {
            version: 19,
            name: "Skel".to_owned(),
            joints,
        }))),
        surf: Some(Surface::Compound(compound)),
        unk_tail: Vec::new(),
    };
    record.surface = Some(NodeRef::inline(0, Node::Surface(surface)));
    record
}

fn write_base(path: &Path) -> Vec<u8> {
    let mut prefix = b"GBX\x06\x00BUCE".to_vec();
    prefix.extend_from_slice(&CHUNK_ID.to_le_bytes());
    let mut file = ShapeFile {
        prefix,
        record: base_record(),
        suffix: b"\xfa\xca\xde\x01".to_vec(),
    };
    let bytes = file.to_bytes().expect("Failed to encode base");
    std::fs::write(path, &bytes).expect("Failed to write base");
    bytes
}

fn run(args: &[&Path]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_vpm-convert"))
        .args(args)
        .output()
        .expect("Failed to run vpm-convert")
}

#[test]
fn export_writes_document_next_to_input() {
    let dir = tempdir().expect("Failed to create temp dir");
    let base = dir.path().join("Car.Shape.Gbx");
    write_base(&base);

    let out = run(&[&base]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let json = std::fs::read_to_string(dir.path().join("Car.Shape.json"))
        .expect("Document should exist");
    let doc = PhyModelDocument::from_json(&json).expect("Document should parse");
    assert_eq!(doc.version.as_deref(), Some("0.0.2"));
    let names: Vec<_> = doc.body_surfs.unwrap().into_iter().map(|b| b.name.unwrap()).collect();
    assert_eq!(names, ["Body"]);
    let front = doc.chassis.unwrap().axle_front.unwrap();
    assert!(front.flags_left.unwrap().is_steering);
}

#[test]
fn edited_document_merges_into_base() {
    let dir = tempdir().expect("Failed to create temp dir");
    let base = dir.path().join("Car.Shape.Gbx");
    let original = write_base(&base);

    assert!(run(&[&base]).status.success());
    let json_path = dir.path().join("Car.Shape.json");
    let mut doc = PhyModelDocument::from_json(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    doc.body_surfs.as_mut().unwrap().push(BodySurface {
        name: Some("Spoiler".to_owned()),
        position: Some(vector_map([0.0, 1.1, -1.8])),
        rotation: None,
        kind: Some(ELLIPSOID_TYPE.to_owned()),
        parameters: Some(vector_map([0.7, 0.05, 0.2])),
    });
    std::fs::write(&json_path, doc.to_json().unwrap()).unwrap();

    // Base first: the document is found by its extension.
    let out = run(&[&base, &json_path]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let merged_bytes = std::fs::read(dir.path().join("Car.Shape.json.Gbx")).expect("Merged file should exist");
    assert_ne!(merged_bytes, original);
    assert!(merged_bytes.ends_with(b"\xfa\xca\xde\x01"));

    let merged = ShapeFile::from_bytes(&merged_bytes).expect("Merged file should decode");
    let surface = merged.record.surface_node().unwrap();
    let names: Vec<_> = surface.skeleton().unwrap().joints.iter().map(|j| j.name.as_str()).collect();
    assert_eq!(names, ["FLSurf", "FRSurf", "RRSurf", "RLSurf", "Body", "Spoiler"]);
    match &surface.surf {
        Some(Surface::Compound(c)) => {
            assert_eq!(c.surfaces.len(), 6);
            assert_eq!(c.indices, [0, 1, 2, 3, 4, 5]);
        },
        other => panic!("expected a compound, got {:?}", other),
    }
    assert_eq!(merged.record.unk35, Some(vec![[1.0, 2.0, 3.0]]));
    assert_eq!(merged.record.name.as_deref(), Some("Stadium"));
}

#[test]
fn unmodified_document_merges_back() {
    let dir = tempdir().expect("Failed to create temp dir");
    let base = dir.path().join("Car.Shape.Gbx");
    let original = write_base(&base);

    assert!(run(&[&base]).status.success());
    let json_path = dir.path().join("Car.Shape.json");
    let output = dir.path().join("roundtrip.Gbx");
    let out = Command::new(env!("CARGO_BIN_EXE_vpm-convert"))
        .arg(&json_path)
        .arg(&base)
        .arg("-o")
        .arg(&output)
        .output()
        .expect("Failed to run vpm-convert");
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let merged = ShapeFile::from_bytes(&std::fs::read(&output).unwrap()).unwrap();
    let original = ShapeFile::from_bytes(&original).unwrap();
    assert_eq!(merged.record.wheels, original.record.wheels);
    assert_eq!(merged.record.front, original.record.front);
    let joints = |f: &ShapeFile| f.record.surface_node().unwrap().skeleton().unwrap().joints.len();
    assert_eq!(joints(&merged), joints(&original));
}

#[test]
fn stale_document_fails_without_output() {
    let dir = tempdir().expect("Failed to create temp dir");
    let base = dir.path().join("Car.Shape.Gbx");
    write_base(&base);
    let json_path = dir.path().join("old.json");
    std::fs::write(&json_path, r#"{ "Version": "0.0.1" }"#).unwrap();

    let out = run(&[&json_path, &base]);
    assert!(!out.status.success());
    assert!(!dir.path().join("old.json.Gbx").exists());
}

#[test]
fn missing_arguments_print_usage() {
    let out = run(&[]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("Usage"));
}

#[test]
fn print_writes_document_to_stdout() {
    let dir = tempdir().expect("Failed to create temp dir");
    let base = dir.path().join("Car.Shape.Gbx");
    write_base(&base);

    let out = Command::new(env!("CARGO_BIN_EXE_vpm-convert"))
        .arg(&base)
        .arg("--print")
        .output()
        .expect("Failed to run vpm-convert");
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let printed = PhyModelDocument::from_json(&String::from_utf8_lossy(&out.stdout))
        .expect("stdout should hold the document");
    let written = PhyModelDocument::from_json(
        &std::fs::read_to_string(dir.path().join("Car.Shape.json")).unwrap(),
    ).unwrap();
    assert_eq!(printed, written);
}

#[test]
fn debug_log_lists_joints() {
    let dir = tempdir().expect("Failed to create temp dir");
    let base = dir.path().join("Car.Shape.Gbx");
    write_base(&base);

    let out = Command::new(env!("CARGO_BIN_EXE_vpm-convert"))
        .arg(&base)
        .env("RUST_LOG", "debug")
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to run vpm-convert");
    assert!(out.status.success());
    let log = String::from_utf8_lossy(&out.stderr);
    assert!(log.contains("skeleton \"Skel\""), "{}", log);
    assert!(log.contains("joint \"Body\""), "{}", log);
    assert!(log.contains("-> joint \"FLSurf\""), "{}", log);
}

#[test]
fn default_log_level_hides_joint_listing() {
    let dir = tempdir().expect("Failed to create temp dir");
    let base = dir.path().join("Car.Shape.Gbx");
    write_base(&base);

    let out = Command::new(env!("CARGO_BIN_EXE_vpm-convert"))
        .arg(&base)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run vpm-convert");
    assert!(out.status.success());
    let log = String::from_utf8_lossy(&out.stderr);
    assert!(log.contains("Exporting"), "{}", log);
    assert!(!log.contains("joint \"Body\""), "{}", log);
}

#[test]
fn three_paths_print_usage() {
    let dir = tempdir().expect("Failed to create temp dir");
    let a = dir.path().join("a.Gbx");
    let b = dir.path().join("b.json");
    let c = dir.path().join("c.Gbx");
    let out = run(&[&a, &b, &c]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("Usage"));
    assert!(!dir.path().join("b.json.Gbx").exists());
}
