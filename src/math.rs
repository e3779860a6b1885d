use nalgebra::{Matrix3, Quaternion, UnitQuaternion};

pub type Vec3 = [f32; 3];
pub type Vec4 = [f32; 4];
/// `[x, y, z, w]` order, where `w` is the scalar.
pub type Quat = [f32; 4];
/// `[min_x, min_y, min_z, max_x, max_y, max_z]`.
pub type BoxF = [f32; 6];

pub const QUAT_IDENTITY: Quat = [0.0, 0.0, 0.0, 1.0];

/// Rigid 3x4 transform.  `rotation` is a 3x3 matrix stored in row-major order.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Iso4 {
    pub rotation: [f32; 9],
    pub translation: Vec3,
}

impl Iso4 {
    pub const IDENTITY: Iso4 = Iso4 {
        rotation: [
            1.0, 0.0, 0.0,
            0.0, 1.0, 0.0,
            0.0, 0.0, 1.0,
        ],
        translation: [0.0; 3],
    };

    pub fn from_rotation_translation(rotation: Quat, translation: Vec3) -> Iso4 {
        let m = rotation_matrix(rotation);
        let mut out = [0.0; 9];
        for r in 0 .. 3 {
            for c in 0 .. 3 {
                out[r * 3 + c] = m[(r, c)];
            }
        }
        Iso4 {
            rotation: out,
            translation,
        }
    }

    pub fn rotation_matrix(&self) -> Matrix3<f32> {
        Matrix3::from_row_slice(&self.rotation)
    }
}

/// Converts a quaternion to a rotation matrix.  Non-unit quaternions are normalized first; a
/// zero quaternion maps to the identity.
pub fn rotation_matrix(q: Quat) -> Matrix3<f32> {
    let q = Quaternion::new(q[3], q[0], q[1], q[2]);
    if q.norm() <= f32::EPSILON {
        return Matrix3::identity();
    }
    *UnitQuaternion::from_quaternion(q).to_rotation_matrix().matrix()
}
