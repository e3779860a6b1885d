use crate::math::Vec3;
use crate::shape::{AxleGeometry, PhysicsShapeRecord};

/// Position of a wheel in the record's wheel array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WheelSlot {
    FrontLeft,
    FrontRight,
    RearRight,
    RearLeft,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Where a wheel sits and how big it is, derived from the chassis scalars.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelPlacement {
    pub slot: WheelSlot,
    pub position: Vec3,
    /// Ellipsoid half-extents: half width, radius, radius.
    pub half_extents: Vec3,
}

impl WheelSlot {
    /// Canonical wheel array order.
    pub const ALL: [WheelSlot; 4] = [
        WheelSlot::FrontLeft,
        WheelSlot::FrontRight,
        WheelSlot::RearRight,
        WheelSlot::RearLeft,
    ];

    pub fn from_index(i: usize) -> Option<WheelSlot> {
        WheelSlot::ALL.get(i).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Identifier given to synthesized wheels and their joints.
    pub fn default_id(self) -> &'static str {
        match self {
            WheelSlot::FrontLeft => "FLSurf",
            WheelSlot::FrontRight => "FRSurf",
            WheelSlot::RearRight => "RRSurf",
            WheelSlot::RearLeft => "RLSurf",
        }
    }

    pub fn is_front(self) -> bool {
        matches!(self, WheelSlot::FrontLeft | WheelSlot::FrontRight)
    }

    pub fn side(self) -> Side {
        match self {
            WheelSlot::FrontLeft | WheelSlot::RearLeft => Side::Left,
            WheelSlot::FrontRight | WheelSlot::RearRight => Side::Right,
        }
    }

    /// Left wheels sit at `+x`, right wheels at `-x`.
    pub fn lateral_sign(self) -> f32 {
        match self.side() {
            Side::Left => 1.0,
            Side::Right => -1.0,
        }
    }

    pub fn axle(self, record: &PhysicsShapeRecord) -> &AxleGeometry {
        if self.is_front() { &record.front } else { &record.rear }
    }

    pub fn placement(self, ground_height: f32, axle: &AxleGeometry) -> WheelPlacement {
        WheelPlacement {
            slot: self,
            position: [
                self.lateral_sign() * axle.wheel_position_x,
                ground_height + axle.wheel_radius,
                axle.position_z,
            ],
            half_extents: [axle.wheel_half_width, axle.wheel_radius, axle.wheel_radius],
        }
    }
}

/// Placements of all four wheels, in canonical order.
pub fn placements(record: &PhysicsShapeRecord) -> [WheelPlacement; 4] {
    WheelSlot::ALL.map(|slot| slot.placement(record.ground_height, slot.axle(record)))
}
