use std::fmt::Display;

/// The three axes of a container. `X` runs from the front wall to the door, `Y` across the
/// container and `Z` from the floor upwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}

impl Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

/// Rotations by 90 degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Rotation {
    #[default]
    None,
    /// Rotated horizontally around the z-axis; length and width are swapped.
    Yaw,
}

/// Fragile items may be stacked onto fragile and non-fragile items, but a non-fragile item must
/// never rest on a fragile one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Fragility {
    #[default]
    None,
    Fragile,
}

/// An axis-aligned box demanded by a customer.
///
/// The dimensions `dx`, `dy`, `dz` are the dimensions of the item in its unrotated orientation;
/// [`Cuboid::rotation`] records how the item was placed. The `group_id` is relative to the route
/// the item was selected into (see [`crate::LoadingChecker::select_items`]) and is overwritten every
/// time the item is selected.
#[derive(Clone, Debug, PartialEq)]
pub struct Cuboid {
    pub id: usize,

    pub x: i32,
    pub y: i32,
    pub z: i32,

    pub dx: i32,
    pub dy: i32,
    pub dz: i32,

    pub rotation: Rotation,
    pub fragility: Fragility,
    pub weight: f64,
    pub enable_horizontal_rotation: bool,
    pub require_floor_placement: bool,

    pub group_id: usize,
}

impl Cuboid {
    pub fn new(
        id: usize,
        dx: i32,
        dy: i32,
        dz: i32,
        weight: f64,
        fragility: Fragility,
        enable_horizontal_rotation: bool,
    ) -> Cuboid {
        Cuboid {
            id,
            x: 0,
            y: 0,
            z: 0,
            dx,
            dy,
            dz,
            rotation: Rotation::None,
            fragility,
            weight,
            enable_horizontal_rotation,
            require_floor_placement: false,
            group_id: 0,
        }
    }

    pub fn area(&self) -> i64 {
        i64::from(self.dx) * i64::from(self.dy)
    }

    pub fn volume(&self) -> i64 {
        self.area() * i64::from(self.dz)
    }

    pub fn is_fragile(&self) -> bool {
        self.fragility == Fragility::Fragile
    }

    /// The smallest extent the item can have along `axis` over all its allowed orientations.
    pub fn minimum_rotatable_dimension(&self, axis: Axis) -> i32 {
        match axis {
            Axis::X if self.enable_horizontal_rotation => self.dx.min(self.dy),
            Axis::X => self.dx,
            Axis::Y if self.enable_horizontal_rotation => self.dx.min(self.dy),
            Axis::Y => self.dy,
            Axis::Z => self.dz,
        }
    }

    /// The largest extent the item can have along `axis` over all its allowed orientations.
    pub fn maximum_rotatable_dimension(&self, axis: Axis) -> i32 {
        match axis {
            Axis::X if self.enable_horizontal_rotation => self.dx.max(self.dy),
            Axis::X => self.dx,
            Axis::Y if self.enable_horizontal_rotation => self.dx.max(self.dy),
            Axis::Y => self.dy,
            Axis::Z => self.dz,
        }
    }

    /// Length, width and height under the given rotation.
    pub fn dimensions(&self, rotation: Rotation) -> (i32, i32, i32) {
        match rotation {
            Rotation::None => (self.dx, self.dy, self.dz),
            Rotation::Yaw => (self.dy, self.dx, self.dz),
        }
    }

    /// Length, width and height as currently placed.
    pub fn placed_dimensions(&self) -> (i32, i32, i32) {
        self.dimensions(self.rotation)
    }

    /// Whether the point lies inside the item as currently placed.
    pub fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        let (length, width, height) = self.placed_dimensions();

        x >= self.x
            && x < self.x + length
            && y >= self.y
            && y < self.y + width
            && z >= self.z
            && z < self.z + height
    }

    /// The key of the class of items which are interchangeable for placement-point generation.
    pub fn homogeneity_key(&self) -> HomogeneityKey {
        let (dx, dy, dz) = self.placed_dimensions();

        HomogeneityKey {
            dx,
            dy,
            dz,
            group_id: self.group_id,
            weight: self.weight as i64,
            fragility: self.fragility,
            enable_horizontal_rotation: self.enable_horizontal_rotation,
            require_floor_placement: self.require_floor_placement,
        }
    }
}

/// Items with equal keys receive the same placement points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HomogeneityKey {
    dx: i32,
    dy: i32,
    dz: i32,
    group_id: usize,
    weight: i64,
    fragility: Fragility,
    enable_horizontal_rotation: bool,
    require_floor_placement: bool,
}
