use super::Axis;

/// The cargo space of a vehicle: the box `(0, 0, 0)-(dx, dy, dz)` with a weight limit. The door is
/// at `x = dx`.
#[derive(Clone, Debug, PartialEq)]
pub struct Container {
    pub dx: i32,
    pub dy: i32,
    pub dz: i32,
    pub weight_limit: f64,
}

impl Container {
    pub fn new(dx: i32, dy: i32, dz: i32, weight_limit: f64) -> Container {
        Container {
            dx,
            dy,
            dz,
            weight_limit,
        }
    }

    pub fn dimension(&self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.dx,
            Axis::Y => self.dy,
            Axis::Z => self.dz,
        }
    }

    pub fn area(&self) -> f64 {
        f64::from(self.dx) * f64::from(self.dy)
    }

    pub fn volume(&self) -> f64 {
        self.area() * f64::from(self.dz)
    }
}
