//! The value types shared by every part of the loading oracle.
mod container;
mod cuboid;
mod group;
mod loading_flags;
mod loading_status;

pub use container::Container;
pub use cuboid::Axis;
pub use cuboid::Cuboid;
pub use cuboid::Fragility;
pub use cuboid::HomogeneityKey;
pub use cuboid::Rotation;
pub use group::Group;
pub use loading_flags::LoadingFlag;
pub use loading_flags::LoadingMask;
pub use loading_flags::PackingType;
pub use loading_status::LoadingStatus;
