pub mod geometry;
pub mod joints;
pub mod landmark;

pub use geometry::{angle, angle_from_vertical, midpoint, try_angle, DEGENERATE_ANGLE};
pub use joints::Bilateral;
pub use landmark::{Landmark, LandmarkIndex, Pose, PoseRecord};
