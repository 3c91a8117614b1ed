//! 3D range test between world positions.

use crate::events::Position;

/// True iff the Euclidean distance between `point` and `observer` is within
/// `radius`. Boundary equality passes; a radius of zero only matches exact
/// coincidence.
pub fn in_range(point: Position, observer: Position, radius: f32) -> bool {
    let dx = point.x - observer.x;
    let dy = point.y - observer.y;
    let dz = point.z - observer.z;
    (dx * dx + dy * dy + dz * dz).sqrt() <= radius
}
