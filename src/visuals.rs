//! Static visual data for particle coloring.

use glam::Vec3;

/// Vibrant hues sampled uniformly at burst generation time.
///
/// Process-wide static data, not user-configurable. The inside/outside
/// gradient remap overwrites these on every color change, so they act as
/// the substrate coloring of a freshly generated burst.
pub const VIBRANT: [Vec3; 7] = [
    Vec3::new(1.0, 0.0, 0.267), // Crimson
    Vec3::new(1.0, 0.733, 0.0), // Amber
    Vec3::new(0.0, 1.0, 0.267), // Spring green
    Vec3::new(0.0, 0.733, 1.0), // Azure
    Vec3::new(1.0, 0.0, 1.0),   // Magenta
    Vec3::new(1.0, 1.0, 0.0),   // Yellow
    Vec3::new(1.0, 0.341, 0.2), // Coral
];
