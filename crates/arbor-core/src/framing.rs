//! Placing a freshly loaded asset and deriving orbit limits from its size

use glam::Vec3;

/// Axis-aligned bounds in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Bounds {
    pub const EMPTY: Bounds = Bounds {
        min: Vec3::splat(f32::MAX),
        max: Vec3::splat(f32::MIN),
    };

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: max.max(min),
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut bounds = Self::EMPTY;
        for p in points {
            bounds.extend(p);
        }
        bounds
    }

    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    pub fn extend(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            self.max - self.min
        }
    }

    pub fn center(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            (self.min + self.max) * 0.5
        }
    }

    /// The eight corners, for transforming local bounds into another space
    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }
}

/// Placement and orbit parameters for a displayed asset (Y up)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssetFraming {
    /// Translation to apply to the asset root
    pub translation: Vec3,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Point the camera orbits around
    pub orbit_target: Vec3,
}

/// Fraction of the asset height it is lifted above ground
const GROUND_LIFT: f32 = 0.05;
/// Orbit target height as a fraction of asset height
const TARGET_HEIGHT: f32 = 0.4;
const MIN_DISTANCE_FACTOR: f32 = 0.8;
const MAX_DISTANCE_FACTOR: f32 = 2.0;

impl AssetFraming {
    /// Centre the footprint on the origin, rest the base just above ground,
    /// and scale the orbit range to the horizontal footprint.
    pub fn from_bounds(bounds: &Bounds) -> Self {
        let bounds = if bounds.is_empty() {
            tracing::warn!("Asset has no mesh bounds, framing as a unit cube");
            Bounds::new(Vec3::splat(-0.5), Vec3::splat(0.5))
        } else {
            *bounds
        };

        let size = bounds.size();
        let center = bounds.center();
        let footprint = size.x.max(size.z).max(f32::EPSILON);

        Self {
            translation: Vec3::new(-center.x, -bounds.min.y + size.y * GROUND_LIFT, -center.z),
            min_distance: footprint * MIN_DISTANCE_FACTOR,
            max_distance: footprint * MAX_DISTANCE_FACTOR,
            orbit_target: Vec3::new(0.0, size.y * TARGET_HEIGHT, 0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_from_points() {
        let b = Bounds::from_points([
            Vec3::new(1.0, 0.0, -2.0),
            Vec3::new(-3.0, 4.0, 2.0),
            Vec3::new(0.0, 1.0, 0.0),
        ]);
        assert_eq!(b.min, Vec3::new(-3.0, 0.0, -2.0));
        assert_eq!(b.max, Vec3::new(1.0, 4.0, 2.0));
        assert_eq!(b.size(), Vec3::new(4.0, 4.0, 4.0));
        assert_eq!(b.center(), Vec3::new(-1.0, 2.0, 0.0));
    }

    #[test]
    fn test_empty_bounds() {
        let b = Bounds::default();
        assert!(b.is_empty());
        assert_eq!(b.size(), Vec3::ZERO);

        let b = Bounds::from_points([Vec3::ONE]);
        assert!(!b.is_empty());
        assert_eq!(b.size(), Vec3::ZERO);
    }

    #[test]
    fn test_framing_tree_standing_on_origin() {
        // 4 wide, 10 tall, 6 deep, offset sideways
        let b = Bounds::new(Vec3::new(1.0, 0.0, -1.0), Vec3::new(5.0, 10.0, 5.0));
        let f = AssetFraming::from_bounds(&b);

        assert_eq!(f.translation, Vec3::new(-3.0, 0.5, -2.0));
        assert!((f.min_distance - 4.8).abs() < 1e-5);
        assert!((f.max_distance - 12.0).abs() < 1e-5);
        assert_eq!(f.orbit_target, Vec3::new(0.0, 4.0, 0.0));

        // Placed footprint is centred and the base rests at 5% of the height
        let placed_min = b.min + f.translation;
        let placed_max = b.max + f.translation;
        assert_eq!((placed_min.x + placed_max.x) / 2.0, 0.0);
        assert_eq!((placed_min.z + placed_max.z) / 2.0, 0.0);
        assert!((placed_min.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_framing_asset_below_ground() {
        let b = Bounds::new(Vec3::new(-1.0, -2.0, -1.0), Vec3::new(1.0, 2.0, 1.0));
        let f = AssetFraming::from_bounds(&b);
        // Lifted so min.y lands at 0.05 * height
        assert!((b.min.y + f.translation.y - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_framing_without_meshes_uses_unit_cube() {
        let f = AssetFraming::from_bounds(&Bounds::EMPTY);
        assert!((f.min_distance - 0.8).abs() < 1e-6);
        assert!((f.max_distance - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_corners_cover_bounds() {
        let b = Bounds::new(Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(Bounds::from_points(b.corners()), b);
    }
}
