//! Sky gradient and ground relief

use glam::Vec3;

/// Vertical sky gradient evaluated on a dome around the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyGradient {
    /// sRGB colour at and above the zenith
    pub top: [f32; 3],
    /// sRGB colour at and below the horizon
    pub bottom: [f32; 3],
    /// Added to every component of the position before normalizing;
    /// pushes the horizon line below eye level
    pub offset: f32,
    pub radius: f32,
}

impl Default for SkyGradient {
    fn default() -> Self {
        Self {
            top: hex_rgb(0x0077FF),
            bottom: hex_rgb(0xFFFFFF),
            offset: 33.0,
            radius: 400.0,
        }
    }
}

impl SkyGradient {
    pub fn color_at(&self, position: Vec3) -> [f32; 3] {
        let h = (position + Vec3::splat(self.offset)).normalize_or_zero().y.max(0.0);
        [
            lerp(self.bottom[0], self.top[0], h),
            lerp(self.bottom[1], self.top[1], h),
            lerp(self.bottom[2], self.top[2], h),
        ]
    }
}

/// Split a 0xRRGGBB literal into sRGB components in [0, 1]
pub fn hex_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xFF) as f32 / 255.0,
        ((hex >> 8) & 0xFF) as f32 / 255.0,
        (hex & 0xFF) as f32 / 255.0,
    ]
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Ground plane layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundLayout {
    pub size: f32,
    pub height: f32,
    /// Vertices per side minus one
    pub subdivisions: u32,
    /// Peak height variation in either direction
    pub relief: f32,
    /// Texture repeats across the plane
    pub texture_repeat: f32,
}

impl Default for GroundLayout {
    fn default() -> Self {
        Self {
            size: 1000.0,
            height: 0.5,
            subdivisions: 200,
            relief: 0.15,
            texture_repeat: 70.0,
        }
    }
}

impl GroundLayout {
    /// Deterministic height offset in [-relief, relief] for a ground vertex
    pub fn relief_at(&self, x: f32, z: f32) -> f32 {
        let h = hash2(x.to_bits(), z.to_bits());
        let unit = (h >> 8) as f32 / (1u32 << 24) as f32;
        (unit * 2.0 - 1.0) * self.relief
    }
}

fn hash2(a: u32, b: u32) -> u32 {
    let mut h = a.wrapping_mul(0x9E37_79B1) ^ b.wrapping_mul(0x85EB_CA77);
    h ^= h >> 15;
    h = h.wrapping_mul(0xC2B2_AE3D);
    h ^= h >> 13;
    h = h.wrapping_mul(0x27D4_EB2F);
    h ^ (h >> 16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_rgb() {
        assert_eq!(hex_rgb(0xFFFFFF), [1.0, 1.0, 1.0]);
        assert_eq!(hex_rgb(0x0077FF), [0.0, 119.0 / 255.0, 1.0]);
    }

    #[test]
    fn test_sky_gradient_endpoints() {
        let sky = SkyGradient::default();
        // Far below the horizon clamps to the bottom colour
        assert_eq!(sky.color_at(Vec3::new(0.0, -400.0, 0.0)), sky.bottom);

        // Straight up is almost entirely the top colour
        let zenith = sky.color_at(Vec3::new(0.0, 400.0, 0.0));
        assert!(zenith[0] < 0.2);
        assert!(zenith[2] > 0.99);
    }

    #[test]
    fn test_sky_gets_bluer_with_height() {
        let sky = SkyGradient::default();
        let low = sky.color_at(Vec3::new(400.0, 0.0, 0.0));
        let high = sky.color_at(Vec3::new(200.0, 300.0, 0.0));
        assert!(high[0] < low[0]);
    }

    #[test]
    fn test_ground_relief_is_bounded_and_deterministic() {
        let ground = GroundLayout::default();
        for i in 0..500 {
            let x = i as f32 * 3.7 - 900.0;
            let z = i as f32 * -1.3 + 250.0;
            let r = ground.relief_at(x, z);
            assert!(r.abs() <= ground.relief, "relief {r} out of range");
            assert_eq!(r, ground.relief_at(x, z));
        }
    }

    #[test]
    fn test_ground_relief_varies() {
        let ground = GroundLayout::default();
        let samples: Vec<f32> = (0..50).map(|i| ground.relief_at(i as f32, 0.0)).collect();
        assert!(samples.iter().any(|r| *r > 0.0));
        assert!(samples.iter().any(|r| *r < 0.0));
    }
}
