//! Orbit camera math (Y up)
//!
//! The controller reads the camera's current pose every update. After an asset
//! is framed it holds that pose untouched until the user next rotates or zooms,
//! so a restored view stays exactly where it was put.

use glam::{Mat3, Quat, Vec2, Vec3};
use std::f32::consts::PI;

use crate::framing::AssetFraming;

/// Camera position and orientation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl CameraPose {
    pub fn looking_at(eye: Vec3, target: Vec3) -> Self {
        Self {
            translation: eye,
            rotation: look_rotation(eye, target, Vec3::Y),
        }
    }
}

/// Rotation that points -Z from `eye` toward `target`, matching Bevy's `Transform::looking_at`
pub fn look_rotation(eye: Vec3, target: Vec3, up: Vec3) -> Quat {
    let back = (eye - target).normalize_or_zero();
    if back == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    let right = up.cross(back).try_normalize().unwrap_or_else(|| back.any_orthonormal_vector());
    let up = back.cross(right);
    Quat::from_mat3(&Mat3::from_cols(right, up, back))
}

/// Perspective projection parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perspective {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Perspective {
    fn default() -> Self {
        Self {
            fov_y_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Aspect ratio for a viewport, guarding against a collapsed window
pub fn aspect_ratio(width: f32, height: f32) -> f32 {
    if width <= 0.0 || height <= 0.0 {
        1.0
    } else {
        width / height
    }
}

/// Where the camera starts before any asset is framed
pub const INITIAL_EYE: Vec3 = Vec3::new(0.0, 5.0, 10.0);

/// Orbit controller with damping, zoom and clamped polar angle; panning is disabled
#[derive(Debug, Clone)]
pub struct OrbitController {
    pub target: Vec3,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Polar angle measured from +Y
    pub min_polar: f32,
    pub max_polar: f32,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    theta_delta: f32,
    phi_delta: f32,
    scale: f32,
    holding: bool,
}

impl Default for OrbitController {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar: PI / 6.0,
            max_polar: PI / 2.2,
            damping_factor: 0.05,
            rotate_speed: 0.5,
            zoom_speed: 1.0,
            theta_delta: 0.0,
            phi_delta: 0.0,
            scale: 1.0,
            holding: false,
        }
    }
}

impl OrbitController {
    /// Queue a drag of `delta` pixels in a viewport `viewport_height` pixels tall
    pub fn rotate(&mut self, delta: Vec2, viewport_height: f32) {
        let height = viewport_height.max(1.0);
        self.theta_delta -= 2.0 * PI * delta.x / height * self.rotate_speed;
        self.phi_delta -= 2.0 * PI * delta.y / height * self.rotate_speed;
        self.holding = false;
    }

    /// Queue a zoom; positive steps move the camera closer
    pub fn zoom(&mut self, steps: f32) {
        self.scale *= 0.95_f32.powf(self.zoom_speed * steps);
        self.holding = false;
    }

    /// Retarget to a freshly placed asset without moving the camera
    pub fn apply_framing(&mut self, framing: &AssetFraming) {
        self.min_distance = framing.min_distance;
        self.max_distance = framing.max_distance;
        self.target = framing.orbit_target;
        // Drop leftover momentum and leave the camera where it is
        self.theta_delta = 0.0;
        self.phi_delta = 0.0;
        self.scale = 1.0;
        self.holding = true;
    }

    /// One damping step from the camera's current pose
    pub fn update(&mut self, current: CameraPose) -> CameraPose {
        if self.holding {
            return current;
        }

        let offset = current.translation - self.target;
        let radius = offset.length();

        let (mut theta, mut phi) = if radius > f32::EPSILON {
            (offset.x.atan2(offset.z), (offset.y / radius).clamp(-1.0, 1.0).acos())
        } else {
            (0.0, self.max_polar)
        };

        theta += self.theta_delta * self.damping_factor;
        phi += self.phi_delta * self.damping_factor;
        phi = phi.clamp(self.min_polar, self.max_polar);

        let radius = (radius * self.scale).clamp(self.min_distance, self.max_distance.max(self.min_distance));

        let sin_phi = phi.sin();
        let offset = Vec3::new(
            radius * sin_phi * theta.sin(),
            radius * phi.cos(),
            radius * sin_phi * theta.cos(),
        );

        self.theta_delta *= 1.0 - self.damping_factor;
        self.phi_delta *= 1.0 - self.damping_factor;
        self.scale = 1.0;

        CameraPose::looking_at(self.target + offset, self.target)
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    fn at(eye: Vec3) -> CameraPose {
        CameraPose::looking_at(eye, Vec3::ZERO)
    }

    #[test]
    fn test_look_rotation_faces_target() {
        let pose = CameraPose::looking_at(Vec3::new(0.0, 5.0, 10.0), Vec3::ZERO);
        let forward = pose.rotation * Vec3::NEG_Z;
        assert!(approx(forward, (Vec3::ZERO - pose.translation).normalize()));
    }

    #[test]
    fn test_update_without_input_keeps_position_in_range() {
        let mut orbit = OrbitController::default();
        let eye = INITIAL_EYE;
        let pose = orbit.update(at(eye));
        // Polar angle of (0, 5, 10) is ~63 degrees: inside [30, 81.8]
        assert!(approx(pose.translation, eye));
    }

    #[test]
    fn test_polar_angle_is_clamped() {
        let mut orbit = OrbitController::default();
        // Straight overhead
        let pose = orbit.update(at(Vec3::new(0.0, 10.0, 0.001)));
        let offset = pose.translation - orbit.target;
        let phi = (offset.y / offset.length()).acos();
        assert!((phi - PI / 6.0).abs() < 1e-4);

        // Below the ground
        let pose = orbit.update(at(Vec3::new(0.0, -10.0, 1.0)));
        let offset = pose.translation - orbit.target;
        let phi = (offset.y / offset.length()).acos();
        assert!((phi - PI / 2.2).abs() < 1e-4);
    }

    #[test]
    fn test_distance_is_clamped_to_framing() {
        let mut orbit = OrbitController::default();
        orbit.apply_framing(&AssetFraming {
            translation: Vec3::ZERO,
            min_distance: 4.0,
            max_distance: 8.0,
            orbit_target: Vec3::new(0.0, 2.0, 0.0),
        });

        // Clamping starts with the first user input after framing
        orbit.zoom(0.0);
        let pose = orbit.update(at(Vec3::new(0.0, 40.0, 30.0)));
        assert!(((pose.translation - orbit.target).length() - 8.0).abs() < 1e-4);

        let pose = orbit.update(at(Vec3::new(0.0, 2.5, 1.0)));
        assert!(((pose.translation - orbit.target).length() - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_rotation_is_damped() {
        let mut orbit = OrbitController::default();
        orbit.rotate(Vec2::new(100.0, 0.0), 800.0);

        let mut eye = INITIAL_EYE;
        let mut steps = Vec::new();
        for _ in 0..5 {
            let before = eye;
            eye = orbit.update(at(eye)).translation;
            steps.push((eye - before).length());
        }
        // Each frame moves less than the last
        assert!(steps.windows(2).all(|w| w[1] < w[0]));
        // Radius is preserved while orbiting
        assert!((eye.length() - INITIAL_EYE.length()).abs() < 1e-3);
    }

    #[test]
    fn test_zoom_scales_distance() {
        let mut orbit = OrbitController::default();
        orbit.zoom(1.0);
        let pose = orbit.update(at(INITIAL_EYE));
        assert!((pose.translation.length() - INITIAL_EYE.length() * 0.95).abs() < 1e-3);
        // Scale resets after each update
        let again = orbit.update(pose);
        assert!(approx(again.translation, pose.translation));
    }

    #[test]
    fn test_framing_holds_restored_pose_until_input() {
        let mut orbit = OrbitController::default();
        let saved = at(INITIAL_EYE);
        // Target above the camera's line of sight and a range that would clamp
        orbit.apply_framing(&AssetFraming {
            translation: Vec3::ZERO,
            min_distance: 4.8,
            max_distance: 12.0,
            orbit_target: Vec3::new(0.0, 4.0, 0.0),
        });

        for _ in 0..10 {
            assert_eq!(orbit.update(saved), saved);
        }

        // The next drag resumes orbiting around the new target
        orbit.rotate(Vec2::new(40.0, 0.0), 800.0);
        let moved = orbit.update(saved);
        assert_ne!(moved, saved);
        let forward = moved.rotation * Vec3::NEG_Z;
        assert!(approx(forward, (orbit.target - moved.translation).normalize()));
    }

    #[test]
    fn test_framing_drops_pending_motion() {
        let mut orbit = OrbitController::default();
        orbit.rotate(Vec2::new(300.0, 50.0), 800.0);
        orbit.zoom(3.0);
        orbit.apply_framing(&AssetFraming {
            translation: Vec3::ZERO,
            min_distance: 1.0,
            max_distance: 50.0,
            orbit_target: Vec3::ZERO,
        });

        // Input with no motion releases the hold; the dropped drag and zoom must not replay
        orbit.zoom(0.0);
        let pose = orbit.update(at(INITIAL_EYE));
        assert!(approx(pose.translation, INITIAL_EYE));
    }

    #[test]
    fn test_aspect_ratio() {
        assert_eq!(aspect_ratio(1920.0, 1080.0), 1920.0 / 1080.0);
        assert_eq!(aspect_ratio(800.0, 0.0), 1.0);
    }
}
