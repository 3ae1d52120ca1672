use crate::config::CameraConfig;
use glam::{Mat4, Vec3};

/// Follow camera riding alongside the track at fixed offsets from the
/// character's rendered position. Smoothing is optional; the main rig snaps,
/// the hallway rig trails behind with an exponential lerp.
#[derive(Debug, Clone)]
pub struct FollowCamera {
    position_offset: Vec3,
    look_at_offset: Vec3,
    smoothing: Option<f32>,
    pub position: Vec3,
    pub look_at: Vec3,
}

impl FollowCamera {
    pub fn from_config(config: &CameraConfig) -> Self {
        let position_offset = Vec3::from(config.position_offset);
        let look_at_offset = Vec3::from(config.look_at_offset);
        Self {
            position_offset,
            look_at_offset,
            smoothing: config.smoothing,
            position: position_offset,
            look_at: look_at_offset,
        }
    }

    /// Runs once per display frame, outside the fixed-step loop.
    pub fn follow(&mut self, target: Vec3, frame_delta: f32) {
        let desired_position = target + self.position_offset;
        let desired_look_at = target + self.look_at_offset;
        match self.smoothing {
            Some(rate) => {
                let t = (rate * frame_delta).min(1.0);
                self.position = self.position.lerp(desired_position, t);
                self.look_at = self.look_at.lerp(desired_look_at, t);
            }
            None => {
                self.position = desired_position;
                self.look_at = desired_look_at;
            }
        }
    }

    /// Drops any smoothing trail, for loop-wrap teleports.
    pub fn snap(&mut self, target: Vec3) {
        self.position = target + self.position_offset;
        self.look_at = target + self.look_at_offset;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.look_at, Vec3::Y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;

    #[test]
    fn snapping_camera_tracks_target_exactly() {
        let mut camera = FollowCamera::from_config(&CameraConfig::default());
        camera.follow(Vec3::new(0.0, 0.0, 50.0), 1.0 / 60.0);
        assert_eq!(camera.position, Vec3::new(-160.0, 30.0, 50.0));
        assert_eq!(camera.look_at, Vec3::new(0.0, 30.0, 50.0));
        assert!(!camera.view_matrix().to_cols_array().iter().any(|v| v.is_nan()));
    }

    #[test]
    fn smoothed_camera_trails_then_converges() {
        let config = CameraConfig { smoothing: Some(6.0), ..CameraConfig::default() };
        let mut camera = FollowCamera::from_config(&config);
        let target = Vec3::new(0.0, 0.0, 100.0);
        camera.follow(target, 1.0 / 60.0);
        assert!(camera.position.z < 100.0);
        for _ in 0..600 {
            camera.follow(target, 1.0 / 60.0);
        }
        assert!((camera.position.z - 100.0).abs() < 0.5);
    }
}
