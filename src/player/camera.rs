use glam::Vec3;

/// Camera-control collaborator. Owns the tracked target position the stream
/// window follows; how it moves (user input, easing, scripted paths) is
/// outside the streaming core's responsibility.
pub trait CameraControls {
    /// Per-frame control update.
    fn update(&mut self, dt: f32);

    /// Current tracked target position.
    fn target(&self) -> Vec3;
}

/// Constant-velocity glide rig for headless runs.
pub struct FreeCamera {
    pub position: Vec3,
    pub velocity: Vec3,
}

impl FreeCamera {
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        FreeCamera { position, velocity }
    }
}

impl CameraControls for FreeCamera {
    fn update(&mut self, dt: f32) {
        self.position += self.velocity * dt;
    }

    fn target(&self) -> Vec3 {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glide_advances_the_target() {
        let mut camera = FreeCamera::new(Vec3::new(0.0, 100.0, 0.0), Vec3::new(8.0, 0.0, -4.0));
        camera.update(0.5);
        assert_eq!(camera.target(), Vec3::new(4.0, 100.0, -2.0));
    }
}
