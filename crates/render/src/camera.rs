use glam::{Mat4, Vec3};
use museum_input::{ControlKey, ControlKeys};
use std::f32::consts::{FRAC_PI_2, PI};

/// Fixed camera parameters. None of these vary at runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Translation speed in units per second.
    pub speed: f32,
    /// Angle change in radians per update call, independent of elapsed time.
    pub angle_step: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            aspect: 4.0 / 3.0,
            near: 0.1,
            far: 100.0,
            speed: 3.0,
            angle_step: 0.01,
        }
    }
}

impl CameraSettings {
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }
}

/// Fly camera position and orientation.
///
/// Angles are unbounded and accumulate without wraparound; the trigonometry in
/// [`CameraState::direction`] makes any value valid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub position: Vec3,
    pub horizontal_angle: f32,
    pub vertical_angle: f32,
}

impl Default for CameraState {
    /// On +Z, looking toward -Z.
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            horizontal_angle: PI,
            vertical_angle: 0.0,
        }
    }
}

impl CameraState {
    /// Unit view direction from the two angles (spherical to Cartesian).
    pub fn direction(&self) -> Vec3 {
        let (h, v) = (self.horizontal_angle, self.vertical_angle);
        Vec3::new(v.cos() * h.sin(), v.sin(), v.cos() * h.cos())
    }

    /// Horizontal right vector; always orthogonal to [`Self::direction`].
    pub fn right(&self) -> Vec3 {
        let h = self.horizontal_angle - FRAC_PI_2;
        Vec3::new(h.sin(), 0.0, h.cos())
    }

    /// Up vector tied to the current orientation, not world up.
    pub fn up(&self) -> Vec3 {
        self.right().cross(self.direction())
    }

    /// Apply one update worth of input.
    ///
    /// Look keys step the angles by `angle_step` whatever `delta_seconds` is.
    /// Move keys then translate along the direction and right vectors derived
    /// from the updated angles, scaled by `delta_seconds * speed`.
    pub fn apply_input(&mut self, keys: &ControlKeys, delta_seconds: f32, settings: &CameraSettings) {
        let step = settings.angle_step;
        if keys.is_held(ControlKey::LookUp) {
            self.vertical_angle += step;
        }
        if keys.is_held(ControlKey::LookDown) {
            self.vertical_angle -= step;
        }
        if keys.is_held(ControlKey::TurnLeft) {
            self.horizontal_angle += step;
        }
        if keys.is_held(ControlKey::TurnRight) {
            self.horizontal_angle -= step;
        }

        if !keys.any_movement() {
            return;
        }

        let direction = self.direction();
        let right = self.right();
        let distance = delta_seconds * settings.speed;

        if keys.is_held(ControlKey::Forward) {
            self.position += direction * distance;
        }
        if keys.is_held(ControlKey::Backward) {
            self.position -= direction * distance;
        }
        if keys.is_held(ControlKey::StrafeRight) {
            self.position += right * distance;
        }
        if keys.is_held(ControlKey::StrafeLeft) {
            self.position -= right * distance;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.direction(), self.up())
    }
}

/// View and projection produced by one camera update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraMatrices {
    pub view: Mat4,
    pub projection: Mat4,
    pub eye: Vec3,
    pub direction: Vec3,
}

impl CameraMatrices {
    pub fn compute(state: &CameraState, settings: &CameraSettings) -> Self {
        Self {
            view: state.view_matrix(),
            projection: settings.projection_matrix(),
            eye: state.position,
            direction: state.direction(),
        }
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

/// Elapsed-time bookkeeping between camera updates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous tick. The first tick returns zero.
    pub fn tick(&mut self, now_seconds: f64) -> f32 {
        let last = self.last.replace(now_seconds).unwrap_or(now_seconds);
        (now_seconds - last) as f32
    }

    pub fn last(&self) -> Option<f64> {
        self.last
    }
}

/// Camera state plus the matrices derived from it at the last update.
#[derive(Debug, Clone)]
pub struct CameraController {
    state: CameraState,
    settings: CameraSettings,
    clock: FrameClock,
    matrices: CameraMatrices,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(CameraState::default(), CameraSettings::default())
    }
}

impl CameraController {
    pub fn new(state: CameraState, settings: CameraSettings) -> Self {
        Self {
            matrices: CameraMatrices::compute(&state, &settings),
            state,
            settings,
            clock: FrameClock::new(),
        }
    }

    /// Advance the clock to `now_seconds`, apply the held keys and recompute
    /// the view and projection matrices.
    pub fn compute_matrices_from_inputs(&mut self, keys: &ControlKeys, now_seconds: f64) -> CameraMatrices {
        let delta = self.clock.tick(now_seconds);
        self.state.apply_input(keys, delta, &self.settings);
        self.matrices = CameraMatrices::compute(&self.state, &self.settings);
        tracing::trace!(
            "camera at ({:.2}, {:.2}, {:.2}) h={:.3} v={:.3} dt={delta:.4}",
            self.state.position.x,
            self.state.position.y,
            self.state.position.z,
            self.state.horizontal_angle,
            self.state.vertical_angle
        );
        self.matrices
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.matrices.view
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.matrices.projection
    }

    pub fn matrices(&self) -> &CameraMatrices {
        &self.matrices
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn angle_grid() -> impl Iterator<Item = (f32, f32)> {
        (-8..=8).flat_map(|i| (-8..=8).map(move |j| (i as f32 * 0.9, j as f32 * 0.7)))
    }

    #[test]
    fn idle_frames_leave_position_unchanged() {
        let mut cam = CameraController::default();
        let start = cam.state().position;
        cam.compute_matrices_from_inputs(&ControlKeys::new(), 10.0);
        cam.compute_matrices_from_inputs(&ControlKeys::new(), 12.5);
        assert_eq!(cam.state().position, start);
        assert_eq!(cam.clock().last(), Some(12.5));
    }

    #[test]
    fn look_keys_alone_do_not_translate() {
        let mut cam = CameraController::default();
        let start = cam.state().position;
        let keys = ControlKeys::holding(&[ControlKey::LookUp, ControlKey::TurnLeft]);
        cam.compute_matrices_from_inputs(&keys, 0.0);
        cam.compute_matrices_from_inputs(&keys, 1.0);
        assert_eq!(cam.state().position, start);
    }

    #[test]
    fn vertical_step_ignores_elapsed_time() {
        let settings = CameraSettings::default();
        let keys = ControlKeys::holding(&[ControlKey::LookUp]);
        for dt in [0.0, 0.016, 1.0, 30.0] {
            let mut state = CameraState::default();
            let before = state.vertical_angle;
            state.apply_input(&keys, dt, &settings);
            assert_eq!(state.vertical_angle, before + 0.01);
            assert_eq!(state.horizontal_angle, PI);
        }
    }

    #[test]
    fn horizontal_keys_step_opposite_ways() {
        let settings = CameraSettings::default();
        let mut state = CameraState::default();
        state.apply_input(&ControlKeys::holding(&[ControlKey::TurnLeft]), 0.5, &settings);
        assert_eq!(state.horizontal_angle, PI + 0.01);
        state.apply_input(&ControlKeys::holding(&[ControlKey::TurnRight]), 0.5, &settings);
        assert!((state.horizontal_angle - PI).abs() < EPS);
    }

    #[test]
    fn angles_accumulate_without_wrapping() {
        let settings = CameraSettings::default();
        let mut state = CameraState::default();
        let keys = ControlKeys::holding(&[ControlKey::LookDown]);
        for _ in 0..1000 {
            state.apply_input(&keys, 0.0, &settings);
        }
        assert!((state.vertical_angle + 10.0).abs() < 1e-3);
    }

    #[test]
    fn direction_is_unit_length() {
        for (h, v) in angle_grid() {
            let state = CameraState {
                horizontal_angle: h,
                vertical_angle: v,
                ..CameraState::default()
            };
            assert!((state.direction().length() - 1.0).abs() < EPS, "h={h} v={v}");
        }
    }

    #[test]
    fn right_is_orthogonal_to_direction() {
        for (h, v) in angle_grid() {
            let state = CameraState {
                horizontal_angle: h,
                vertical_angle: v,
                ..CameraState::default()
            };
            assert!(state.right().dot(state.direction()).abs() < EPS, "h={h} v={v}");
            assert_eq!(state.right().y, 0.0);
        }
    }

    #[test]
    fn default_orientation_has_world_up() {
        let state = CameraState::default();
        assert!(state.direction().abs_diff_eq(Vec3::NEG_Z, EPS));
        assert!(state.right().abs_diff_eq(Vec3::X, EPS));
        assert!(state.up().abs_diff_eq(Vec3::Y, EPS));
    }

    #[test]
    fn projection_is_fixed_across_states() {
        let mut a = CameraController::default();
        let mut b = CameraController::new(
            CameraState {
                position: Vec3::new(-3.0, 7.0, 1.0),
                horizontal_angle: 0.3,
                vertical_angle: -1.2,
            },
            CameraSettings::default(),
        );
        a.compute_matrices_from_inputs(&ControlKeys::holding(&[ControlKey::Forward]), 0.0);
        b.compute_matrices_from_inputs(&ControlKeys::holding(&[ControlKey::LookUp]), 4.0);
        assert_eq!(a.projection_matrix(), b.projection_matrix());
        assert_ne!(a.view_matrix(), b.view_matrix());

        let s = a.settings();
        assert_eq!(
            (s.fov_degrees, s.aspect, s.near, s.far),
            (45.0, 4.0 / 3.0, 0.1, 100.0)
        );
        assert_eq!(a.projection_matrix(), s.projection_matrix());
    }

    #[test]
    fn forward_for_one_second_moves_three_units() {
        let mut cam = CameraController::default();
        let keys = ControlKeys::holding(&[ControlKey::Forward]);
        cam.compute_matrices_from_inputs(&keys, 100.0);
        // first update only starts the clock
        assert_eq!(cam.state().position, Vec3::new(0.0, 0.0, 5.0));
        cam.compute_matrices_from_inputs(&keys, 101.0);
        assert!(
            cam.state().position.abs_diff_eq(Vec3::new(0.0, 0.0, 2.0), 1e-4),
            "{:?}",
            cam.state().position
        );
    }

    #[test]
    fn strafe_and_backward_use_elapsed_time() {
        let settings = CameraSettings::default();
        let mut state = CameraState::default();
        state.apply_input(&ControlKeys::holding(&[ControlKey::StrafeRight]), 0.5, &settings);
        assert!(state.position.abs_diff_eq(Vec3::new(1.5, 0.0, 5.0), 1e-4));
        state.apply_input(&ControlKeys::holding(&[ControlKey::StrafeLeft]), 0.5, &settings);
        state.apply_input(&ControlKeys::holding(&[ControlKey::Backward]), 2.0, &settings);
        assert!(state.position.abs_diff_eq(Vec3::new(0.0, 0.0, 11.0), 1e-4));
    }

    #[test]
    fn view_maps_target_onto_negative_z() {
        let state = CameraState::default();
        let target = state.position + state.direction() * 4.0;
        let in_view = state.view_matrix().transform_point3(target);
        assert!(in_view.abs_diff_eq(Vec3::new(0.0, 0.0, -4.0), 1e-4));
    }

    #[test]
    fn clock_first_tick_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(3.0), 0.0);
        assert_eq!(clock.tick(3.25), 0.25);
        assert_eq!(clock.last(), Some(3.25));
    }

    #[test]
    fn matrices_are_valid_before_first_update() {
        let cam = CameraController::default();
        assert_eq!(*cam.matrices(), CameraMatrices::compute(cam.state(), cam.settings()));
        assert!(!cam.matrices().view_projection().is_nan());
    }
}
