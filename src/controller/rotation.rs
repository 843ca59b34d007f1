use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::RotationError;
use crate::model::Transform2D;
use crate::utils::lerp;

/// Tuning for free spin and drag tracking
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinSettings {
    /// Scales the per-tick lerp of angular velocity toward zero. Each idle
    /// tick moves by `decay_rate * elapsed`, capped at the whole velocity.
    pub decay_rate: f32,
    /// Per-tick drag deltas beyond this are treated as an atan2 branch-cut jump
    pub wrap_threshold: f32,
}

impl Default for SpinSettings {
    fn default() -> Self {
        Self {
            decay_rate: 0.5,
            wrap_threshold: 350.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    /// `last_bearing` is the most recent world-space pointer sample
    Dragging { last_bearing: Vec2 },
}

/// Turns pointer drags into rotation and lets the object spin down when released.
///
/// Each tick while dragging, the change in bearing of the pointer around the
/// pivot is added to the rotation and kept as the angular velocity. Once
/// released, that velocity keeps being applied and decays toward zero.
#[derive(Debug, Clone)]
pub struct RotationController {
    settings: SpinSettings,
    state: DragState,
    angular_velocity: f32,
}

impl Default for RotationController {
    fn default() -> Self {
        Self::new(SpinSettings::default())
    }
}

impl RotationController {
    pub fn new(settings: SpinSettings) -> Self {
        Self {
            settings,
            state: DragState::Idle,
            angular_velocity: 0.0,
        }
    }

    pub fn settings(&self) -> &SpinSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SpinSettings {
        &mut self.settings
    }

    pub fn drag_state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Degrees per tick, signed
    pub fn angular_velocity(&self) -> f32 {
        self.angular_velocity
    }

    pub fn last_bearing(&self) -> Option<Vec2> {
        match self.state {
            DragState::Dragging { last_bearing } => Some(last_bearing),
            DragState::Idle => None,
        }
    }

    /// Grab the object. Pressing again mid-drag restarts from `world_position`.
    pub fn on_pointer_down(&mut self, world_position: Vec2) -> Result<(), RotationError> {
        check_position(world_position)?;
        self.state = DragState::Dragging { last_bearing: world_position };
        tracing::trace!(x = world_position.x, y = world_position.y, "drag start");
        Ok(())
    }

    /// Let go. The last drag velocity becomes the free-spin velocity.
    pub fn on_pointer_up(&mut self) {
        if self.is_dragging() {
            tracing::trace!(velocity = self.angular_velocity, "drag end");
        }
        self.state = DragState::Idle;
    }

    /// Advance one tick. `current_world_position` is only read while dragging.
    pub fn on_tick(
        &mut self,
        transform: &mut Transform2D,
        current_world_position: Vec2,
        elapsed: f32,
    ) -> Result<(), RotationError> {
        if !elapsed.is_finite() || elapsed < 0.0 {
            return Err(RotationError::InvalidElapsed(elapsed));
        }

        let last_bearing = match self.state {
            DragState::Idle => {
                transform.rotation += self.angular_velocity;
                let t = (self.settings.decay_rate * elapsed).clamp(0.0, 1.0);
                self.angular_velocity = lerp(self.angular_velocity, 0.0, t);
                return Ok(());
            }
            DragState::Dragging { last_bearing } => last_bearing,
        };

        check_position(current_world_position)?;

        let pivot = transform.position;
        let delta = bearing_degrees(last_bearing - pivot) - bearing_degrees(current_world_position - pivot);
        transform.rotation += delta;
        self.angular_velocity = unwrap_delta(delta, self.settings.wrap_threshold);
        self.state = DragState::Dragging { last_bearing: current_world_position };
        Ok(())
    }
}

/// Angle of `offset` from +X in degrees, in (-180, 180].
pub fn bearing_degrees(offset: Vec2) -> f32 {
    offset.y.atan2(offset.x).to_degrees()
}

// atan2 jumps by 360 when the pointer crosses the -X axis between samples
fn unwrap_delta(delta: f32, threshold: f32) -> f32 {
    if delta > threshold {
        delta - 360.0
    } else if delta < -threshold {
        delta + 360.0
    } else {
        delta
    }
}

fn check_position(p: Vec2) -> Result<(), RotationError> {
    if p.is_finite() {
        Ok(())
    } else {
        Err(RotationError::NonFinitePosition { x: p.x, y: p.y })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    fn assert_close(actual: f32, expected: f32, what: &str) {
        assert!(
            (actual - expected).abs() < EPS,
            "{what}: expected {expected}, got {actual}"
        );
    }

    fn at_degrees(deg: f32) -> Vec2 {
        Vec2::from_angle(deg.to_radians())
    }

    /// Drag once so the controller is left idle with velocity `v`.
    fn spinning_at(v: f32) -> (RotationController, Transform2D) {
        let mut controller = RotationController::default();
        let mut transform = Transform2D::default();
        controller.on_pointer_down(at_degrees(v)).unwrap();
        controller.on_tick(&mut transform, at_degrees(0.0), 0.016).unwrap();
        controller.on_pointer_up();
        transform.rotation = 0.0;
        (controller, transform)
    }

    #[test]
    fn test_starts_idle_and_still() {
        let controller = RotationController::default();
        assert!(!controller.is_dragging());
        assert_eq!(controller.angular_velocity(), 0.0);
        assert_eq!(controller.last_bearing(), None);
    }

    #[test]
    fn test_idle_decay_is_monotonic_and_converges() {
        let (mut controller, mut transform) = spinning_at(40.0);
        let mut previous = controller.angular_velocity().abs();
        assert!(previous > 39.0);

        for _ in 0..100 {
            controller.on_tick(&mut transform, Vec2::ZERO, 0.5).unwrap();
            let current = controller.angular_velocity().abs();
            assert!(current <= previous, "speed grew from {previous} to {current}");
            previous = current;
        }
        assert!(previous < 1e-6, "speed should have decayed to ~0, got {previous}");
    }

    #[test]
    fn test_idle_decay_converges_for_negative_spin() {
        let (mut controller, mut transform) = spinning_at(-40.0);
        assert!(controller.angular_velocity() < -39.0);

        let mut previous = controller.angular_velocity();
        for _ in 0..100 {
            controller.on_tick(&mut transform, Vec2::ZERO, 0.5).unwrap();
            let current = controller.angular_velocity();
            assert!(current <= 0.0, "decay flipped the sign: {current}");
            assert!(current >= previous, "speed grew from {previous} to {current}");
            previous = current;
        }
        assert!(previous.abs() < 1e-6, "speed should have decayed to ~0, got {previous}");
    }

    #[test]
    fn test_wrap_threshold_is_exclusive() {
        assert_eq!(unwrap_delta(350.0, 350.0), 350.0);
        assert_eq!(unwrap_delta(-350.0, 350.0), -350.0);
        assert_eq!(unwrap_delta(350.5, 350.0), -9.5);
        assert_eq!(unwrap_delta(-350.5, 350.0), 9.5);
    }

    #[test]
    fn test_idle_tick_applies_velocity_before_decay() {
        let (mut controller, mut transform) = spinning_at(30.0);
        let v = controller.angular_velocity();
        transform.rotation = 12.0;

        controller.on_tick(&mut transform, Vec2::ZERO, 0.25).unwrap();

        assert_close(transform.rotation, 12.0 + v, "rotation");
        assert_close(controller.angular_velocity(), v * (1.0 - 0.5 * 0.25), "velocity");
    }

    #[test]
    fn test_idle_tick_ignores_pointer() {
        let (mut controller, mut transform) = spinning_at(10.0);
        controller.on_tick(&mut transform, Vec2::NAN, 0.1).unwrap();
        assert!(transform.rotation.is_finite());
    }

    #[test]
    fn test_drag_quarter_turn_counter_clockwise() {
        let mut controller = RotationController::default();
        let mut transform = Transform2D::default();

        controller.on_pointer_down(Vec2::new(1.0, 0.0)).unwrap();
        controller.on_tick(&mut transform, Vec2::new(0.0, 1.0), 0.016).unwrap();

        assert_close(transform.rotation, -90.0, "rotation");
        assert_close(controller.angular_velocity(), -90.0, "velocity");
        assert_eq!(controller.last_bearing(), Some(Vec2::new(0.0, 1.0)));
    }

    #[test]
    fn test_wrap_correction_upper() {
        let mut controller = RotationController::default();
        let mut transform = Transform2D::default();

        // 177.5 -> -177.5 reads as +355 across the branch cut
        controller.on_pointer_down(at_degrees(177.5)).unwrap();
        controller.on_tick(&mut transform, at_degrees(-177.5), 0.016).unwrap();

        assert_close(transform.rotation, 355.0, "rotation gets the raw delta");
        assert_close(controller.angular_velocity(), -5.0, "velocity");
    }

    #[test]
    fn test_wrap_correction_lower() {
        let mut controller = RotationController::default();
        let mut transform = Transform2D::default();

        controller.on_pointer_down(at_degrees(-177.5)).unwrap();
        controller.on_tick(&mut transform, at_degrees(177.5), 0.016).unwrap();

        assert_close(transform.rotation, -355.0, "rotation gets the raw delta");
        assert_close(controller.angular_velocity(), 5.0, "velocity");
    }

    #[test]
    fn test_small_delta_across_branch_cut_is_not_corrected_below_threshold() {
        let mut controller = RotationController::default();
        let mut transform = Transform2D::default();

        controller.on_pointer_down(at_degrees(170.0)).unwrap();
        controller.on_tick(&mut transform, at_degrees(-170.0), 0.016).unwrap();

        // 340 is under the 350 threshold
        assert_close(controller.angular_velocity(), 340.0, "velocity");
    }

    #[test]
    fn test_down_then_up_keeps_velocity() {
        let (mut controller, _) = spinning_at(25.0);
        let v = controller.angular_velocity();

        controller.on_pointer_down(Vec2::new(3.0, 4.0)).unwrap();
        controller.on_pointer_up();

        assert!(!controller.is_dragging());
        assert_eq!(controller.angular_velocity(), v);
    }

    #[test]
    fn test_gesture_scenario() {
        let mut controller = RotationController::default();
        let mut transform = Transform2D::default();

        controller.on_pointer_down(Vec2::new(10.0, 0.0)).unwrap();
        controller.on_tick(&mut transform, Vec2::new(0.0, 10.0), 123.0).unwrap();
        assert_close(transform.rotation, -90.0, "rotation after drag");
        assert_close(controller.angular_velocity(), -90.0, "velocity after drag");
        assert_eq!(controller.last_bearing(), Some(Vec2::new(0.0, 10.0)));

        controller.on_pointer_up();
        controller.on_tick(&mut transform, Vec2::ZERO, 1.0).unwrap();
        assert_close(transform.rotation, -180.0, "rotation after free tick");
        assert_close(controller.angular_velocity(), -45.0, "velocity after decay");
    }

    #[test]
    fn test_stalled_frame_stops_without_sign_flip() {
        let (mut controller, mut transform) = spinning_at(20.0);
        controller.on_tick(&mut transform, Vec2::ZERO, 10.0).unwrap();
        assert_eq!(controller.angular_velocity(), 0.0);
    }

    #[test]
    fn test_pointer_down_again_resets_bearing() {
        let mut controller = RotationController::default();
        let mut transform = Transform2D::default();

        controller.on_pointer_down(Vec2::new(1.0, 0.0)).unwrap();
        controller.on_pointer_down(Vec2::new(0.0, 1.0)).unwrap();
        controller.on_tick(&mut transform, Vec2::new(0.0, 2.0), 0.016).unwrap();

        assert_close(transform.rotation, 0.0, "same bearing, no turn");
        assert_close(controller.angular_velocity(), 0.0, "velocity");
    }

    #[test]
    fn test_bearing_is_relative_to_pivot() {
        let mut controller = RotationController::default();
        let mut transform = Transform2D { position: Vec2::new(5.0, 5.0), ..Default::default() };

        controller.on_pointer_down(Vec2::new(6.0, 5.0)).unwrap();
        controller.on_tick(&mut transform, Vec2::new(5.0, 6.0), 0.016).unwrap();

        assert_close(transform.rotation, -90.0, "rotation");
    }

    #[test]
    fn test_rejects_non_finite_input() {
        let mut controller = RotationController::default();
        let mut transform = Transform2D::default();

        assert!(matches!(
            controller.on_pointer_down(Vec2::new(f32::NAN, 0.0)),
            Err(RotationError::NonFinitePosition { .. })
        ));
        assert!(!controller.is_dragging());

        controller.on_pointer_down(Vec2::new(1.0, 0.0)).unwrap();
        assert!(matches!(
            controller.on_tick(&mut transform, Vec2::new(0.0, f32::INFINITY), 0.016),
            Err(RotationError::NonFinitePosition { .. })
        ));
        assert_eq!(controller.last_bearing(), Some(Vec2::new(1.0, 0.0)));
        assert_eq!(transform.rotation, 0.0);
    }

    #[test]
    fn test_rejects_bad_elapsed() {
        let (mut controller, mut transform) = spinning_at(15.0);
        let v = controller.angular_velocity();

        assert_eq!(
            controller.on_tick(&mut transform, Vec2::ZERO, -0.1),
            Err(RotationError::InvalidElapsed(-0.1))
        );
        assert!(controller.on_tick(&mut transform, Vec2::ZERO, f32::NAN).is_err());
        assert_eq!(controller.angular_velocity(), v);
        assert_eq!(transform.rotation, 0.0);
    }

    #[test]
    fn test_zero_elapsed_rotates_without_decay() {
        let (mut controller, mut transform) = spinning_at(8.0);
        let v = controller.angular_velocity();
        controller.on_tick(&mut transform, Vec2::ZERO, 0.0).unwrap();
        assert_eq!(controller.angular_velocity(), v);
        assert_close(transform.rotation, v, "rotation");
    }
}
