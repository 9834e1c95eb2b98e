use std::f32::consts::TAU;

/// Per-frame rotation increment, radians.
const ANGLE_INCREMENT: f32 = 0.01;

/// Rotation state: a single angle, advanced once per frame, wrapped into
/// [0, 2π) so it never grows without bound.
#[derive(Debug, Default)]
pub struct Spin {
    angle: f32,
}

impl Spin {
    pub fn new() -> Self {
        Self { angle: 0.0 }
    }

    /// Advances by one frame's increment and returns the new angle.
    pub fn advance(&mut self) -> f32 {
        self.angle = (self.angle + ANGLE_INCREMENT) % TAU;
        self.angle
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f32, b: f32, tol: f32) {
        assert!((a - b).abs() < tol, "{a} !~ {b}");
    }

    #[test]
    fn starts_at_zero() {
        assert_eq!(Spin::new().angle(), 0.0);
    }

    #[test]
    fn advance_accumulates_the_fixed_increment() {
        let mut spin = Spin::new();
        for _ in 0..5 {
            spin.advance();
        }
        assert_close(spin.angle(), 0.05, 1e-6);
    }

    #[test]
    fn angle_matches_the_closed_form_modulo_tau() {
        let mut spin = Spin::new();
        for n in 1..=1000u32 {
            let angle = spin.advance();
            assert_close(angle, (n as f32 * ANGLE_INCREMENT) % TAU, 1e-3);
        }
    }

    #[test]
    fn angle_stays_in_range_indefinitely() {
        let mut spin = Spin::new();
        for _ in 0..10_000 {
            let angle = spin.advance();
            assert!((0.0..TAU).contains(&angle), "angle {angle} out of range");
        }
    }

    #[test]
    fn full_revolution_wraps_back_near_zero() {
        // 629 frames of 0.01 rad pass 2π by less than one increment.
        let mut spin = Spin::new();
        for _ in 0..629 {
            spin.advance();
        }
        assert!(spin.angle() < ANGLE_INCREMENT);
    }
}
