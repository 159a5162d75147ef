//! Small numeric helpers shared by the glottis and the tract.

/// Step `current` toward `target` by at most `amount_up` (when rising) or
/// `amount_down` (when falling), never overshooting.
///
/// The asymmetric rates let articulators close faster than they open.
#[inline]
pub fn move_towards(current: f64, target: f64, amount_up: f64, amount_down: f64) -> f64 {
    if current < target {
        (current + amount_up).min(target)
    } else {
        (current - amount_down).max(target)
    }
}

/// Linear blend between a block's previous and current value.
#[inline]
pub fn lerp(old: f64, new: f64, lambda: f64) -> f64 {
    old * (1.0 - lambda) + new * lambda
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_towards_uses_direction_specific_rate() {
        assert!((move_towards(0.0, 1.0, 0.1, 0.5) - 0.1).abs() < 1e-12);
        assert!((move_towards(1.0, 0.0, 0.1, 0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn move_towards_never_overshoots() {
        assert_eq!(move_towards(0.95, 1.0, 0.1, 0.1), 1.0);
        assert_eq!(move_towards(0.05, 0.0, 0.1, 0.1), 0.0);
        assert_eq!(move_towards(0.3, 0.3, 0.1, 0.1), 0.3);
    }

    #[test]
    fn lerp_hits_endpoints() {
        assert_eq!(lerp(2.0, 4.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 4.0, 1.0), 4.0);
        assert!((lerp(2.0, 4.0, 0.25) - 2.5).abs() < 1e-12);
    }
}
