use std::f64::consts::PI;

use crate::dsp::tract::TractLayout;

pub const DEFAULT_TONGUE_INDEX: f64 = 12.9;
pub const DEFAULT_TONGUE_DIAMETER: f64 = 2.43;
/// Tongue diameters reachable from the control, closed to open.
pub const INNER_RADIUS: f64 = 2.05;
pub const OUTER_RADIUS: f64 = 3.5;
/// Offset between the drawn diameter grid and the rest-shape curve.
const GRID_OFFSET: f64 = 1.7;

/// Tongue body position in tract coordinates. Shapes the rest diameters
/// between the blade and the lips.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tongue {
    pub index: f64,
    pub diameter: f64,
}

impl Default for Tongue {
    fn default() -> Self {
        Self {
            index: DEFAULT_TONGUE_INDEX,
            diameter: DEFAULT_TONGUE_DIAMETER,
        }
    }
}

impl Tongue {
    /// Lowest and highest reachable tongue index.
    pub fn index_bounds(layout: &TractLayout) -> (f64, f64) {
        (
            (layout.blade_start + 2) as f64,
            (layout.tip_start - 3) as f64,
        )
    }

    pub fn index_centre(layout: &TractLayout) -> f64 {
        let (lower, upper) = Self::index_bounds(layout);
        0.5 * (lower + upper)
    }

    /// Whether a point lands on the tongue control area (with some slack).
    pub fn hit(layout: &TractLayout, index: f64, diameter: f64) -> bool {
        let (lower, upper) = Self::index_bounds(layout);
        (lower - 4.0..=upper + 4.0).contains(&index)
            && (INNER_RADIUS - 0.5..=OUTER_RADIUS + 0.5).contains(&diameter)
    }

    /// Follow a drag to `(index, diameter)`. The reachable index range narrows
    /// as the tongue opens, tracing the triangular control area.
    pub fn drag_to(&mut self, layout: &TractLayout, index: f64, diameter: f64) {
        let (lower, upper) = Self::index_bounds(layout);
        let centre = Self::index_centre(layout);

        let mut from_point =
            ((OUTER_RADIUS - diameter) / (OUTER_RADIUS - INNER_RADIUS)).clamp(0.0, 1.0);
        // Curve fit so the edge of the area reads as a straight line
        from_point = from_point.powf(0.58) - 0.2 * (from_point * from_point - from_point);

        self.diameter = diameter.clamp(INNER_RADIUS, OUTER_RADIUS);
        let out = from_point * 0.5 * (upper - lower);
        self.index = index.clamp(centre - out, centre + out);
    }

    /// Write the rest shape for this tongue position into `rest`, starting
    /// from the neutral tract.
    pub fn write_rest_diameters(&self, layout: &TractLayout, rest: &mut [f64]) {
        for (i, d) in rest.iter_mut().take(layout.n).enumerate() {
            *d = layout.neutral_diameter(i);
        }

        let span = (layout.tip_start - layout.blade_start) as f64;
        let fixed_diameter = 2.0 + (self.diameter - 2.0) / 1.5;
        let end = layout.lip_start.min(rest.len());
        for i in layout.blade_start..end {
            let t = 1.1 * PI * (self.index - i as f64) / span;
            let mut curve = (1.5 - fixed_diameter + GRID_OFFSET) * t.cos();
            if i + 2 == layout.blade_start || i + 1 == layout.lip_start {
                curve *= 0.8;
            }
            if i == layout.blade_start || i + 2 == layout.lip_start {
                curve *= 0.94;
            }
            rest[i] = 1.5 - curve;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> TractLayout {
        TractLayout::new(44)
    }

    #[test]
    fn default_shape_leaves_throat_neutral() {
        let layout = layout();
        let mut rest = [0.0; 44];
        Tongue::default().write_rest_diameters(&layout, &mut rest);
        for i in 0..layout.blade_start {
            assert_eq!(rest[i], layout.neutral_diameter(i));
        }
        for i in layout.lip_start..44 {
            assert_eq!(rest[i], 1.5);
        }
        assert!(rest.iter().all(|d| d.is_finite() && *d > 0.0));
    }

    #[test]
    fn tongue_narrows_tract_under_its_index() {
        let layout = layout();
        let mut rest = [0.0; 44];
        let tongue = Tongue { index: 20.0, diameter: INNER_RADIUS };
        tongue.write_rest_diameters(&layout, &mut rest);
        // cos(0) at the tongue index gives the tightest point
        let narrowest = (layout.blade_start..layout.lip_start)
            .min_by(|&a, &b| rest[a].total_cmp(&rest[b]));
        assert_eq!(narrowest, Some(20));
    }

    #[test]
    fn drag_clamps_into_control_area() {
        let layout = layout();
        let mut tongue = Tongue::default();

        tongue.drag_to(&layout, 100.0, 10.0);
        assert_eq!(tongue.diameter, OUTER_RADIUS);
        // Fully open: the index collapses onto the centre
        assert_eq!(tongue.index, Tongue::index_centre(&layout));

        tongue.drag_to(&layout, 100.0, INNER_RADIUS);
        let (_, upper) = Tongue::index_bounds(&layout);
        assert!((tongue.index - upper).abs() < 1e-9);
    }

    #[test]
    fn hit_area_has_slack() {
        let layout = layout();
        assert!(Tongue::hit(&layout, 10.0, 1.6));
        assert!(!Tongue::hit(&layout, 10.0, 0.5));
        assert!(!Tongue::hit(&layout, 40.0, 2.5));
    }
}
