use crate::{
    articulation::tongue::Tongue,
    dsp::{
        glottis::{GlottisTargets, DEFAULT_FREQUENCY, DEFAULT_TENSENESS},
        tract::{Constriction, TractLayout, DEFAULT_VELUM_TARGET},
    },
    MAX_CONSTRICTIONS, MAX_TRACT_SEGMENTS, MIN_TRACT_SEGMENTS,
};

pub const MIN_FREQUENCY: f64 = 20.0;
pub const MAX_FREQUENCY: f64 = 1000.0;
pub const MAX_DIAMETER: f64 = 5.0;

/// Everything the control thread may change, packed into one fixed-size value
/// so it can cross the realtime boundary through a ring buffer.
///
/// The audio thread applies at most one snapshot per block, always the newest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlSnapshot {
    pub glottis: GlottisTargets,
    pub target_diameter: [f64; MAX_TRACT_SEGMENTS],
    /// Number of meaningful entries in `target_diameter`.
    pub segments: usize,
    pub velum_target: f64,
    pub constrictions: [Constriction; MAX_CONSTRICTIONS],
    pub constriction_count: usize,
}

impl ControlSnapshot {
    /// Default voice targets over the resting tongue shape, the same shape a
    /// freshly built synthesizer starts from.
    pub fn neutral(segments: usize) -> Self {
        let segments = segments.clamp(MIN_TRACT_SEGMENTS, MAX_TRACT_SEGMENTS);
        let layout = TractLayout::new(segments);
        let mut target_diameter = [0.0; MAX_TRACT_SEGMENTS];
        Tongue::default().write_rest_diameters(&layout, &mut target_diameter[..segments]);
        Self {
            glottis: GlottisTargets::default(),
            target_diameter,
            segments,
            velum_target: DEFAULT_VELUM_TARGET,
            constrictions: [Constriction::default(); MAX_CONSTRICTIONS],
            constriction_count: 0,
        }
    }

    pub fn target_diameters(&self) -> &[f64] {
        &self.target_diameter[..self.segments.min(MAX_TRACT_SEGMENTS)]
    }

    pub fn target_diameters_mut(&mut self) -> &mut [f64] {
        &mut self.target_diameter[..self.segments.min(MAX_TRACT_SEGMENTS)]
    }

    pub fn set_target_diameters(&mut self, diameters: &[f64]) {
        for (target, &d) in self.target_diameters_mut().iter_mut().zip(diameters) {
            *target = d;
        }
    }

    pub fn constrictions(&self) -> &[Constriction] {
        &self.constrictions[..self.constriction_count.min(MAX_CONSTRICTIONS)]
    }

    /// Replace the constriction list. Entries past [`MAX_CONSTRICTIONS`] are dropped.
    pub fn set_constrictions(&mut self, constrictions: &[Constriction]) {
        let count = constrictions.len().min(MAX_CONSTRICTIONS);
        self.constrictions[..count].copy_from_slice(&constrictions[..count]);
        self.constriction_count = count;
    }

    /// Clamp every field into the range the model is built for. Non-finite
    /// values fall back to the [`neutral`](Self::neutral) defaults.
    pub fn sanitized(mut self) -> Self {
        self.segments = self.segments.clamp(MIN_TRACT_SEGMENTS, MAX_TRACT_SEGMENTS);
        self.constriction_count = self.constriction_count.min(MAX_CONSTRICTIONS);

        let g = &mut self.glottis;
        g.frequency = finite_or(g.frequency, DEFAULT_FREQUENCY).clamp(MIN_FREQUENCY, MAX_FREQUENCY);
        g.tenseness = finite_or(g.tenseness, DEFAULT_TENSENESS).clamp(0.0, 1.0);
        g.loudness = finite_or(g.loudness, 1.0).clamp(0.0, 1.0);

        let rest = Self::neutral(self.segments);
        for (d, &fallback) in self.target_diameters_mut().iter_mut().zip(rest.target_diameters()) {
            *d = finite_or(*d, fallback).clamp(0.0, MAX_DIAMETER);
        }
        self.velum_target = finite_or(self.velum_target, DEFAULT_VELUM_TARGET).clamp(0.0, 1.0);

        let count = self.constriction_count;
        for c in &mut self.constrictions[..count] {
            if !c.index.is_finite() || !c.diameter.is_finite() {
                *c = Constriction::default();
            }
            c.fricative_intensity = finite_or(c.fricative_intensity, 0.0).clamp(0.0, 1.0);
        }
        self
    }
}

impl Default for ControlSnapshot {
    fn default() -> Self {
        Self::neutral(crate::REFERENCE_TRACT_SEGMENTS)
    }
}

#[inline]
fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_snapshot_matches_tongue_rest_shape() {
        let snapshot = ControlSnapshot::neutral(44);
        let layout = TractLayout::new(44);
        assert_eq!(snapshot.target_diameters().len(), 44);
        assert_eq!(snapshot.target_diameters()[0], layout.neutral_diameter(0));
        assert_eq!(snapshot.target_diameters()[43], 1.5);
        assert!(snapshot.constrictions().is_empty());

        let mut tongue_rest = [0.0; 44];
        Tongue::default().write_rest_diameters(&layout, &mut tongue_rest);
        assert_eq!(snapshot.target_diameters(), &tongue_rest[..]);
    }

    #[test]
    fn non_finite_diameter_falls_back_to_tongue_rest() {
        let mut snapshot = ControlSnapshot::default();
        let rest = snapshot.target_diameter[25];
        snapshot.target_diameter[25] = f64::NAN;
        assert_eq!(snapshot.sanitized().target_diameter[25], rest);
    }

    #[test]
    fn sanitize_clamps_out_of_range_values() {
        let mut snapshot = ControlSnapshot::default();
        snapshot.glottis.frequency = 5_000.0;
        snapshot.glottis.tenseness = -2.0;
        snapshot.glottis.loudness = f64::NAN;
        snapshot.velum_target = 7.0;
        snapshot.target_diameter[3] = -1.0;
        snapshot.target_diameter[4] = f64::INFINITY;
        snapshot.set_constrictions(&[Constriction {
            index: 20.0,
            diameter: 0.4,
            fricative_intensity: 3.0,
        }]);

        let clean = snapshot.sanitized();
        assert_eq!(clean.glottis.frequency, MAX_FREQUENCY);
        assert_eq!(clean.glottis.tenseness, 0.0);
        assert_eq!(clean.glottis.loudness, 1.0);
        assert_eq!(clean.velum_target, 1.0);
        assert_eq!(clean.target_diameter[3], 0.0);
        assert_eq!(clean.target_diameter[4], TractLayout::new(44).neutral_diameter(4));
        assert_eq!(clean.constrictions()[0].fricative_intensity, 1.0);
    }

    #[test]
    fn non_finite_constriction_is_neutralized() {
        let mut snapshot = ControlSnapshot::default();
        snapshot.set_constrictions(&[Constriction {
            index: f64::NAN,
            diameter: 0.5,
            fricative_intensity: 1.0,
        }]);
        let clean = snapshot.sanitized();
        assert_eq!(clean.constrictions()[0].diameter, 0.0);
    }

    #[test]
    fn segment_count_is_kept_in_supported_range() {
        let mut snapshot = ControlSnapshot::default();
        snapshot.segments = 4_000;
        snapshot.constriction_count = 99;
        let clean = snapshot.sanitized();
        assert_eq!(clean.segments, MAX_TRACT_SEGMENTS);
        assert_eq!(clean.constrictions().len(), MAX_CONSTRICTIONS);
    }

    #[test]
    fn extra_constrictions_are_dropped() {
        let mut snapshot = ControlSnapshot::default();
        snapshot.set_constrictions(&[Constriction::default(); MAX_CONSTRICTIONS + 3]);
        assert_eq!(snapshot.constrictions().len(), MAX_CONSTRICTIONS);
    }
}
