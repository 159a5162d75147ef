use super::{glottis::GlottalSource, math::{lerp, move_towards}, transient::TransientPool};
use crate::REFERENCE_TRACT_SEGMENTS;

/*
Vocal Tract Waveguide
=====================

The oral tract is a row of short cylindrical segments from the glottis (index
0) to the lips (index n-1). Each segment carries a right-going wave R (toward
the lips) and a left-going wave L (back toward the glottis). Where two
segments of different area meet, part of each wave is reflected:

    r = (A[i-1] - A[i]) / (A[i-1] + A[i])        A = diameter^2

    w        = r * (R[i-1] + L[i])
    R_out[i] = R[i-1] - w
    L_out[i] = L[i]   + w

This is the Kelly-Lochbaum scattering junction. A closed segment (A = 0) gets
a fixed near-total reflection of 0.999 instead.

Layout (reference 44-segment tract)
-----------------------------------

    glottis                                                         lips
    0 ········ blade_start(10) ········ tip_start(32) ····· lip_start(39) ··· n
                          │
                      nose_start(17)
                          │
                          ╰── nasal branch, nose_length = 28 segments ──→ nostrils

All landmarks scale with n / 44. The nasal branch joins the oral tract at
nose_start through a three-port junction whose coefficients are normalized by
the sum of the three adjoining areas. The first nasal segment is the velum:
its diameter opens and closes the branch.

Boundaries
----------

    glottis end   R_out[0] = 0.75 * L[0] + excitation
    lips          L_out[n] = -0.85 * R[n-1]
    nostrils      nose L_out[end] = -0.85 * nose R[end-1]

Every wave is damped by 0.999 and clamped to [-1, 1] on each tick, so
feedback can never run away.

Timing
------

The tract ticks twice per output sample. Reflection coefficients are double
buffered: a block computes `new_reflection` from the freshly moved diameters,
and every tick blends from the previous block's `reflection` to
`new_reflection` by lambda, so shape changes never click.
*/

const GLOTTAL_REFLECTION: f64 = 0.75;
const LIP_REFLECTION: f64 = -0.85;
const DAMPING: f64 = 0.999;
const CLOSED_REFLECTION: f64 = 0.999;

/// Diameter change rate of the articulators, in diameter units per second.
const MOVEMENT_SPEED: f64 = 15.0;
pub const DEFAULT_VELUM_TARGET: f64 = 0.01;
/// Velum area below which a released closure produces an audible burst.
const BURST_VELUM_AREA: f64 = 0.05;

const TURBULENCE_GAIN: f64 = 0.66;
const AMPLITUDE_UPDATE_INTERVAL: u32 = 10;
const AMPLITUDE_DECAY: f64 = 0.999;

/// Landmark segment indices, scaled from the reference tract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TractLayout {
    pub n: usize,
    pub blade_start: usize,
    pub tip_start: usize,
    pub lip_start: usize,
    pub nose_length: usize,
    pub nose_start: usize,
}

impl TractLayout {
    pub fn new(n: usize) -> Self {
        let scale = |reference: usize| reference * n / REFERENCE_TRACT_SEGMENTS;
        let nose_length = scale(28);
        Self {
            n,
            blade_start: scale(10),
            tip_start: scale(32),
            lip_start: scale(39),
            nose_length,
            nose_start: n - nose_length + 1,
        }
    }

    /// Neutral rest diameter of oral segment `i`: narrow glottis, wider
    /// pharynx, open mouth.
    pub fn neutral_diameter(&self, i: usize) -> f64 {
        let i = i as f64;
        let n = self.n as f64;
        let reference = REFERENCE_TRACT_SEGMENTS as f64;
        if i < 7.0 * n / reference - 0.5 {
            0.6
        } else if i < 12.0 * n / reference {
            1.1
        } else {
            1.5
        }
    }

    /// Fixed nasal profile, widening then tapering toward the nostrils.
    pub fn nose_rest_diameter(&self, i: usize) -> f64 {
        let d = 2.0 * (i as f64 / self.nose_length as f64);
        let diameter = if d < 1.0 {
            0.4 + 1.6 * d
        } else {
            0.5 + 1.5 * (2.0 - d)
        };
        diameter.min(1.9)
    }

    /// Rate factor for diameters returning to rest: the back of the tract
    /// moves slower than the tongue tip.
    fn slow_return(&self, i: usize) -> f64 {
        if i < self.nose_start {
            0.6
        } else if i >= self.tip_start {
            1.0
        } else {
            0.6 + 0.4 * (i - self.nose_start) as f64 / (self.tip_start - self.nose_start) as f64
        }
    }
}

/// A narrowing produced by a control: where it is, how tight, and how much
/// turbulence it currently makes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Constriction {
    /// Fractional segment position.
    pub index: f64,
    /// Diameter at the narrowing; zero or below means fully closed.
    pub diameter: f64,
    /// Frication gain in [0, 1].
    pub fricative_intensity: f64,
}

pub struct TractWaveguide {
    layout: TractLayout,
    half_step: f64,
    block_time: f64,

    right: Vec<f64>,
    left: Vec<f64>,
    junction_right: Vec<f64>,
    junction_left: Vec<f64>,
    reflection: Vec<f64>,
    new_reflection: Vec<f64>,
    max_amplitude: Vec<f64>,

    diameter: Vec<f64>,
    rest_diameter: Vec<f64>,
    target_diameter: Vec<f64>,
    area: Vec<f64>,

    nose_right: Vec<f64>,
    nose_left: Vec<f64>,
    nose_junction_right: Vec<f64>,
    nose_junction_left: Vec<f64>,
    nose_reflection: Vec<f64>,
    nose_diameter: Vec<f64>,
    nose_area: Vec<f64>,
    nose_max_amplitude: Vec<f64>,

    // Three-port junction at nose_start: (left, right, nose)
    junction_reflection: [f64; 3],
    new_junction_reflection: [f64; 3],

    velum_target: f64,
    last_obstruction: Option<usize>,
    transients: TransientPool,
    constrictions: [Constriction; crate::MAX_CONSTRICTIONS],
    constriction_count: usize,

    lip_output: f64,
    nose_output: f64,
    steps: u32,
}

impl TractWaveguide {
    /// Build a tract of `n` segments at rest. `n` must already be validated
    /// against the supported segment range.
    pub fn new(n: usize, sample_rate: f64, block_time: f64) -> Self {
        let layout = TractLayout::new(n);
        let nose_length = layout.nose_length;
        let diameter: Vec<f64> = (0..n).map(|i| layout.neutral_diameter(i)).collect();
        let mut nose_diameter: Vec<f64> =
            (0..nose_length).map(|i| layout.nose_rest_diameter(i)).collect();
        nose_diameter[0] = DEFAULT_VELUM_TARGET;

        let mut tract = Self {
            layout,
            half_step: 1.0 / (2.0 * sample_rate),
            block_time,
            right: vec![0.0; n],
            left: vec![0.0; n],
            junction_right: vec![0.0; n + 1],
            junction_left: vec![0.0; n + 1],
            reflection: vec![0.0; n + 1],
            new_reflection: vec![0.0; n + 1],
            max_amplitude: vec![0.0; n],
            rest_diameter: diameter.clone(),
            target_diameter: diameter.clone(),
            area: vec![0.0; n],
            diameter,
            nose_right: vec![0.0; nose_length],
            nose_left: vec![0.0; nose_length],
            nose_junction_right: vec![0.0; nose_length + 1],
            nose_junction_left: vec![0.0; nose_length + 1],
            nose_reflection: vec![0.0; nose_length + 1],
            nose_diameter,
            nose_area: vec![0.0; nose_length],
            nose_max_amplitude: vec![0.0; nose_length],
            junction_reflection: [0.0; 3],
            new_junction_reflection: [0.0; 3],
            velum_target: DEFAULT_VELUM_TARGET,
            last_obstruction: None,
            transients: TransientPool::new(),
            constrictions: [Constriction::default(); crate::MAX_CONSTRICTIONS],
            constriction_count: 0,
            lip_output: 0.0,
            nose_output: 0.0,
            steps: 0,
        };
        tract.settle_reflections();
        tract
    }

    /// Replace the rest shape and jump the tract straight to it. Only for
    /// use before audio starts; the running tract moves via targets.
    pub fn set_rest_diameters(&mut self, rest: &[f64]) {
        for (i, &d) in rest.iter().take(self.layout.n).enumerate() {
            self.rest_diameter[i] = d;
            self.target_diameter[i] = d;
            self.diameter[i] = d;
        }
        self.settle_reflections();
    }

    /// Update control-rate targets. Takes effect at the next `finish_block`.
    pub fn set_targets(
        &mut self,
        target_diameter: &[f64],
        velum_target: f64,
        constrictions: &[Constriction],
    ) {
        for (target, &d) in self.target_diameter.iter_mut().zip(target_diameter) {
            *target = d;
        }
        self.velum_target = velum_target;

        let count = constrictions.len().min(self.constrictions.len());
        self.constrictions[..count].copy_from_slice(&constrictions[..count]);
        self.constriction_count = count;
    }

    /// Compute reflections twice so the blend buffers agree.
    fn settle_reflections(&mut self) {
        self.calculate_nose_reflections();
        self.calculate_reflections();
        self.calculate_reflections();
    }

    /// One half-sample tick of the waveguide.
    pub fn step(
        &mut self,
        glottal_output: f64,
        turbulence_noise: f64,
        lambda: f64,
        glottis: &GlottalSource,
    ) {
        let n = self.layout.n;
        let update_amplitudes = self.steps % AMPLITUDE_UPDATE_INTERVAL == 0;
        self.steps = self.steps.wrapping_add(1);

        self.transients.process(&mut self.right, &mut self.left, self.half_step);
        self.add_turbulence(turbulence_noise, glottis.noise_modulator());

        self.junction_right[0] = self.left[0] * GLOTTAL_REFLECTION + glottal_output;
        self.junction_left[n] = self.right[n - 1] * LIP_REFLECTION;

        for i in 1..n {
            let r = lerp(self.reflection[i], self.new_reflection[i], lambda);
            let w = r * (self.right[i - 1] + self.left[i]);
            self.junction_right[i] = self.right[i - 1] - w;
            self.junction_left[i] = self.left[i] + w;
        }

        // Three-port junction with the nasal branch
        let i = self.layout.nose_start;
        let [old_left, old_right, old_nose] = self.junction_reflection;
        let [new_left, new_right, new_nose] = self.new_junction_reflection;
        let nose_in = self.nose_left[0];

        let r = lerp(old_left, new_left, lambda);
        self.junction_left[i] = r * self.right[i - 1] + (1.0 + r) * (nose_in + self.left[i]);
        let r = lerp(old_right, new_right, lambda);
        self.junction_right[i] = r * self.left[i] + (1.0 + r) * (self.right[i - 1] + nose_in);
        let r = lerp(old_nose, new_nose, lambda);
        self.nose_junction_right[0] = r * nose_in + (1.0 + r) * (self.left[i] + self.right[i - 1]);

        for i in 0..n {
            self.right[i] = (self.junction_right[i] * DAMPING).clamp(-1.0, 1.0);
            self.left[i] = (self.junction_left[i + 1] * DAMPING).clamp(-1.0, 1.0);
        }
        if update_amplitudes {
            track_peaks(&mut self.max_amplitude, &self.right, &self.left);
        }
        self.lip_output = self.right[n - 1];

        // Nasal branch
        let nose_length = self.layout.nose_length;
        self.nose_junction_left[nose_length] = self.nose_right[nose_length - 1] * LIP_REFLECTION;
        for i in 1..nose_length {
            let w = self.nose_reflection[i] * (self.nose_right[i - 1] + self.nose_left[i]);
            self.nose_junction_right[i] = self.nose_right[i - 1] - w;
            self.nose_junction_left[i] = self.nose_left[i] + w;
        }
        for i in 0..nose_length {
            self.nose_right[i] = (self.nose_junction_right[i] * DAMPING).clamp(-1.0, 1.0);
            self.nose_left[i] = (self.nose_junction_left[i + 1] * DAMPING).clamp(-1.0, 1.0);
        }
        if update_amplitudes {
            track_peaks(&mut self.nose_max_amplitude, &self.nose_right, &self.nose_left);
        }
        self.nose_output = self.nose_right[nose_length - 1];
    }

    fn add_turbulence(&mut self, turbulence_noise: f64, noise_modulator: f64) {
        let n = self.layout.n as f64;
        for k in 0..self.constriction_count {
            let c = self.constrictions[k];
            if c.index < 2.0 || c.index > n || c.diameter <= 0.0 || c.fricative_intensity <= 0.0 {
                continue;
            }
            let noise =
                TURBULENCE_GAIN * turbulence_noise * c.fricative_intensity * noise_modulator;
            self.add_turbulence_at(noise, c.index, c.diameter);
        }
    }

    fn add_turbulence_at(&mut self, noise: f64, index: f64, diameter: f64) {
        let i = index.floor();
        let delta = index - i;
        let thinness = (8.0 * (0.7 - diameter)).clamp(0.0, 1.0);
        let openness = (30.0 * (diameter - 0.3)).clamp(0.0, 1.0);
        let shaped = noise * thinness * openness;

        let i = i as usize;
        for (segment, share) in [(i + 1, 1.0 - delta), (i + 2, delta)] {
            let half = shaped * share / 2.0;
            if let (Some(r), Some(l)) = (self.right.get_mut(segment), self.left.get_mut(segment)) {
                *r += half;
                *l += half;
            }
        }
    }

    /// Block-rate update: move articulators, release bursts, ease the velum
    /// and recompute every reflection coefficient.
    pub fn finish_block(&mut self) {
        self.reshape();
        self.calculate_reflections();
        self.calculate_nose_reflections();
    }

    fn reshape(&mut self) {
        let amount = self.block_time * MOVEMENT_SPEED;
        let mut new_last_obstruction = None;
        for i in 0..self.layout.n {
            let diameter = self.diameter[i];
            if diameter <= 0.0 {
                new_last_obstruction = Some(i);
            }
            let slow_return = self.layout.slow_return(i);
            self.diameter[i] = move_towards(
                diameter,
                self.target_diameter[i],
                slow_return * amount,
                2.0 * amount,
            );
        }

        if let Some(position) = self.last_obstruction {
            if new_last_obstruction.is_none() && self.nose_area[0] < BURST_VELUM_AREA {
                self.transients.spawn(position);
            }
        }
        self.last_obstruction = new_last_obstruction;

        self.nose_diameter[0] = move_towards(
            self.nose_diameter[0],
            self.velum_target,
            amount * 0.25,
            amount * 0.1,
        );
        self.nose_area[0] = self.nose_diameter[0] * self.nose_diameter[0];
    }

    /// Derive areas and oral reflections from the current diameters,
    /// rotating the previous block's values into `reflection`.
    pub fn calculate_reflections(&mut self) {
        for (a, d) in self.area.iter_mut().zip(&self.diameter) {
            *a = d * d;
        }
        for i in 1..self.layout.n {
            self.reflection[i] = self.new_reflection[i];
            self.new_reflection[i] = if self.area[i] == 0.0 {
                CLOSED_REFLECTION
            } else {
                (self.area[i - 1] - self.area[i]) / (self.area[i - 1] + self.area[i])
            };
        }

        let s = self.layout.nose_start;
        let (left, right, nose) = (self.area[s], self.area[s + 1], self.nose_area[0]);
        let sum = (left + right + nose).max(f64::MIN_POSITIVE);
        self.junction_reflection = self.new_junction_reflection;
        self.new_junction_reflection = [
            (2.0 * left - sum) / sum,
            (2.0 * right - sum) / sum,
            (2.0 * nose - sum) / sum,
        ];
    }

    pub fn calculate_nose_reflections(&mut self) {
        for (a, d) in self.nose_area.iter_mut().zip(&self.nose_diameter) {
            *a = d * d;
        }
        for i in 1..self.layout.nose_length {
            let sum = self.nose_area[i - 1] + self.nose_area[i];
            self.nose_reflection[i] = if sum == 0.0 {
                0.0
            } else {
                (self.nose_area[i - 1] - self.nose_area[i]) / sum
            };
        }
    }

    pub fn layout(&self) -> &TractLayout {
        &self.layout
    }

    pub fn lip_output(&self) -> f64 {
        self.lip_output
    }

    pub fn nose_output(&self) -> f64 {
        self.nose_output
    }

    pub fn diameters(&self) -> &[f64] {
        &self.diameter
    }

    pub fn rest_diameters(&self) -> &[f64] {
        &self.rest_diameter
    }

    pub fn target_diameters(&self) -> &[f64] {
        &self.target_diameter
    }

    pub fn nose_diameters(&self) -> &[f64] {
        &self.nose_diameter
    }

    pub fn reflections(&self) -> &[f64] {
        &self.reflection
    }

    pub fn new_reflections(&self) -> &[f64] {
        &self.new_reflection
    }

    pub fn nose_reflections(&self) -> &[f64] {
        &self.nose_reflection
    }

    /// Current and pending (left, right, nose) coefficients at the nose junction.
    pub fn junction_reflections(&self) -> ([f64; 3], [f64; 3]) {
        (self.junction_reflection, self.new_junction_reflection)
    }

    pub fn max_amplitude(&self) -> &[f64] {
        &self.max_amplitude
    }

    pub fn nose_max_amplitude(&self) -> &[f64] {
        &self.nose_max_amplitude
    }

    pub fn velum_target(&self) -> f64 {
        self.velum_target
    }

    pub fn constrictions(&self) -> &[Constriction] {
        &self.constrictions[..self.constriction_count]
    }

    pub fn transients(&self) -> &TransientPool {
        &self.transients
    }

    /// Travelling waves as (right, left, nose right, nose left).
    pub fn waves(&self) -> (&[f64], &[f64], &[f64], &[f64]) {
        (&self.right, &self.left, &self.nose_right, &self.nose_left)
    }
}

#[inline]
fn track_peaks(peaks: &mut [f64], right: &[f64], left: &[f64]) {
    for ((peak, r), l) in peaks.iter_mut().zip(right).zip(left) {
        let amplitude = (r + l).abs();
        if amplitude > *peak {
            *peak = amplitude;
        } else {
            *peak *= AMPLITUDE_DECAY;
        }
    }
}
