use std::f64::consts::PI;

/*
Band-pass pre-filters for the noise source
==========================================

Breath and frication noise do not reach the tract as raw white noise. The
aspiration input is band-limited around 500 Hz and the frication input around
1 kHz, both with a broad Q of 0.5:

| input      | centre  | Q   | feeds                          |
| ---------- | ------- | --- | ------------------------------ |
| aspiration | 500 Hz  | 0.5 | glottis (breathy voice)        |
| frication  | 1000 Hz | 0.5 | tract turbulence at narrowings |

Both use the trapezoidal state-variable topology. Only the band-pass tap is
read, scaled by k so the peak gain is unity at the centre frequency.

    g = tan(pi * fc / fs)
    k = 1 / Q
*/

pub struct BandPass {
    ic1eq: f64, // First integrator's memory
    ic2eq: f64, // Second integrator's memory

    g: f64,
    k: f64,
}

impl BandPass {
    pub fn new(cutoff_hz: f64, q: f64, sample_rate: f64) -> Self {
        let nyquist_guard = 0.49 * sample_rate;
        let cutoff = cutoff_hz.clamp(1.0, nyquist_guard);
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            g: (PI * cutoff / sample_rate).tan(),
            k: 1.0 / q.max(1e-3),
        }
    }

    /// 500 Hz, Q 0.5. Feeds the glottal aspiration input.
    pub fn aspiration(sample_rate: f64) -> Self {
        Self::new(500.0, 0.5, sample_rate)
    }

    /// 1 kHz, Q 0.5. Feeds the tract frication input.
    pub fn frication(sample_rate: f64) -> Self {
        Self::new(1000.0, 0.5, sample_rate)
    }

    #[inline]
    pub fn next_sample(&mut self, sample: f64) -> f64 {
        let h = 1.0 / (1.0 + self.g * (self.g + self.k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + self.g * v3);
        let v2 = self.ic2eq + self.g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        self.k * v1
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }
}
