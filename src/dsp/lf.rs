use std::f64::consts::PI;

/*
Liljencrants-Fant Glottal Pulse
===============================

The LF model describes the *derivative* of airflow through the vocal folds
over one glottal cycle. It is what the tract actually hears: a smooth rise
while the folds open, a sharp negative spike when they snap shut, then a
short exponential recovery.

Vocabulary
----------

  t           Normalized time within one cycle, 0.0 to 1.0.

  Tp          Time of peak airflow (where the derivative crosses zero).

  Te          Time of the main excitation: the instant of fastest closure,
              where the derivative reaches its negative peak (-1 here).

  Ta          Return-phase time constant. How quickly the flow settles after
              closure; small Ta = abrupt closure = bright, buzzy voice.

  Rd          A single "voice quality" knob that predicts Ta, Tp and Te
              together (Fant 1995). Low Rd = pressed voice, high Rd = breathy.

  tenseness   The control exposed to players. Rd = 3 * (1 - tenseness),
              clamped to [0.5, 2.7], the range the regression was fitted on.


The Shape
---------

    flow derivative
        │      ╭──╮
        │    ╭╯   ╰╮
    0 ──┼───╯───────╰╮────────────────╭─────  → t
        │             ╰╮            ╭╯
        │              ╰╮        ╭─╯   return phase
   -1 ──┼───────────────╰───────╯           (t > Te)
        0     Tp        Te              1
            open phase
            (t <= Te)

  Open phase:    E0 * e^(alpha*t) * sin(omega*t),   omega = pi / Tp
  Return phase:  (shift - e^(-epsilon*(t - Te))) / Delta

shift = e^(-epsilon*(1 - Te)) makes the return phase land exactly on zero at
t = 1, and dividing by Delta = 1 - shift makes it start at exactly -1 at
t = Te. E0 and alpha are then chosen so the open phase also reaches -1 at Te
and so the whole cycle integrates to zero net flow (no DC leak into the
tract). The result is continuous at Te by construction.


From Rd to Shape Parameters
---------------------------

    Ra = -0.01 + 0.048 * Rd
    Rk =  0.224 + 0.118 * Rd
    Rg = (Rk/4)(0.5 + 1.2 Rk) / (0.11 Rd - Ra (0.5 + 1.2 Rk))

    Ta = Ra,  Tp = 1 / (2 Rg),  Te = Tp (1 + Rk)

Zero net flow means the area under the open phase must cancel the area of
the return phase. The return-phase integral is known in closed form; the
open-phase integral up to Tp is approximated as E0 * e^(alpha*Tp/2) * 2Tp/pi.
With s = sin(omega * Te), solving both conditions for x = e^alpha gives

    y     = -pi * s * upper / (2 Tp)
    alpha = ln(y) / (Tp/2 - Te)
    E0    = -1 / (s * e^(alpha * Te))

Across the clamped Rd range y stays strictly positive, so the logarithm is
always defined.
*/

pub const RD_MIN: f64 = 0.5;
pub const RD_MAX: f64 = 2.7;

/// Derived LF parameters for one glottal cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LfShape {
    pub rd: f64,
    pub ra: f64,
    pub rk: f64,
    pub rg: f64,
    pub tp: f64,
    pub te: f64,
    pub epsilon: f64,
    pub shift: f64,
    pub delta: f64,
    pub alpha: f64,
    pub e0: f64,
    pub omega: f64,
}

impl LfShape {
    /// Map a tenseness value onto Rd, clamping to the fitted range.
    #[inline]
    pub fn rd_from_tenseness(tenseness: f64) -> f64 {
        (3.0 * (1.0 - tenseness)).clamp(RD_MIN, RD_MAX)
    }

    pub fn from_tenseness(tenseness: f64) -> Self {
        Self::from_rd(Self::rd_from_tenseness(tenseness))
    }

    /// Derive the shape for an `rd` already inside [`RD_MIN`, `RD_MAX`].
    pub fn from_rd(rd: f64) -> Self {
        let rd = rd.clamp(RD_MIN, RD_MAX);

        // Normalized to a period of 1 and an excitation peak Ee of 1
        let ra = -0.01 + 0.048 * rd;
        let rk = 0.224 + 0.118 * rd;
        let rg = (rk / 4.0) * (0.5 + 1.2 * rk) / (0.11 * rd - ra * (0.5 + 1.2 * rk));

        let ta = ra;
        let tp = 1.0 / (2.0 * rg);
        let te = tp + tp * rk;

        let epsilon = 1.0 / ta;
        let shift = (-epsilon * (1.0 - te)).exp();
        let delta = 1.0 - shift;

        let rhs_integral = ((1.0 / epsilon) * (shift - 1.0) + (1.0 - te) * shift) / delta;
        let total_lower_integral = -(te - tp) / 2.0 + rhs_integral;
        let total_upper_integral = -total_lower_integral;

        let omega = PI / tp;
        let s = (omega * te).sin();

        let y = -PI * s * total_upper_integral / (tp * 2.0);
        let alpha = y.ln() / (tp / 2.0 - te);
        let e0 = -1.0 / (s * (alpha * te).exp());

        Self {
            rd,
            ra,
            rk,
            rg,
            tp,
            te,
            epsilon,
            shift,
            delta,
            alpha,
            e0,
            omega,
        }
    }

    pub fn is_finite(&self) -> bool {
        [
            self.rd,
            self.ra,
            self.rk,
            self.rg,
            self.tp,
            self.te,
            self.epsilon,
            self.shift,
            self.delta,
            self.alpha,
            self.e0,
            self.omega,
        ]
        .iter()
        .all(|v| v.is_finite())
    }

    /// Unscaled flow derivative at normalized time `t` in [0, 1].
    #[inline]
    pub fn evaluate(&self, t: f64) -> f64 {
        if t > self.te {
            (-(-self.epsilon * (t - self.te)).exp() + self.shift) / self.delta
        } else {
            self.e0 * (self.alpha * t).exp() * (self.omega * t).sin()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rd_sweep() -> impl Iterator<Item = f64> {
        (0..=220).map(|i| RD_MIN + (RD_MAX - RD_MIN) * i as f64 / 220.0)
    }

    #[test]
    fn every_rd_in_range_gives_finite_shape() {
        for rd in rd_sweep() {
            let shape = LfShape::from_rd(rd);
            assert!(shape.is_finite(), "non-finite shape at rd={rd}: {shape:?}");
            assert!(shape.tp > 0.0 && shape.tp < shape.te && shape.te < 1.0);
        }
    }

    #[test]
    fn tenseness_outside_unit_range_is_clamped() {
        for tenseness in [-4.0, -0.5, 0.0, 0.5, 1.0, 1.7, 3.0, 40.0] {
            let shape = LfShape::from_tenseness(tenseness);
            assert!((RD_MIN..=RD_MAX).contains(&shape.rd));
            assert!(shape.is_finite());
        }
    }

    #[test]
    fn continuous_at_excitation_instant() {
        for rd in rd_sweep() {
            let shape = LfShape::from_rd(rd);
            let before = shape.evaluate(shape.te);
            let after = shape.evaluate(shape.te + 1e-12);
            assert!(
                (before - after).abs() < 1e-6,
                "discontinuity at rd={rd}: {before} vs {after}"
            );
            assert!((before + 1.0).abs() < 1e-6, "excitation peak should be -1");
        }
    }

    #[test]
    fn cycle_starts_and_ends_at_zero() {
        for rd in [0.5, 1.0, 1.8, 2.7] {
            let shape = LfShape::from_rd(rd);
            assert!(shape.evaluate(0.0).abs() < 1e-12);
            assert!(shape.evaluate(1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn open_phase_rises_before_peak_flow() {
        let shape = LfShape::from_tenseness(0.6);
        assert!(shape.evaluate(shape.tp * 0.5) > 0.0);
        assert!(shape.evaluate((shape.tp + shape.te) * 0.5) < 0.0);
    }
}
