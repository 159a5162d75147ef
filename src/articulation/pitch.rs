use std::f64::consts::FRAC_PI_2;

/// Bottom note of the pitch control (F2).
pub const BASE_NOTE: f64 = 87.3071;
/// Semitones spanned by the pitch control.
pub const SEMITONES: f64 = 20.0;

#[inline]
pub fn frequency_for_semitone(semitone: f64) -> f64 {
    BASE_NOTE * (semitone / 12.0).exp2()
}

/// Map a linear vertical position `t` in [0, 1] onto tenseness, easing in so
/// most of the travel stays in the breathy-to-modal range.
#[inline]
pub fn tenseness_for(t: f64) -> f64 {
    1.0 - (t.clamp(0.0, 1.0) * FRAC_PI_2).cos()
}

#[inline]
pub fn loudness_for(tenseness: f64) -> f64 {
    tenseness.max(0.0).powf(0.25)
}

/// Pitch and voice-quality control. Values persist after release, so the
/// next voiced sound starts where the last one ended.
///
/// Loudness stays at full scale until the control is first pressed; from then
/// on it follows tenseness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchControl {
    semitone: f64,
    vertical: f64,
    touched: bool,
    engaged: bool,
}

impl Default for PitchControl {
    fn default() -> Self {
        // 140 Hz at tenseness 0.6
        let semitone = 12.0 * (140.0 / BASE_NOTE).log2();
        let vertical = (1.0 - 0.6_f64).acos() / FRAC_PI_2;
        Self {
            semitone,
            vertical,
            touched: false,
            engaged: false,
        }
    }
}

impl PitchControl {
    /// Hold the control at `semitone` above [`BASE_NOTE`] and vertical
    /// position `t` (0 = breathy, 1 = pressed).
    pub fn press(&mut self, semitone: f64, t: f64) {
        self.touched = true;
        self.engaged = true;
        self.set(semitone, t);
    }

    pub fn set(&mut self, semitone: f64, t: f64) {
        self.semitone = semitone.clamp(0.0, SEMITONES);
        self.vertical = t.clamp(0.0, 1.0);
    }

    pub fn release(&mut self) {
        self.touched = false;
    }

    pub fn is_touched(&self) -> bool {
        self.touched
    }

    pub fn semitone(&self) -> f64 {
        self.semitone
    }

    /// Vertical position in [0, 1] that tenseness is derived from.
    pub fn vertical(&self) -> f64 {
        self.vertical
    }

    pub fn frequency(&self) -> f64 {
        frequency_for_semitone(self.semitone)
    }

    pub fn tenseness(&self) -> f64 {
        tenseness_for(self.vertical)
    }

    pub fn loudness(&self) -> f64 {
        if self.engaged {
            loudness_for(self.tenseness())
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octave_doubles_frequency() {
        assert!((frequency_for_semitone(0.0) - BASE_NOTE).abs() < 1e-9);
        assert!((frequency_for_semitone(12.0) - 2.0 * BASE_NOTE).abs() < 1e-9);
    }

    #[test]
    fn tenseness_curve_endpoints() {
        assert!(tenseness_for(0.0).abs() < 1e-12);
        assert!((tenseness_for(1.0) - 1.0).abs() < 1e-12);
        assert!(tenseness_for(0.5) < 0.5);
    }

    #[test]
    fn loudness_follows_tenseness() {
        assert_eq!(loudness_for(1.0), 1.0);
        assert!((loudness_for(0.0625) - 0.5).abs() < 1e-12);
        assert_eq!(loudness_for(0.0), 0.0);
    }

    #[test]
    fn default_matches_resting_voice() {
        let pitch = PitchControl::default();
        assert!((pitch.frequency() - 140.0).abs() < 1e-6);
        assert!((pitch.tenseness() - 0.6).abs() < 1e-9);
        assert!(!pitch.is_touched());
    }

    #[test]
    fn press_clamps_to_control_range() {
        let mut pitch = PitchControl::default();
        pitch.press(40.0, 2.0);
        assert_eq!(pitch.semitone(), SEMITONES);
        assert!((pitch.tenseness() - 1.0).abs() < 1e-12);
        pitch.release();
        assert!(!pitch.is_touched());
        assert_eq!(pitch.semitone(), SEMITONES);
    }

    #[test]
    fn loudness_is_full_until_first_press() {
        let mut pitch = PitchControl::default();
        assert_eq!(pitch.loudness(), 1.0);
        pitch.set(5.0, 0.2);
        assert_eq!(pitch.loudness(), 1.0);

        pitch.press(5.0, 0.5);
        let pressed = loudness_for(tenseness_for(0.5));
        assert!((pitch.loudness() - pressed).abs() < 1e-12);
        assert!(pitch.loudness() < 1.0);

        pitch.release();
        assert!((pitch.loudness() - pressed).abs() < 1e-12);
    }
}
