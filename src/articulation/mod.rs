//! Control-thread articulation: turns tongue, touch and pitch input into
//! [`ControlSnapshot`]s for the audio thread.
//!
//! Nothing here runs on the audio thread, so it is free to allocate.

pub mod pitch;
pub mod tongue;
pub mod touch;

use std::f64::consts::PI;

use crate::{
    dsp::{
        glottis::GlottisTargets,
        tract::{Constriction, TractLayout, DEFAULT_VELUM_TARGET},
    },
    synth::controls::ControlSnapshot,
    MAX_CONSTRICTIONS,
};

use self::{pitch::PitchControl, tongue::Tongue, touch::TouchSet};

/// Velum opening while a touch reaches into the nasal area.
pub const OPEN_VELUM_TARGET: f64 = 0.4;
/// Diameter coordinate where the nasal area starts (below zero).
const NOSE_OFFSET: f64 = 0.8;
/// Touches deeper than this in the nasal area do not shape the tract.
const NASAL_IGNORE_BELOW: f64 = -0.85 - NOSE_OFFSET;

pub struct Articulator {
    layout: TractLayout,
    tongue: Tongue,
    tongue_touch: Option<u32>,
    touches: TouchSet,
    pitch: PitchControl,
    pub always_voice: bool,
    pub auto_wobble: bool,
}

impl Articulator {
    pub fn new(segments: usize) -> Self {
        Self {
            layout: TractLayout::new(segments),
            tongue: Tongue::default(),
            tongue_touch: None,
            touches: TouchSet::new(),
            pitch: PitchControl::default(),
            always_voice: false,
            auto_wobble: false,
        }
    }

    pub fn layout(&self) -> &TractLayout {
        &self.layout
    }

    pub fn tongue(&self) -> &Tongue {
        &self.tongue
    }

    /// Place the tongue directly, bypassing touch capture.
    pub fn set_tongue(&mut self, index: f64, diameter: f64) {
        self.tongue.drag_to(&self.layout, index, diameter);
    }

    pub fn pitch(&self) -> &PitchControl {
        &self.pitch
    }

    pub fn pitch_mut(&mut self) -> &mut PitchControl {
        &mut self.pitch
    }

    pub fn touches(&self) -> &TouchSet {
        &self.touches
    }

    pub fn press(&mut self, id: u32, index: f64, diameter: f64, time: f64) -> bool {
        self.touches.press(id, index, diameter, time)
    }

    pub fn move_touch(&mut self, id: u32, index: f64, diameter: f64) {
        self.touches.move_to(id, index, diameter);
    }

    pub fn release(&mut self, id: u32, time: f64) {
        self.touches.release(id, time);
    }

    /// Advance touch envelopes to `time` and let a fresh touch on the tongue
    /// area take hold of the tongue.
    pub fn update(&mut self, time: f64) {
        self.touches.update(time);

        let held = self
            .tongue_touch
            .and_then(|id| self.touches.get(id))
            .filter(|t| t.is_alive())
            .map(|t| t.id);
        self.tongue_touch = held.or_else(|| {
            self.touches
                .alive()
                .filter(|t| t.fricative_intensity < 1.0)
                .filter(|t| Tongue::hit(&self.layout, t.index, t.diameter))
                .last()
                .map(|t| t.id)
        });

        if let Some(touch) = self.tongue_touch.and_then(|id| self.touches.get(id)) {
            let (index, diameter) = (touch.index, touch.diameter);
            self.tongue.drag_to(&self.layout, index, diameter);
        }
    }

    /// Current targets for the audio thread.
    pub fn snapshot(&self) -> ControlSnapshot {
        let mut snapshot = ControlSnapshot::neutral(self.layout.n);
        snapshot.glottis = GlottisTargets {
            frequency: self.pitch.frequency(),
            tenseness: self.pitch.tenseness(),
            loudness: self.pitch.loudness(),
            is_touched: self.pitch.is_touched(),
            is_touching_somewhere: self.pitch.is_touched() || self.touches.any_alive(),
            always_voice: self.always_voice,
            auto_wobble: self.auto_wobble,
        };

        let targets = snapshot.target_diameters_mut();
        self.tongue.write_rest_diameters(&self.layout, targets);

        snapshot.velum_target = DEFAULT_VELUM_TARGET;
        for touch in self.touches.alive() {
            if touch.index > self.layout.nose_start as f64 && touch.diameter < -NOSE_OFFSET {
                snapshot.velum_target = OPEN_VELUM_TARGET;
            }
            if touch.diameter < NASAL_IGNORE_BELOW {
                continue;
            }
            constrict(&self.layout, snapshot.target_diameters_mut(), touch.index, touch.diameter);
        }

        let mut constrictions = [Constriction::default(); MAX_CONSTRICTIONS];
        let mut count = 0;
        for (slot, touch) in constrictions.iter_mut().zip(self.touches.iter()) {
            *slot = touch.constriction();
            count += 1;
        }
        snapshot.set_constrictions(&constrictions[..count]);
        snapshot
    }
}

/// Pull target diameters around `index` down toward a narrowing of
/// `diameter`, with a raised-cosine falloff whose width depends on where in
/// the tract the narrowing is.
pub fn constrict(layout: &TractLayout, targets: &mut [f64], index: f64, diameter: f64) {
    let n = layout.n.min(targets.len());
    let d = (diameter - 0.3).max(0.0);
    let tip = layout.tip_start as f64;
    let width = if index < 25.0 {
        10.0
    } else if index >= tip {
        5.0
    } else {
        10.0 - 5.0 * (index - 25.0) / (tip - 25.0)
    };

    if !(index >= 2.0 && index < n as f64 && d < 3.0) {
        return;
    }

    let centre = index.round() as i64;
    let reach = width.ceil() as i64 + 1;
    for offset in -reach..reach {
        if (offset as f64) >= width + 1.0 {
            break;
        }
        let i = centre + offset;
        if i < 0 || i >= n as i64 {
            continue;
        }
        let i = i as usize;
        let relpos = (i as f64 - index).abs() - 0.5;
        let shrink = if relpos <= 0.0 {
            0.0
        } else if relpos > width {
            1.0
        } else {
            0.5 * (1.0 - (PI * relpos / width).cos())
        };
        if d < targets[i] {
            targets[i] = d + (targets[i] - d) * shrink;
        }
    }
}
