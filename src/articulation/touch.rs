//! Held points on the tract and their frication envelopes.

use crate::{dsp::tract::Constriction, MAX_CONSTRICTIONS};

/// Time for frication to fade fully in after a press, and out after release.
pub const FRICATIVE_ATTACK: f64 = 0.1;
/// How long a released touch keeps shaping turbulence before it is forgotten.
const FORGET_AFTER: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Touch {
    pub id: u32,
    /// Fractional segment index.
    pub index: f64,
    /// Diameter coordinate; negative values reach into the nasal area.
    pub diameter: f64,
    pub start_time: f64,
    pub end_time: Option<f64>,
    pub fricative_intensity: f64,
}

impl Touch {
    pub fn is_alive(&self) -> bool {
        self.end_time.is_none()
    }

    pub fn constriction(&self) -> Constriction {
        Constriction {
            index: self.index,
            diameter: self.diameter,
            fricative_intensity: self.fricative_intensity,
        }
    }
}

/// Touches on the tract, live and recently released, capped at
/// [`MAX_CONSTRICTIONS`].
#[derive(Debug, Default)]
pub struct TouchSet {
    touches: Vec<Touch>,
}

impl TouchSet {
    pub fn new() -> Self {
        Self {
            touches: Vec::with_capacity(MAX_CONSTRICTIONS),
        }
    }

    /// Register a new touch. Returns false when every slot is taken.
    pub fn press(&mut self, id: u32, index: f64, diameter: f64, time: f64) -> bool {
        if self.touches.len() >= MAX_CONSTRICTIONS {
            // Make room by forgetting the oldest released touch
            let released = self
                .touches
                .iter()
                .enumerate()
                .filter_map(|(i, t)| t.end_time.map(|end| (i, end)))
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(i, _)| i);
            match released {
                Some(i) => {
                    self.touches.remove(i);
                }
                None => return false,
            }
        }
        self.touches.push(Touch {
            id,
            index,
            diameter,
            start_time: time,
            end_time: None,
            fricative_intensity: 0.0,
        });
        true
    }

    pub fn move_to(&mut self, id: u32, index: f64, diameter: f64) {
        if let Some(touch) = self.find_alive_mut(id) {
            touch.index = index;
            touch.diameter = diameter;
        }
    }

    pub fn release(&mut self, id: u32, time: f64) {
        if let Some(touch) = self.find_alive_mut(id) {
            touch.end_time = Some(time);
        }
    }

    /// Advance frication envelopes to `time` and drop touches released long ago.
    pub fn update(&mut self, time: f64) {
        self.touches
            .retain(|t| t.end_time.map_or(true, |end| time <= end + FORGET_AFTER));
        for touch in &mut self.touches {
            touch.fricative_intensity = match touch.end_time {
                None => (time - touch.start_time) / FRICATIVE_ATTACK,
                Some(end) => 1.0 - (time - end) / FRICATIVE_ATTACK,
            }
            .clamp(0.0, 1.0);
        }
    }

    fn find_alive_mut(&mut self, id: u32) -> Option<&mut Touch> {
        self.touches.iter_mut().find(|t| t.id == id && t.is_alive())
    }

    pub fn get(&self, id: u32) -> Option<&Touch> {
        self.touches.iter().find(|t| t.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Touch> {
        self.touches.iter()
    }

    pub fn alive(&self) -> impl Iterator<Item = &Touch> {
        self.touches.iter().filter(|t| t.is_alive())
    }

    pub fn any_alive(&self) -> bool {
        self.touches.iter().any(Touch::is_alive)
    }

    pub fn len(&self) -> usize {
        self.touches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.touches.is_empty()
    }
}
