//! Plosive bursts released when a closure in the tract opens.
//!
//! A transient is a decaying pressure pulse injected into both travelling
//! waves at the segment where the last obstruction was. The pool has a fixed
//! capacity so spawning one never allocates on the audio thread.

pub const TRANSIENT_CAPACITY: usize = 16;

const LIFE_TIME: f64 = 0.2;
const STRENGTH: f64 = 0.3;
const EXPONENT: f64 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transient {
    pub position: usize,
    pub time_alive: f64,
    pub life_time: f64,
    pub strength: f64,
    pub exponent: f64,
}

impl Transient {
    pub fn new(position: usize) -> Self {
        Self {
            position,
            time_alive: 0.0,
            life_time: LIFE_TIME,
            strength: STRENGTH,
            exponent: EXPONENT,
        }
    }

    #[inline]
    pub fn amplitude(&self) -> f64 {
        self.strength * (-self.exponent * self.time_alive).exp2()
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        self.time_alive > self.life_time
    }
}

pub struct TransientPool {
    slots: [Transient; TRANSIENT_CAPACITY],
    len: usize,
}

impl Default for TransientPool {
    fn default() -> Self {
        Self::new()
    }
}

impl TransientPool {
    pub fn new() -> Self {
        Self {
            slots: [Transient::new(0); TRANSIENT_CAPACITY],
            len: 0,
        }
    }

    /// Start a burst at `position`. A full pool recycles its oldest burst.
    pub fn spawn(&mut self, position: usize) {
        if self.len < TRANSIENT_CAPACITY {
            self.slots[self.len] = Transient::new(position);
            self.len += 1;
            return;
        }

        let mut oldest = 0;
        for (i, transient) in self.slots.iter().enumerate() {
            if transient.time_alive > self.slots[oldest].time_alive {
                oldest = i;
            }
        }
        self.slots[oldest] = Transient::new(position);
    }

    /// Inject every live burst into the waves, age it by `dt` and drop the
    /// ones past their life time.
    pub fn process(&mut self, right: &mut [f64], left: &mut [f64], dt: f64) {
        for transient in &mut self.slots[..self.len] {
            let half = transient.amplitude() / 2.0;
            if let Some(r) = right.get_mut(transient.position) {
                *r += half;
            }
            if let Some(l) = left.get_mut(transient.position) {
                *l += half;
            }
            transient.time_alive += dt;
        }

        // Compact in place, keeping spawn order
        let mut kept = 0;
        for i in 0..self.len {
            if !self.slots[i].is_expired() {
                self.slots[kept] = self.slots[i];
                kept += 1;
            }
        }
        self.len = kept;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transient> {
        self.slots[..self.len].iter()
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 1.0 / 96_000.0;

    #[test]
    fn burst_lives_until_life_time_is_exceeded() {
        let mut pool = TransientPool::new();
        let mut right = [0.0; 8];
        let mut left = [0.0; 8];
        pool.spawn(3);

        let mut last_age = 0.0;
        loop {
            pool.process(&mut right, &mut left, DT);
            match pool.iter().next() {
                Some(t) => {
                    assert!(t.time_alive <= LIFE_TIME);
                    last_age = t.time_alive;
                }
                None => break,
            }
        }
        assert!(last_age + DT > LIFE_TIME);
    }

    #[test]
    fn injects_half_into_each_direction() {
        let mut pool = TransientPool::new();
        let mut right = [0.0; 4];
        let mut left = [0.0; 4];
        pool.spawn(2);
        pool.process(&mut right, &mut left, DT);

        assert!((right[2] - STRENGTH / 2.0).abs() < 1e-12);
        assert_eq!(right[2], left[2]);
        assert_eq!(right[1], 0.0);
    }

    #[test]
    fn amplitude_decays() {
        let mut t = Transient::new(0);
        let start = t.amplitude();
        t.time_alive = 0.05;
        assert!(t.amplitude() < start * 1e-2);
    }

    #[test]
    fn full_pool_recycles_oldest() {
        let mut pool = TransientPool::new();
        let mut right = [0.0; 32];
        let mut left = [0.0; 32];
        for i in 0..TRANSIENT_CAPACITY {
            pool.spawn(i);
            pool.process(&mut right, &mut left, DT);
        }
        assert_eq!(pool.len(), TRANSIENT_CAPACITY);

        pool.spawn(31);
        assert_eq!(pool.len(), TRANSIENT_CAPACITY);
        assert!(pool.iter().all(|t| t.position != 0));
        assert!(pool.iter().any(|t| t.position == 31));
    }

    #[test]
    fn out_of_range_position_is_ignored() {
        let mut pool = TransientPool::new();
        let mut right = [0.0; 4];
        let mut left = [0.0; 4];
        pool.spawn(10);
        pool.process(&mut right, &mut left, DT);
        assert!(right.iter().chain(left.iter()).all(|&x| x == 0.0));
    }
}
