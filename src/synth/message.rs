#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer};

use super::controls::ControlSnapshot;

/// Audio-side end of the control channel.
pub trait ControlReceiver {
    fn pop(&mut self) -> Option<ControlSnapshot>;

    /// Drain everything pending and keep only the newest snapshot.
    fn latest(&mut self) -> Option<ControlSnapshot> {
        let mut newest = None;
        while let Some(snapshot) = self.pop() {
            newest = Some(snapshot);
        }
        newest
    }
}

/// Receiver that never yields anything, for offline rendering with fixed controls.
pub struct NoControls;

impl ControlReceiver for NoControls {
    fn pop(&mut self) -> Option<ControlSnapshot> {
        None
    }
}

#[cfg(feature = "rtrb")]
impl ControlReceiver for Consumer<ControlSnapshot> {
    fn pop(&mut self) -> Option<ControlSnapshot> {
        Consumer::pop(self).ok()
    }
}

/// Control-side end of the channel. A full ring drops the snapshot; the next
/// publish carries the complete state again, so nothing is lost for good.
#[cfg(feature = "rtrb")]
pub struct ControlPublisher {
    tx: Producer<ControlSnapshot>,
    dropped: u64,
}

#[cfg(feature = "rtrb")]
impl ControlPublisher {
    pub fn new(tx: Producer<ControlSnapshot>) -> Self {
        Self { tx, dropped: 0 }
    }

    /// Build a connected publisher/receiver pair with room for `capacity` snapshots.
    pub fn channel(capacity: usize) -> (Self, Consumer<ControlSnapshot>) {
        let (tx, rx) = rtrb::RingBuffer::new(capacity);
        (Self::new(tx), rx)
    }

    pub fn publish(&mut self, snapshot: ControlSnapshot) -> bool {
        match self.tx.push(snapshot) {
            Ok(()) => true,
            Err(_) => {
                self.dropped += 1;
                tracing::trace!(dropped = self.dropped, "control ring full, snapshot dropped");
                false
            }
        }
    }

    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
