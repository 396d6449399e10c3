//! Fault and diagnostic events emitted from the audio path.
//!
//! The core does no console or file I/O; anything worth reporting is pushed
//! through an [`EventSink`] the host installs. The default sink discards.
//! With the `rtrb` feature a wait-free SPSC ring carries events off the audio
//! thread; a full ring drops the event rather than blocking.

#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer, RingBuffer};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FaultEvent {
    /// `process_block` was called before `prepare`; the block was silenced.
    NotReady,
    /// A block larger than the prepared maximum was rejected and silenced.
    OversizedBlock,
    /// The filter detected numeric instability and reset its history.
    FilterReset,
}

pub trait EventSink: Send {
    fn push(&mut self, event: FaultEvent);
}

/// Discards every event. The engine's default.
pub struct NullSink;

impl EventSink for NullSink {
    fn push(&mut self, _event: FaultEvent) {}
}

#[cfg(feature = "rtrb")]
impl EventSink for Producer<FaultEvent> {
    fn push(&mut self, event: FaultEvent) {
        // Push is wait-free; a full ring means the control side is not
        // draining, and dropping beats stalling the audio callback.
        let _ = Producer::push(self, event);
    }
}

/// SPSC fault channel: install the producer on the engine, drain the
/// consumer from the control side.
#[cfg(feature = "rtrb")]
pub fn fault_channel(capacity: usize) -> (Producer<FaultEvent>, Consumer<FaultEvent>) {
    RingBuffer::new(capacity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "rtrb")]
    #[test]
    fn channel_carries_events_in_order() {
        let (mut tx, mut rx) = fault_channel(4);
        tx.push(FaultEvent::NotReady);
        tx.push(FaultEvent::FilterReset);

        assert_eq!(rx.pop().ok(), Some(FaultEvent::NotReady));
        assert_eq!(rx.pop().ok(), Some(FaultEvent::FilterReset));
        assert!(rx.pop().is_err());
    }

    #[cfg(feature = "rtrb")]
    #[test]
    fn full_channel_drops_instead_of_blocking() {
        let (mut tx, _rx) = fault_channel(1);
        tx.push(FaultEvent::FilterReset);
        // Second push must return immediately even though the ring is full.
        tx.push(FaultEvent::FilterReset);
    }
}
