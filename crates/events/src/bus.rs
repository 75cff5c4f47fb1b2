//! Event publishing/subscription abstraction (mechanics only).
//!
//! The bus makes minimal assumptions: transport-agnostic, at-least-once
//! delivery, no persistence. Events are appended to the ledger first and
//! published second, so a lost publication can always be recovered by
//! replaying the ledger. Subscribers must be idempotent.

use std::sync::Arc;
use std::sync::mpsc::Receiver;

/// A subscription to an event stream.
///
/// Each subscription receives its own copy of every message published after
/// it was created. Consumption is non-blocking: events are advisory, and a
/// consumer that needs completeness replays the ledger instead of waiting on
/// the bus.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Take the next pending message, if any.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }
}

/// Domain-agnostic event bus (pub/sub abstraction).
///
/// `publish` can fail; since the write has already committed by the time an
/// event is published, retrying publication is safe (at-least-once).
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
