use chrono::{DateTime, Utc};

/// A fact that already happened in the inventory domain.
///
/// Implementations carry their own payload; this trait exposes only the
/// metadata consumers need to route and order what they receive.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable dotted identifier, e.g. "ledger.movement.registered".
    fn event_type(&self) -> &'static str;

    /// Payload schema version, bumped on incompatible changes.
    fn version(&self) -> u32;

    /// Business time of the underlying fact.
    fn occurred_at(&self) -> DateTime<Utc>;
}
