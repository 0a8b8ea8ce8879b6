//! Event publication shared by the command handlers.

use tracing::warn;

use crate::domain::foundation::{CommandMetadata, SerializableDomainEvent};
use crate::ports::EventPublisher;

/// Publishes a committed event stamped with the command's context.
///
/// The aggregate is already durable at this point, so a publish failure is
/// logged instead of failing the command.
pub(crate) async fn publish<E: SerializableDomainEvent>(
    publisher: &dyn EventPublisher,
    metadata: &CommandMetadata,
    event: &E,
) {
    let envelope = metadata.stamp(event.to_envelope());
    let event_type = envelope.event_type.clone();
    if let Err(e) = publisher.publish(envelope).await {
        warn!(event_type = %event_type, error = %e, "failed to publish domain event");
    }
}
