//! Poll activation, submission and results handlers.

mod activate_poll;
mod deactivate_poll;
mod get_poll_results;
mod submit_response;

pub use activate_poll::{ActivatePollCommand, ActivatePollHandler, ActivatePollResult};
pub use deactivate_poll::{DeactivatePollCommand, DeactivatePollHandler};
pub use get_poll_results::{GetPollResultsHandler, GetPollResultsQuery, PollResultsView};
pub use submit_response::{SubmitResponseCommand, SubmitResponseHandler, SubmitResponseResult};

use crate::domain::foundation::{PollId, TenantId};
use crate::domain::poll::PollDefinition;
use crate::domain::presentation::PresentationError;
use crate::ports::PollDefinitionReader;

/// Dereferences a poll id against the external store.
async fn resolve_definition(
    reader: &dyn PollDefinitionReader,
    tenant_id: &TenantId,
    poll_id: PollId,
) -> Result<PollDefinition, PresentationError> {
    reader
        .find(tenant_id, poll_id)
        .await?
        .ok_or(PresentationError::PollNotFound(poll_id))
}
