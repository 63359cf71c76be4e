//! Single-turn intent command.

use voicecart_skill::intents::IntentRouter;
use voicecart_skill::intents::slots::{IntentRequest, QUANTITY_SLOT, SEARCH_TERM_SLOT};
use voicecart_skill::magento::CommerceSession;

use super::{CommandError, client_from_env};

/// Raw slot values for a turn, as the language model would send them.
#[derive(Debug, Default)]
pub struct TurnSlots {
    pub term: Option<String>,
    pub sku: Option<String>,
    pub quantity: Option<String>,
}

impl TurnSlots {
    fn into_request(self, name: &str) -> IntentRequest {
        let mut request = IntentRequest::new(name);
        if let Some(term) = self.term {
            request = request.with_slot_value(SEARCH_TERM_SLOT, term);
        }
        if let Some(sku) = self.sku {
            request = request.with_resolved_id(SEARCH_TERM_SLOT, sku);
        }
        if let Some(quantity) = self.quantity {
            request = request.with_slot_value(QUANTITY_SLOT, quantity);
        }
        request
    }
}

/// Route one turn and print the response as pretty JSON.
///
/// # Errors
///
/// Returns `CommandError` if configuration is missing. Backend failures
/// are part of the printed response, not errors.
#[allow(clippy::print_stdout)]
pub async fn run(name: &str, slots: TurnSlots) -> Result<(), CommandError> {
    let router = IntentRouter::new(client_from_env()?);
    let request = slots.into_request(name);

    let response = router.route(&request, &CommerceSession::new()).await;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
