//! Intent routing: the entry point for one user turn.
//!
//! # Dispatch table
//!
//! ```text
//! LaunchRequest, StartIntent, AMAZON.StartOverIntent, Unhandled -> welcome
//! AMAZON.HelpIntent                                             -> help
//! AMAZON.StopIntent, AMAZON.CancelIntent                        -> quit
//! AddToCartByNameIntent                                         -> resolve + add to cart
//! anything else                                                 -> welcome
//! ```
//!
//! Routing never fails. Backend errors become a spoken "try again later"
//! and leave the conversation open.

pub mod messages;
pub mod response;
pub mod slots;

pub use response::SkillResponse;
pub use slots::IntentRequest;

use tracing::{debug, instrument};

use crate::magento::{CommerceSession, HttpTransport, MagentoClient, MagentoError};
use crate::resolver::resolve_sku;

/// The fixed set of actions an intent can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Welcome,
    Help,
    Quit,
    AddToCartByName,
}

impl Intent {
    /// Look up the action for an intent name; unknown names fall back to
    /// [`Intent::Welcome`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "LaunchRequest" | "StartIntent" | "AMAZON.StartOverIntent" | "Unhandled" => {
                Self::Welcome
            }
            "AMAZON.HelpIntent" => Self::Help,
            "AMAZON.StopIntent" | "AMAZON.CancelIntent" => Self::Quit,
            "AddToCartByNameIntent" => Self::AddToCartByName,
            other => {
                debug!(intent = %other, "Unhandled intent, falling back to welcome");
                Self::Welcome
            }
        }
    }
}

/// Dispatches turns to their handlers.
pub struct IntentRouter<T: HttpTransport> {
    client: MagentoClient<T>,
}

impl<T: HttpTransport> Clone for IntentRouter<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
        }
    }
}

impl<T: HttpTransport> IntentRouter<T> {
    /// Create a router over a Magento client.
    #[must_use]
    pub const fn new(client: MagentoClient<T>) -> Self {
        Self { client }
    }

    /// Handle one turn.
    #[instrument(skip_all, fields(intent = %request.name))]
    pub async fn route(&self, request: &IntentRequest, session: &CommerceSession) -> SkillResponse {
        match Intent::from_name(&request.name) {
            Intent::Welcome => SkillResponse::ask_with_reprompt(messages::WELCOME, messages::REPROMPT),
            Intent::Help => SkillResponse::ask(messages::HELP),
            Intent::Quit => SkillResponse::tell(messages::QUIT),
            Intent::AddToCartByName => match self.add_to_cart_by_name(request, session).await {
                Ok(response) => response,
                Err(err) => service_unavailable(&err),
            },
        }
    }

    async fn add_to_cart_by_name(
        &self,
        request: &IntentRequest,
        session: &CommerceSession,
    ) -> Result<SkillResponse, MagentoError> {
        let resolution = request.resolution_request();

        let Some(product) = resolve_sku(&self.client, session, &resolution).await? else {
            return Ok(SkillResponse::ask(messages::product_not_found(
                resolution.spoken_term(),
            )));
        };

        let added = self
            .client
            .add_item(session, &product.sku, resolution.quantity)
            .await?;

        Ok(SkillResponse::ask(messages::added_to_cart(
            &added.name,
            added.quantity,
        )))
    }
}

/// Report a failed turn and produce the generic apology.
fn service_unavailable(err: &MagentoError) -> SkillResponse {
    let event_id = sentry::capture_error(err);
    tracing::error!(
        error = %err,
        authentication = err.is_authentication_failure(),
        sentry_event_id = %event_id,
        "Add to cart failed"
    );
    SkillResponse::ask(messages::SERVICE_UNAVAILABLE)
}
