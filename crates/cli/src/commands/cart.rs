//! Cart commands.
//!
//! Unlike the `intent` command, failures here are reported as errors
//! instead of being rendered as speech.

use voicecart_core::{Quantity, ResolutionRequest, Sku};
use voicecart_skill::magento::CommerceSession;
use voicecart_skill::resolver::resolve_sku;

use super::{CommandError, client_from_env};

/// Resolve `term` (or use `sku` directly) and add it to the cart.
///
/// # Errors
///
/// Returns `CommandError::NotFound` if nothing matches, or the backend
/// error if authentication, cart creation or the add itself fails.
#[allow(clippy::print_stdout)]
pub async fn add(term: &str, sku: Option<Sku>, quantity: Quantity) -> Result<(), CommandError> {
    let client = client_from_env()?;
    let session = CommerceSession::new();

    let mut request = ResolutionRequest::from_parts(None, Some(term), None);
    request.structured_sku = sku;
    request.quantity = quantity;

    let product = resolve_sku(&client, &session, &request)
        .await?
        .ok_or_else(|| CommandError::NotFound(term.to_string()))?;
    tracing::info!(sku = %product.sku, name = %product.display_name, "Resolved product");

    let added = client.add_item(&session, &product.sku, quantity).await?;
    let status = session.status().await;

    println!("Added {} x {}", added.quantity, added.name);
    if let Some(cart_id) = status.cart_id {
        println!("Cart: {cart_id}");
    }
    Ok(())
}
