//! Catalog search command.

use voicecart_skill::magento::CommerceSession;

use super::{CommandError, client_from_env};

/// Search for `term` and print every hit as `SKU<TAB>name`.
///
/// # Errors
///
/// Returns `CommandError` if configuration is missing or the search fails.
#[allow(clippy::print_stdout)]
pub async fn run(term: &str) -> Result<(), CommandError> {
    let client = client_from_env()?;
    let session = CommerceSession::new();

    let results = client.search(&session, term).await?;
    if results.is_empty() {
        return Err(CommandError::NotFound(term.to_string()));
    }

    for hit in results {
        println!("{}\t{}", hit.sku, hit.display_name);
    }
    Ok(())
}
