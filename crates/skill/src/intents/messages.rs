//! Built-in English prompts.

use voicecart_core::Quantity;

pub const WELCOME: &str =
    "Welcome to the shop. Tell me what you would like to add to your cart.";
pub const REPROMPT: &str = "What would you like to add to your cart?";
pub const HELP: &str = "You can say, add two blue mugs to my cart. What would you like to add?";
pub const QUIT: &str = "Goodbye, and happy shopping.";
pub const RETRY: &str = "Please try again.";
pub const SERVICE_UNAVAILABLE: &str =
    "Sorry, the shop is not reachable right now. Please try again in a moment.";

/// Nothing in the catalog matched what the shopper said.
#[must_use]
pub fn product_not_found(term: &str) -> String {
    if term.is_empty() {
        format!("Sorry, I could not find that product. {RETRY}")
    } else {
        format!("Sorry, I could not find a product called {term}. {RETRY}")
    }
}

/// Confirmation after a cart line was added.
#[must_use]
pub fn added_to_cart(name: &str, quantity: Quantity) -> String {
    format!("I added {name} to your cart. Quantity: {quantity}.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_not_found_mentions_term() {
        let text = product_not_found("xyzzy");
        assert!(text.contains("xyzzy"));
        assert!(text.ends_with(RETRY));
    }

    #[test]
    fn test_product_not_found_without_term() {
        assert_eq!(
            product_not_found(""),
            "Sorry, I could not find that product. Please try again."
        );
    }

    #[test]
    fn test_added_to_cart() {
        assert_eq!(
            added_to_cart("Blue Mug", Quantity::ONE),
            "I added Blue Mug to your cart. Quantity: 1."
        );
    }
}
