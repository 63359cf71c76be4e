//! REST paths and search criteria for the Magento endpoints used here.

use voicecart_core::ProductId;

use super::TokenRole;

/// Fetch-or-create the customer's active cart.
pub const CART_PATH: &str = "/rest/V1/carts/mine";

/// Add a line item to the customer's active cart.
pub const CART_ITEMS_PATH: &str = "/rest/V1/carts/mine/items";

const SEARCH_PATH: &str = "/rest/V1/search";
const PRODUCTS_PATH: &str = "/rest/V1/products";

// Both search stages only ever need the best match.
const PAGE_SIZE: u32 = 1;

/// Token issue endpoint for `role`.
pub fn token_path(role: TokenRole) -> String {
    format!(
        "/rest/default/V1/integration/{}/token",
        role.path_segment()
    )
}

/// Stage one: quick search resolving free text to ranked product ids.
///
/// The term is URL-encoded and wrapped in `%` wildcards.
pub fn quick_search_path(term: &str) -> String {
    let term = urlencoding::encode(term.trim());
    format!(
        "{SEARCH_PATH}?searchCriteria[requestName]=quick_search_container\
         &searchCriteria[filter_groups][0][filters][0][field]=search_term\
         &searchCriteria[filter_groups][0][filters][0][value]=%25{term}%25\
         &searchCriteria[current_page]=1\
         &searchCriteria[page_size]={PAGE_SIZE}"
    )
}

/// Stage two: full product record for one entity id.
pub fn product_by_id_path(id: ProductId) -> String {
    format!(
        "{PRODUCTS_PATH}?searchCriteria[filter_groups][0][filters][0][field]=entity_id\
         &searchCriteria[filter_groups][0][filters][0][value]={id}\
         &searchCriteria[filter_groups][0][filters][0][condition_type]=eq\
         &searchCriteria[current_page]=1\
         &searchCriteria[page_size]={PAGE_SIZE}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_paths() {
        assert_eq!(
            token_path(TokenRole::Customer),
            "/rest/default/V1/integration/customer/token"
        );
        assert_eq!(
            token_path(TokenRole::Admin),
            "/rest/default/V1/integration/admin/token"
        );
    }

    #[test]
    fn test_quick_search_path_encodes_term() {
        let path = quick_search_path(" blue mug ");
        assert!(path.starts_with("/rest/V1/search?searchCriteria[requestName]=quick_search_container&"));
        assert!(path.contains("[value]=%25blue%20mug%25&"));
        assert!(path.ends_with("searchCriteria[page_size]=1"));
    }

    #[test]
    fn test_quick_search_path_escapes_reserved_characters() {
        let path = quick_search_path("salt & pepper");
        assert!(path.contains("%25salt%20%26%20pepper%25"));
    }

    #[test]
    fn test_product_by_id_path() {
        let path = product_by_id_path(ProductId::new(42));
        assert!(path.starts_with("/rest/V1/products?"));
        assert!(path.contains("[field]=entity_id&"));
        assert!(path.contains("[value]=42&"));
        assert!(path.contains("[condition_type]=eq&"));
        assert!(path.ends_with("searchCriteria[page_size]=1"));
    }
}
