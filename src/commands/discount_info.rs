//! Customer discount lookup.

use crate::config::Config;
use serde::Serialize;

/// Flat discount on file for a customer account.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerDiscount {
    pub customer_id: String,
    pub discount_percentage: f64,
    pub discount_type: String,
    pub description: String,
    pub applicable_services: String,
    pub note: String,
}

/// Returns the discount on file for a customer.
///
/// Every customer currently receives the standard percentage from
/// configuration; a per-customer source can slot in behind this signature.
pub fn customer_discount(config: &Config, customer_id: Option<&str>) -> CustomerDiscount {
    CustomerDiscount {
        customer_id: customer_id.unwrap_or("default").to_string(),
        discount_percentage: config.default_discount,
        discount_type: "standard".to_string(),
        description: "Standard customer discount".to_string(),
        applicable_services: "all".to_string(),
        note: "This is a default discount applied to all customers. \
               Contact sales for enterprise discounts."
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_config;

    #[test]
    fn test_default_customer() {
        let discount = customer_discount(&test_config(), None);
        assert_eq!(discount.customer_id, "default");
        assert_eq!(discount.discount_percentage, 10.0);
        assert_eq!(discount.discount_type, "standard");
        assert_eq!(discount.applicable_services, "all");
    }

    #[test]
    fn test_named_customer_uses_configured_percentage() {
        let mut config = test_config();
        config.default_discount = 15.0;

        let discount = customer_discount(&config, Some("contoso"));
        assert_eq!(discount.customer_id, "contoso");
        assert_eq!(discount.discount_percentage, 15.0);
    }
}
