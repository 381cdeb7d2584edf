use serde::{Deserialize, Serialize};
use std::fmt;

/// Grocery category assigned to a purchase line by the parser.
///
/// Categories the client does not know deserialize as [`GroceryCategory::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroceryCategory {
    Produce,
    Dairy,
    Meat,
    Dessert,
    Beverage,
    Snacks,
    Frozen,
    Canned,
    Grains,
    Condiments,
    Household,
    PersonalCare,
    #[default]
    #[serde(other)]
    Other,
}

impl GroceryCategory {
    pub const ALL: [GroceryCategory; 13] = [
        GroceryCategory::Produce,
        GroceryCategory::Dairy,
        GroceryCategory::Meat,
        GroceryCategory::Dessert,
        GroceryCategory::Beverage,
        GroceryCategory::Snacks,
        GroceryCategory::Frozen,
        GroceryCategory::Canned,
        GroceryCategory::Grains,
        GroceryCategory::Condiments,
        GroceryCategory::Household,
        GroceryCategory::PersonalCare,
        GroceryCategory::Other,
    ];

    /// Wire value, e.g. `personal_care`.
    pub fn as_str(&self) -> &'static str {
        match self {
            GroceryCategory::Produce => "produce",
            GroceryCategory::Dairy => "dairy",
            GroceryCategory::Meat => "meat",
            GroceryCategory::Dessert => "dessert",
            GroceryCategory::Beverage => "beverage",
            GroceryCategory::Snacks => "snacks",
            GroceryCategory::Frozen => "frozen",
            GroceryCategory::Canned => "canned",
            GroceryCategory::Grains => "grains",
            GroceryCategory::Condiments => "condiments",
            GroceryCategory::Household => "household",
            GroceryCategory::PersonalCare => "personal_care",
            GroceryCategory::Other => "other",
        }
    }

    /// Human-readable label, e.g. `personal care`.
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl fmt::Display for GroceryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit a purchase quantity is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitType {
    #[serde(rename = "oz")]
    Ounce,
    #[serde(rename = "lb")]
    Pound,
    #[serde(rename = "ea")]
    Each,
}

impl UnitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitType::Ounce => "oz",
            UnitType::Pound => "lb",
            UnitType::Each => "ea",
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User the receipt was parsed for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptUser {
    pub username: String,
}

/// Store the receipt was issued by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    #[serde(default = "default_store_name")]
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

fn default_store_name() -> String {
    "unknown".to_string()
}

impl Default for Store {
    fn default() -> Self {
        Self {
            name: default_store_name(),
            address: None,
            phone: None,
        }
    }
}

/// One line item on a receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub name: String,
    #[serde(default)]
    pub category: GroceryCategory,
    #[serde(default)]
    pub brand: Option<String>,
    pub quantity: f64,
    pub unit_price: f64,
    pub unit_type: UnitType,
}

impl Purchase {
    /// quantity × unit price
    pub fn line_total(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

/// Structured receipt returned by `POST /grocery_receipt`.
///
/// `date_time` stays the server's string so the record compares equal to the
/// payload it came from; parse it only for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroceryReceipt {
    #[serde(default)]
    pub date_time: Option<String>,
    pub is_valid: bool,
    pub user: ReceiptUser,
    #[serde(default)]
    pub store: Store,
    #[serde(default)]
    pub purchases: Vec<Purchase>,
}

impl GroceryReceipt {
    /// Σ(quantity × unit price) over all purchases.
    pub fn total(&self) -> f64 {
        self.purchases.iter().map(Purchase::line_total).sum()
    }

    pub fn item_count(&self) -> usize {
        self.purchases.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn milk() -> Purchase {
        Purchase {
            name: "Milk".to_string(),
            category: GroceryCategory::Dairy,
            brand: None,
            quantity: 1.0,
            unit_price: 3.5,
            unit_type: UnitType::Each,
        }
    }

    #[test]
    fn test_deserialize_full_payload() {
        let payload = json!({
            "date_time": "2025-03-14T17:42:00",
            "is_valid": true,
            "user": { "username": "DemoUser" },
            "store": { "name": "Corner Market", "address": "1 Main St", "phone": null },
            "purchases": [{
                "name": "Milk",
                "category": "dairy",
                "brand": null,
                "quantity": 1,
                "unit_price": 3.5,
                "unit_type": "ea"
            }]
        });

        let receipt: GroceryReceipt = serde_json::from_value(payload).unwrap();
        assert!(receipt.is_valid);
        assert_eq!(receipt.date_time.as_deref(), Some("2025-03-14T17:42:00"));
        assert_eq!(receipt.store.name, "Corner Market");
        assert_eq!(receipt.purchases, vec![milk()]);
    }

    #[test]
    fn test_missing_store_and_purchases_use_defaults() {
        let receipt: GroceryReceipt = serde_json::from_value(json!({
            "is_valid": false,
            "user": { "username": "DemoUser" }
        }))
        .unwrap();

        assert_eq!(receipt.store.name, "unknown");
        assert!(receipt.purchases.is_empty());
        assert_eq!(receipt.total(), 0.0);
    }

    #[test]
    fn test_unknown_category_maps_to_other() {
        let purchase: Purchase = serde_json::from_value(json!({
            "name": "Sourdough",
            "category": "bakery",
            "quantity": 1,
            "unit_price": 6.0,
            "unit_type": "ea"
        }))
        .unwrap();
        assert_eq!(purchase.category, GroceryCategory::Other);
    }

    #[test]
    fn test_unit_type_wire_names() {
        assert_eq!(serde_json::to_value(UnitType::Ounce).unwrap(), json!("oz"));
        assert_eq!(serde_json::to_value(UnitType::Pound).unwrap(), json!("lb"));
        assert_eq!(serde_json::to_value(UnitType::Each).unwrap(), json!("ea"));
        assert!(serde_json::from_value::<UnitType>(json!("kg")).is_err());
    }

    #[test]
    fn test_category_label() {
        assert_eq!(GroceryCategory::PersonalCare.label(), "personal care");
        assert_eq!(GroceryCategory::Produce.label(), "produce");
        for category in GroceryCategory::ALL {
            let value = serde_json::to_value(category).unwrap();
            assert_eq!(value, json!(category.as_str()));
        }
    }

    #[test]
    fn test_total_sums_line_totals() {
        let mut apples = milk();
        apples.name = "Apples".to_string();
        apples.quantity = 2.5;
        apples.unit_price = 2.0;
        apples.unit_type = UnitType::Pound;

        let receipt = GroceryReceipt {
            date_time: None,
            is_valid: true,
            user: ReceiptUser {
                username: "DemoUser".to_string(),
            },
            store: Store::default(),
            purchases: vec![milk(), apples],
        };

        assert!((receipt.total() - 8.5).abs() < f64::EPSILON);
        assert_eq!(receipt.item_count(), 2);
    }
}
