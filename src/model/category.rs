use anyhow::bail;
use serde::{Deserialize, Serialize};

use crate::error::Res;

/// The fixed set of categories a new transaction can be filed under. The serialized form is the
/// human-readable label, which is what the transaction service stores.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Food & Drinks")]
    FoodAndDrinks,
    Shopping,
    Transportation,
    Entertainment,
    Bills,
    Income,
    Other,
}

serde_plain::derive_display_from_serialize!(Category);
serde_plain::derive_fromstr_from_deserialize!(Category);

impl Category {
    /// Every category, in the order they are offered to the user.
    pub const ALL: [Category; 7] = [
        Category::FoodAndDrinks,
        Category::Shopping,
        Category::Transportation,
        Category::Entertainment,
        Category::Bills,
        Category::Income,
        Category::Other,
    ];

    /// The short, stable identifier of the category.
    pub fn id(&self) -> &'static str {
        match self {
            Category::FoodAndDrinks => FOOD_ID,
            Category::Shopping => SHOPPING_ID,
            Category::Transportation => TRANSPORTATION_ID,
            Category::Entertainment => ENTERTAINMENT_ID,
            Category::Bills => BILLS_ID,
            Category::Income => INCOME_ID,
            Category::Other => OTHER_ID,
        }
    }

    /// Finds a category by its label (`Food & Drinks`) or by its id (`food`).
    pub fn from_label_or_id(s: impl AsRef<str>) -> Res<Category> {
        let s = s.as_ref().trim();
        if let Ok(category) = s.parse::<Category>() {
            return Ok(category);
        }
        match Category::ALL.iter().find(|c| c.id() == s) {
            Some(category) => Ok(*category),
            None => bail!("Invalid category '{s}'"),
        }
    }
}

const FOOD_ID: &str = "food";
const SHOPPING_ID: &str = "shopping";
const TRANSPORTATION_ID: &str = "transportation";
const ENTERTAINMENT_ID: &str = "entertainment";
const BILLS_ID: &str = "bills";
const INCOME_ID: &str = "income";
const OTHER_ID: &str = "other";
