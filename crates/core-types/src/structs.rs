use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::CoreError;

/// A product in the catalog.
///
/// Every field defaults to its zero value when missing from an incoming JSON
/// body, so a create request without `category_id` decodes successfully and
/// is rejected by [`Product::check_new`] instead of by the decoder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct Product {
    /// Assigned by storage on insert.
    pub id: i64,
    pub name: String,
    /// Price in the minor currency unit.
    pub price: i64,
    pub stock: i32,
    /// Reference to the owning category. Zero means "unset".
    pub category_id: i64,
}

impl Product {
    /// Validates a product that is about to be created.
    ///
    /// Only checks that a category reference is present; whether the
    /// referenced category exists is left to the storage foreign key.
    pub fn check_new(&self) -> Result<(), CoreError> {
        if self.category_id == 0 {
            return Err(CoreError::MissingField("category_id"));
        }
        Ok(())
    }
}

/// A product category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct Category {
    pub id: i64,
    // Older clients still send the Indonesian-flavoured keys.
    #[serde(alias = "nama")]
    pub name: String,
    #[serde(alias = "deskription")]
    pub description: String,
}
