use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use utoipa::ToSchema;

/// A persisted product.
///
/// `id` is assigned by storage on insert; `0` means "not yet assigned".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
}

impl Product {
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: 0,
            name: name.into(),
            price,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }
}

/// Body of create and update requests. The update target comes from the path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProductRequestDto {
    #[schema(example = "Espresso machine")]
    pub name: String,
    #[schema(example = "249.99")]
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProductResponseDto {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Espresso machine")]
    pub name: String,
    #[schema(example = "249.99")]
    pub price: Decimal,
}

/// Fields a page of products can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum ProductSortField {
    Id,
    Name,
    Price,
}
