//! Field-for-field conversion between [`Product`] and the transfer objects.

use crate::models::{Product, ProductRequestDto, ProductResponseDto};

/// The result carries id `0`; update callers set it with [`Product::with_id`].
pub fn to_model(dto: ProductRequestDto) -> Product {
    Product::new(dto.name, dto.price)
}

pub fn to_dto(product: Product) -> ProductResponseDto {
    ProductResponseDto {
        id: product.id,
        name: product.name,
        price: product.price,
    }
}

impl From<ProductRequestDto> for Product {
    fn from(dto: ProductRequestDto) -> Self {
        to_model(dto)
    }
}

impl From<Product> for ProductResponseDto {
    fn from(product: Product) -> Self {
        to_dto(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn request(name: &str, cents: i64) -> ProductRequestDto {
        ProductRequestDto {
            name: name.to_string(),
            price: Decimal::new(cents, 2),
        }
    }

    #[test]
    fn test_to_model_leaves_id_unassigned() {
        let product = to_model(request("Desk", 15000));
        assert_eq!(product.id, 0);
        assert_eq!(product.name, "Desk");
        assert_eq!(product.price, Decimal::new(15000, 2));
    }

    #[test]
    fn test_to_dto_copies_every_field() {
        let dto = to_dto(Product::new("Chair", Decimal::new(4999, 2)).with_id(11));
        assert_eq!(
            dto,
            ProductResponseDto {
                id: 11,
                name: "Chair".into(),
                price: Decimal::new(4999, 2),
            }
        );
    }

    #[test]
    fn test_name_and_price_survive_mapping() {
        for (name, cents) in [("", 0), ("Ünïcode shelf", 1), ("Bulk pallet", 9_999_999_999)] {
            let input = request(name, cents);
            let out: ProductResponseDto = Product::from(input.clone()).into();
            assert_eq!(out.name, input.name);
            assert_eq!(out.price, input.price);
        }
    }
}
