pub use sea_orm_migration::prelude::*;

mod m20250101_000000_create_products;

pub use m20250101_000000_create_products::Products;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250101_000000_create_products::Migration)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_registered_in_order() {
        let names: Vec<String> = Migrator::migrations()
            .iter()
            .map(|m| m.name().to_string())
            .collect();

        assert_eq!(names, vec!["m20250101_000000_create_products"]);

        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }
}
