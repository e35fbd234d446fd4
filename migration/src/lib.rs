pub use sea_orm_migration::prelude::*;

mod m20260305_000001_create_diners;
mod m20260305_000002_create_restaurants;
mod m20260305_000003_create_dining_tables;
mod m20260305_000004_create_bookings;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260305_000001_create_diners::Migration),
            Box::new(m20260305_000002_create_restaurants::Migration),
            Box::new(m20260305_000003_create_dining_tables::Migration),
            Box::new(m20260305_000004_create_bookings::Migration),
        ]
    }
}
