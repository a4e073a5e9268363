pub mod generate_item;
pub mod pricing;
