pub mod checkout;
pub mod generation;
pub mod pricing;
pub mod weapon;
