pub mod lenient;
pub mod pricing;
pub mod prompt;
pub mod weapon;
