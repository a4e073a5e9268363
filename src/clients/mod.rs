pub mod openai;
pub mod stripe;
