pub mod cors;
pub mod request;
pub mod response;
