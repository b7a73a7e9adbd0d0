pub mod envelope;
pub mod errors;
pub mod jwt;
pub mod pagination;
pub mod password;
pub mod status;
