pub mod timestamps;
pub mod validation;
