pub mod token;
pub mod claims_builder;

pub use token::*;
pub use claims_builder::*;
