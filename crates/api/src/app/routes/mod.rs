pub mod common;
pub mod products;
pub mod system;
