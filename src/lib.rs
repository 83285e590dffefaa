pub mod aggregate;
pub mod consumption;
pub mod error;
pub mod input;
pub mod render;
pub mod search;
pub mod solver;
pub mod types;
