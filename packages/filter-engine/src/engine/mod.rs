pub mod eval;
pub mod flatten;
pub mod signature;
pub mod tree;
pub mod types;
pub mod views;
