pub mod export;
pub mod extract;
pub mod index;
