pub mod excel;
pub mod filter;
pub mod store;
pub mod upload;
