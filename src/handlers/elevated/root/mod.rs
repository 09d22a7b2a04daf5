// handlers/elevated/root/mod.rs - Workbook bootstrap

pub mod initialize;

pub use initialize::initialize_post;
