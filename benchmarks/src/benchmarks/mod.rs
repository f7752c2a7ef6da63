pub mod config;
pub mod scripts;
pub mod staging;
