pub mod config;
pub mod languages;
pub mod verdict;
