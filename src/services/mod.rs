pub mod catalog;
pub mod cost;
pub mod recommendations;
pub mod scoring;
