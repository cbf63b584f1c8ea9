pub mod point_generator;
pub mod retention_cleaner;
