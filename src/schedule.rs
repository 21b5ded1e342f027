pub mod schedule;
pub mod shift;
