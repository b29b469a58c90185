pub mod job;
pub mod shift;
