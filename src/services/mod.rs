pub mod job_service;
pub mod shift_service;
