pub mod job_dto;
pub mod shift_dto;
