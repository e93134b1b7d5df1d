pub mod job_description;
pub mod resume;
pub mod suggestion;
pub mod user;
