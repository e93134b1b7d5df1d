// Users: registration, login, profile reads and self-service updates.

pub mod handlers;
