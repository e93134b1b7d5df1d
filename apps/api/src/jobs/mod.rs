// Job descriptions: submitted as text, owned by one user.

pub mod handlers;
