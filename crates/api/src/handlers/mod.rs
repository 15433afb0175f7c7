pub mod companies;
pub mod sessions;
pub mod workflows;
