pub mod examples;
pub mod home;
pub mod not_found;
