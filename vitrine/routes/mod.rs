pub mod app;
pub mod home;
