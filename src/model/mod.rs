pub mod session;
pub mod transcript;
