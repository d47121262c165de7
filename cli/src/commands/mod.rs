pub mod config;
pub mod import;
pub mod init;
pub mod problem;
pub mod question;
