pub mod check_config;
pub mod init_db;
pub mod serve;
