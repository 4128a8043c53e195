pub mod connection;
pub mod health_check;
