pub mod error;
pub mod gateway;
pub mod http;
pub mod session;
