pub mod account;
pub mod caller;
pub mod code;
pub mod entity;
pub mod login;
pub mod password;
pub mod session;
