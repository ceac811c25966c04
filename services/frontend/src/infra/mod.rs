pub mod db;
pub mod notify;
pub mod sms;
pub mod smtp;
