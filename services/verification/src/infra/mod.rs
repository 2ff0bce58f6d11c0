pub mod db;
pub mod mail;
pub mod sms;
