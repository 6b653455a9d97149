pub mod handler;
pub mod input;
pub mod message;
pub mod time;
