pub mod booking;
pub mod event;
pub mod message;
pub mod review;
pub mod user;
