pub mod admin;
pub mod auth;
pub mod bookings;
pub mod chat;
pub mod events;
pub mod profile;
pub mod reviews;
pub mod upload;
