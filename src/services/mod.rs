pub mod attendance;
pub mod fcm;
pub mod google_auth;
pub mod notification;
