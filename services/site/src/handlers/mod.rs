pub mod body;
pub mod guard;
pub mod health;
pub mod otp;
pub mod session;
pub mod submissions;
pub mod transformations;
