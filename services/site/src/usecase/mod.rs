pub mod intake;
pub mod passcode;
pub mod role;
pub mod session;
