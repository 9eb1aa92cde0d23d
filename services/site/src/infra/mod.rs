pub mod credentials;
pub mod files;
pub mod google;
pub mod mail;
pub mod memory;
