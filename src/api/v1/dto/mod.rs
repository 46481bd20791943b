pub mod capabilities;
pub mod login;
