pub mod capabilities;
pub mod claims;
pub mod login;
pub mod resolver;
pub mod store;
pub mod token;

pub use login::{LoginOutcome, LoginService};
