pub mod user;
pub mod donation;
pub mod category;
pub mod volunteer;

pub use user::*;
pub use donation::*;
pub use category::*;
pub use volunteer::*;
