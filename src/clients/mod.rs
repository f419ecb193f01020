//! Typed clients over the actors. Each client owns the use-case rules for
//! its entity and translates actor errors into its domain error.

#[macro_use]
mod macros;

mod category_client;
mod donation_client;
mod notification_client;
mod statistics_client;
mod user_client;

pub use category_client::CategoryClient;
pub use donation_client::DonationClient;
pub use notification_client::NotificationClient;
pub use statistics_client::StatisticsClient;
pub use user_client::{ProfileUpdate, UserClient};
