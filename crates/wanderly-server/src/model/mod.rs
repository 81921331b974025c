//! Typed views of the resources the external API returns.
//!
//! Models are lenient: optional fields default when missing and
//! relations that may or may not be populated stay as raw JSON.

mod booking;
mod meta;
mod review;
mod stats;
mod subscription;
mod tour;
mod user;

pub use crate::model::booking::{Booking, BookingStatus};
pub use crate::model::meta::Meta;
pub use crate::model::review::Review;
pub use crate::model::stats::{AdminStats, HostStats};
pub use crate::model::subscription::{Subscription, SubscriptionPlan};
pub use crate::model::tour::{Division, Tour, TourType};
pub use crate::model::user::{Role, User};
