//! [`CustomRoutes`] for extending the router.

mod custom_routes;

pub use crate::handler::utils::custom_routes::{CustomRoutes, RouterMapFn};
