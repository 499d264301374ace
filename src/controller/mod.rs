//! Page controllers: fetch, transform, and expose view data.
//!
//! Each controller owns the state one dashboard page held, talks to the API
//! through the [`ArenaApi`](crate::client::ArenaApi) seam, and reports
//! outcomes through the injected [`Notifier`](crate::notify::Notifier).

mod admin;
mod arena;
mod comments;
mod review;
mod session;

pub use admin::UserAdmin;
pub use arena::{ArenaBrowser, ITEMS_PER_PAGE, SEASON_FALLBACK};
pub use comments::CommentsPanel;
pub use review::ReviewQueue;
pub use session::Session;
