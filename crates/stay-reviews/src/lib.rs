//! Review list presentation for accommodation pages.
//!
//! - `AuthState` - Session as seen by the presenter (injected, never read
//!   from ambient storage)
//! - `NotificationCenter` - Transient user notifications
//! - `ReviewListPresenter` - Loading/loaded/error view state, preview
//!   toggle and helpful marking
//! - `render_reviews` - HTML for the reviews section

mod auth;
mod notification;
mod presenter;
mod render;

pub use auth::*;
pub use notification::*;
pub use presenter::*;
pub use render::*;
