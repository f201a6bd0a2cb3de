// Proxy module.
// The server-side data endpoint consumed by the page, plus the page's static assets.

pub mod assets;
pub mod fallback;
pub mod handler;

pub use handler::{ProxyState, create_router};
