mod ping;
mod url;

pub use ping::ping_handler;
pub use url::{add_url_handler, redirect_handler, shorten_handler, user_urls_handler};
