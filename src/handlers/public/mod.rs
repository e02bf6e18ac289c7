// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Welcome text, health probe, account registration and token acquisition.

pub mod health;
pub mod login;
pub mod register;
pub mod root;

pub use health::health;
pub use login::login_post;
pub use register::register_post;
pub use root::root;
