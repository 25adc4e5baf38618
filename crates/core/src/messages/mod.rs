pub mod message;
pub mod reply;

pub use message::*;
pub use reply::*;
