pub mod page;
pub mod web_app;

pub use page::*;
pub use web_app::*;
