pub mod review;
pub mod search_log;
pub mod technology;
pub mod user;

pub use review::*;
pub use search_log::*;
pub use technology::*;
pub use user::*;
