pub mod error;
pub mod model;
pub mod speech;
pub mod text;
pub mod time;

pub use error::Error;
pub use time::Clock;
