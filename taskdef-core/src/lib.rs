pub mod authorization;
pub mod config;
pub mod creator;
pub mod error;
pub mod message;
pub mod payload;
pub mod refs;
pub mod schema;
pub mod status;
pub mod store;
pub mod task;
pub mod worker;

pub use authorization::*;
pub use config::*;
pub use creator::*;
pub use error::*;
pub use message::*;
pub use payload::*;
pub use refs::*;
pub use schema::*;
pub use status::*;
pub use store::*;
pub use task::*;
pub use worker::*;
