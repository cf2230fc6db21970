pub mod advisor;
pub mod posts;
pub mod resources;
pub mod chat;
pub mod tour;
pub mod users;

pub use advisor::*;
pub use posts::*;
pub use resources::*;
pub use chat::*;
pub use tour::*;
pub use users::*;
