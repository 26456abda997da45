pub mod artist;
pub mod error;
pub mod search;
pub mod show;
pub mod venue;

pub use error::ServiceError;
