//! Tracked feed sources.

pub mod repository;
pub mod types;

pub use repository::ChannelRepository;
pub use types::{Channel, NewChannel};
