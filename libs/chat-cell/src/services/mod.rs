pub mod channel;

pub use channel::ChatChannel;
