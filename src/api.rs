pub mod client;
pub mod elering;
pub mod heartbeat;
pub mod price_source;
pub mod wallbox;
