// Infrastructure layer - External dependencies and adapters
pub mod codec;
pub mod config;
pub mod timer;
pub mod websocket;
