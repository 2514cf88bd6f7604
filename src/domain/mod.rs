// Domain layer - Entities, wire payloads and pure value logic
pub mod clock;
pub mod color;
pub mod counters;
pub mod entity;
pub mod message;
pub mod ring_buffer;
pub mod scale;
