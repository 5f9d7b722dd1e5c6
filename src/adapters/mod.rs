// Adapters layer: concrete implementations of the domain ports.

pub mod serpapi;
pub mod sink;
