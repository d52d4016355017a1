//! The `session` module pairs one WebSocket connection with at most one
//! broker connection and applies the relay's control messages to it.

mod session;

pub use session::Session;

#[cfg(test)]
mod tests;
