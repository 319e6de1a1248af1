//! Network layer: the relay's listening socket.

pub mod listener;

pub use listener::RelayListener;
