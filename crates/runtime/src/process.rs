//! Port helpers for the driver service.

use std::net::TcpListener;

/// Returns `true` when `port` can be bound on localhost.
pub fn port_available(port: u16) -> bool {
	TcpListener::bind(("127.0.0.1", port)).is_ok()
}

/// Asks the OS for an unused localhost port.
///
/// The listener is dropped before returning, so another process may grab
/// the port in between; callers treat launch failure as retryable.
pub fn free_port() -> std::io::Result<u16> {
	let listener = TcpListener::bind(("127.0.0.1", 0))?;
	Ok(listener.local_addr()?.port())
}
