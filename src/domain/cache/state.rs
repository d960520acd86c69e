//! Cache connection lifecycle

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle of the single remote cache connection.
///
/// `Disconnected -> Connecting -> Connected`, with `Disabled` reachable only
/// from `Connecting` once every connect attempt has failed. `Disabled` is
/// terminal for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ConnectionState {
    Disconnected = 0,
    Connecting = 1,
    Connected = 2,
    Disabled = 3,
}

impl ConnectionState {
    /// Whether moving from `self` to `next` is a legal transition
    pub fn can_transition_to(self, next: ConnectionState) -> bool {
        use ConnectionState::*;

        matches!(
            (self, next),
            (Disconnected, Connecting)
                | (Connecting, Connected)
                | (Connecting, Disabled)
                | (Connecting, Disconnected)
                | (Connected, Disconnected)
        )
    }

    /// Only a connected client talks to the remote service
    pub fn is_available(self) -> bool {
        self == ConnectionState::Connected
    }

    pub fn is_terminal(self) -> bool {
        self == ConnectionState::Disabled
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Disabled => "disabled",
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Connecting,
            2 => Self::Connected,
            3 => Self::Disabled,
            _ => Self::Disconnected,
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lock-free holder for a [`ConnectionState`] that only permits legal transitions
#[derive(Debug)]
pub struct ConnectionStateCell(AtomicU8);

impl ConnectionStateCell {
    pub fn new() -> Self {
        Self(AtomicU8::new(ConnectionState::Disconnected as u8))
    }

    /// A cell that starts out `Connected`, for clients with no remote side
    pub fn connected() -> Self {
        Self(AtomicU8::new(ConnectionState::Connected as u8))
    }

    pub fn load(&self) -> ConnectionState {
        ConnectionState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Move to `next`, returning the previous state.
    ///
    /// Fails with the current state when the transition is not allowed.
    pub fn transition(&self, next: ConnectionState) -> Result<ConnectionState, ConnectionState> {
        let mut current = self.load();

        loop {
            if !current.can_transition_to(next) {
                return Err(current);
            }

            match self.0.compare_exchange(
                current as u8,
                next as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Ok(current),
                Err(actual) => current = ConnectionState::from_u8(actual),
            }
        }
    }
}

impl Default for ConnectionStateCell {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let cell = ConnectionStateCell::new();
        assert_eq!(cell.load(), ConnectionState::Disconnected);

        assert_eq!(
            cell.transition(ConnectionState::Connecting),
            Ok(ConnectionState::Disconnected)
        );
        assert_eq!(
            cell.transition(ConnectionState::Connected),
            Ok(ConnectionState::Connecting)
        );
        assert!(cell.load().is_available());

        assert_eq!(
            cell.transition(ConnectionState::Disconnected),
            Ok(ConnectionState::Connected)
        );
    }

    #[test]
    fn test_disabled_is_terminal() {
        let cell = ConnectionStateCell::new();
        cell.transition(ConnectionState::Connecting).unwrap();
        cell.transition(ConnectionState::Disabled).unwrap();

        for next in [
            ConnectionState::Disconnected,
            ConnectionState::Connecting,
            ConnectionState::Connected,
        ] {
            assert_eq!(cell.transition(next), Err(ConnectionState::Disabled));
        }

        assert!(cell.load().is_terminal());
        assert!(!cell.load().is_available());
    }

    #[test]
    fn test_disabled_only_from_connecting() {
        assert!(!ConnectionState::Disconnected.can_transition_to(ConnectionState::Disabled));
        assert!(!ConnectionState::Connected.can_transition_to(ConnectionState::Disabled));
        assert!(ConnectionState::Connecting.can_transition_to(ConnectionState::Disabled));
    }

    #[test]
    fn test_connected_cell_can_disconnect() {
        let cell = ConnectionStateCell::connected();
        assert!(cell.load().is_available());
        assert_eq!(
            cell.transition(ConnectionState::Disconnected),
            Ok(ConnectionState::Connected)
        );
    }

    #[test]
    fn test_cannot_skip_connecting() {
        let cell = ConnectionStateCell::new();
        assert_eq!(
            cell.transition(ConnectionState::Connected),
            Err(ConnectionState::Disconnected)
        );
    }
}
