//! Transient user-feedback signals.

use serde::{Deserialize, Serialize};

/// Which feedback signal fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    /// New content was captured into history.
    PasteConfirmed,
    /// A history item was written back to the clipboard.
    CopyConfirmed,
    /// A forced paste found nothing to capture.
    ClipboardEmpty,
}

impl SignalKind {
    pub const ALL: [SignalKind; 3] = [
        SignalKind::PasteConfirmed,
        SignalKind::CopyConfirmed,
        SignalKind::ClipboardEmpty,
    ];
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PasteConfirmed => write!(f, "paste-confirmed"),
            Self::CopyConfirmed => write!(f, "copy-confirmed"),
            Self::ClipboardEmpty => write!(f, "clipboard-empty"),
        }
    }
}

/// Current value of every signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalState {
    pub paste_confirmed: bool,
    pub copy_confirmed: bool,
    pub clipboard_empty: bool,
}

impl SignalState {
    #[must_use]
    pub fn get(&self, kind: SignalKind) -> bool {
        match kind {
            SignalKind::PasteConfirmed => self.paste_confirmed,
            SignalKind::CopyConfirmed => self.copy_confirmed,
            SignalKind::ClipboardEmpty => self.clipboard_empty,
        }
    }

    pub fn set(&mut self, kind: SignalKind, active: bool) {
        match kind {
            SignalKind::PasteConfirmed => self.paste_confirmed = active,
            SignalKind::CopyConfirmed => self.copy_confirmed = active,
            SignalKind::ClipboardEmpty => self.clipboard_empty = active,
        }
    }

    /// Whether any signal is active.
    #[must_use]
    pub fn any(&self) -> bool {
        SignalKind::ALL.iter().any(|kind| self.get(*kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get_are_independent() {
        let mut state = SignalState::default();
        assert!(!state.any());
        state.set(SignalKind::CopyConfirmed, true);
        assert!(state.get(SignalKind::CopyConfirmed));
        assert!(!state.get(SignalKind::PasteConfirmed));
        assert!(!state.get(SignalKind::ClipboardEmpty));
        assert!(state.any());
    }

    #[test]
    fn signal_kind_display() {
        assert_eq!(SignalKind::PasteConfirmed.to_string(), "paste-confirmed");
        assert_eq!(SignalKind::ClipboardEmpty.to_string(), "clipboard-empty");
    }
}
