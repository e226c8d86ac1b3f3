use super::http::Responder;

/// Lifecycle of the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    /// No session.
    Idle,
    /// Session active, waiting for or processing turns.
    Listening,
    /// Terminal; a fresh `start` is required.
    ShuttingDown,
}

/// Per-game session state, owned exclusively by the bridge.
///
/// `pending` holds the responder of the one accepted request whose reply is
/// still owed. `delivered` marks output that was already sent to a resuming
/// client: it is kept for further resumes and dropped when the next command
/// is accepted.
#[derive(Debug, Default)]
pub(crate) struct Session {
    pub output: String,
    pub pending: Option<Responder>,
    pub quit: bool,
    pub delivered: bool,
}

impl Session {
    pub fn append(&mut self, text: &str) {
        if self.delivered {
            self.output.clear();
            self.delivered = false;
        }
        self.output.push_str(text);
    }

    /// Take the buffered output for a reply, leaving the buffer empty.
    pub fn take_output(&mut self) -> String {
        self.delivered = false;
        std::mem::take(&mut self.output)
    }

    /// Forget output that a resuming client has already seen.
    pub fn discard_delivered(&mut self) {
        if self.delivered {
            self.output.clear();
            self.delivered = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivered_output_is_replaced_not_extended() {
        let mut session = Session::default();
        session.append("intro");
        session.delivered = true;
        session.append("next turn");
        assert_eq!(session.output, "next turn");
        assert!(!session.delivered);
    }

    #[test]
    fn take_output_empties_the_buffer() {
        let mut session = Session::default();
        session.append("a");
        session.append("b");
        assert_eq!(session.take_output(), "ab");
        assert!(session.output.is_empty());
    }
}
