//! Status tokens emitted by the modem firmware.
//!
//! The firmware reports its state as short fixed codes (`#101`..`#107`)
//! embedded anywhere inside newline-terminated lines. Tokens are matched by
//! substring containment only; lines are never parsed beyond that.

use std::fmt;

/// A status token the remote firmware embeds in a response line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusToken {
    /// Setup is complete and transfers can begin.
    SetupComplete,
    /// The modem was found connected and has booted.
    ModemBooted,
    /// Still waiting for the modem to boot.
    WaitingForModemBoot,
    /// The modem control register has been set.
    ControlRegisterSet,
    /// No response was received after sending data to the mains.
    NoResponse,
    /// A general read from the mains returned nothing.
    NoMessage,
    /// The remote peer acknowledged a message.
    Ack,
}

impl StatusToken {
    /// Every token the firmware can emit, in code order.
    pub const ALL: [StatusToken; 7] = [
        StatusToken::SetupComplete,
        StatusToken::ModemBooted,
        StatusToken::WaitingForModemBoot,
        StatusToken::ControlRegisterSet,
        StatusToken::NoResponse,
        StatusToken::NoMessage,
        StatusToken::Ack,
    ];

    /// The literal wire code for this token.
    pub fn code(self) -> &'static str {
        match self {
            StatusToken::SetupComplete => "#101",
            StatusToken::ModemBooted => "#102",
            StatusToken::WaitingForModemBoot => "#103",
            StatusToken::ControlRegisterSet => "#104",
            StatusToken::NoResponse => "#105",
            StatusToken::NoMessage => "#106",
            StatusToken::Ack => "#107",
        }
    }

    /// Scan a line for a known status code. Returns the first token whose
    /// code appears anywhere in the line.
    pub fn detect(line: &str) -> Option<StatusToken> {
        StatusToken::ALL
            .into_iter()
            .find(|token| line.contains(token.code()))
    }

    /// User-facing description, suitable for rendering in a chat transcript.
    pub fn describe(self) -> &'static str {
        match self {
            StatusToken::SetupComplete => "Setup complete, ready to transfer.",
            StatusToken::ModemBooted => "Modem is up.",
            StatusToken::WaitingForModemBoot => "Waiting for the modem to boot...",
            StatusToken::ControlRegisterSet => "Control register configured.",
            StatusToken::NoResponse => "No response from the remote peer.",
            StatusToken::NoMessage => "Nothing received.",
            StatusToken::Ack => "Message acknowledged.",
        }
    }
}

impl fmt::Display for StatusToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_token_embedded_in_line() {
        assert_eq!(
            StatusToken::detect("boot: #102\r\n"),
            Some(StatusToken::ModemBooted)
        );
        assert_eq!(StatusToken::detect("#107"), Some(StatusToken::Ack));
    }

    #[test]
    fn detect_plain_text_line() {
        assert_eq!(StatusToken::detect("hello over the mains\n"), None);
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(StatusToken::NoMessage.code(), "#106");
        assert_eq!(StatusToken::NoResponse.code(), "#105");
        for token in StatusToken::ALL {
            assert!(token.code().starts_with("#10"));
        }
    }

    #[test]
    fn display_uses_description() {
        assert_eq!(StatusToken::Ack.to_string(), "Message acknowledged.");
    }
}
