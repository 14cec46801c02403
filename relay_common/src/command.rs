//! Grammar of the text frames a client sends to the relay.
//!
//! Every inbound frame is classified into a `Command`:
//! - `exchange` — current exchange rates;
//! - `exchange N` where `N` is a single decimal digit — rates for the `N` preceding days;
//! - anything else — a chat line to broadcast as is.

/// Keyword that starts every exchange request.
pub const EXCHANGE: &str = "exchange";

/// Parsed representation of an inbound text frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Current provider rates, forwarded unfiltered.
    LiveExchange,
    /// EUR/USD rates for each of the `days_back` days before today.
    HistoricalExchange {
        /// Number of days to look back, `0..=9`.
        days_back: u8,
    },
    /// Plain chat text.
    Chat {
        /// Text exactly as received.
        text: String,
    },
}

impl Command {
    /// Classify a raw text frame. Never fails: unknown input is chat.
    pub fn parse(text: &str) -> Self {
        if text == EXCHANGE {
            return Command::LiveExchange;
        }
        match Self::parse_days_back(text) {
            Some(days_back) => Command::HistoricalExchange { days_back },
            None => Command::Chat {
                text: text.to_string(),
            },
        }
    }

    fn parse_days_back(text: &str) -> Option<u8> {
        let rest = text.strip_prefix(EXCHANGE)?.strip_prefix(' ')?;
        match rest.as_bytes() {
            [digit] if digit.is_ascii_digit() => Some(digit - b'0'),
            _ => None,
        }
    }
}
