/// Hands out HARP sequence numbers for one connection.
///
/// Numbers run 1..=255 and wrap back to 1; 0 is never issued, so a command
/// still carrying its initial sequence number is easy to spot.
#[derive(Debug, Clone, Default)]
pub struct SequenceCounter {
    last: u8,
}

impl SequenceCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue after `last`, e.g. when resuming a session.
    pub fn starting_after(last: u8) -> Self {
        Self { last }
    }

    /// Issue the next number.
    pub fn advance(&mut self) -> u8 {
        self.last = match self.last {
            u8::MAX => 1,
            n => n + 1,
        };
        self.last
    }

    /// Most recently issued number, 0 before the first call to `advance`.
    pub fn last(&self) -> u8 {
        self.last
    }
}
