/// A single face-down slot on the board.
///
/// The secret value is fixed at construction; only the revealed flag moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    secret_value: usize,
    revealed: bool,
}

impl Card {
    pub fn new(secret_value: usize) -> Self {
        Self {
            secret_value,
            revealed: false,
        }
    }

    pub fn secret_value(&self) -> usize {
        self.secret_value
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub(crate) fn reveal(&mut self) {
        self.revealed = true;
    }

    pub(crate) fn hide(&mut self) {
        self.revealed = false;
    }
}
