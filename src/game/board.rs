use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;
use super::card::Card;

/// Largest board a single game may deal.
pub const MAX_PAIR_COUNT: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("Pair count must be between 1 and {}", MAX_PAIR_COUNT)]
    InvalidPairCount,
    #[error("Card index {index} is out of range for a board of {len} cards")]
    OutOfRange { index: usize, len: usize },
    #[error("Invalid board layout: {0}")]
    InvalidLayout(String),
}

/// What a single flip did to the board.
///
/// Every variant except `NoOp` carries the secret value of the card that was
/// just flipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipOutcome {
    /// First card of a pair attempt, now face up and pending.
    Revealed(usize),
    /// Second card matched the pending one; both slots are removed.
    Matched(usize),
    /// Second card did not match; both cards are face down again.
    Mismatched(usize),
    /// The slot was already removed or already face up.
    NoOp,
}

impl FlipOutcome {
    pub fn secret_value(&self) -> Option<usize> {
        match self {
            FlipOutcome::Revealed(value)
            | FlipOutcome::Matched(value)
            | FlipOutcome::Mismatched(value) => Some(*value),
            FlipOutcome::NoOp => None,
        }
    }

    /// Caller-facing encoding: the flipped card's value, or `-1` for a no-op.
    pub fn to_code(&self) -> i64 {
        self.secret_value().map_or(-1, |value| value as i64)
    }
}

/// One deal of the game: an even number of slots holding pairs of values.
///
/// A slot is `None` once its pair has been matched; removed slots are never
/// revived.
#[derive(Debug, Clone)]
pub struct Board {
    slots: Vec<Option<Card>>,
    pending_reveal: Option<usize>,
}

impl Board {
    /// Deals `pair_count` pairs in a uniformly random order.
    pub fn new(pair_count: usize) -> Result<Self, GameError> {
        Self::shuffled_with(pair_count, &mut rand::rng())
    }

    pub fn shuffled_with<R: Rng + ?Sized>(
        pair_count: usize,
        rng: &mut R,
    ) -> Result<Self, GameError> {
        if pair_count == 0 || pair_count > MAX_PAIR_COUNT {
            return Err(GameError::InvalidPairCount);
        }

        let mut slots: Vec<Option<Card>> = (0..pair_count)
            .chain(0..pair_count)
            .map(|value| Some(Card::new(value)))
            .collect();
        slots.shuffle(rng);

        Ok(Self {
            slots,
            pending_reveal: None,
        })
    }

    /// Builds a board from a fixed layout. Every value must appear exactly twice.
    pub fn from_values(values: Vec<usize>) -> Result<Self, GameError> {
        if values.is_empty() {
            return Err(GameError::InvalidLayout("layout is empty".to_string()));
        }

        let mut counts: HashMap<usize, usize> = HashMap::new();
        for value in &values {
            *counts.entry(*value).or_default() += 1;
        }
        if let Some((value, count)) = counts.iter().find(|(_, count)| **count != 2) {
            return Err(GameError::InvalidLayout(format!(
                "value {} appears {} times, expected 2",
                value, count
            )));
        }

        Ok(Self {
            slots: values.into_iter().map(|value| Some(Card::new(value))).collect(),
            pending_reveal: None,
        })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn pair_count(&self) -> usize {
        self.slots.len() / 2
    }

    pub fn pending_reveal(&self) -> Option<usize> {
        self.pending_reveal
    }

    pub fn is_removed(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(None))
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(Some(card)) if card.is_revealed())
    }

    pub fn remaining_pairs(&self) -> usize {
        self.slots.iter().flatten().count() / 2
    }

    pub fn is_finished(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn flip(&mut self, index: usize) -> Result<FlipOutcome, GameError> {
        let len = self.slots.len();
        let target = match self.slots.get(index) {
            None => return Err(GameError::OutOfRange { index, len }),
            Some(None) => return Ok(FlipOutcome::NoOp),
            Some(Some(card)) if card.is_revealed() => return Ok(FlipOutcome::NoOp),
            Some(Some(card)) => *card,
        };

        let Some(pending) = self.pending_reveal.take() else {
            if let Some(card) = self.slots[index].as_mut() {
                card.reveal();
            }
            self.pending_reveal = Some(index);
            return Ok(FlipOutcome::Revealed(target.secret_value()));
        };

        let pending_value = self
            .slots
            .get(pending)
            .copied()
            .flatten()
            .map(|card| card.secret_value());

        match pending_value {
            Some(value) if value == target.secret_value() => {
                self.slots[pending] = None;
                self.slots[index] = None;
                Ok(FlipOutcome::Matched(value))
            }
            Some(_) => {
                // The second card is never left face up on a mismatch.
                if let Some(Some(card)) = self.slots.get_mut(pending) {
                    card.hide();
                }
                Ok(FlipOutcome::Mismatched(target.secret_value()))
            }
            // A pending slot that no longer holds a card starts a fresh attempt
            None => {
                if let Some(card) = self.slots[index].as_mut() {
                    card.reveal();
                }
                self.pending_reveal = Some(index);
                Ok(FlipOutcome::Revealed(target.secret_value()))
            }
        }
    }
}
