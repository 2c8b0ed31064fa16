// A Game wraps one Board with the bookkeeping a leaderboard needs: how many
// flips were made and how long the player took since their first flip.
//
// Activity tracking (`touch`) is driven by the session registry rather than by
// the game's own methods, so the idle clock reflects registry-level traffic.

use std::time::Duration;

use tokio::time::Instant;

use super::board::{Board, FlipOutcome, GameError};
use crate::score::ScoreCard;

#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    pair_count: usize,
    elapsed_seconds: f64,
    flip_count: u64,
    started_at: Option<Instant>,
    last_activity_at: Instant,
}

impl Game {
    pub fn new(pair_count: usize) -> Result<Self, GameError> {
        Ok(Self::with_board(Board::new(pair_count)?))
    }

    /// Wraps an already dealt board, e.g. one built from a fixed layout.
    pub fn with_board(board: Board) -> Self {
        Self {
            pair_count: board.pair_count(),
            board,
            elapsed_seconds: 0.0,
            flip_count: 0,
            started_at: None,
            last_activity_at: Instant::now(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn pair_count(&self) -> usize {
        self.pair_count
    }

    /// Flips one card. The first valid flip starts the clock.
    ///
    /// Out-of-range indices are rejected without counting as a move; every
    /// other attempt counts, including no-ops.
    pub fn flip(&mut self, index: usize) -> Result<FlipOutcome, GameError> {
        let outcome = self.board.flip(index)?;

        let now = Instant::now();
        let started_at = *self.started_at.get_or_insert(now);
        self.flip_count += 1;
        self.elapsed_seconds = now.saturating_duration_since(started_at).as_secs_f64();

        Ok(outcome)
    }

    /// Seconds since the first flip, `0.0` before it.
    ///
    /// The clock stops on the flip that clears the board.
    pub fn elapsed_seconds(&self) -> f64 {
        match self.started_at {
            None => 0.0,
            Some(_) if self.board.is_finished() => self.elapsed_seconds,
            Some(started_at) => Instant::now()
                .saturating_duration_since(started_at)
                .as_secs_f64()
                .max(self.elapsed_seconds),
        }
    }

    pub fn flip_count(&self) -> u64 {
        self.flip_count
    }

    pub fn is_finished(&self) -> bool {
        self.board.is_finished()
    }

    /// Captures what the score sink needs so it can be persisted without
    /// holding on to the game.
    pub fn score_card(&self, player_name: &str) -> ScoreCard {
        ScoreCard {
            player_name: player_name.to_string(),
            elapsed_seconds: self.elapsed_seconds(),
            flip_count: self.flip_count,
        }
    }

    pub fn touch(&mut self) {
        let now = Instant::now();
        if now > self.last_activity_at {
            self.last_activity_at = now;
        }
    }

    pub fn last_activity_at(&self) -> Instant {
        self.last_activity_at
    }

    pub fn can_expire(&self, idle_threshold: Duration) -> bool {
        Instant::now().saturating_duration_since(self.last_activity_at) > idle_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout_game() -> Game {
        Game::with_board(Board::from_values(vec![0, 1, 1, 0]).unwrap())
    }

    #[test]
    fn test_new_game() {
        let game = Game::new(10).unwrap();

        assert_eq!(game.pair_count(), 10);
        assert_eq!(game.board().len(), 20);
        assert_eq!(game.flip_count(), 0);
        assert_eq!(game.elapsed_seconds(), 0.0);
        assert!(!game.is_finished());
    }

    #[test]
    fn test_zero_pairs_rejected() {
        assert_eq!(Game::new(0).unwrap_err(), GameError::InvalidPairCount);
    }

    #[test]
    fn test_flip_counts_every_valid_attempt() {
        let mut game = layout_game();

        assert_eq!(game.flip(0).unwrap(), FlipOutcome::Revealed(0));
        assert_eq!(game.flip(0).unwrap(), FlipOutcome::NoOp);
        assert_eq!(game.flip(1).unwrap(), FlipOutcome::Mismatched(1));
        assert_eq!(game.flip_count(), 3);
    }

    #[test]
    fn test_out_of_range_flip_is_not_counted() {
        let mut game = layout_game();

        assert!(matches!(
            game.flip(17),
            Err(GameError::OutOfRange { index: 17, len: 4 })
        ));
        assert_eq!(game.flip_count(), 0);
        assert_eq!(game.elapsed_seconds(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_elapsed_time_starts_on_first_flip() {
        let mut game = layout_game();

        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(game.elapsed_seconds(), 0.0);

        game.flip(0).unwrap();
        tokio::time::advance(Duration::from_secs(5)).await;
        let first = game.elapsed_seconds();
        assert!((first - 5.0).abs() < 1e-6, "elapsed was {}", first);

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(game.elapsed_seconds() >= first);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clock_stops_when_finished() {
        let mut game = layout_game();

        game.flip(0).unwrap();
        tokio::time::advance(Duration::from_secs(3)).await;
        game.flip(3).unwrap();
        game.flip(1).unwrap();
        tokio::time::advance(Duration::from_secs(4)).await;
        game.flip(2).unwrap();
        assert!(game.is_finished());

        tokio::time::advance(Duration::from_secs(100)).await;
        assert!((game.elapsed_seconds() - 7.0).abs() < 1e-6);

        let card = game.score_card("alice");
        assert_eq!(card.player_name, "alice");
        assert_eq!(card.flip_count, 4);
        assert!((card.elapsed_seconds - 7.0).abs() < 1e-6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_can_expire_after_idle_threshold() {
        let mut game = layout_game();
        let threshold = Duration::from_secs(600);

        tokio::time::advance(Duration::from_secs(599)).await;
        assert!(!game.can_expire(threshold));

        game.touch();
        tokio::time::advance(Duration::from_secs(599)).await;
        assert!(!game.can_expire(threshold));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(game.can_expire(threshold));
    }

    #[tokio::test(start_paused = true)]
    async fn test_flip_does_not_touch_activity() {
        let mut game = layout_game();
        let created = game.last_activity_at();

        tokio::time::advance(Duration::from_secs(10)).await;
        game.flip(0).unwrap();

        assert_eq!(game.last_activity_at(), created);
    }
}
