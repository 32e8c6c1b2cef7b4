//! Uniformly random opponent, reproducible from its seed.

use std::sync::Mutex;

use rand::seq::IndexedRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use ronda_engine::cards::Card;
use ronda_engine::engine::Engine;
use ronda_engine::player::PlayerId;

use crate::AIOpponent;

#[derive(Debug)]
pub struct RandomAI {
    rng: Mutex<ChaCha20Rng>,
}

impl RandomAI {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha20Rng::seed_from_u64(seed)),
        }
    }
}

impl AIOpponent for RandomAI {
    fn choose_card(&self, engine: &Engine, player_id: PlayerId) -> Option<Card> {
        let hand = engine.player(player_id)?.hand();
        let mut rng = self.rng.lock().ok()?;
        hand.choose(&mut *rng).copied()
    }

    fn name(&self) -> &str {
        "RandomAI"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ronda_engine::rules::RuleSet;

    #[test]
    fn same_seed_same_choices() {
        let mut engine = Engine::new(Some(3), RuleSet::default());
        engine.start().expect("start");
        let p = engine.current_player();
        let a = RandomAI::new(9);
        let b = RandomAI::new(9);
        for _ in 0..5 {
            let card = a.choose_card(&engine, p).expect("card");
            assert!(engine.players()[p].has_card(card));
            assert_eq!(Some(card), b.choose_card(&engine, p));
        }
    }

    #[test]
    fn unknown_player_gets_nothing() {
        let engine = Engine::new(Some(3), RuleSet::default());
        assert_eq!(RandomAI::new(1).choose_card(&engine, 4), None);
    }
}
