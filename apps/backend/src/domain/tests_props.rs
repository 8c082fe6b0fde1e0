//! Property tests over random operation sequences.

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::game::{GameConfig, GameSession};

#[derive(Debug, Clone)]
enum Op {
    Draw(usize),
    Discard(usize, usize),
    Recycle(usize),
    Pass(usize, usize, usize),
    Pick(usize, usize),
    DiscardDeckTop,
    RecycleToDeck,
    Reshuffle,
    TarotDraw(usize),
    TarotDiscard(usize, usize),
    TarotFlip,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    // Seat/index ranges deliberately overshoot so sequences also exercise
    // the error paths.
    prop_oneof![
        (0usize..5).prop_map(Op::Draw),
        (0usize..5, 0usize..60).prop_map(|(p, c)| Op::Discard(p, c)),
        (0usize..5).prop_map(Op::Recycle),
        (0usize..5, 0usize..60, 0usize..5).prop_map(|(p, c, t)| Op::Pass(p, c, t)),
        (0usize..5, 0usize..5).prop_map(|(p, t)| Op::Pick(p, t)),
        (0usize..3).prop_map(|i| match i {
            0 => Op::DiscardDeckTop,
            1 => Op::RecycleToDeck,
            _ => Op::Reshuffle,
        }),
        (0usize..5).prop_map(Op::TarotDraw),
        (0usize..5, 0usize..30).prop_map(|(p, c)| Op::TarotDiscard(p, c)),
        Just(Op::TarotFlip),
    ]
}

proptest! {
    #[test]
    fn cards_are_conserved_across_any_operation_sequence(
        seed in any::<u64>(),
        ops in proptest::collection::vec(op_strategy(), 0..200),
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let players = ["Amy".to_string(), "Bo".to_string(), "Cass".to_string()];
        let mut game = GameSession::new(&players, &GameConfig::default(), &mut rng).unwrap();

        let cards = game.total_card_count();
        let tarots = game.total_tarot_count();

        for op in ops {
            // Errors are fine; the invariant must hold either way.
            let _ = match op {
                Op::Draw(p) => game.draw_card(p).map(|_| ()),
                Op::Discard(p, c) => game.discard_card(p, c).map(|_| ()),
                Op::Recycle(p) => game.recycle_from_pile(p).map(|_| ()),
                Op::Pass(p, c, t) => game.pass_card(p, c, t).map(|_| ()),
                Op::Pick(p, t) => game.pick_random_from(p, t, &mut rng).map(|_| ()),
                Op::DiscardDeckTop => {
                    game.discard_deck_top();
                    Ok(())
                }
                Op::RecycleToDeck => {
                    game.recycle_to_deck();
                    Ok(())
                }
                Op::Reshuffle => {
                    game.reshuffle_discard_into_deck(&mut rng);
                    Ok(())
                }
                Op::TarotDraw(p) => game.tarot_draw(p).map(|_| ()),
                Op::TarotDiscard(p, c) => game.tarot_discard(p, c).map(|_| ()),
                Op::TarotFlip => {
                    game.tarot_flip_pile_top();
                    Ok(())
                }
            };

            prop_assert_eq!(game.total_card_count(), cards);
            prop_assert_eq!(game.total_tarot_count(), tarots);
        }
    }

    #[test]
    fn dealt_hands_never_exceed_deck(
        seed in any::<u64>(),
        hand_size in 0usize..40,
        decks in 1usize..3,
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let config = GameConfig { decks, jokers: 2, hand_size, ..GameConfig::default() };
        let players = ["Amy".to_string(), "Bo".to_string()];
        let game = GameSession::new(&players, &config, &mut rng).unwrap();

        // Oversized deals exhaust the deck and stop; nothing is invented.
        prop_assert_eq!(game.total_card_count(), decks * 54);
    }
}
