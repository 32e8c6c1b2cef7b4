use ronda_engine::cards::{Card, Rank as R, Suit as S};
use ronda_engine::rules::{
    can_capture, capture_set, extra_card_points, hand_deal_size, is_missa, score_capture,
    winner, ScoringPolicy,
};

fn card(s: S, r: R) -> Card {
    Card::new(s, r)
}

#[test]
fn five_on_run_stops_before_ten() {
    let table = [
        card(S::Oros, R::Five),
        card(S::Copas, R::Six),
        card(S::Espadas, R::Seven),
        card(S::Bastos, R::Ten),
    ];
    let captured = capture_set(card(S::Copas, R::Five), &table);
    assert_eq!(captured, table[..3].to_vec());
    assert!(!captured.contains(&card(S::Bastos, R::Ten)));
}

#[test]
fn five_on_two_fives_and_a_seven_leaves_the_seven() {
    let table = [
        card(S::Oros, R::Five),
        card(S::Copas, R::Five),
        card(S::Espadas, R::Seven),
    ];
    let captured = capture_set(card(S::Bastos, R::Five), &table);
    assert_eq!(
        captured,
        vec![card(S::Oros, R::Five), card(S::Copas, R::Five)]
    );
}

#[test]
fn run_through_six_picks_up_the_seven() {
    let table = [
        card(S::Espadas, R::Seven),
        card(S::Oros, R::Five),
        card(S::Copas, R::Six),
        card(S::Bastos, R::Six),
    ];
    let captured = capture_set(card(S::Bastos, R::Five), &table);
    // first six in table order extends the run; the second six stays
    assert_eq!(
        captured,
        vec![
            card(S::Espadas, R::Seven),
            card(S::Oros, R::Five),
            card(S::Copas, R::Six)
        ]
    );
}

#[test]
fn no_match_means_no_capture() {
    let table = [card(S::Oros, R::Four), card(S::Oros, R::Six)];
    let played = card(S::Copas, R::Five);
    assert!(!can_capture(played, &table));
    assert!(capture_set(played, &table).is_empty());
}

#[test]
fn card_count_scoring_matches_known_totals() {
    let one_two = [card(S::Oros, R::One), card(S::Oros, R::Two)];
    assert_eq!(score_capture(&one_two, ScoringPolicy::CardCount, false).total(), 3);

    let ten_two = [card(S::Oros, R::Ten), card(S::Oros, R::Two)];
    assert_eq!(score_capture(&ten_two, ScoringPolicy::CardCount, false).total(), 12);

    let king_two = [card(S::Oros, R::Twelve), card(S::Oros, R::Two)];
    let last = score_capture(&king_two, ScoringPolicy::CardCount, true);
    assert_eq!(last.final_throw, 5);
    assert_eq!(last.total(), 7);
}

#[test]
fn final_throw_needs_a_king_or_an_ace() {
    let plain = [card(S::Oros, R::Three), card(S::Copas, R::Three)];
    let score = score_capture(&plain, ScoringPolicy::CardCount, true);
    assert_eq!(score.final_throw, 0);
    assert_eq!(score.total(), 2);
}

#[test]
fn khamsa_and_missa() {
    let run = [
        card(S::Oros, R::Four),
        card(S::Oros, R::Five),
        card(S::Oros, R::Six),
    ];
    let score = score_capture(&run, ScoringPolicy::CardCount, false);
    assert_eq!(score.base, 3);
    assert_eq!(score.khamsa, 5);
    assert_eq!(score.missa, 1);
    assert_eq!(score.total(), 9);
}

#[test]
fn court_run_is_not_a_missa() {
    let courts = [
        card(S::Oros, R::Ten),
        card(S::Oros, R::Eleven),
        card(S::Oros, R::Twelve),
    ];
    assert!(!is_missa(&courts));
    let score = score_capture(&courts, ScoringPolicy::CardCount, false);
    assert_eq!(score.ashra, 10);
    assert_eq!(score.missa, 0);
}

#[test]
fn match_plus_run_policy() {
    let single = [card(S::Oros, R::Three)];
    assert_eq!(score_capture(&single, ScoringPolicy::MatchPlusRun, false).base, 2);

    let run = [
        card(S::Oros, R::Two),
        card(S::Copas, R::Three),
        card(S::Oros, R::Four),
    ];
    let score = score_capture(&run, ScoringPolicy::MatchPlusRun, false);
    assert_eq!(score.base, 5);
    assert_eq!(score.missa, 1);
}

#[test]
fn extra_card_bonus_is_capped() {
    assert_eq!(extra_card_points(25, 15), 10);
    assert_eq!(extra_card_points(35, 5), 20);
    assert_eq!(extra_card_points(15, 15), 0);
    assert_eq!(extra_card_points(10, 15), 0);
}

#[test]
fn hand_size_shrinks_at_the_end_of_the_deck() {
    assert_eq!(hand_deal_size(30), 3);
    assert_eq!(hand_deal_size(7), 3);
    assert_eq!(hand_deal_size(6), 3);
    assert_eq!(hand_deal_size(5), 2);
    assert_eq!(hand_deal_size(2), 1);
    assert_eq!(hand_deal_size(1), 0);
}

#[test]
fn winner_requires_target_and_no_tie() {
    assert_eq!(winner([40, 12], 41), None);
    assert_eq!(winner([41, 12], 41), Some(0));
    assert_eq!(winner([45, 50], 41), Some(1));
    assert_eq!(winner([45, 45], 41), None);
    assert_eq!(winner([0, 0], 0), None);
    assert_eq!(winner([0, 1], 0), Some(1));
}
