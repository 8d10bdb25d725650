mod common;

use common::*;
use game_core::{EXHAUSTED_PHRASE, JoinOutcome, Room};
use game_types::GameError;
use std::collections::HashSet;

#[test]
fn room_creation_seeds_first_turn() {
    let room = room_with_players(&["Ann"]);
    assert_eq!(room.players().len(), 1);
    assert_eq!(room.current_turn().guesser, "Ann");
    assert!(!room.current_turn().phrase.is_empty());

    let snapshot = room.snapshot();
    assert_eq!(snapshot.turns.len(), 1);
    assert_eq!(snapshot.players[0].name, "Ann");
    assert_eq!(snapshot.players[0].points, 0);
    assert!(snapshot.players[0].active);
}

#[test]
fn rotation_follows_join_order_and_wraps() {
    let mut room = room_with_players(&["Ann", "Bob", "Cy"]);
    let mut guessers = vec![room.current_turn().guesser.clone()];
    for _ in 0..5 {
        room.finish_turn(true, None);
        guessers.push(room.current_turn().guesser.clone());
    }
    assert_eq!(guessers, ["Ann", "Bob", "Cy", "Ann", "Bob", "Cy"]);
}

#[test]
fn submissions_overwrite_per_player() {
    let mut room = room_with_players(&["Ann", "Bob", "Cy"]);
    room.add_submission("Bob", "first".to_string()).unwrap();
    room.add_submission("Bob", "second".to_string()).unwrap();

    let turn = &room.snapshot().turns[0];
    assert_eq!(turn.submissions.len(), 1);
    assert_eq!(turn.submissions["Bob"], "second");
    assert!(!turn.submissions_complete);
}

#[test]
fn completeness_requires_every_non_guesser() {
    let mut room = room_with_players(&["Ann", "Bob", "Cy"]);
    room.add_submission("Bob", "one".to_string()).unwrap();
    assert!(!room.current_turn().submissions_complete);

    room.add_submission("Cy", "two".to_string()).unwrap();
    assert!(room.current_turn().submissions_complete);
    assert!(room.current_turn().submission_count() <= room.players().len() - 1);
}

#[test]
fn lone_player_never_completes() {
    let mut room = room_with_players(&["Ann"]);
    // No one can submit, and completeness must not latch for roster < 2.
    room.recheck_submissions();
    assert!(!room.current_turn().submissions_complete);
}

#[test]
fn guesser_cannot_submit() {
    let mut room = room_with_players(&["Ann", "Bob"]);
    let result = room.add_submission("Ann", "sneaky".to_string());
    assert_eq!(result, Err(GameError::GuesserCannotSubmit));
    assert_eq!(room.current_turn().submission_count(), 0);
}

#[test]
fn finish_awards_best_submitter_and_guesser() {
    let mut room = room_with_players(&["Ann", "Bob"]);
    room.add_submission("Bob", "hello".to_string()).unwrap();
    assert!(room.current_turn().submissions_complete);

    room.finish_turn(true, Some("Bob"));

    assert_eq!(room.player("Bob").unwrap().points, 1);
    assert_eq!(room.player("Ann").unwrap().points, 1);
    assert_eq!(room.current_turn().guesser, "Bob");

    let snapshot = room.snapshot();
    assert_eq!(snapshot.turns.len(), 2);
    assert_eq!(
        snapshot.turns[1].best_submission_player_name.as_deref(),
        Some("Bob")
    );
}

#[test]
fn finish_without_best_awards_nothing() {
    let mut room = room_with_players(&["Ann", "Bob"]);
    room.add_submission("Bob", "hello".to_string()).unwrap();
    room.finish_turn(true, None);

    assert_eq!(room.player("Ann").unwrap().points, 0);
    assert_eq!(room.player("Bob").unwrap().points, 0);
    assert_eq!(room.current_turn().guesser, "Bob");
}

#[test]
fn finish_with_non_submitter_awards_nothing() {
    let mut room = room_with_players(&["Ann", "Bob", "Cy"]);
    room.add_submission("Bob", "hello".to_string()).unwrap();
    // Cy never submitted, so naming them earns no one anything.
    room.finish_turn(true, Some("Cy"));

    assert!(room.players().iter().all(|p| p.points == 0));
    assert!(
        room.snapshot().turns[1]
            .best_submission_player_name
            .is_none()
    );
}

#[test]
fn kicking_guesser_force_finishes_without_credit() {
    let mut room = room_with_players(&["Ann", "Bob", "Cy"]);
    room.add_submission("Bob", "pending".to_string()).unwrap();

    let removed = room.kick("Ann");
    assert_eq!(removed.unwrap().name, "Ann");
    assert!(room.players().iter().all(|p| p.points == 0));
    assert_eq!(room.current_turn().guesser, "Bob");
    assert!(room.player("Ann").is_none());
    // Bob's submission belonged to the replaced turn.
    assert_eq!(room.current_turn().submission_count(), 0);
}

#[test]
fn guesser_is_always_a_roster_member() {
    let mut room = room_with_players(&["Ann", "Bob", "Cy"]);
    room.kick("Ann");
    assert!(room.player(&room.current_turn().guesser).is_some());

    room.finish_turn(true, None);
    room.kick("Cy");
    assert!(room.player(&room.current_turn().guesser).is_some());
}

#[test]
fn kicking_non_guesser_may_complete_the_turn() {
    let mut room = room_with_players(&["Ann", "Bob", "Cy"]);
    room.add_submission("Bob", "only one".to_string()).unwrap();
    assert!(!room.current_turn().submissions_complete);

    room.kick("Cy");
    assert!(room.current_turn().submissions_complete);
    assert_eq!(room.current_turn().guesser, "Ann");
}

#[test]
fn kicking_a_submitter_drops_their_entry() {
    let mut room = room_with_players(&["Ann", "Bob", "Cy"]);
    room.add_submission("Cy", "mine".to_string()).unwrap();

    room.kick("Cy");
    assert_eq!(room.current_turn().submission_count(), 0);
    assert!(!room.current_turn().submissions_complete);
}

#[test]
fn kick_unknown_name_is_a_no_op() {
    let mut room = room_with_players(&["Ann", "Bob"]);
    assert!(room.kick("Nobody").is_none());
    assert_eq!(room.players().len(), 2);
}

#[test]
fn join_existing_name_reconnects_without_new_identity() {
    let mut room = room_with_players(&["Ann", "Bob"]);
    room.add_submission("Bob", "hello".to_string()).unwrap();
    room.finish_turn(true, Some("Bob"));
    room.mark_disconnected("Bob");
    assert!(!room.player("Bob").unwrap().active);

    let outcome = room.join("Bob", "candidate-secret".to_string());
    assert_eq!(outcome, JoinOutcome::Reconnected);

    let bob = room.player("Bob").unwrap();
    assert_eq!(room.players().len(), 2);
    assert!(bob.active);
    assert!(bob.ponged);
    assert_eq!(bob.points, 1);
    // The stored secret survives; the candidate is discarded.
    assert_eq!(bob.secret, "secret-Bob");
}

#[test]
fn skip_keeps_the_guesser_and_discards_submissions() {
    let mut room = room_with_players(&["Ann", "Bob"]);
    room.add_submission("Bob", "stale".to_string()).unwrap();
    let skipped_phrase = room.current_turn().phrase.clone();

    room.skip_turn();

    assert_eq!(room.current_turn().guesser, "Ann");
    assert_eq!(room.current_turn().submission_count(), 0);
    assert_ne!(room.current_turn().phrase, skipped_phrase);
    assert_eq!(room.snapshot().turns.len(), 2);
}

#[test]
fn phrases_never_repeat_within_a_room() {
    let mut room = room_with_players(&["Ann", "Bob"]);
    for _ in 0..12 {
        room.skip_turn();
    }

    let snapshot = room.snapshot();
    let mut real_phrases = HashSet::new();
    let mut exhausted = 0;
    for turn in &snapshot.turns {
        if turn.phrase == EXHAUSTED_PHRASE {
            exhausted += 1;
        } else {
            assert!(real_phrases.insert(turn.phrase.clone()), "phrase repeated");
        }
    }
    assert_eq!(real_phrases.len(), 8);
    assert_eq!(exhausted, 5);
}

#[test]
fn rooms_draw_from_independent_pools() {
    let phraseset = test_phraseset();
    let mut first = Room::new("Ann", "s1".to_string(), &phraseset);
    let second = Room::new("Bob", "s2".to_string(), &phraseset);

    for _ in 0..10 {
        first.skip_turn();
    }
    // Draining the first room must not affect the second.
    assert_ne!(second.current_turn().phrase, EXHAUSTED_PHRASE);
}

#[test]
fn sweep_declares_silent_players_dead_on_second_tick() {
    let mut room = room_with_players(&["Ann", "Bob"]);

    // First tick: everyone had ponged at join, flags are lowered.
    assert!(room.sweep_unponged().is_empty());

    // Ann answers the probe, Bob stays silent.
    room.mark_ponged("Ann");
    let dead = room.sweep_unponged();
    assert_eq!(dead, vec!["Bob".to_string()]);
    assert!(!room.player("Bob").unwrap().active);
    assert!(room.player("Ann").unwrap().active);
}

#[test]
fn room_survives_zero_active_players() {
    let mut room = room_with_players(&["Ann", "Bob"]);
    room.mark_disconnected("Ann");
    room.mark_disconnected("Bob");

    assert!(room.players().iter().all(|p| !p.active));
    assert_eq!(room.players().len(), 2);
    // The room still answers state queries.
    assert_eq!(room.snapshot().players.len(), 2);
}
