use lane_battle_core::game::{
    standard_catalog, standard_events, ActionKind, BattleEngine, BattleResult, BattleState,
    BattleTactic, BattleWarrior, Catalog, CombatEventKind, DeckSlot, FieldEffect, Lane, OwnedCard,
    PlayerDeck, SeededRandom, Side, Stats, StatusEffect, StatusKind, TeamState,
};
use lane_battle_core::run_to_completion;

fn warrior(card_id: &str, lane: Lane, level: u32, tag: &str) -> BattleWarrior {
    let card = standard_catalog()
        .warrior(card_id)
        .expect("standard card should exist");
    BattleWarrior::from_card(format!("{tag}-{}", lane.label()), card, level, lane, &Stats::default())
}

fn tactics(tag: &str, ids: &[&str]) -> Vec<BattleTactic> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| BattleTactic::new(format!("{tag}-t{i}"), *id, 1))
        .collect()
}

fn manual_battle(player_tactics: &[&str], enemy_tactics: &[&str]) -> BattleState {
    let player = TeamState::new(
        vec![
            warrior("shu_guardsman", Lane::Front, 1, "p"),
            warrior("wei_crossbowman", Lane::Mid, 1, "p"),
        ],
        tactics("p", player_tactics),
    );
    let enemy = TeamState::new(
        vec![
            warrior("wu_marine", Lane::Front, 1, "e"),
            warrior("yellow_turban", Lane::Mid, 1, "e"),
        ],
        tactics("e", enemy_tactics),
    );
    BattleState::new(player, enemy, lane_battle_core::game::field::clear_skies(), 30)
}

fn sample_deck() -> (PlayerDeck, Vec<OwnedCard>) {
    let inventory = vec![
        OwnedCard::new("w1", "zhao_yun", 2),
        OwnedCard::new("w2", "hua_tuo", 2),
        OwnedCard::new("w3", "lu_xun", 1),
        OwnedCard::new("t1", "fire_attack", 1),
        OwnedCard::new("t2", "smokescreen", 1),
    ];
    let deck = PlayerDeck::new(
        vec![
            DeckSlot {
                lane: Lane::Front,
                instance_id: "w1".into(),
            },
            DeckSlot {
                lane: Lane::Mid,
                instance_id: "w2".into(),
            },
            DeckSlot {
                lane: Lane::Back,
                instance_id: "w3".into(),
            },
        ],
        vec!["t1".into(), "t2".into()],
    );
    (deck, inventory)
}

#[test]
fn one_hp_rosters_end_on_the_first_blow() {
    let engine = BattleEngine::standard();
    let mut state = BattleState::new(
        TeamState::new(vec![warrior("wei_crossbowman", Lane::Front, 1, "p")], Vec::new()),
        TeamState::new(vec![warrior("wu_marine", Lane::Front, 1, "e")], Vec::new()),
        lane_battle_core::game::field::clear_skies(),
        30,
    );
    state.player.warriors[0].current_hp = 1;
    state.enemy.warriors[0].current_hp = 1;

    let mut rng = SeededRandom::new(1);
    let resolution = engine
        .resolve_turn(&state, Some(&mut rng))
        .expect("turn should resolve");
    assert_eq!(resolution.result, Some(BattleResult::Win));
    assert!(!resolution.state.enemy.warriors[0].is_alive);
    assert!(resolution.state.player.warriors[0].is_alive);
    let attacks: Vec<_> = resolution
        .actions
        .iter()
        .filter(|action| action.kind == ActionKind::Attack)
        .collect();
    assert_eq!(attacks.len(), 1);
    assert_eq!(attacks[0].side, Some(Side::Player));
    assert_eq!(attacks[0].count(CombatEventKind::Death), 1);
}

#[test]
fn out_of_range_tactic_returns_identical_state() {
    let engine = BattleEngine::standard();
    let state = manual_battle(&["fire_attack", "ambush"], &[]);
    let resolution = engine
        .apply_tactic(&state, Side::Player, 5)
        .expect("tactic call should succeed");
    assert!(resolution.action.is_none());
    assert_eq!(resolution.state, state);
}

#[test]
fn level_growth_keeps_max_hp_tied_to_command() {
    let rookie = warrior("shu_guardsman", Lane::Front, 1, "a");
    assert_eq!(rookie.stats.command, 10);
    assert_eq!(rookie.max_hp, 30);

    let veteran = warrior("shu_guardsman", Lane::Front, 3, "b");
    assert_eq!(veteran.stats.command, 12);
    assert_eq!(veteran.max_hp, 36);
    assert_eq!(veteran.max_hp, veteran.stats.command * 3);
}

#[test]
fn fire_tactic_fizzles_in_rain() {
    let engine = BattleEngine::standard();
    let mut state = manual_battle(&["fire_attack"], &[]);
    state.field_event = standard_events()
        .iter()
        .find(|event| event.effect == FieldEffect::Rain)
        .cloned()
        .expect("rain event should exist");

    let resolution = engine
        .apply_tactic(&state, Side::Player, 0)
        .expect("tactic should resolve");
    let action = resolution.action.expect("tactic should produce an action");
    assert_eq!(action.count(CombatEventKind::Damage), 0);
    assert!(resolution.state.player.tactics[0].used);
    assert!(resolution
        .state
        .log
        .iter()
        .any(|line| line.contains("nullified by weather")));
}

#[test]
fn counter_stance_reflects_next_turn_tactic() {
    let engine = BattleEngine::standard();
    let mut rng = SeededRandom::new(5);
    let state = manual_battle(&["counter_stance"], &["war_cry"]);

    let armed = engine
        .apply_tactic(&state, Side::Player, 0)
        .expect("counter should arm")
        .state;
    assert!(armed.player.tactics[0].armed);
    let next_turn = engine
        .resolve_turn(&armed, Some(&mut rng))
        .expect("turn should resolve")
        .state;
    assert_eq!(next_turn.turn, 2);

    let before: Vec<i32> = next_turn.enemy.warriors.iter().map(|w| w.current_hp).collect();
    let resolution = engine
        .apply_tactic(&next_turn, Side::Enemy, 0)
        .expect("enemy tactic should resolve");
    let after = &resolution.state;

    assert!(after.enemy.warriors[0].has_status(StatusKind::AttackUp));
    assert!(after.player.tactics[0].used);
    for (warrior, hp_before) in after.enemy.warriors.iter().zip(before) {
        if warrior.is_alive {
            assert_eq!(warrior.current_hp, hp_before - 5);
        }
    }
}

#[test]
fn permanent_stun_draws_by_stalemate() {
    let engine = BattleEngine::standard();
    let mut state = manual_battle(&[], &[]);
    for side in Side::ORDER {
        for warrior in &mut state.team_mut(side).warriors {
            warrior.add_status(StatusEffect::until_consumed(StatusKind::Stun, 1));
        }
    }

    let mut rng = SeededRandom::new(6);
    let mut stun_skips = 0;
    while !state.is_finished() {
        let resolution = engine
            .resolve_turn(&state, Some(&mut rng))
            .expect("turn should resolve");
        stun_skips += resolution
            .actions
            .iter()
            .filter(|action| action.kind == ActionKind::StunSkip)
            .count();
        state = resolution.state;
    }
    assert_eq!(state.result, Some(BattleResult::Draw));
    assert_eq!(state.stalemate_turns, 8);
    assert!(state.turn < 30);
    assert_eq!(stun_skips, 8 * 4);
}

#[test]
fn finite_status_lasts_exactly_its_turns() {
    let engine = BattleEngine::standard();
    let mut state = manual_battle(&[], &[]);
    for side in Side::ORDER {
        for warrior in &mut state.team_mut(side).warriors {
            warrior.add_status(StatusEffect::until_consumed(StatusKind::Stun, 1));
        }
    }
    state.player.warriors[0].add_status(StatusEffect::new(StatusKind::DefenseUp, 2, 3));

    let mut rng = SeededRandom::new(7);
    for _ in 0..2 {
        state = engine
            .resolve_turn(&state, Some(&mut rng))
            .expect("turn should resolve")
            .state;
        assert!(state.player.warriors[0].has_status(StatusKind::DefenseUp));
    }
    state = engine
        .resolve_turn(&state, Some(&mut rng))
        .expect("turn should resolve")
        .state;
    assert!(!state.player.warriors[0].has_status(StatusKind::DefenseUp));
}

#[test]
fn seeded_battles_replay_byte_for_byte() {
    let engine = BattleEngine::standard();
    let (deck, inventory) = sample_deck();
    let play = || {
        let mut rng = SeededRandom::new(2024);
        let state = engine
            .initialize(&deck, &inventory, 2, Some(&mut rng))
            .expect("battle should initialize");
        let replay = run_to_completion(&engine, &state, &mut rng, None).expect("battle should finish");
        (
            serde_json::to_string(&replay.state).expect("state should serialize"),
            serde_json::to_string(&replay.actions).expect("actions should serialize"),
        )
    };
    assert_eq!(play(), play());
}

#[test]
fn input_snapshots_are_never_mutated() {
    let engine = BattleEngine::standard();
    let (deck, inventory) = sample_deck();
    let mut rng = SeededRandom::new(99);
    let state = engine
        .initialize(&deck, &inventory, 0, Some(&mut rng))
        .expect("battle should initialize");
    let snapshot = state.clone();

    let after_tactic = engine
        .apply_tactic(&state, Side::Player, 0)
        .expect("tactic should resolve");
    let _ = engine
        .resolve_turn(&after_tactic.state, Some(&mut rng))
        .expect("turn should resolve");
    assert_eq!(state, snapshot);
}
