//! 开战初始化：校验卡组、抽取场地、生成敌方阵容、结算羁绊与开战技能。

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::catalog::{Catalog, Grade, Stats};
use super::config::BattleConfig;
use super::field::{clear_skies, standard_events};
use super::rng::RandomSource;
use super::rules::BattleError;
use super::skills;
use super::state::{
    BattleState, BattleTactic, BattleWarrior, CardId, InstanceId, Lane, Side, TeamState,
};
use super::synergy::{apply_synergies, compute_synergies};
use crate::ai::opponent;

/// 卡组中的一个武将位。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeckSlot {
    pub lane: Lane,
    pub instance_id: InstanceId,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerDeck {
    #[serde(default)]
    pub warriors: Vec<DeckSlot>,
    #[serde(default)]
    pub tactics: Vec<InstanceId>,
}

impl PlayerDeck {
    pub fn new(warriors: Vec<DeckSlot>, tactics: Vec<InstanceId>) -> Self {
        Self { warriors, tactics }
    }
}

fn default_level() -> u32 {
    1
}

/// 玩家收藏中的一张卡（武将或战术）。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OwnedCard {
    pub instance_id: InstanceId,
    pub card_id: CardId,
    #[serde(default = "default_level")]
    pub level: u32,
}

impl OwnedCard {
    pub fn new(instance_id: impl Into<InstanceId>, card_id: impl Into<CardId>, level: u32) -> Self {
        Self {
            instance_id: instance_id.into(),
            card_id: card_id.into(),
            level: level.max(1),
        }
    }
}

/// 决定敌方强度的玩家战力摘要。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerPower {
    pub max_grade: Grade,
    pub average_level: u32,
}

impl PlayerPower {
    fn measure(catalog: &dyn Catalog, warriors: &[BattleWarrior]) -> Self {
        let max_grade = warriors
            .iter()
            .filter_map(|warrior| catalog.warrior(&warrior.card_id))
            .map(|card| card.grade)
            .max()
            .unwrap_or_default();
        let average_level = if warriors.is_empty() {
            1
        } else {
            let total: u64 = warriors.iter().map(|warrior| u64::from(warrior.level)).sum();
            let count = warriors.len() as u64;
            let average = (total + count / 2) / count;
            u32::try_from(average).unwrap_or(u32::MAX).max(1)
        };
        Self {
            max_grade,
            average_level,
        }
    }
}

pub fn initialize(
    catalog: &dyn Catalog,
    config: &BattleConfig,
    deck: &PlayerDeck,
    inventory: &[OwnedCard],
    win_count: u32,
    rng: &mut dyn RandomSource,
) -> Result<BattleState, BattleError> {
    let events = standard_events();
    let field_event = rng
        .pick_index(events.len())
        .and_then(|idx| events.get(idx))
        .cloned()
        .unwrap_or_else(clear_skies);
    let field_delta = field_event.effect.stat_delta();

    let mut notes = Vec::new();
    let mut placed = HashSet::new();
    let warriors = player_warriors(
        catalog,
        config,
        deck,
        inventory,
        &field_delta,
        &mut placed,
        &mut notes,
    );
    let tactics = player_tactics(catalog, config, deck, inventory, &mut placed, &mut notes);
    let power = PlayerPower::measure(catalog, &warriors);

    let enemy = opponent::build_enemy_roster(catalog, config, power, win_count, &field_delta, rng)?;
    let player = TeamState::new(warriors, tactics);

    let mut state = BattleState::new(player, enemy, field_event, config.max_turns);
    state.push_log(format!(
        "Battlefield: {} - {}",
        state.field_event.name, state.field_event.description
    ));
    state.log.extend(notes);
    if config.penalty_applies(win_count) {
        state.push_log("The enemy is battle-weary and fights below strength");
    }

    for side in Side::ORDER {
        let synergies = compute_synergies(state.team(side), side);
        let lines = apply_synergies(state.team_mut(side), &synergies);
        state.log.extend(lines);
        state.active_synergies.extend(synergies);
    }
    for side in Side::ORDER {
        for warrior in &mut state.team_mut(side).warriors {
            warrior.base_stats = warrior.stats;
        }
    }

    let mut opening = Vec::new();
    for side in Side::ORDER {
        skills::fire_battle_start(catalog, config, &mut state, side, &mut opening)?;
    }
    state.opening_actions = opening;
    state.mark_tactic_phase();

    log::info!(
        "battle ready: {} vs {} warriors on {} (enemy ceiling from {:?}, level {})",
        state.player.warriors.len(),
        state.enemy.warriors.len(),
        state.field_event.name,
        power.max_grade,
        power.average_level
    );
    Ok(state)
}

/// 一张收藏卡在同一场战斗里只能占一个位置，`placed` 记录已上场的实例。
fn player_warriors(
    catalog: &dyn Catalog,
    config: &BattleConfig,
    deck: &PlayerDeck,
    inventory: &[OwnedCard],
    field_delta: &Stats,
    placed: &mut HashSet<InstanceId>,
    notes: &mut Vec<String>,
) -> Vec<BattleWarrior> {
    let mut warriors: Vec<BattleWarrior> = Vec::new();
    for slot in &deck.warriors {
        if placed.contains(&slot.instance_id) {
            drop_slot(notes, &slot.instance_id, "card is already in the deck");
            continue;
        }
        if warriors.iter().any(|warrior| warrior.lane == slot.lane) {
            drop_slot(notes, &slot.instance_id, "lane is already occupied");
            continue;
        }
        let Some(owned) = inventory
            .iter()
            .find(|owned| owned.instance_id == slot.instance_id)
        else {
            drop_slot(notes, &slot.instance_id, "card is not in the collection");
            continue;
        };
        let Some(card) = catalog.warrior(&owned.card_id) else {
            drop_slot(notes, &slot.instance_id, "unknown warrior card");
            continue;
        };
        placed.insert(owned.instance_id.clone());
        warriors.push(BattleWarrior::from_card(
            owned.instance_id.clone(),
            card,
            owned.level.clamp(1, config.level_cap()),
            slot.lane,
            field_delta,
        ));
    }
    warriors
}

fn player_tactics(
    catalog: &dyn Catalog,
    config: &BattleConfig,
    deck: &PlayerDeck,
    inventory: &[OwnedCard],
    placed: &mut HashSet<InstanceId>,
    notes: &mut Vec<String>,
) -> Vec<BattleTactic> {
    let mut tactics = Vec::new();
    for instance_id in &deck.tactics {
        if placed.contains(instance_id) {
            drop_slot(notes, instance_id, "card is already in the deck");
            continue;
        }
        if tactics.len() >= config.max_tactics {
            drop_slot(notes, instance_id, "tactic slots are full");
            continue;
        }
        let Some(owned) = inventory
            .iter()
            .find(|owned| &owned.instance_id == instance_id)
        else {
            drop_slot(notes, instance_id, "card is not in the collection");
            continue;
        };
        if catalog.tactic(&owned.card_id).is_none() {
            drop_slot(notes, instance_id, "unknown tactic card");
            continue;
        }
        placed.insert(owned.instance_id.clone());
        tactics.push(BattleTactic::new(
            owned.instance_id.clone(),
            owned.card_id.clone(),
            owned.level.clamp(1, config.level_cap()),
        ));
    }
    tactics
}

fn drop_slot(notes: &mut Vec<String>, instance_id: &str, reason: &str) {
    log::warn!("dropping deck slot {instance_id}: {reason}");
    notes.push(format!("Deck slot {instance_id} was skipped ({reason})"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::catalog::standard_catalog;
    use crate::game::rng::{ScriptedRandom, SeededRandom};
    use crate::game::state::BattlePhase;

    fn inventory() -> Vec<OwnedCard> {
        vec![
            OwnedCard::new("c1", "guan_yu", 3),
            OwnedCard::new("c2", "liu_bei", 2),
            OwnedCard::new("c3", "zhang_fei", 1),
            OwnedCard::new("t1", "ambush", 1),
            OwnedCard::new("t2", "war_cry", 2),
            OwnedCard::new("t3", "provoke", 1),
        ]
    }

    fn deck() -> PlayerDeck {
        PlayerDeck::new(
            vec![
                DeckSlot {
                    lane: Lane::Front,
                    instance_id: "c1".into(),
                },
                DeckSlot {
                    lane: Lane::Mid,
                    instance_id: "c2".into(),
                },
                DeckSlot {
                    lane: Lane::Back,
                    instance_id: "c3".into(),
                },
            ],
            vec!["t1".into(), "t2".into()],
        )
    }

    #[test]
    fn fresh_battle_is_ready_for_tactics() {
        let config = BattleConfig::default();
        let mut rng = ScriptedRandom::constant(0.0);
        let state = initialize(standard_catalog(), &config, &deck(), &inventory(), 0, &mut rng)
            .expect("battle should initialize");

        assert_eq!(state.turn, 1);
        assert_eq!(state.phase, BattlePhase::Tactic);
        assert!(state.result.is_none());
        assert_eq!(state.field_event.name, "Clear Skies");
        assert!(state.log[0].contains("Clear Skies"));
        assert_eq!(state.player.warriors.len(), 3);
        assert_eq!(state.enemy.warriors.len(), 3);
        state.integrity_check().expect("fresh state should be consistent");
    }

    #[test]
    fn shu_trio_gets_major_synergy_and_bonus_tactic() {
        let config = BattleConfig::default();
        let mut rng = ScriptedRandom::constant(0.0);
        let state = initialize(standard_catalog(), &config, &deck(), &inventory(), 0, &mut rng)
            .expect("battle should initialize");

        assert!(state
            .active_synergies
            .iter()
            .any(|synergy| synergy.side == Side::Player
                && synergy.tier == crate::game::state::SynergyTier::Major));
        let guan_yu = &state.player.warriors[0];
        assert_eq!(guan_yu.stats.attack, 18 + 2 + 4);
        assert_eq!(guan_yu.base_stats, guan_yu.stats);
        assert_eq!(guan_yu.max_hp, guan_yu.stats.command * 3);

        assert_eq!(state.player.tactics.len(), 3, "Liu Bei grants a bonus tactic");
        assert_eq!(state.player.tactics[2].card_id, "field_medic");
        assert!(!state.opening_actions.is_empty());
    }

    #[test]
    fn bad_slots_are_dropped_not_rejected() {
        let config = BattleConfig::default();
        let mut deck = deck();
        deck.warriors[1].instance_id = "missing".into();
        deck.tactics.push("t3".into());
        let mut inventory = inventory();
        inventory[2].card_id = "no_such_card".into();

        let mut rng = SeededRandom::new(11);
        let state = initialize(standard_catalog(), &config, &deck, &inventory, 4, &mut rng)
            .expect("battle should still initialize");
        assert_eq!(state.player.warriors.len(), 1);
        assert_eq!(state.player.tactics.len(), 2);
        assert_eq!(
            state
                .log
                .iter()
                .filter(|line| line.starts_with("Deck slot"))
                .count(),
            3
        );
    }

    #[test]
    fn repeated_instances_take_a_single_slot() {
        let config = BattleConfig::default();
        let deck = PlayerDeck::new(
            vec![
                DeckSlot {
                    lane: Lane::Front,
                    instance_id: "c1".into(),
                },
                DeckSlot {
                    lane: Lane::Mid,
                    instance_id: "c1".into(),
                },
            ],
            vec!["t1".into(), "t1".into()],
        );
        let mut rng = SeededRandom::new(8);
        let state = initialize(standard_catalog(), &config, &deck, &inventory(), 0, &mut rng)
            .expect("battle should initialize");

        let warrior_ids: Vec<&str> = state
            .player
            .warriors
            .iter()
            .map(|warrior| warrior.instance_id.as_str())
            .collect();
        assert_eq!(warrior_ids, ["c1"]);
        let tactic_ids: Vec<&str> = state
            .player
            .tactics
            .iter()
            .map(|tactic| tactic.instance_id.as_str())
            .collect();
        assert_eq!(tactic_ids, ["t1"]);
        assert_eq!(
            state
                .log
                .iter()
                .filter(|line| line.contains("already in the deck"))
                .count(),
            2
        );
    }

    #[test]
    fn huge_levels_are_capped_not_wrapped() {
        let config = BattleConfig::default();
        let inventory = vec![
            OwnedCard::new("c1", "xu_chu", u32::MAX),
            OwnedCard::new("c2", "xu_chu", u32::MAX),
            OwnedCard::new("c3", "xu_chu", 3_000_000_000),
            OwnedCard::new("t1", "ambush", u32::MAX),
        ];
        let mut rng = SeededRandom::new(12);
        let state = initialize(standard_catalog(), &config, &deck(), &inventory, 0, &mut rng)
            .expect("battle should initialize");

        let card = standard_catalog().warrior("xu_chu").expect("xu_chu exists");
        let first = &state.player.warriors[0];
        assert_eq!(state.player.warriors.len(), 3);
        assert!(first.stats.attack > card.base.attack);
        for warrior in &state.player.warriors {
            assert_eq!(warrior.level, config.level_cap());
            assert_eq!(warrior.stats, first.stats);
            assert_eq!(warrior.max_hp, warrior.stats.command * 3);
        }
        assert_eq!(state.player.tactics[0].level, config.level_cap());
        for warrior in &state.enemy.warriors {
            assert!(warrior.level <= config.level_cap());
        }
        state.integrity_check().expect("capped state should be consistent");
    }

    #[test]
    fn empty_deck_still_builds_a_battle() {
        let config = BattleConfig::default();
        let mut rng = SeededRandom::new(3);
        let state = initialize(standard_catalog(), &config, &PlayerDeck::default(), &[], 0, &mut rng)
            .expect("battle should initialize");
        assert!(state.player.warriors.is_empty());
        assert_eq!(state.enemy.warriors.len(), 3);
    }
}
