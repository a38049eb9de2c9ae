use serde::{Deserialize, Serialize};

use crate::game::{
    catalog::{Catalog, Grade, Stats},
    config::BattleConfig,
    rng::RandomSource,
    rules::{lookup_tactic, lookup_warrior, BattleError},
    setup::PlayerPower,
    state::{BattleState, BattleTactic, BattleWarrior, CardId, Lane, Side, TeamState},
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceReason {
    /// 己方总血量低于阈值，优先防守类战术。
    Defensive,
    FirstAvailable,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TacticChoice {
    pub index: usize,
    pub card_id: CardId,
    pub reason: ChoiceReason,
}

/// 敌方品级上限：玩家最强卡的品级，胜场足够后上调一档。
pub fn grade_ceiling(config: &BattleConfig, player_max: Grade, win_count: u32) -> Grade {
    if win_count >= config.grade_boost_after_wins {
        player_max.raised()
    } else {
        player_max
    }
}

fn roll_level(config: &BattleConfig, average: u32, rng: &mut dyn RandomSource) -> u32 {
    let cap = config.level_cap();
    let average = average.clamp(1, cap);
    let low = average.saturating_sub(config.level_window).max(1);
    let high = average.saturating_add(config.level_window).min(cap);
    let span = (high - low) as usize + 1;
    low + rng.pick_index(span).unwrap_or(0) as u32
}

/// 按玩家战力生成敌方阵容：不放回抽取、每路一名、等级在平均等级附近浮动。
pub fn build_enemy_roster(
    catalog: &dyn Catalog,
    config: &BattleConfig,
    power: PlayerPower,
    win_count: u32,
    field_delta: &Stats,
    rng: &mut dyn RandomSource,
) -> Result<TeamState, BattleError> {
    let ceiling = grade_ceiling(config, power.max_grade, win_count);
    let mut pool: Vec<CardId> = catalog
        .warriors()
        .iter()
        .filter(|card| card.grade <= ceiling)
        .map(|card| card.id.clone())
        .collect();

    let mut delta = *field_delta;
    if config.penalty_applies(win_count) {
        delta.apply(&config.enemy_penalty);
    }

    let mut warriors = Vec::new();
    for lane in Lane::ORDER {
        let Some(pick) = rng.pick_index(pool.len()) else {
            break;
        };
        let card_id = pool.remove(pick);
        let card = lookup_warrior(catalog, &card_id)?;
        let level = roll_level(config, power.average_level, rng);
        warriors.push(BattleWarrior::from_card(
            format!("enemy-{}", lane.label()),
            card,
            level,
            lane,
            &delta,
        ));
    }

    let mut deck: Vec<CardId> = catalog.tactics().iter().map(|card| card.id.clone()).collect();
    let mut tactics = Vec::new();
    while tactics.len() < config.max_tactics {
        let Some(pick) = rng.pick_index(deck.len()) else {
            break;
        };
        let card_id = deck.remove(pick);
        lookup_tactic(catalog, &card_id)?;
        tactics.push(BattleTactic::new(
            format!("enemy-tactic-{}", tactics.len()),
            card_id,
            power.average_level,
        ));
    }

    log::debug!(
        "enemy roster drawn under {:?} ceiling: {:?}",
        ceiling,
        warriors.iter().map(|w| w.card_id.as_str()).collect::<Vec<_>>()
    );
    Ok(TeamState::new(warriors, tactics))
}

/// 启发式选择，不做前瞻搜索。
pub fn decide_tactic(
    catalog: &dyn Catalog,
    config: &BattleConfig,
    state: &BattleState,
    side: Side,
) -> Option<TacticChoice> {
    if state.is_finished() {
        return None;
    }
    let team = state.team(side);
    let available = || {
        team.tactics
            .iter()
            .enumerate()
            .filter(|(_, tactic)| tactic.is_available())
    };

    if team.hp_ratio() < config.ai_defensive_hp_ratio {
        let defensive = available().find(|(_, tactic)| {
            catalog
                .tactic(&tactic.card_id)
                .map(|card| card.kind.is_defensive())
                .unwrap_or(false)
        });
        if let Some((index, tactic)) = defensive {
            return Some(TacticChoice {
                index,
                card_id: tactic.card_id.clone(),
                reason: ChoiceReason::Defensive,
            });
        }
    }

    available().next().map(|(index, tactic)| TacticChoice {
        index,
        card_id: tactic.card_id.clone(),
        reason: ChoiceReason::FirstAvailable,
    })
}

pub fn select_tactic(
    catalog: &dyn Catalog,
    config: &BattleConfig,
    state: &BattleState,
    side: Side,
) -> Option<usize> {
    decide_tactic(catalog, config, state, side).map(|choice| choice.index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::catalog::standard_catalog;
    use crate::game::field::clear_skies;
    use crate::game::rng::{ScriptedRandom, SeededRandom};

    fn power(max_grade: Grade, average_level: u32) -> PlayerPower {
        PlayerPower {
            max_grade,
            average_level,
        }
    }

    #[test]
    fn roster_respects_grade_ceiling_and_level_window() {
        let config = BattleConfig::default();
        for seed in 0..20 {
            let mut rng = SeededRandom::new(seed);
            let team = build_enemy_roster(
                standard_catalog(),
                &config,
                power(Grade::Rare, 4),
                3,
                &Stats::default(),
                &mut rng,
            )
            .expect("roster should build");
            assert_eq!(team.warriors.len(), 3);
            assert_eq!(team.tactics.len(), config.max_tactics);

            let mut ids: Vec<&str> = team.warriors.iter().map(|w| w.card_id.as_str()).collect();
            ids.dedup();
            assert_eq!(ids.len(), 3, "drawn without replacement");
            for warrior in &team.warriors {
                let card = standard_catalog()
                    .warrior(&warrior.card_id)
                    .expect("drawn card should exist");
                assert!(card.grade <= Grade::Rare);
                assert!((3..=5).contains(&warrior.level));
            }
        }
    }

    #[test]
    fn ceiling_rises_after_enough_wins() {
        let config = BattleConfig::default();
        assert_eq!(grade_ceiling(&config, Grade::Rare, 4), Grade::Rare);
        assert_eq!(grade_ceiling(&config, Grade::Rare, 5), Grade::Epic);
        assert_eq!(grade_ceiling(&config, Grade::Legendary, 9), Grade::Legendary);
    }

    #[test]
    fn early_enemies_are_penalized() {
        let config = BattleConfig::default();
        let build = |wins| {
            let mut rng = ScriptedRandom::constant(0.0);
            build_enemy_roster(
                standard_catalog(),
                &config,
                power(Grade::Common, 1),
                wins,
                &Stats::default(),
                &mut rng,
            )
            .expect("roster should build")
        };
        let weakened = build(0);
        let full = build(3);
        assert_eq!(
            weakened.warriors[0].stats.attack,
            full.warriors[0].stats.attack - 2
        );
        assert_eq!(
            weakened.warriors[0].stats.defense,
            full.warriors[0].stats.defense - 1
        );
    }

    fn tactic_state(hp_ratio_pct: i32) -> BattleState {
        let player = build_enemy_roster(
            standard_catalog(),
            &BattleConfig::default(),
            power(Grade::Common, 1),
            3,
            &Stats::default(),
            &mut ScriptedRandom::constant(0.0),
        )
        .expect("roster should build");
        let mut enemy = player.clone();
        enemy.tactics = vec![
            BattleTactic::new("e0", "fire_attack", 1),
            BattleTactic::new("e1", "smokescreen", 1),
        ];
        for warrior in &mut enemy.warriors {
            warrior.current_hp = warrior.max_hp * hp_ratio_pct / 100;
        }
        BattleState::new(player, enemy, clear_skies(), 30)
    }

    #[test]
    fn healthy_ai_plays_first_available() {
        let state = tactic_state(100);
        let choice = decide_tactic(standard_catalog(), &BattleConfig::default(), &state, Side::Enemy)
            .expect("a tactic should be chosen");
        assert_eq!(choice.index, 0);
        assert_eq!(choice.reason, ChoiceReason::FirstAvailable);
    }

    #[test]
    fn wounded_ai_prefers_defense() {
        let state = tactic_state(40);
        let choice = decide_tactic(standard_catalog(), &BattleConfig::default(), &state, Side::Enemy)
            .expect("a tactic should be chosen");
        assert_eq!(choice.index, 1);
        assert_eq!(choice.reason, ChoiceReason::Defensive);
    }

    #[test]
    fn exhausted_hand_yields_none() {
        let mut state = tactic_state(100);
        for tactic in &mut state.enemy.tactics {
            tactic.used = true;
        }
        assert_eq!(
            select_tactic(standard_catalog(), &BattleConfig::default(), &state, Side::Enemy),
            None
        );
    }
}
