//! 武将技能的触发与结算：开战、被动、主动、奥义、回合末维持五类，
//! 每类按阵容顺序扫描存活单位，在工作副本上修改状态并追加动作。

use super::catalog::{
    ActiveSkill, Catalog, Grade, OpeningSkill, PassiveSkill, UltimateSkill, UpkeepSkill,
};
use super::config::BattleConfig;
use super::rng::RandomSource;
use super::rules::{lookup_warrior, BattleError};
use super::state::{
    level_growth, ActionKind, BattleAction, BattleState, BattleTactic, CombatEvent,
    CombatEventKind, Side, StatusEffect, StatusKind, UltimateMarker,
};

fn skill_action(state: &BattleState, kind: ActionKind, side: Side, idx: usize) -> BattleAction {
    let warrior = &state.team(side).warriors[idx];
    BattleAction::new(kind, state.turn).by(side, warrior.instance_id.clone())
}

fn skill_event(target: &str, value: i32) -> CombatEvent {
    CombatEvent::new(CombatEventKind::Skill, target, value)
}

/// 开战技能，只在初始化时触发一次。
pub fn fire_battle_start(
    catalog: &dyn Catalog,
    config: &BattleConfig,
    state: &mut BattleState,
    side: Side,
    actions: &mut Vec<BattleAction>,
) -> Result<(), BattleError> {
    for idx in 0..state.team(side).warriors.len() {
        if !state.team(side).warriors[idx].is_alive {
            continue;
        }
        let card = lookup_warrior(catalog, &state.team(side).warriors[idx].card_id)?;
        for skill in card.opening_skills() {
            let mut action = skill_action(state, ActionKind::BattleStartSkill, side, idx);
            apply_opening(catalog, config, state, side, idx, skill, &mut action)?;
            state.record(action, actions);
        }
    }
    Ok(())
}

fn apply_opening(
    catalog: &dyn Catalog,
    config: &BattleConfig,
    state: &mut BattleState,
    side: Side,
    idx: usize,
    skill: &OpeningSkill,
    action: &mut BattleAction,
) -> Result<(), BattleError> {
    let caster = state.team(side).warriors[idx].clone();
    match skill {
        OpeningSkill::LeaderAura => {
            let team = state.team(side);
            let target = team
                .living_indices()
                .into_iter()
                .filter(|other| *other != idx)
                .min_by_key(|other| team.warriors[*other].lane)
                .unwrap_or(idx);
            let ally = state.warrior_mut(side, target);
            ally.refresh_status(StatusEffect::until_consumed(StatusKind::TacticNullify, 1));
            action.push_event(skill_event(&ally.instance_id, 1));
            action.push_log(format!(
                "{} raises {}: {} is shielded from enemy tactics",
                caster.name,
                skill.label(),
                ally.name
            ));
        }
        OpeningSkill::Intimidate { amount } => {
            action.push_log(format!("{} uses {}", caster.name, skill.label()));
            let targets = state.team(side.opponent()).living_indices();
            if targets.is_empty() {
                action.push_event(skill_event(&caster.instance_id, 0));
            }
            for target in targets {
                let enemy = state.warrior_mut(side.opponent(), target);
                enemy.add_status(StatusEffect::until_consumed(StatusKind::IntelDown, *amount));
                action.push_event(skill_event(&enemy.instance_id, *amount));
                action.push_log(format!("{} loses {} intel", enemy.name, amount));
            }
        }
        OpeningSkill::Demoralize { amount } => {
            action.push_log(format!("{} uses {}", caster.name, skill.label()));
            let targets = state.team(side.opponent()).living_indices();
            if targets.is_empty() {
                action.push_event(skill_event(&caster.instance_id, 0));
            }
            for target in targets {
                let enemy = state.warrior_mut(side.opponent(), target);
                let command = enemy.stats.command - amount;
                enemy.set_command(command);
                enemy.add_status(StatusEffect::until_consumed(StatusKind::CommandDown, *amount));
                action.push_event(skill_event(&enemy.instance_id, *amount));
                action.push_log(format!(
                    "{} loses {} command (max HP {})",
                    enemy.name, amount, enemy.max_hp
                ));
            }
        }
        OpeningSkill::BonusTactic { card_id } => {
            let tactic = catalog
                .tactic(card_id)
                .ok_or_else(|| BattleError::CatalogEntryMissing {
                    card_id: card_id.clone(),
                })?;
            let team = state.team_mut(side);
            if team.tactics.len() < config.tactic_capacity() {
                let instance_id = format!("{}-bonus-{}", caster.instance_id, team.tactics.len());
                team.tactics
                    .push(BattleTactic::new(instance_id, card_id.clone(), caster.level));
                action.push_event(skill_event(&caster.instance_id, 1));
                action.push_log(format!(
                    "{} issues {}: gains {} tactic",
                    caster.name,
                    skill.label(),
                    tactic.name
                ));
            } else {
                action.push_event(skill_event(&caster.instance_id, 0));
                action.push_log(format!(
                    "{} issues {}, but the tactic slots are full",
                    caster.name,
                    skill.label()
                ));
            }
        }
    }
    Ok(())
}

/// 被动技能：每回合攻击前重新评估，只把属性抬到下限，不跨回合叠加。
pub fn run_passives(
    catalog: &dyn Catalog,
    state: &mut BattleState,
    side: Side,
    actions: &mut Vec<BattleAction>,
) -> Result<(), BattleError> {
    for idx in 0..state.team(side).warriors.len() {
        if !state.team(side).warriors[idx].is_alive {
            continue;
        }
        let card = lookup_warrior(catalog, &state.team(side).warriors[idx].card_id)?;
        for skill in card.passives() {
            if !passive_applies(state, side, idx, skill) {
                continue;
            }
            let mut action = skill_action(state, ActionKind::PassiveSkill, side, idx);
            apply_passive(state, side, idx, skill, &mut action);
            state.record(action, actions);
        }
    }
    Ok(())
}

fn passive_applies(state: &BattleState, side: Side, idx: usize, skill: &PassiveSkill) -> bool {
    let team = state.team(side);
    let warrior = &team.warriors[idx];
    match skill {
        PassiveSkill::LaneMastery { lane, .. } | PassiveSkill::LongReach { lane } => {
            warrior.lane == *lane
        }
        PassiveSkill::SwornBond { partners, .. } => team.warriors.iter().any(|ally| {
            ally.is_alive && ally.instance_id != warrior.instance_id && partners.contains(&ally.card_id)
        }),
        PassiveSkill::FirstTurnGuard => state.turn == 1 && !warrior.has_status(StatusKind::Shield),
    }
}

fn apply_passive(
    state: &mut BattleState,
    side: Side,
    idx: usize,
    skill: &PassiveSkill,
    action: &mut BattleAction,
) {
    let warrior = state.warrior_mut(side, idx);
    match skill {
        PassiveSkill::LaneMastery { bonus, .. } | PassiveSkill::SwornBond { bonus, .. } => {
            let floor = warrior.base_stats.attack + bonus;
            let raised = (floor - warrior.stats.attack).max(0);
            warrior.stats.attack = warrior.stats.attack.max(floor);
            action.push_event(skill_event(&warrior.instance_id, raised));
            action.push_log(format!(
                "{}'s {} holds attack at {}",
                warrior.name,
                skill.label(),
                warrior.stats.attack
            ));
        }
        PassiveSkill::FirstTurnGuard => {
            warrior.add_status(StatusEffect::until_consumed(StatusKind::Shield, 1));
            action.push_event(skill_event(&warrior.instance_id, 1));
            action.push_log(format!(
                "{} takes up {}: the first blow will be blocked",
                warrior.name,
                skill.label()
            ));
        }
        PassiveSkill::LongReach { .. } => {
            warrior.refresh_status(StatusEffect::new(StatusKind::BackAttack, 1, 1));
            action.push_event(skill_event(&warrior.instance_id, 1));
            action.push_log(format!(
                "{}'s {} reaches the enemy rear",
                warrior.name,
                skill.label()
            ));
        }
    }
}

/// 主动技能：每个符合条件的单位每回合各掷一次。
pub fn run_actives(
    catalog: &dyn Catalog,
    state: &mut BattleState,
    side: Side,
    rng: &mut dyn RandomSource,
    actions: &mut Vec<BattleAction>,
) -> Result<(), BattleError> {
    for idx in 0..state.team(side).warriors.len() {
        if !state.team(side).warriors[idx].is_alive {
            continue;
        }
        let card = lookup_warrior(catalog, &state.team(side).warriors[idx].card_id)?;
        for (chance, skill) in card.actives() {
            if !state.team(side).warriors[idx].is_alive || !active_eligible(state, side, idx, skill) {
                continue;
            }
            if !rng.roll_percent(chance) {
                continue;
            }
            let mut action = skill_action(state, ActionKind::ActiveSkill, side, idx);
            apply_active(state, side, idx, skill, &mut action);
            state.record(action, actions);
        }
    }
    Ok(())
}

fn active_eligible(state: &BattleState, side: Side, idx: usize, skill: &ActiveSkill) -> bool {
    let warrior = &state.team(side).warriors[idx];
    let enemies = state.team(side.opponent());
    match skill {
        ActiveSkill::RallyCry { .. } | ActiveSkill::Benevolence { .. } => true,
        ActiveSkill::LaneStun { .. } => enemies
            .index_in_lane(warrior.lane)
            .map(|target| enemies.warriors[target].is_alive)
            .unwrap_or(false),
        ActiveSkill::LastStand { threshold_pct, .. } => {
            warrior.hp_ratio() * 100.0 <= *threshold_pct as f64
        }
        ActiveSkill::ArcaneBlast { .. } => enemies.has_living(),
    }
}

fn apply_active(
    state: &mut BattleState,
    side: Side,
    idx: usize,
    skill: &ActiveSkill,
    action: &mut BattleAction,
) {
    let caster = state.team(side).warriors[idx].clone();
    action.push_log(format!("{} triggers {}", caster.name, skill.label()));
    match skill {
        ActiveSkill::RallyCry { bonus, turns } => {
            for ally in state.team(side).living_indices() {
                let warrior = state.warrior_mut(side, ally);
                warrior.refresh_status(StatusEffect::new(StatusKind::AttackUp, *bonus, *turns));
                action.push_event(skill_event(&warrior.instance_id, *bonus));
            }
        }
        ActiveSkill::LaneStun { turns } => {
            let enemy_side = side.opponent();
            if let Some(target) = state.team(enemy_side).index_in_lane(caster.lane) {
                let enemy = state.warrior_mut(enemy_side, target);
                enemy.refresh_status(StatusEffect::new(StatusKind::Stun, 1, *turns));
                action.push_event(skill_event(&enemy.instance_id, *turns));
                action.push_log(format!("{} is stunned", enemy.name));
            }
        }
        ActiveSkill::LastStand { heal, .. } => {
            let amount = heal + level_growth(caster.level);
            state.heal_warrior(side, idx, amount, action);
            let warrior = state.warrior_mut(side, idx);
            warrior.refresh_status(StatusEffect::until_consumed(StatusKind::Shield, 1));
            action.push_event(skill_event(&warrior.instance_id, 1));
        }
        ActiveSkill::Benevolence { heal } => {
            let amount = heal + caster.effective_intel() / 4;
            for ally in state.team(side).living_indices() {
                state.heal_warrior(side, ally, amount, action);
            }
        }
        ActiveSkill::ArcaneBlast { power } => {
            let amount = (power + caster.effective_intel() / 3).max(1);
            let enemy_side = side.opponent();
            for target in state.team(enemy_side).living_indices() {
                state.damage_warrior(enemy_side, target, amount, action);
            }
        }
    }
}

/// 奥义：仅最高品级单位，第 N 回合起、生命不高于阈值时触发，每场一次。
pub fn run_ultimates(
    catalog: &dyn Catalog,
    config: &BattleConfig,
    state: &mut BattleState,
    side: Side,
    actions: &mut Vec<BattleAction>,
) -> Result<(), BattleError> {
    if state.turn < config.ultimate_min_turn {
        return Ok(());
    }
    for idx in 0..state.team(side).warriors.len() {
        let warrior = &state.team(side).warriors[idx];
        if !warrior.is_alive
            || warrior.has_status(StatusKind::UltimateUsed)
            || warrior.hp_ratio() > config.ultimate_hp_ratio
        {
            continue;
        }
        let card = lookup_warrior(catalog, &warrior.card_id)?;
        if card.grade != Grade::Legendary {
            continue;
        }
        let Some(ultimate) = card.ultimate() else {
            continue;
        };

        let mut action = skill_action(state, ActionKind::UltimateSkill, side, idx);
        apply_ultimate(state, side, idx, ultimate, &mut action);
        let turn = state.turn;
        let warrior = state.warrior_mut(side, idx);
        warrior.add_status(StatusEffect::until_consumed(StatusKind::UltimateUsed, 1));
        let instance_id = warrior.instance_id.clone();
        state.ultimate_triggered = Some(UltimateMarker {
            side,
            instance_id,
            turn,
        });
        state.record(action, actions);
    }
    Ok(())
}

fn apply_ultimate(
    state: &mut BattleState,
    side: Side,
    idx: usize,
    skill: &UltimateSkill,
    action: &mut BattleAction,
) {
    let caster = state.team(side).warriors[idx].clone();
    let enemy_side = side.opponent();
    action.push_event(skill_event(&caster.instance_id, 1));
    action.push_log(format!("{} unleashes {}!", caster.name, skill.label()));
    match skill {
        UltimateSkill::Cataclysm { power } => {
            let amount = power + caster.effective_attack() / 2;
            for target in state.team(enemy_side).living_indices() {
                state.damage_warrior(enemy_side, target, amount, action);
            }
        }
        UltimateSkill::Resurgence {
            attack_bonus,
            heal_pct,
        } => {
            for ally in state.team(side).living_indices() {
                let warrior = state.warrior_mut(side, ally);
                warrior.refresh_status(StatusEffect::new(StatusKind::AttackUp, *attack_bonus, 3));
                let amount = warrior.max_hp * *heal_pct as i32 / 100;
                action.push_event(skill_event(&warrior.instance_id, *attack_bonus));
                state.heal_warrior(side, ally, amount, action);
            }
        }
        UltimateSkill::Thunderlock { turns } => {
            for target in state.team(enemy_side).living_indices() {
                let enemy = state.warrior_mut(enemy_side, target);
                enemy.refresh_status(StatusEffect::new(StatusKind::Stun, 1, *turns));
                action.push_event(skill_event(&enemy.instance_id, *turns));
                action.push_log(format!("{} is stunned", enemy.name));
            }
        }
        UltimateSkill::SageStrike { multiplier_pct } => {
            if let Some(target) = state.team(enemy_side).lowest_hp_ratio() {
                let amount = caster.effective_intel() * *multiplier_pct as i32 / 100
                    + caster.effective_attack();
                state.damage_warrior(enemy_side, target, amount.max(1), action);
            }
        }
    }
}

/// 回合末的常驻维持效果。
pub fn run_upkeep(
    catalog: &dyn Catalog,
    state: &mut BattleState,
    side: Side,
    actions: &mut Vec<BattleAction>,
) -> Result<(), BattleError> {
    for idx in 0..state.team(side).warriors.len() {
        if !state.team(side).warriors[idx].is_alive {
            continue;
        }
        let card = lookup_warrior(catalog, &state.team(side).warriors[idx].card_id)?;
        for skill in card.upkeep() {
            let mut action = skill_action(state, ActionKind::PassiveSkill, side, idx);
            match skill {
                UpkeepSkill::Fortify => {
                    let warrior = state.warrior_mut(side, idx);
                    let stack = 1 + level_growth(warrior.level) / 5;
                    warrior.refresh_status(StatusEffect::new(StatusKind::DefenseStack, stack, 1));
                    action.push_event(skill_event(&warrior.instance_id, stack));
                    action.push_log(format!(
                        "{} fortifies: +{} defense until next turn ends",
                        warrior.name, stack
                    ));
                }
            }
            state.record(action, actions);
        }
    }
    Ok(())
}
