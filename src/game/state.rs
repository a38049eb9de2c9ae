use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::catalog::{Faction, Stats, WarriorCard};
use super::field::FieldEvent;

/// 卡牌目录中的标识。
pub type CardId = String;
/// 战斗内单位或战术实例的稳定标识。
pub type InstanceId = String;

/// "直到被消耗"类效果使用的剩余回合哨兵值，不参与回合衰减。
pub const UNTIL_CONSUMED: i32 = 999;

/// 等级硬上限，超出部分按上限计算成长。
pub const MAX_LEVEL: u32 = 100;

/// 等级带来的成长值：等级 1 为 0，超过 `MAX_LEVEL` 的部分不再计入。
pub fn level_growth(level: u32) -> i32 {
    level.clamp(1, MAX_LEVEL) as i32 - 1
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Lane {
    Front,
    Mid,
    Back,
}

impl Lane {
    /// 固定的攻击与索敌顺序。
    pub const ORDER: [Lane; 3] = [Lane::Front, Lane::Mid, Lane::Back];

    pub fn index(self) -> usize {
        match self {
            Lane::Front => 0,
            Lane::Mid => 1,
            Lane::Back => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Lane::Front => "front",
            Lane::Mid => "mid",
            Lane::Back => "back",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    /// 每个阶段都先结算玩家方。
    pub const ORDER: [Side; 2] = [Side::Player, Side::Enemy];

    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Side::Player => "Player",
            Side::Enemy => "Enemy",
        }
    }
}

impl FromStr for Side {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "player" | "ally" => Ok(Side::Player),
            "enemy" | "opponent" | "ai" => Ok(Side::Enemy),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Stun,
    AttackUp,
    DefenseUp,
    IntelDown,
    CommandDown,
    DefenseStack,
    Evasion,
    Taunt,
    TacticNullify,
    BackAttack,
    UltimateUsed,
    Shield,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusEffect {
    #[serde(rename = "type")]
    pub kind: StatusKind,
    pub value: i32,
    pub turns_left: i32,
}

impl StatusEffect {
    pub fn new(kind: StatusKind, value: i32, turns_left: i32) -> Self {
        Self {
            kind,
            value,
            turns_left,
        }
    }

    pub fn until_consumed(kind: StatusKind, value: i32) -> Self {
        Self::new(kind, value, UNTIL_CONSUMED)
    }

    pub fn is_sentinel(&self) -> bool {
        self.turns_left >= UNTIL_CONSUMED
    }
}

/// 战场上的一名武将。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BattleWarrior {
    pub instance_id: InstanceId,
    pub card_id: CardId,
    pub name: String,
    pub faction: Faction,
    pub level: u32,
    pub lane: Lane,
    pub current_hp: i32,
    pub max_hp: i32,
    pub stats: Stats,
    pub base_stats: Stats,
    pub is_alive: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub status_effects: Vec<StatusEffect>,
}

impl BattleWarrior {
    /// 按等级成长与场地修正构建单位：攻/统/智 +(等级-1)，防 +(等级-1)/2。
    pub fn from_card(
        instance_id: impl Into<InstanceId>,
        card: &WarriorCard,
        level: u32,
        lane: Lane,
        field_delta: &Stats,
    ) -> Self {
        let level = level.clamp(1, MAX_LEVEL);
        let growth = level_growth(level);
        let mut stats = card.base;
        stats.attack += growth;
        stats.command += growth;
        stats.intel += growth;
        stats.defense += growth / 2;
        stats.apply(field_delta);
        stats.clamp_floor();

        let max_hp = stats.command * 3;
        Self {
            instance_id: instance_id.into(),
            card_id: card.id.clone(),
            name: card.name.clone(),
            faction: card.faction,
            level,
            lane,
            current_hp: max_hp,
            max_hp,
            stats,
            base_stats: stats,
            is_alive: max_hp > 0,
            status_effects: Vec::new(),
        }
    }

    pub fn has_status(&self, kind: StatusKind) -> bool {
        self.status_effects.iter().any(|effect| effect.kind == kind)
    }

    pub fn status_total(&self, kind: StatusKind) -> i32 {
        self.status_effects
            .iter()
            .filter(|effect| effect.kind == kind)
            .map(|effect| effect.value)
            .sum()
    }

    pub fn add_status(&mut self, effect: StatusEffect) {
        self.status_effects.push(effect);
    }

    /// 同类效果只保留一份，取较长的持续时间与较大的数值。
    pub fn refresh_status(&mut self, effect: StatusEffect) {
        match self
            .status_effects
            .iter_mut()
            .find(|existing| existing.kind == effect.kind)
        {
            Some(existing) => {
                existing.value = existing.value.max(effect.value);
                existing.turns_left = existing.turns_left.max(effect.turns_left);
            }
            None => self.status_effects.push(effect),
        }
    }

    pub fn take_status(&mut self, kind: StatusKind) -> Option<StatusEffect> {
        let pos = self
            .status_effects
            .iter()
            .position(|effect| effect.kind == kind)?;
        Some(self.status_effects.remove(pos))
    }

    pub fn clear_status(&mut self, kind: StatusKind) {
        self.status_effects.retain(|effect| effect.kind != kind);
    }

    pub fn effective_attack(&self) -> i32 {
        (self.stats.attack + self.status_total(StatusKind::AttackUp)).max(0)
    }

    pub fn effective_defense(&self) -> i32 {
        (self.stats.defense
            + self.status_total(StatusKind::DefenseUp)
            + self.status_total(StatusKind::DefenseStack))
        .max(0)
    }

    pub fn effective_intel(&self) -> i32 {
        (self.stats.intel - self.status_total(StatusKind::IntelDown)).max(0)
    }

    pub fn hp_ratio(&self) -> f64 {
        if self.max_hp <= 0 {
            return 0.0;
        }
        self.current_hp as f64 / self.max_hp as f64
    }

    /// 扣减生命并返回实际扣除量，生命下限为 0。
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        if !self.is_alive || amount <= 0 {
            return 0;
        }
        let dealt = amount.min(self.current_hp);
        self.current_hp -= dealt;
        self.is_alive = self.current_hp > 0;
        dealt
    }

    /// 回复生命并返回实际回复量，不超过上限，不复活阵亡单位。
    pub fn heal(&mut self, amount: i32) -> i32 {
        if !self.is_alive || amount <= 0 {
            return 0;
        }
        let restored = amount.min(self.max_hp - self.current_hp).max(0);
        self.current_hp += restored;
        restored
    }

    /// 统率变化时同步生命上限（统率 × 3），当前生命随之截断。
    pub fn set_command(&mut self, command: i32) {
        self.stats.command = command.max(1);
        self.max_hp = self.stats.command * 3;
        self.current_hp = self.current_hp.min(self.max_hp);
        self.is_alive = self.current_hp > 0;
    }

    /// 剩余回合减一并清除到期效果，哨兵效果不衰减。
    pub fn decay_statuses(&mut self) {
        for effect in &mut self.status_effects {
            if !effect.is_sentinel() {
                effect.turns_left -= 1;
            }
        }
        self.status_effects.retain(|effect| effect.turns_left > 0);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BattleTactic {
    pub instance_id: InstanceId,
    pub card_id: CardId,
    pub level: u32,
    #[serde(default)]
    pub used: bool,
    /// 反击架势已布置，等待对手出牌。
    #[serde(default)]
    pub armed: bool,
}

impl BattleTactic {
    pub fn new(instance_id: impl Into<InstanceId>, card_id: impl Into<CardId>, level: u32) -> Self {
        Self {
            instance_id: instance_id.into(),
            card_id: card_id.into(),
            level: level.clamp(1, MAX_LEVEL),
            used: false,
            armed: false,
        }
    }

    pub fn is_available(&self) -> bool {
        !self.used && !self.armed
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamState {
    #[serde(default)]
    pub warriors: Vec<BattleWarrior>,
    #[serde(default)]
    pub tactics: Vec<BattleTactic>,
    #[serde(default)]
    pub selected_tactic: Option<usize>,
}

impl TeamState {
    pub fn new(warriors: Vec<BattleWarrior>, tactics: Vec<BattleTactic>) -> Self {
        let mut warriors = warriors;
        warriors.sort_by_key(|warrior| warrior.lane);
        Self {
            warriors,
            tactics,
            selected_tactic: None,
        }
    }

    pub fn has_living(&self) -> bool {
        self.warriors.iter().any(|warrior| warrior.is_alive)
    }

    pub fn living_indices(&self) -> Vec<usize> {
        self.warriors
            .iter()
            .enumerate()
            .filter(|(_, warrior)| warrior.is_alive)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// 按 前→中→后 顺序的第一个存活单位。
    pub fn first_living(&self) -> Option<usize> {
        Lane::ORDER
            .iter()
            .find_map(|lane| self.index_in_lane(*lane).filter(|idx| self.warriors[*idx].is_alive))
    }

    pub fn last_living(&self) -> Option<usize> {
        Lane::ORDER
            .iter()
            .rev()
            .find_map(|lane| self.index_in_lane(*lane).filter(|idx| self.warriors[*idx].is_alive))
    }

    pub fn index_in_lane(&self, lane: Lane) -> Option<usize> {
        self.warriors.iter().position(|warrior| warrior.lane == lane)
    }

    pub fn index_of(&self, instance_id: &str) -> Option<usize> {
        self.warriors
            .iter()
            .position(|warrior| warrior.instance_id == instance_id)
    }

    pub fn total_hp(&self) -> i32 {
        self.warriors.iter().map(|warrior| warrior.current_hp).sum()
    }

    pub fn total_max_hp(&self) -> i32 {
        self.warriors.iter().map(|warrior| warrior.max_hp).sum()
    }

    pub fn hp_ratio(&self) -> f64 {
        let max = self.total_max_hp();
        if max <= 0 {
            return 0.0;
        }
        self.total_hp() as f64 / max as f64
    }

    pub fn lowest_hp_ratio(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for idx in self.living_indices() {
            let ratio = self.warriors[idx].hp_ratio();
            if best.map(|(_, current)| ratio < current).unwrap_or(true) {
                best = Some((idx, ratio));
            }
        }
        best.map(|(idx, _)| idx)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BattlePhase {
    Tactic,
    Result,
}

impl Default for BattlePhase {
    fn default() -> Self {
        BattlePhase::Tactic
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BattleResult {
    Win,
    Lose,
    Draw,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SynergyTier {
    Minor,
    Major,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActiveSynergy {
    pub side: Side,
    pub faction: Faction,
    pub tier: SynergyTier,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UltimateMarker {
    pub side: Side,
    pub instance_id: InstanceId,
    pub turn: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CombatEventKind {
    Damage,
    Heal,
    Miss,
    Death,
    Skill,
}

/// 表现层消费的最小事件单元。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CombatEvent {
    #[serde(rename = "type")]
    pub kind: CombatEventKind,
    pub target: InstanceId,
    pub value: i32,
}

impl CombatEvent {
    pub fn new(kind: CombatEventKind, target: impl Into<InstanceId>, value: i32) -> Self {
        Self {
            kind,
            target: target.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    TurnStart,
    TacticUse,
    BattleStartSkill,
    PassiveSkill,
    ActiveSkill,
    UltimateSkill,
    Attack,
    StunSkip,
    ForcedSkip,
    TurnEnd,
}

/// 可回放的一步，自带事件与日志。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BattleAction {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    pub turn: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<InstanceId>,
    #[serde(default)]
    pub events: Vec<CombatEvent>,
    #[serde(default)]
    pub logs: Vec<String>,
}

impl BattleAction {
    pub fn new(kind: ActionKind, turn: u32) -> Self {
        Self {
            kind,
            turn,
            side: None,
            actor: None,
            events: Vec::new(),
            logs: Vec::new(),
        }
    }

    pub fn by(mut self, side: Side, actor: impl Into<InstanceId>) -> Self {
        self.side = Some(side);
        self.actor = Some(actor.into());
        self
    }

    pub fn for_side(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }

    pub fn push_event(&mut self, event: CombatEvent) {
        self.events.push(event);
    }

    pub fn push_log(&mut self, line: impl Into<String>) {
        self.logs.push(line.into());
    }

    pub fn count(&self, kind: CombatEventKind) -> usize {
        self.events.iter().filter(|event| event.kind == kind).count()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum IntegrityError {
    HpOutOfBounds {
        instance_id: InstanceId,
        current_hp: i32,
        max_hp: i32,
    },
    AliveFlagMismatch {
        instance_id: InstanceId,
    },
    MaxHpMismatch {
        instance_id: InstanceId,
        max_hp: i32,
        command: i32,
    },
    DuplicateLane {
        side: Side,
        lane: Lane,
    },
    TooManyWarriors {
        side: Side,
        count: usize,
    },
}

/// 一场战斗的完整快照，每一步结算都返回新的副本。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BattleState {
    pub turn: u32,
    pub max_turns: u32,
    #[serde(default)]
    pub stalemate_turns: u32,
    #[serde(default)]
    pub phase: BattlePhase,
    pub player: TeamState,
    pub enemy: TeamState,
    pub field_event: FieldEvent,
    #[serde(default)]
    pub log: Vec<String>,
    #[serde(default)]
    pub result: Option<BattleResult>,
    #[serde(default)]
    pub active_synergies: Vec<ActiveSynergy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ultimate_triggered: Option<UltimateMarker>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub opening_actions: Vec<BattleAction>,
    /// 进入战术阶段时双方的生命总和，僵持判定以此为基准，战术造成的伤害也算作变化。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tactic_phase_hp: Option<(i32, i32)>,
}

impl BattleState {
    pub fn new(player: TeamState, enemy: TeamState, field_event: FieldEvent, max_turns: u32) -> Self {
        Self {
            turn: 1,
            max_turns,
            stalemate_turns: 0,
            phase: BattlePhase::Tactic,
            player,
            enemy,
            field_event,
            log: Vec::new(),
            result: None,
            active_synergies: Vec::new(),
            ultimate_triggered: None,
            opening_actions: Vec::new(),
            tactic_phase_hp: None,
        }
        .with_tactic_phase_marked()
    }

    fn with_tactic_phase_marked(mut self) -> Self {
        self.mark_tactic_phase();
        self
    }

    /// (玩家, 敌方) 当前生命总和。
    pub fn hp_totals(&self) -> (i32, i32) {
        (self.player.total_hp(), self.enemy.total_hp())
    }

    pub fn mark_tactic_phase(&mut self) {
        self.tactic_phase_hp = Some(self.hp_totals());
    }

    pub fn team(&self, side: Side) -> &TeamState {
        match side {
            Side::Player => &self.player,
            Side::Enemy => &self.enemy,
        }
    }

    pub fn team_mut(&mut self, side: Side) -> &mut TeamState {
        match side {
            Side::Player => &mut self.player,
            Side::Enemy => &mut self.enemy,
        }
    }

    pub fn warrior_mut(&mut self, side: Side, idx: usize) -> &mut BattleWarrior {
        &mut self.team_mut(side).warriors[idx]
    }

    pub fn is_finished(&self) -> bool {
        self.result.is_some()
    }

    pub fn push_log(&mut self, line: impl Into<String>) {
        self.log.push(line.into());
    }

    /// 对单位造成伤害，把伤害与阵亡事件写入动作。
    pub fn damage_warrior(
        &mut self,
        side: Side,
        idx: usize,
        amount: i32,
        action: &mut BattleAction,
    ) -> i32 {
        let warrior = self.warrior_mut(side, idx);
        if !warrior.is_alive {
            return 0;
        }
        let dealt = warrior.take_damage(amount);
        action.push_event(CombatEvent::new(
            CombatEventKind::Damage,
            warrior.instance_id.clone(),
            dealt,
        ));
        if !warrior.is_alive {
            action.push_event(CombatEvent::new(
                CombatEventKind::Death,
                warrior.instance_id.clone(),
                0,
            ));
            action.push_log(format!("{} has fallen", warrior.name));
        }
        dealt
    }

    pub fn heal_warrior(
        &mut self,
        side: Side,
        idx: usize,
        amount: i32,
        action: &mut BattleAction,
    ) -> i32 {
        let warrior = self.warrior_mut(side, idx);
        if !warrior.is_alive {
            return 0;
        }
        let restored = warrior.heal(amount);
        action.push_event(CombatEvent::new(
            CombatEventKind::Heal,
            warrior.instance_id.clone(),
            restored,
        ));
        restored
    }

    /// 把动作的日志并入战斗日志，并追加到动作序列。
    pub fn record(&mut self, action: BattleAction, actions: &mut Vec<BattleAction>) {
        self.log.extend(action.logs.iter().cloned());
        actions.push(action);
    }

    pub fn integrity_check(&self) -> Result<(), IntegrityError> {
        for side in Side::ORDER {
            let team = self.team(side);
            if team.warriors.len() > Lane::ORDER.len() {
                return Err(IntegrityError::TooManyWarriors {
                    side,
                    count: team.warriors.len(),
                });
            }
            let mut lanes = Vec::new();
            for warrior in &team.warriors {
                if lanes.contains(&warrior.lane) {
                    return Err(IntegrityError::DuplicateLane {
                        side,
                        lane: warrior.lane,
                    });
                }
                lanes.push(warrior.lane);

                if warrior.current_hp < 0 || warrior.current_hp > warrior.max_hp {
                    return Err(IntegrityError::HpOutOfBounds {
                        instance_id: warrior.instance_id.clone(),
                        current_hp: warrior.current_hp,
                        max_hp: warrior.max_hp,
                    });
                }
                if warrior.is_alive != (warrior.current_hp > 0) {
                    return Err(IntegrityError::AliveFlagMismatch {
                        instance_id: warrior.instance_id.clone(),
                    });
                }
                if warrior.max_hp != warrior.stats.command * 3 {
                    return Err(IntegrityError::MaxHpMismatch {
                        instance_id: warrior.instance_id.clone(),
                        max_hp: warrior.max_hp,
                        command: warrior.stats.command,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::catalog::{Grade, Skill};

    fn plain_card(command: i32) -> WarriorCard {
        WarriorCard {
            id: "test_guard".into(),
            name: "Test Guard".into(),
            faction: Faction::Qun,
            grade: Grade::Common,
            base: Stats::new(5, command, 3, 2),
            skills: Vec::<Skill>::new(),
        }
    }

    #[test]
    fn level_growth_feeds_max_hp() {
        let card = plain_card(10);
        let rookie = BattleWarrior::from_card("w1", &card, 1, Lane::Front, &Stats::default());
        assert_eq!(rookie.max_hp, 30);

        let veteran = BattleWarrior::from_card("w2", &card, 3, Lane::Front, &Stats::default());
        assert_eq!(veteran.stats.command, 12);
        assert_eq!(veteran.stats.attack, 7);
        assert_eq!(veteran.stats.defense, 3);
        assert_eq!(veteran.max_hp, veteran.stats.command * 3);
        assert_eq!(veteran.current_hp, veteran.max_hp);
    }

    #[test]
    fn damage_and_heal_respect_bounds() {
        let card = plain_card(4);
        let mut warrior = BattleWarrior::from_card("w1", &card, 1, Lane::Mid, &Stats::default());
        assert_eq!(warrior.take_damage(5), 5);
        assert_eq!(warrior.heal(100), 5);
        assert_eq!(warrior.current_hp, warrior.max_hp);
        assert_eq!(warrior.take_damage(1000), 12);
        assert_eq!(warrior.current_hp, 0);
        assert!(!warrior.is_alive);
        assert_eq!(warrior.heal(5), 0, "dead units are not revived by heals");
    }

    #[test]
    fn finite_status_expires_after_its_turns() {
        let card = plain_card(4);
        let mut warrior = BattleWarrior::from_card("w1", &card, 1, Lane::Mid, &Stats::default());
        warrior.add_status(StatusEffect::new(StatusKind::Stun, 1, 2));
        warrior.add_status(StatusEffect::until_consumed(StatusKind::Shield, 1));

        warrior.decay_statuses();
        assert!(warrior.has_status(StatusKind::Stun));
        warrior.decay_statuses();
        assert!(!warrior.has_status(StatusKind::Stun));
        assert!(warrior.has_status(StatusKind::Shield), "sentinel effects never decay");
    }

    #[test]
    fn command_change_resyncs_max_hp() {
        let card = plain_card(10);
        let mut warrior = BattleWarrior::from_card("w1", &card, 1, Lane::Back, &Stats::default());
        warrior.set_command(6);
        assert_eq!(warrior.max_hp, 18);
        assert_eq!(warrior.current_hp, 18);
    }

    #[test]
    fn integrity_check_flags_duplicate_lanes() {
        let card = plain_card(10);
        let a = BattleWarrior::from_card("a", &card, 1, Lane::Front, &Stats::default());
        let b = BattleWarrior::from_card("b", &card, 1, Lane::Front, &Stats::default());
        let state = BattleState::new(
            TeamState::new(vec![a, b], Vec::new()),
            TeamState::default(),
            crate::game::field::clear_skies(),
            30,
        );
        assert!(matches!(
            state.integrity_check(),
            Err(IntegrityError::DuplicateLane { side: Side::Player, lane: Lane::Front })
        ));
    }
}
