use serde::{Deserialize, Serialize};

use super::catalog::Stats;
use super::state::MAX_LEVEL;

const DEFAULT_MAX_TURNS: u32 = 30;
const DEFAULT_STALEMATE_LIMIT: u32 = 8;
const DEFAULT_MAX_TACTICS: usize = 2;
const DEFAULT_MAX_BONUS_TACTICS: usize = 1;
const DEFAULT_PENALTY_UNTIL_WINS: u32 = 3;
const DEFAULT_GRADE_BOOST_AFTER_WINS: u32 = 5;
const DEFAULT_LEVEL_WINDOW: u32 = 1;
const DEFAULT_ULTIMATE_MIN_TURN: u32 = 2;
const DEFAULT_ULTIMATE_HP_RATIO: f64 = 0.5;
const DEFAULT_AI_DEFENSIVE_HP_RATIO: f64 = 0.5;

/// 战斗引擎的全部可调上限与阈值。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BattleConfig {
    pub max_turns: u32,
    /// 连续多少回合双方生命总和都不变即判平局。
    pub stalemate_limit: u32,
    pub max_tactics: usize,
    pub max_bonus_tactics: usize,
    /// 玩家胜场低于该值时，敌方整体削弱。
    pub enemy_penalty_until_wins: u32,
    pub enemy_penalty: Stats,
    /// 玩家胜场达到该值后，敌方品级上限提高一档。
    pub grade_boost_after_wins: u32,
    pub level_window: u32,
    /// 卡组中卡牌等级的上限，敌方等级同样受限。
    pub max_level: u32,
    pub ultimate_min_turn: u32,
    pub ultimate_hp_ratio: f64,
    pub ai_defensive_hp_ratio: f64,
}

impl BattleConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns.max(1);
        self
    }

    pub fn with_stalemate_limit(mut self, limit: u32) -> Self {
        self.stalemate_limit = limit.max(1);
        self
    }

    pub fn tactic_capacity(&self) -> usize {
        self.max_tactics + self.max_bonus_tactics
    }

    pub fn level_cap(&self) -> u32 {
        self.max_level.clamp(1, MAX_LEVEL)
    }

    pub fn penalty_applies(&self, win_count: u32) -> bool {
        win_count < self.enemy_penalty_until_wins
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            max_turns: DEFAULT_MAX_TURNS,
            stalemate_limit: DEFAULT_STALEMATE_LIMIT,
            max_tactics: DEFAULT_MAX_TACTICS,
            max_bonus_tactics: DEFAULT_MAX_BONUS_TACTICS,
            enemy_penalty_until_wins: DEFAULT_PENALTY_UNTIL_WINS,
            enemy_penalty: Stats::new(-2, 0, -1, -1),
            grade_boost_after_wins: DEFAULT_GRADE_BOOST_AFTER_WINS,
            level_window: DEFAULT_LEVEL_WINDOW,
            max_level: MAX_LEVEL,
            ultimate_min_turn: DEFAULT_ULTIMATE_MIN_TURN,
            ultimate_hp_ratio: DEFAULT_ULTIMATE_HP_RATIO,
            ai_defensive_hp_ratio: DEFAULT_AI_DEFENSIVE_HP_RATIO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = BattleConfig::from_json(r#"{ "max_turns": 12 }"#).expect("config should parse");
        assert_eq!(config.max_turns, 12);
        assert_eq!(config.stalemate_limit, DEFAULT_STALEMATE_LIMIT);
        assert_eq!(config.tactic_capacity(), 3);
    }

    #[test]
    fn penalty_lifts_after_threshold() {
        let config = BattleConfig::default();
        assert!(config.penalty_applies(0));
        assert!(!config.penalty_applies(3));
    }

    #[test]
    fn level_cap_never_exceeds_hard_limit() {
        let config = BattleConfig::from_json(r#"{ "max_level": 4000000000 }"#)
            .expect("config should parse");
        assert_eq!(config.level_cap(), MAX_LEVEL);
        let config = BattleConfig::from_json(r#"{ "max_level": 0 }"#).expect("config should parse");
        assert_eq!(config.level_cap(), 1);
    }
}
