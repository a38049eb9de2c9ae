//! 敌方 AI：阵容生成、战术选择与自动对局。

pub mod autoplay;
pub mod opponent;

pub use autoplay::{mirror_policy, run_to_completion, BattleReplay, PlayerPolicy};
pub use opponent::{build_enemy_roster, decide_tactic, select_tactic, ChoiceReason, TacticChoice};
