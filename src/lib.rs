pub mod ai;
pub mod game;

use gloo_timers::future::TimeoutFuture;
use serde::Serialize;
use serde_wasm_bindgen::{from_value, to_value};
use std::str::FromStr;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::js_sys::Promise;

pub use ai::{decide_tactic, run_to_completion, BattleReplay, ChoiceReason, TacticChoice};
pub use game::{
    standard_catalog, BattleAction, BattleConfig, BattleEngine, BattleError, BattleResult,
    BattleState, Catalog, DeckSlot, EntropyRandom, OwnedCard, PlayerDeck, RandomSource,
    SeededRandom, Side, TacticResolution, TurnResolution,
};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn start() {
    set_panic_hook();
    let _ = console_log::init_with_level(log::Level::Debug);
}

fn to_js_error(error: BattleError) -> JsValue {
    to_value(&error).unwrap_or_else(|_| JsValue::from_str(&error.to_string()))
}

fn serde_to_js_error<E: std::fmt::Display>(error: E) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn parse_side(value: &str) -> Result<Side, JsValue> {
    Side::from_str(value).map_err(|_| JsValue::from_str(&format!("unknown side `{value}`")))
}

fn parse_config(config_json: Option<&str>) -> Result<BattleConfig, JsValue> {
    match config_json {
        Some(json) => BattleConfig::from_json(json).map_err(|error| {
            to_js_error(BattleError::InvalidConfig {
                reason: error.to_string(),
            })
        }),
        None => Ok(BattleConfig::default()),
    }
}

fn seeded(seed: Option<u32>) -> Option<SeededRandom> {
    seed.map(|seed| SeededRandom::new(u64::from(seed)))
}

fn as_source(rng: &mut Option<SeededRandom>) -> Option<&mut dyn RandomSource> {
    rng.as_mut().map(|rng| rng as &mut dyn RandomSource)
}

#[derive(Serialize)]
struct AiThought {
    #[serde(skip_serializing_if = "Option::is_none")]
    choice: Option<TacticChoice>,
    delay_ms: u32,
}

/// 一场战斗的会话：持有当前快照、配置和本场独占的随机源。
#[wasm_bindgen]
pub struct BattleSession {
    state: BattleState,
    config: BattleConfig,
    rng: Box<dyn RandomSource>,
}

impl BattleSession {
    fn engine(&self) -> BattleEngine<'static> {
        BattleEngine::new(standard_catalog(), self.config.clone())
    }
}

#[wasm_bindgen]
impl BattleSession {
    /// `seed` 为空时使用非确定性随机源。
    #[wasm_bindgen(constructor)]
    pub fn new(
        deck_json: &str,
        inventory_json: &str,
        win_count: u32,
        seed: Option<u32>,
        config_json: Option<String>,
    ) -> Result<BattleSession, JsValue> {
        let deck: PlayerDeck = serde_json::from_str(deck_json).map_err(serde_to_js_error)?;
        let inventory: Vec<OwnedCard> =
            serde_json::from_str(inventory_json).map_err(serde_to_js_error)?;
        let config = parse_config(config_json.as_deref())?;

        let mut rng: Box<dyn RandomSource> = match seed {
            Some(seed) => Box::new(SeededRandom::new(u64::from(seed))),
            None => Box::new(EntropyRandom::new()),
        };
        let engine = BattleEngine::new(standard_catalog(), config.clone());
        let state = engine
            .initialize(&deck, &inventory, win_count, Some(rng.as_mut()))
            .map_err(to_js_error)?;
        Ok(BattleSession { state, config, rng })
    }

    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state).map_err(serde_to_js_error)
    }

    pub fn set_state_json(&mut self, json: &str) -> Result<(), JsValue> {
        let state: BattleState = serde_json::from_str(json).map_err(serde_to_js_error)?;
        state
            .integrity_check()
            .map_err(|error| to_js_error(BattleError::IntegrityViolation { error }))?;
        self.state = state;
        Ok(())
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn apply_tactic_json(&mut self, side: &str, index: u32) -> Result<String, JsValue> {
        let side = parse_side(side)?;
        let resolution = self
            .engine()
            .apply_tactic(&self.state, side, index as usize)
            .map_err(to_js_error)?;
        self.state = resolution.state.clone();
        serde_json::to_string(&resolution).map_err(serde_to_js_error)
    }

    pub fn select_ai_tactic(&self) -> Option<u32> {
        self.engine()
            .select_ai_tactic(&self.state)
            .map(|index| index as u32)
    }

    /// 让敌方按启发式出一张战术，没有可用战术时返回 `null`。
    pub fn play_ai_tactic_json(&mut self) -> Result<Option<String>, JsValue> {
        let engine = self.engine();
        let Some(index) = engine.select_ai_tactic(&self.state) else {
            return Ok(None);
        };
        let resolution = engine
            .apply_tactic(&self.state, Side::Enemy, index)
            .map_err(to_js_error)?;
        self.state = resolution.state.clone();
        serde_json::to_string(&resolution)
            .map(Some)
            .map_err(serde_to_js_error)
    }

    pub fn resolve_turn_json(&mut self) -> Result<String, JsValue> {
        let engine = self.engine();
        let resolution = engine
            .resolve_turn(&self.state, Some(self.rng.as_mut()))
            .map_err(to_js_error)?;
        self.state = resolution.state.clone();
        serde_json::to_string(&resolution).map_err(serde_to_js_error)
    }

    /// 延迟 `delay_ms` 后给出敌方的战术选择，供前端展示"思考中"。
    pub fn think_ai(&self, delay_ms: Option<u32>) -> Promise {
        let state = self.state.clone();
        let config = self.config.clone();
        let delay = delay_ms.unwrap_or(0);

        future_to_promise(async move {
            if delay > 0 {
                TimeoutFuture::new(delay).await;
            }
            let choice = decide_tactic(standard_catalog(), &config, &state, Side::Enemy);
            let thought = AiThought {
                choice,
                delay_ms: delay,
            };
            let json = serde_json::to_string(&thought).map_err(serde_to_js_error)?;
            Ok(JsValue::from_str(&json))
        })
    }
}

/// 内置卡牌目录，供前端渲染卡面。
#[wasm_bindgen(js_name = "standardCatalog")]
pub fn standard_catalog_js() -> Result<JsValue, JsValue> {
    to_value(standard_catalog()).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "initBattle")]
pub fn init_battle(
    deck: JsValue,
    inventory: JsValue,
    win_count: u32,
    seed: Option<u32>,
) -> Result<JsValue, JsValue> {
    let deck: PlayerDeck = from_value(deck).map_err(JsValue::from)?;
    let inventory: Vec<OwnedCard> = from_value(inventory).map_err(JsValue::from)?;
    let mut rng = seeded(seed);
    let state = BattleEngine::standard()
        .initialize(&deck, &inventory, win_count, as_source(&mut rng))
        .map_err(to_js_error)?;
    to_value(&state).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "applyTactic")]
pub fn apply_tactic(state: JsValue, side: &str, index: u32) -> Result<JsValue, JsValue> {
    let state: BattleState = from_value(state).map_err(JsValue::from)?;
    let side = parse_side(side)?;
    let resolution = BattleEngine::standard()
        .apply_tactic(&state, side, index as usize)
        .map_err(to_js_error)?;
    to_value(&resolution).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "selectAiTactic")]
pub fn select_ai_tactic(state: JsValue) -> Result<JsValue, JsValue> {
    let state: BattleState = from_value(state).map_err(JsValue::from)?;
    let index = BattleEngine::standard().select_ai_tactic(&state);
    to_value(&index).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "resolveTurn")]
pub fn resolve_turn(state: JsValue, seed: Option<u32>) -> Result<JsValue, JsValue> {
    let state: BattleState = from_value(state).map_err(JsValue::from)?;
    let mut rng = seeded(seed);
    let resolution = BattleEngine::standard()
        .resolve_turn(&state, as_source(&mut rng))
        .map_err(to_js_error)?;
    to_value(&resolution).map_err(JsValue::from)
}

/// 双方都由 AI 出牌，一直打到结束，返回完整回放。
#[wasm_bindgen(js_name = "autoBattle")]
pub fn auto_battle(state: JsValue, seed: u32) -> Result<JsValue, JsValue> {
    let state: BattleState = from_value(state).map_err(JsValue::from)?;
    let engine = BattleEngine::standard();
    let mut rng = SeededRandom::new(u64::from(seed));
    let mut policy = |current: &BattleState| ai::mirror_policy(&engine, current);
    let replay = run_to_completion(&engine, &state, &mut rng, Some(&mut policy))
        .map_err(to_js_error)?;
    to_value(&replay).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "validateState")]
pub fn validate_state(state: JsValue) -> Result<(), JsValue> {
    let state: BattleState = from_value(state).map_err(JsValue::from)?;
    state
        .integrity_check()
        .map_err(|error| to_js_error(BattleError::IntegrityViolation { error }))?;
    Ok(())
}

#[cfg(feature = "console_error_panic_hook")]
fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

#[cfg(not(feature = "console_error_panic_hook"))]
fn set_panic_hook() {}
