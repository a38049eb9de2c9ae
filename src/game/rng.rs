//! 注入式随机源：所有随机决策都经由 [`RandomSource`]，同一种子必然得到同一场战斗。

use rand::rngs::{SmallRng, StdRng};
use rand::{Rng, SeedableRng};

/// 单方法随机源，返回 `[0, 1)` 区间的浮点数。
pub trait RandomSource {
    fn next(&mut self) -> f64;

    /// 在 `[0, len)` 中均匀取一个下标，`len` 为 0 时返回 `None`。
    fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let idx = (self.next() * len as f64) as usize;
        Some(idx.min(len - 1))
    }

    /// 以百分比概率判定是否触发。
    fn roll_percent(&mut self, chance: u8) -> bool {
        self.next() * 100.0 < chance as f64
    }
}

/// 固定种子的随机源，供测试与回放使用。
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// 非确定性随机源，调用方未提供随机源时使用。
#[derive(Debug, Clone)]
pub struct EntropyRandom {
    rng: SmallRng,
}

impl EntropyRandom {
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }
}

impl Default for EntropyRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for EntropyRandom {
    fn next(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// 按给定序列循环出值的随机源，用于精确控制测试中的每一次抽取。
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    draws: Vec<f64>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(draws: Vec<f64>) -> Self {
        Self { draws, cursor: 0 }
    }

    /// 永远返回同一个值。
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for ScriptedRandom {
    fn next(&mut self) -> f64 {
        if self.draws.is_empty() {
            return 0.0;
        }
        let value = self.draws[self.cursor % self.draws.len()];
        self.cursor += 1;
        value.clamp(0.0, 0.999_999)
    }
}

/// 未传入随机源时退回到熵源。
pub(crate) fn with_source<T>(
    rng: Option<&mut dyn RandomSource>,
    body: impl FnOnce(&mut dyn RandomSource) -> T,
) -> T {
    match rng {
        Some(rng) => body(rng),
        None => {
            let mut fallback = EntropyRandom::new();
            body(&mut fallback)
        }
    }
}
