use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::KmResult;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub timing: TimingThresholds,
    #[command(flatten)]
    pub comfort: ComfortWeights,
    #[command(flatten)]
    pub optimizer: OptimizerParams,
    #[command(flatten)]
    pub simulator: SimulatorParams,
    #[command(flatten)]
    pub patterns: PatternParams,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingThresholds {
    /// Expected inter-key delay; also the synthetic delay for cached bigrams.
    #[arg(long, default_value_t = 150.0)]
    pub normal_ms: f64,

    /// Deltas above this (and below pause_ms) count as hesitations.
    #[arg(long, default_value_t = 500.0)]
    pub hesitation_ms: f64,

    /// Deltas at or above this are breaks, excluded from latency stats.
    #[arg(long, default_value_t = 2000.0)]
    pub pause_ms: f64,

    /// Symbols of context captured on each side of a hesitation.
    #[arg(long, default_value_t = 5)]
    pub context_window: usize,
}

impl Default for TimingThresholds {
    fn default() -> Self {
        Self {
            normal_ms: 150.0,
            hesitation_ms: 500.0,
            pause_ms: 2000.0,
            context_window: 5,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComfortWeights {
    #[arg(long, default_value_t = 50.0)]
    pub comfort_base: f64,

    #[arg(long, default_value_t = 40.0)]
    pub penalty_same_finger: f64,

    #[arg(long, default_value_t = 20.0)]
    pub bonus_alternation: f64,

    // Applied per row of vertical travel.
    #[arg(long, default_value_t = 10.0)]
    pub penalty_row_jump: f64,

    #[arg(long, default_value_t = 10.0)]
    pub bonus_fast: f64,

    #[arg(long, default_value_t = 10.0)]
    pub penalty_slow: f64,

    /// Recorded transitions averaging under this earn the fast bonus.
    #[arg(long, default_value_t = 150.0)]
    pub fast_ms: f64,

    /// Recorded transitions averaging over this take the slow penalty.
    #[arg(long, default_value_t = 300.0)]
    pub slow_ms: f64,

    /// Comfort below this marks a transition as awkward.
    #[arg(long, default_value_t = 30.0)]
    pub awkward_ceiling: f64,
}

impl Default for ComfortWeights {
    fn default() -> Self {
        Self {
            comfort_base: 50.0,
            penalty_same_finger: 40.0,
            bonus_alternation: 20.0,
            penalty_row_jump: 10.0,
            bonus_fast: 10.0,
            penalty_slow: 10.0,
            fast_ms: 150.0,
            slow_ms: 300.0,
            awkward_ceiling: 30.0,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerParams {
    /// Combined pair frequency must exceed this for a paired placement.
    #[arg(long, default_value_t = 50)]
    pub pair_threshold: u64,

    /// How many unpaired symbols get individual slots.
    #[arg(long, default_value_t = 30)]
    pub individual_limit: usize,
}

impl Default for OptimizerParams {
    fn default() -> Self {
        Self {
            pair_threshold: 50,
            individual_limit: 30,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorParams {
    /// Cost charged per layer switch.
    #[arg(long, default_value_t = 150.0)]
    pub layer_overhead_ms: f64,

    /// Target layer switches per 100 keystrokes.
    #[arg(long, default_value_t = 5.0)]
    pub switch_target: f64,

    /// Per-symbol repetition cap when expanding a frequency table to text.
    #[arg(long, default_value_t = 100)]
    pub sample_cap: u64,
}

impl Default for SimulatorParams {
    fn default() -> Self {
        Self {
            layer_overhead_ms: 150.0,
            switch_target: 5.0,
            sample_cap: 100,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternParams {
    #[arg(long, default_value_t = 3)]
    pub min_sequence_len: usize,

    #[arg(long, default_value_t = 20)]
    pub max_sequence_len: usize,

    #[arg(long, default_value_t = 3)]
    pub min_sequence_count: usize,

    /// Occurrences a pattern needs before it is worth a macro.
    #[arg(long, default_value_t = 50)]
    pub macro_threshold: usize,

    /// Keystroke savings above this flag a suggestion as recommended.
    #[arg(long, default_value_t = 100)]
    pub savings_floor: usize,
}

impl Default for PatternParams {
    fn default() -> Self {
        Self {
            min_sequence_len: 3,
            max_sequence_len: 20,
            min_sequence_count: 3,
            macro_threshold: 50,
            savings_floor: 100,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> KmResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        self.timing.merge_from_cli(&cli.timing, matches);
        self.comfort.merge_from_cli(&cli.comfort, matches);
        self.optimizer.merge_from_cli(&cli.optimizer, matches);
        self.simulator.merge_from_cli(&cli.simulator, matches);
        self.patterns.merge_from_cli(&cli.patterns, matches);
    }
}

macro_rules! update_if_present {
    ($self:ident, $cli:ident, $matches:ident, $field:ident) => {
        if $matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
            $self.$field = $cli.$field.clone();
        }
    };
}

impl TimingThresholds {
    pub fn merge_from_cli(&mut self, cli: &TimingThresholds, matches: &ArgMatches) {
        update_if_present!(self, cli, matches, normal_ms);
        update_if_present!(self, cli, matches, hesitation_ms);
        update_if_present!(self, cli, matches, pause_ms);
        update_if_present!(self, cli, matches, context_window);
    }
}

impl ComfortWeights {
    pub fn merge_from_cli(&mut self, cli: &ComfortWeights, matches: &ArgMatches) {
        update_if_present!(self, cli, matches, comfort_base);
        update_if_present!(self, cli, matches, penalty_same_finger);
        update_if_present!(self, cli, matches, bonus_alternation);
        update_if_present!(self, cli, matches, penalty_row_jump);
        update_if_present!(self, cli, matches, bonus_fast);
        update_if_present!(self, cli, matches, penalty_slow);
        update_if_present!(self, cli, matches, fast_ms);
        update_if_present!(self, cli, matches, slow_ms);
        update_if_present!(self, cli, matches, awkward_ceiling);
    }
}

impl OptimizerParams {
    pub fn merge_from_cli(&mut self, cli: &OptimizerParams, matches: &ArgMatches) {
        update_if_present!(self, cli, matches, pair_threshold);
        update_if_present!(self, cli, matches, individual_limit);
    }
}

impl SimulatorParams {
    pub fn merge_from_cli(&mut self, cli: &SimulatorParams, matches: &ArgMatches) {
        update_if_present!(self, cli, matches, layer_overhead_ms);
        update_if_present!(self, cli, matches, switch_target);
        update_if_present!(self, cli, matches, sample_cap);
    }
}

impl PatternParams {
    pub fn merge_from_cli(&mut self, cli: &PatternParams, matches: &ArgMatches) {
        update_if_present!(self, cli, matches, min_sequence_len);
        update_if_present!(self, cli, matches, max_sequence_len);
        update_if_present!(self, cli, matches, min_sequence_count);
        update_if_present!(self, cli, matches, macro_threshold);
        update_if_present!(self, cli, matches, savings_floor);
    }
}
