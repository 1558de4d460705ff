//! Water-savings ledger.
//!
//! Credits a fixed volume per tick whenever the node decides *not* to
//! irrigate while the crop is demonstrably healthy, and mints one
//! conservation token per completed volume quantum. The balance only ever
//! grows; tokens are derived from the lifetime total, never counted
//! separately.

use crate::config::NodeConfig;
use crate::sim::SensorState;

pub struct LedgerAccountant {
    savings_wilting_ceiling: f32,
    savings_liters_per_tick: f32,
    liters_per_token: f32,
    credited_this_tick: bool,
}

impl LedgerAccountant {
    pub fn new(cfg: &NodeConfig) -> Self {
        Self {
            savings_wilting_ceiling: cfg.savings_wilting_ceiling,
            savings_liters_per_tick: cfg.savings_liters_per_tick,
            liters_per_token: cfg.liters_per_token,
            credited_this_tick: false,
        }
    }

    /// Re-arms the ledger at the start of a tick. Without this a tick that
    /// evaluated savings twice would double-credit.
    pub fn begin_tick(&mut self) {
        self.credited_this_tick = false;
    }

    /// Settle the tick: credit at most once, then re-derive the token
    /// count from the lifetime total. Returns the number of tokens minted
    /// by this settlement.
    pub fn settle(&mut self, state: &mut SensorState, wilting_probability: f32) -> u64 {
        if !self.credited_this_tick
            && wilting_probability < self.savings_wilting_ceiling
            && !state.pump_active
        {
            state.water_saved_liters += self.savings_liters_per_tick;
            self.credited_this_tick = true;
        }
        let total = (state.water_saved_liters / self.liters_per_token).floor() as u64;
        let minted = total.saturating_sub(state.tokens_minted);
        if minted > 0 {
            log::info!(
                "LEDGER| minted {minted} WCT, balance {:.1} L / {total} WCT",
                state.water_saved_liters
            );
        }
        state.tokens_minted = total;
        minted
    }
}
