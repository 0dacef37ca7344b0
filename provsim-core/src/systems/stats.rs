use crate::defines::WINDOW_DAYS;
use crate::ledger::{Accumulate, CommodityFlows, DailyLedger, RollingWindow};
use crate::state::ProvinceState;
use tracing::instrument;

/// World-wide aggregates over the trailing window.
#[derive(Debug, Clone)]
pub struct WorldStats {
    /// Flows of the day in progress.
    pub today: CommodityFlows,
    pub flows: RollingWindow<CommodityFlows>,
    pub ledger: RollingWindow<DailyLedger>,
}

impl WorldStats {
    pub fn new(commodities: usize) -> Self {
        Self {
            today: CommodityFlows::zeros(commodities),
            flows: RollingWindow::new(WINDOW_DAYS, CommodityFlows::zeros(commodities)),
            ledger: RollingWindow::new(WINDOW_DAYS, DailyLedger::default()),
        }
    }

    pub fn begin_day(&mut self) {
        self.today.clear();
    }

    /// Number of days recorded (at most the window length).
    pub fn days(&self) -> usize {
        self.flows.len()
    }
}

/// Pushes the finished day into every trailing window.
#[instrument(skip_all, name = "stats")]
pub fn run_stats_tick(provinces: &mut [ProvinceState], stats: &mut WorldStats) {
    let mut world = DailyLedger::default();
    for p in provinces.iter_mut() {
        p.trailing.push(p.today);
        world.accumulate(&p.today);
    }
    stats.flows.push(stats.today.clone());
    stats.ledger.push(world);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_roll_province_and_world() {
        let mut provinces = vec![
            ProvinceState::new(1, "A", "plains", 2),
            ProvinceState::new(2, "B", "plains", 2),
        ];
        let mut stats = WorldStats::new(2);
        for day in 0..400 {
            stats.begin_day();
            for p in provinces.iter_mut() {
                p.reset_day();
                p.today.gdp = 1.0;
            }
            stats.today.produced[0] = f64::from(day);
            run_stats_tick(&mut provinces, &mut stats);
        }
        assert_eq!(stats.days(), 365);
        assert!((stats.ledger.total().gdp - 730.0).abs() < 1e-9);
        assert!((provinces[0].trailing.total().gdp - 365.0).abs() < 1e-9);
        // days 35..=399
        let expected: f64 = (35..400).map(f64::from).sum();
        assert!((stats.flows.total().produced[0] - expected).abs() < 1e-6);
    }
}
