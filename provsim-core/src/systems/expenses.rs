use super::TickContext;
use crate::config::FiscalConfig;
use crate::defines::fiscal;
use crate::state::ProvinceState;
use std::f64::consts::TAU;
use tracing::instrument;

/// Smooth seasonal multiplier, phase-shifted per province so regions don't
/// peak together.
pub fn seasonal_factor(day: u32, province_index: usize) -> f64 {
    let d = f64::from(day);
    let k = province_index as f64;
    1.0 + fiscal::SEASONAL_AMPLITUDE * (TAU * d / 365.0 + k * 0.61).sin()
        + fiscal::NOISE_AMPLITUDE * (d * 0.37 + k * 1.7).sin()
}

/// Daily administrative upkeep for one province.
pub fn daily_expense(p: &ProvinceState, rates: &FiscalConfig, seasonal: f64) -> f64 {
    let pop = p.pop as f64;
    let load = f64::from(p.building_count()) / fiscal::BUILDING_LOAD_NORM;
    let base = pop * rates.admin_base
        + pop * p.infra * rates.admin_infra
        + load * pop * rates.admin_building;
    crate::sanitize(base * seasonal)
}

/// Books the day's tax income and administrative expense into each treasury.
#[instrument(skip_all, name = "expenses")]
pub fn run_expenses_tick(provinces: &mut [ProvinceState], ctx: &TickContext) {
    for (idx, p) in provinces.iter_mut().enumerate() {
        let expense = daily_expense(p, &ctx.config.fiscal, seasonal_factor(ctx.day, idx));
        p.today.expenses = expense;
        let balance = p.treasury + p.today.income() - expense;
        if balance < 0.0 {
            log::trace!("province {}: treasury exhausted on day {}", p.pid, ctx.day);
        }
        p.treasury = crate::sanitize(balance);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seasonal_factor_stays_near_one() {
        for day in 0..730 {
            for idx in 0..10 {
                let f = seasonal_factor(day, idx);
                assert!((0.88..=1.12).contains(&f), "day {day} idx {idx}: {f}");
            }
        }
    }

    #[test]
    fn test_expense_scales_with_population_and_buildings() {
        let rates = FiscalConfig::default();
        let mut p = ProvinceState::new(1, "A", "plains", 1);
        p.pop = 100_000;
        p.infra = 0.5;
        let bare = daily_expense(&p, &rates, 1.0);
        assert!((bare - (100_000.0 * 2e-5 + 100_000.0 * 0.5 * 1e-5)).abs() < 1e-9);

        p.add_building(crate::catalog::RecipeId(0), 5, 1.0);
        assert!(daily_expense(&p, &rates, 1.0) > bare);
    }

    #[test]
    fn test_treasury_never_negative() {
        let nodes = crate::testing::TopologyBuilder::new()
            .province(1, "plains", (0.0, 0.0))
            .build();
        let mut fx = crate::testing::SystemFixture::new(nodes, crate::catalog::Catalog::standard());
        fx.provinces[0].pop = 1_000_000;
        fx.provinces[0].treasury = 1.0;
        let (ctx, provinces) = fx.split();
        run_expenses_tick(provinces, &ctx);
        assert_eq!(provinces[0].treasury, 0.0);
        assert!(provinces[0].today.expenses > 0.0);
    }
}
