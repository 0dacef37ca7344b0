//! Tuning constants for the economy systems.

/// Trailing statistics window.
pub const WINDOW_DAYS: usize = 365;

/// Quantities below this are treated as zero.
pub const EPSILON: f64 = 1e-6;

pub mod stock {
    /// Share of target held back as non-sellable safety stock.
    pub const RESERVE_SHARE: f64 = 0.55;
    /// Export ceiling and production stop, as a multiple of target.
    pub const EXPORT_BUFFER: f64 = 1.6;
    /// Provinces below this share of target look for sellers.
    pub const BUYER_THRESHOLD: f64 = 0.98;

    pub const POP_BUFFER_DAYS: f64 = 6.0;
    pub const INPUT_BUFFER_DAYS: f64 = 4.0;
    pub const OUTPUT_BUFFER_DAYS: f64 = 1.5;
    pub const POTENTIAL_BUFFER_DAYS: f64 = 1.0;
    pub const UPKEEP_BUFFER_DAYS: f64 = 6.0;
    /// Utilization assumed when sizing building-driven targets.
    pub const PLANNING_UTILIZATION: f64 = 0.75;

    pub const INITIAL_STAPLE_DAYS: f64 = 4.0;
    pub const HUB_RAW_BUFFER: f64 = 10.0;
}

pub mod production {
    /// Share of population available as daily workforce.
    pub const LABOR_PARTICIPATION: f64 = 0.42;
    /// Cost of one workforce unit per day.
    pub const WAGE: f64 = 0.012;
    /// Output value must beat input cost by this factor (plus labor).
    pub const PROFIT_MARGIN: f64 = 1.03;
    /// Essential outputs below this share of target override profitability.
    pub const DEFICIT_OVERRIDE: f64 = 0.95;

    /// Extraction cost as a share of base price at infra 1.0.
    pub const EXTRACTION_COST_SHARE: f64 = 0.55;
    pub const YIELD_BASE: f64 = 0.35;
    pub const YIELD_PROFIT: f64 = 0.75;
}

pub mod maintenance {
    pub const MIN_EFFICIENCY: f64 = 0.65;
    pub const MAX_EFFICIENCY: f64 = 1.15;
    /// Efficiency lost per day at zero upkeep coverage.
    pub const DEGRADE_RATE: f64 = 0.03;
    /// Daily multiplicative recovery at full upkeep.
    pub const RESTORE_FACTOR: f64 = 1.002;
}

pub mod trade {
    /// Buyers never pay more than this multiple of their own price.
    pub const BID_CEILING: f64 = 1.25;
    /// Transport load per unit for commodities with (near) zero bulk.
    pub const MIN_BULK: f64 = 0.05;
    pub const MAX_TRANSIT_LOSS: f64 = 0.9;
    /// Share of the daily shortfall one import order may cover (of target).
    pub const IMPORT_SHARE_PER_DAY: f64 = 0.35;
    /// Share of exportable surplus shipped per day.
    pub const EXPORT_SHARE_PER_DAY: f64 = 0.5;
}

pub mod pricing {
    pub const SCARCITY_CLAMP: f64 = 2.0;
    pub const SCARCITY_RATE: f64 = 0.05;
    pub const PARITY_PULL: f64 = 0.10;
    pub const IDLE_PULL: f64 = 0.08;
    /// Stock/target ratio below which prices move toward import parity.
    pub const SCARCE_RATIO: f64 = 0.9;
    pub const FLOOR_BASE: f64 = 0.06;
    pub const FLOOR_PARITY: f64 = 0.85;
    pub const CEILING_BASE: f64 = 8.0;
    pub const CEILING_PARITY: f64 = 2.8;
    /// Export price never drops below this share of base price.
    pub const EXPORT_FLOOR: f64 = 0.08;
}

pub mod logistics {
    pub const TRANSPORT_BASE: f64 = 20.0;
    pub const TRANSPORT_PER_THOUSAND: f64 = 4.0;
    pub const CITY_TRANSPORT_BONUS: f64 = 1.5;
    pub const WORLD_BASE: f64 = 10.0;
    pub const WORLD_PER_THOUSAND: f64 = 1.5;
    pub const HUB_WORLD_BONUS: f64 = 3.0;
}

pub mod demography {
    /// Inhabitants per unit of area before terrain and city multipliers.
    pub const DENSITY: f64 = 900.0;
    pub const CITY_BONUS: f64 = 2.6;
    pub const NOISE_SD: f64 = 0.25;
    pub const INFRA_CITY: f64 = 0.75;
    pub const INFRA_RURAL: f64 = 0.45;
    pub const INFRA_SD: f64 = 0.12;
    pub const INFRA_MIN: f64 = 0.2;
    pub const INFRA_MAX: f64 = 1.0;
    pub const MAX_BUILDING_COUNT: u32 = 6;
    /// Potential must exceed the world mean by this factor to place a building.
    pub const POTENTIAL_THRESHOLD: f64 = 1.1;
}

pub mod fiscal {
    pub const BUILDING_LOAD_NORM: f64 = 10.0;
    pub const SEASONAL_AMPLITUDE: f64 = 0.08;
    pub const NOISE_AMPLITUDE: f64 = 0.03;
    pub const INITIAL_TREASURY_PER_CAPITA: f64 = 0.02;
}
