//! Daily accumulators and their trailing-window sums.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Values that can be summed into / removed from a running total.
pub trait Accumulate {
    fn accumulate(&mut self, other: &Self);
    fn remove(&mut self, other: &Self);
}

/// One province's money flows for a single day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyLedger {
    /// Market turnover: harvest, production output, internal sales, exports.
    pub gdp: f64,
    pub imports: f64,
    pub exports: f64,
    pub trade_tax: f64,
    /// Import and export duties.
    pub customs: f64,
    pub transit_tax: f64,
    pub expenses: f64,
}

impl DailyLedger {
    pub fn income(&self) -> f64 {
        self.trade_tax + self.customs + self.transit_tax
    }
}

impl Accumulate for DailyLedger {
    fn accumulate(&mut self, o: &Self) {
        self.gdp += o.gdp;
        self.imports += o.imports;
        self.exports += o.exports;
        self.trade_tax += o.trade_tax;
        self.customs += o.customs;
        self.transit_tax += o.transit_tax;
        self.expenses += o.expenses;
    }

    fn remove(&mut self, o: &Self) {
        self.gdp -= o.gdp;
        self.imports -= o.imports;
        self.exports -= o.exports;
        self.trade_tax -= o.trade_tax;
        self.customs -= o.customs;
        self.transit_tax -= o.transit_tax;
        self.expenses -= o.expenses;
    }
}

/// World-wide per-commodity quantities for one day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommodityFlows {
    pub produced: Vec<f64>,
    /// Absorbed by population, production inputs and upkeep.
    pub sold: Vec<f64>,
    pub imported: Vec<f64>,
    pub exported: Vec<f64>,
}

impl CommodityFlows {
    pub fn zeros(n: usize) -> Self {
        Self {
            produced: vec![0.0; n],
            sold: vec![0.0; n],
            imported: vec![0.0; n],
            exported: vec![0.0; n],
        }
    }

    pub fn clear(&mut self) {
        for v in [
            &mut self.produced,
            &mut self.sold,
            &mut self.imported,
            &mut self.exported,
        ] {
            v.iter_mut().for_each(|x| *x = 0.0);
        }
    }
}

fn add_into(acc: &mut Vec<f64>, other: &[f64], sign: f64) {
    if acc.len() < other.len() {
        acc.resize(other.len(), 0.0);
    }
    for (a, b) in acc.iter_mut().zip(other) {
        *a += sign * b;
    }
}

impl Accumulate for CommodityFlows {
    fn accumulate(&mut self, o: &Self) {
        add_into(&mut self.produced, &o.produced, 1.0);
        add_into(&mut self.sold, &o.sold, 1.0);
        add_into(&mut self.imported, &o.imported, 1.0);
        add_into(&mut self.exported, &o.exported, 1.0);
    }

    fn remove(&mut self, o: &Self) {
        add_into(&mut self.produced, &o.produced, -1.0);
        add_into(&mut self.sold, &o.sold, -1.0);
        add_into(&mut self.imported, &o.imported, -1.0);
        add_into(&mut self.exported, &o.exported, -1.0);
    }
}

/// Fixed-length trailing window with a running total.
///
/// Pushing day `t` subtracts day `t - capacity` from the total.
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
    days: VecDeque<T>,
    total: T,
    capacity: usize,
}

impl<T: Accumulate + Clone> RollingWindow<T> {
    pub fn new(capacity: usize, zero: T) -> Self {
        Self {
            days: VecDeque::with_capacity(capacity),
            total: zero,
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, day: T) {
        if self.days.len() == self.capacity {
            if let Some(old) = self.days.pop_front() {
                self.total.remove(&old);
            }
        }
        self.total.accumulate(&day);
        self.days.push_back(day);
    }

    pub fn total(&self) -> &T {
        &self.total
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn latest(&self) -> Option<&T> {
        self.days.back()
    }
}
