use crate::readings::ReadingAccumulator;

/// Instantaneous power values derived once per cycle, all in watts. The
/// display sink integrates them into energy totals over its own sampling
/// interval; nothing here is carried across cycles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedMetrics {
    pub home_consumption: f64,
    pub self_consumption: f64,
    pub grid_import: f64,
    pub grid_export: f64,
}

impl DerivedMetrics {
    pub fn from_readings(acc: &ReadingAccumulator) -> Self {
        let g = acc.grid_power;
        let gen = acc.generation;
        let gep = acc.generation_positive;
        let div = acc.diversion;

        let home_consumption = (g + gen) - (div + gep);
        let self_consumption = (gen - gep + g.min(0.0)).max(0.0);

        // The sink accumulates each grid channel monotonically and cannot
        // take a signed rate, so exactly one of the pair is nonzero per
        // cycle and the other is forced back to zero.
        let (grid_import, grid_export) = if g < 0.0 { (0.0, -g) } else { (g, 0.0) };

        Self {
            home_consumption,
            self_consumption,
            grid_import,
            grid_export,
        }
    }
}
