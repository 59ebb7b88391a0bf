/// Heartbeat multiples the poll interval can be set to. With the 5 second
/// host heartbeat this spans 5 seconds up to 10 minutes.
pub const INTERVAL_MENU: [u32; 7] = [1, 3, 6, 12, 36, 60, 120];

/// Default selection (~30 seconds).
pub const DEFAULT_INTERVAL_TICKS: u32 = 6;

/// Gates how often the poll pipeline actually runs. The counter advances on
/// every heartbeat and wraps modulo the configured cycle length whether or
/// not the cycle's fetch succeeded; the pipeline fires only on the tick
/// where the counter sits at zero.
#[derive(Debug)]
pub struct PollScheduler {
    counter: u32,
    cycle_ticks: u32,
}

impl PollScheduler {
    pub fn new(cycle_ticks: u32) -> Self {
        Self {
            counter: 0,
            cycle_ticks: cycle_ticks.max(1),
        }
    }

    /// Advances the counter by one heartbeat. Returns true when the pipeline
    /// is due this tick.
    pub fn tick(&mut self) -> bool {
        let due = self.counter == 0;
        self.counter = (self.counter + 1) % self.cycle_ticks;
        due
    }
}

/// Clamps an interval selection to the fixed menu, falling back to the
/// default for anything off-menu.
pub fn validated_interval(ticks: u32) -> u32 {
    if INTERVAL_MENU.contains(&ticks) {
        ticks
    } else {
        DEFAULT_INTERVAL_TICKS
    }
}
