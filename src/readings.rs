use serde_json::Value;

/// The hub's status response: an ordered array of category-tagged records,
/// read permissively so payload schema drift never breaks a poll cycle.
pub type StatusPayload = Vec<Value>;

/// Per-cycle totals accumulated while walking one status payload.
///
/// Built zeroed at the start of every cycle so a failed fetch can never leak
/// stale readings into the next cycle's output.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReadingAccumulator {
    /// Net grid power in watts, negative when exporting. Last unit wins.
    pub grid_power: f64,
    /// Grid voltage in volts. The hub reports tenths of a volt.
    pub grid_voltage: f64,
    /// Total generation in watts; both `gep` and `gen` add into this.
    pub generation: f64,
    /// The `gep` component of `generation`, tracked separately because the
    /// self-consumption formula excludes it.
    pub generation_positive: f64,
    /// Diverted/charging power in watts, summed across units.
    pub diversion: f64,
    /// Charge added this session, summed across units. Accumulated ahead of
    /// a dedicated output record.
    pub charge_added: f64,
    pub mode_code: i64,
    pub status_code: i64,
    pub charge_state: String,
}

/// Walks the status payload and accumulates the recognized Zappi fields.
///
/// Unrecognized categories and fields are skipped, as is any field whose
/// value has the wrong shape. When multiple Zappi units are present the
/// mode/status/charge-state codes come from the last unit walked.
pub fn parse(payload: &[Value]) -> ReadingAccumulator {
    let mut acc = ReadingAccumulator::default();

    for entry in payload {
        // The eddi category is recognized but carries nothing we report yet.
        if let Some(devices) = entry.get("zappi").and_then(Value::as_array) {
            for device in devices {
                accumulate_device(&mut acc, device);
            }
        }
    }

    acc
}

fn accumulate_device(acc: &mut ReadingAccumulator, device: &Value) {
    // Grid readings
    if let Some(grd) = device.get("grd").and_then(Value::as_f64) {
        acc.grid_power = grd;
    }
    if let Some(vol) = device.get("vol").and_then(Value::as_f64) {
        acc.grid_voltage = vol / 10.0;
    }
    // Zappi readings
    if let Some(gep) = device.get("gep").and_then(Value::as_f64) {
        acc.generation += gep;
        acc.generation_positive += gep;
    }
    if let Some(gen) = device.get("gen").and_then(Value::as_f64) {
        acc.generation += gen;
    }
    if let Some(div) = device.get("div").and_then(Value::as_f64) {
        acc.diversion += div;
    }
    if let Some(che) = device.get("che").and_then(Value::as_f64) {
        acc.charge_added += che;
    }
    if let Some(zmo) = device.get("zmo").and_then(Value::as_i64) {
        acc.mode_code = zmo;
    }
    if let Some(sta) = device.get("sta").and_then(Value::as_i64) {
        acc.status_code = sta;
    }
    if let Some(pst) = device.get("pst").and_then(Value::as_str) {
        acc.charge_state = pst.to_string();
    }
}
