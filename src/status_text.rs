//! Fixed lookup tables turning the hub's small code fields into display
//! labels. Codes the hub adds in later firmware map to "Unknown" instead of
//! failing.

pub fn mode_text(code: i64) -> &'static str {
    match code {
        1 => "Fast",
        2 => "Eco",
        3 => "Eco+",
        4 => "Stop",
        _ => "Unknown",
    }
}

pub fn status_text(code: i64) -> &'static str {
    match code {
        1 => "Waiting for export",
        2 => "Demand-response wait",
        3 => "Diverting/Charging",
        4 => "Boosting",
        5 => "Charge complete",
        _ => "Unknown",
    }
}

/// Charge-state codes are short alphanumerics describing the charging
/// session phase, unlike the numeric status codes.
pub fn charge_state_text(code: &str) -> &'static str {
    match code {
        "A" => "EV disconnected",
        "B1" => "EV connected",
        "B2" => "Waiting for EV",
        "C1" => "EV ready to charge",
        "C2" => "Charging",
        "F" => "Fault",
        _ => "Unknown",
    }
}
