//! Default priority ordering used to sort overdue-review reports.
//!
//! Lower value sorts first (more urgent). Matches the reference
//! implementation's default `priority_mapping`; this engine does not (yet)
//! support overriding it from configuration.

pub fn priority_value(priority: &str) -> i64 {
    match priority {
        "P0" => 1,
        "P1" => 2,
        "P2" => 3,
        "P3" => 4,
        _ => 5,
    }
}
