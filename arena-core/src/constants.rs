/// Default number of opponents per recommendation request.
pub const DEFAULT_NUM_OPPONENTS: usize = 2;

/// Slack when walking the cumulative weight line during weighted selection.
/// Guards against f64 rounding pushing the final remainder just above zero.
pub const WEIGHT_EPSILON: f64 = 1e-10;
