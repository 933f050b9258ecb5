// Local sentiment labelling and summary aggregation.
// Both are pure; the BFF's own analysis takes precedence whenever it carries a distribution.

pub mod aggregator;
pub mod classifier;
