use std::fmt::{Display, Formatter};

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    PartialOrd,
    derive_more::Add,
    derive_more::From,
    derive_more::FromStr,
    derive_more::Sum,
    serde::Deserialize,
    serde::Serialize,
)]
pub struct Percent(pub f64);

impl Percent {
    pub const ZERO: Self = Self(0.0);

    /// Convert a `[0, 1]` ratio into a percentage rounded to two decimals.
    /// Ratios above `1` are capped at `100 %`.
    pub fn from_capped_ratio(ratio: f64) -> Self {
        Self((ratio.min(1.0) * 100.0 * 100.0).round() / 100.0)
    }
}

impl Display for Percent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} %", self.0)
    }
}
