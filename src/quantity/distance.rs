use std::{
    fmt::{Display, Formatter},
    ops::Mul,
};

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    PartialOrd,
    derive_more::Add,
    derive_more::From,
    derive_more::FromStr,
    derive_more::Sub,
    serde::Deserialize,
    serde::Serialize,
)]
pub struct Kilometers(pub f64);

impl Kilometers {
    pub const ZERO: Self = Self(0.0);

    pub fn min(self, rhs: Self) -> Self {
        if rhs.0 < self.0 { rhs } else { self }
    }

    pub fn max(self, rhs: Self) -> Self {
        if rhs.0 > self.0 { rhs } else { self }
    }
}

impl Display for Kilometers {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} km", self.0)
    }
}

impl Mul<f64> for Kilometers {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self(self.0 * rhs)
    }
}
