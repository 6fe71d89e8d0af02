use std::{
    fmt::{Display, Formatter},
    ops::Mul,
};

/// Global Horizontal Irradiance.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    PartialOrd,
    derive_more::Add,
    derive_more::From,
    derive_more::Sub,
    serde::Deserialize,
    serde::Serialize,
)]
pub struct WattsPerSquareMetre(pub f64);

impl WattsPerSquareMetre {
    pub const ZERO: Self = Self(0.0);
}

impl Display for WattsPerSquareMetre {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.0} W/m²", self.0)
    }
}

impl Mul<f64> for WattsPerSquareMetre {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self(self.0 * rhs)
    }
}
