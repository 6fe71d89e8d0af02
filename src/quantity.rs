pub mod distance;
pub mod energy;
pub mod irradiance;
pub mod percent;
pub mod power;

pub use self::{
    distance::Kilometers,
    energy::KilowattHours,
    irradiance::WattsPerSquareMetre,
    percent::Percent,
    power::Kilowatts,
};
