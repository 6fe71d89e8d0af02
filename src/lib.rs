//! Route-aware EV charger ranking and microgrid solar allocation.
//!
//! The crate is the pure computation core of the charging guidance stack:
//! collaborators fetch charger, weather, and microgrid snapshots, call
//! [`allocate_solar`] (or [`forecast_solar`] for a hypothetical instant) to
//! derive every charger's solar/grid mix, then feed the annotated chargers
//! and the route into [`rank_chargers`]. Every entry point is a pure
//! function over its arguments and safe to call concurrently.

pub mod allocation;
pub mod charger;
pub mod clock;
pub mod forecast;
pub mod geo;
pub mod irradiance;
pub mod microgrid;
mod prelude;
pub mod quantity;
pub mod ranking;
pub mod route;
pub mod snapshot;
pub mod weather;

pub use self::{
    allocation::{AllocationOutcome, allocate_solar},
    clock::Clock,
    forecast::forecast_solar,
    ranking::{RankedCharger, RankingRequest, rank_chargers},
};
