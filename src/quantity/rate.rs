use std::fmt::{Debug, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Euro per megawatt-hour, the unit the spot market quotes in.
#[derive(
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Deserialize,
    Serialize,
)]
pub struct MegawattHourRate(pub f64);

impl MegawattHourRate {
    #[must_use]
    pub fn to_kilowatt_hour_rate(self) -> KilowattHourRate {
        KilowattHourRate(self.0 / 1000.0)
    }
}

impl Display for MegawattHourRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} €/MWh", self.0)
    }
}

impl Debug for MegawattHourRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}€/MWh", self.0)
    }
}

/// Euro per kilowatt-hour.
#[derive(
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Deserialize,
    Serialize,
    derive_more::Add,
    derive_more::Mul,
)]
pub struct KilowattHourRate(pub f64);

impl KilowattHourRate {
    /// Stands for «no known price».
    pub const MAX: Self = Self(f64::MAX);
}

impl Display for KilowattHourRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if *self == Self::MAX {
            write!(f, "∞ €/kWh")
        } else {
            write!(f, "{:.4} €/kWh", self.0)
        }
    }
}

impl Debug for KilowattHourRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}€/kWh", self.0)
    }
}
