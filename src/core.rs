pub mod charger;
pub mod decision;
pub mod engine;
pub mod interval;
pub mod point;
pub mod series;
pub mod status;
pub mod tariff;
pub mod window;
