use chrono::{DateTime, TimeDelta, Timelike, Utc};
use ordered_float::OrderedFloat;

use crate::{
    config::PriceConfig,
    core::{series::PriceSeries, tariff::calculate_price},
    quantity::rate::{KilowattHourRate, MegawattHourRate},
};

/// The charge-till hour recurs at least daily, this only guards against DST gaps.
const MAX_STEPS: i64 = 48;

/// Single hour of the lookahead window.
#[derive(Copy, Clone, Debug)]
pub struct WindowStep {
    pub timestamp: DateTime<Utc>,
    pub raw_price: MegawattHourRate,
    pub final_price: KilowattHourRate,
}

impl PriceConfig {
    /// Local hour by which charging should be done, given the current local hour.
    #[must_use]
    pub const fn charge_till_hour(&self, local_hour: u32) -> u32 {
        if self.charge_till_hour_night < local_hour && local_hour <= self.charge_till_hour_day {
            self.charge_till_hour_day
        } else {
            self.charge_till_hour_night
        }
    }

    /// Hourly timestamps from `since` up to, but excluding, the charge-till hour.
    ///
    /// The window also ends when the local clock skips over the charge-till hour.
    pub fn window_hours(&self, since: DateTime<Utc>) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        let until_hour = self.charge_till_hour(self.local_hour(since));
        let mut previous_hour = None;
        (0..MAX_STEPS)
            .map(move |n_hours| since + TimeDelta::hours(n_hours))
            .take_while(move |timestamp| {
                let hour = self.local_hour(*timestamp);
                let has_reached = match previous_hour.replace(hour) {
                    None => hour == until_hour,
                    Some(previous) => {
                        let to_deadline = hours_after(previous, until_hour);
                        to_deadline != 0 && to_deadline <= hours_after(previous, hour)
                    }
                };
                !has_reached
            })
    }

    fn local_hour(&self, timestamp: DateTime<Utc>) -> u32 {
        timestamp.with_timezone(&self.market_timezone).hour()
    }
}

/// Clock hours from `from` forward to `to`, in `0..24`.
const fn hours_after(from: u32, to: u32) -> u32 {
    (to + 24 - from) % 24
}

/// Scan the window, stopping at the first hour without a known price.
pub fn scan_window<'a>(
    config: &'a PriceConfig,
    series: &'a PriceSeries,
    since: DateTime<Utc>,
) -> impl Iterator<Item = WindowStep> + 'a {
    config.window_hours(since).map_while(move |timestamp| {
        let raw_price = series.get(timestamp)?;
        let final_price = calculate_price(timestamp, raw_price, config);
        Some(WindowStep { timestamp, raw_price, final_price })
    })
}

/// Lowest final price until the charge-till hour, or [`KilowattHourRate::MAX`] if none is known.
#[must_use]
pub fn find_min_price(
    config: &PriceConfig,
    series: &PriceSeries,
    since: DateTime<Utc>,
) -> KilowattHourRate {
    scan_window(config, series, since)
        .map(|step| step.final_price)
        .min_by_key(|price| OrderedFloat(price.0))
        .unwrap_or(KilowattHourRate::MAX)
}

/// Acceptance threshold: the window minimum, but never above the configured ceiling.
#[must_use]
pub fn resolve_desired_price(
    config: &PriceConfig,
    min_window_price: KilowattHourRate,
) -> KilowattHourRate {
    if min_window_price > config.max_price { config.max_price } else { min_window_price }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::TimeZone;
    use chrono_tz::Tz;
    use itertools::Itertools;

    use super::*;
    use crate::core::{point::PricePoint, tariff::tests::config};

    fn series(points: &[(i64, f64)]) -> PriceSeries {
        points
            .iter()
            .map(|(timestamp, price)| {
                PricePoint::new(
                    DateTime::from_timestamp(*timestamp, 0).unwrap(),
                    MegawattHourRate(*price),
                )
            })
            .collect()
    }

    /// 2023-08-01 01:00 in Vilnius.
    fn since() -> DateTime<Utc> {
        Tz::Europe__Vilnius.with_ymd_and_hms(2023, 8, 1, 1, 0, 0).unwrap().to_utc()
    }

    #[test]
    fn test_charge_till_hour() {
        let config = config();
        assert_eq!(config.charge_till_hour(8), 8);
        assert_eq!(config.charge_till_hour(9), 17);
        assert_eq!(config.charge_till_hour(17), 17);
        assert_eq!(config.charge_till_hour(18), 8);
        assert_eq!(config.charge_till_hour(0), 8);
    }

    #[test]
    fn test_window_hours_stop_before_boundary() {
        let hours = config().window_hours(since()).collect_vec();
        assert_eq!(hours.len(), 7);
        assert_eq!(hours[0], since());
        assert_eq!(hours[6], since() + TimeDelta::hours(6));
    }

    #[test]
    fn test_window_crosses_midnight() {
        let since = Tz::Europe__Vilnius.with_ymd_and_hms(2023, 8, 1, 20, 0, 0).unwrap().to_utc();
        assert_eq!(config().window_hours(since).count(), 12);
    }

    #[test]
    fn test_window_ends_on_skipped_hour() {
        // 03:00 does not exist in Vilnius on 2024-03-31.
        let mut config = config();
        config.charge_till_hour_night = 3;
        let since = Tz::Europe__Vilnius.with_ymd_and_hms(2024, 3, 30, 22, 0, 0).unwrap().to_utc();
        let hours = config.window_hours(since).collect_vec();
        assert_eq!(hours.len(), 5);
        assert_eq!(hours[4].with_timezone(&Tz::Europe__Vilnius).hour(), 2);
    }

    #[test]
    fn test_window_through_repeated_hour() {
        // 03:00 happens twice in Vilnius on 2023-10-29.
        let mut config = config();
        config.charge_till_hour_night = 5;
        let since = Tz::Europe__Vilnius.with_ymd_and_hms(2023, 10, 28, 22, 0, 0).unwrap().to_utc();
        assert_eq!(config.window_hours(since).count(), 8);
    }

    #[test]
    fn test_empty() {
        let price = find_min_price(&config(), &PriceSeries::default(), since());
        assert_eq!(price, KilowattHourRate::MAX);
    }

    #[test]
    fn test_single() {
        let price = find_min_price(&config(), &series(&[(1_690_840_800, 100.0)]), since());
        assert_abs_diff_eq!(price.0, 0.15, epsilon = 1e-9);
    }

    #[test]
    fn test_first_lower() {
        let series = series(&[(1_690_840_800, 100.0), (1_690_844_400, 200.0)]);
        assert_abs_diff_eq!(find_min_price(&config(), &series, since()).0, 0.15, epsilon = 1e-9);
    }

    #[test]
    fn test_second_lower() {
        let series = series(&[(1_690_840_800, 200.0), (1_690_844_400, 100.0)]);
        assert_abs_diff_eq!(find_min_price(&config(), &series, since()).0, 0.15, epsilon = 1e-9);
    }

    #[test]
    fn test_three_prices() {
        let series =
            series(&[(1_690_840_800, 200.0), (1_690_844_400, 100.0), (1_690_848_000, 200.0)]);
        assert_abs_diff_eq!(find_min_price(&config(), &series, since()).0, 0.15, epsilon = 1e-9);
    }

    #[test]
    fn test_boundary_two_hours_ahead() {
        let mut config = config();
        config.charge_till_hour_night = 3;
        let series =
            series(&[(1_690_840_800, 200.0), (1_690_844_400, 100.0), (1_690_848_000, 0.0)]);
        assert_abs_diff_eq!(find_min_price(&config, &series, since()).0, 0.15, epsilon = 1e-9);
    }

    #[test]
    fn test_equal_prices_anywhere_in_window() {
        let config = config();
        let expected = calculate_price(since(), MegawattHourRate(80.0), &config);
        let series = series(&[(1_690_840_800, 80.0), (1_690_844_400, 80.0), (1_690_848_000, 80.0)]);
        let price = find_min_price(&config, &series, since());
        assert_abs_diff_eq!(price.0, expected.0, epsilon = 1e-9);
    }

    #[test]
    fn test_boundary_hour_itself_is_excluded() {
        let mut config = config();
        config.charge_till_hour_night = 2;
        let series = series(&[(1_690_840_800, 200.0), (1_690_844_400, 100.0)]);
        assert_abs_diff_eq!(find_min_price(&config, &series, since()).0, 0.25, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_length_window() {
        let mut config = config();
        config.charge_till_hour_night = 1;
        let series = series(&[(1_690_840_800, 100.0)]);
        assert_eq!(find_min_price(&config, &series, since()), KilowattHourRate::MAX);
    }

    #[test]
    fn test_gap_terminates_scan() {
        let series = series(&[(1_690_840_800, 200.0), (1_690_848_000, 0.0)]);
        assert_abs_diff_eq!(find_min_price(&config(), &series, since()).0, 0.25, epsilon = 1e-9);
    }

    #[test]
    fn test_resolve_desired_price() {
        let mut config = config();
        config.max_price = KilowattHourRate(0.2);
        assert_eq!(resolve_desired_price(&config, KilowattHourRate(0.3)), KilowattHourRate(0.2));
        assert_eq!(resolve_desired_price(&config, KilowattHourRate(0.1)), KilowattHourRate(0.1));
        assert_eq!(resolve_desired_price(&config, KilowattHourRate(0.2)), KilowattHourRate(0.2));
        assert_eq!(resolve_desired_price(&config, KilowattHourRate::MAX), KilowattHourRate(0.2));
    }
}
