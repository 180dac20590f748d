use crate::types::{
    City, CleanOrder, CourierRatingRow, CourierSpeedRow, DailyOrdersRow, FleetMetrics,
    MapMarkerRow, RatingStatsRow, Traffic, TrafficCityRow, TrafficShareRow, WeeklyCourierLoadRow,
    WeeklyOrdersRow,
};
use crate::util::{average, format_number, median, std_dev};
use chrono::{Datelike, NaiveDate};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Ranking direction for the courier speed table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedOrder {
    Fastest,
    Slowest,
}

/// Week index with week 0 starting on January 1st, independent of locale
/// and weekday conventions.
fn week_of_year(d: NaiveDate) -> u32 {
    d.ordinal0() / 7
}

fn week_label(w: u32) -> String {
    format!("{:02}", w)
}

pub fn orders_by_date(data: &[CleanOrder]) -> Vec<DailyOrdersRow> {
    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for o in data {
        *counts.entry(o.order_date).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(order_date, orders)| DailyOrdersRow { order_date, orders })
        .collect()
}

pub fn share_by_traffic(data: &[CleanOrder]) -> Vec<TrafficShareRow> {
    let mut counts: HashMap<Traffic, usize> = HashMap::new();
    for o in data {
        *counts.entry(o.traffic).or_insert(0) += 1;
    }
    let total = data.len();
    let mut tallies: Vec<(usize, Traffic)> =
        counts.into_iter().map(|(t, c)| (c, t)).collect();
    // Busiest category first; name breaks ties so the order is stable.
    tallies.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.as_str().cmp(b.1.as_str())));
    tallies
        .into_iter()
        .map(|(orders, traffic)| TrafficShareRow {
            traffic,
            orders,
            share_pct: format_number(100.0 * orders as f64 / total as f64, 2),
        })
        .collect()
}

pub fn orders_by_traffic_and_city(data: &[CleanOrder]) -> Vec<TrafficCityRow> {
    // Only combinations present in the data appear; nothing is zero-filled.
    let mut counts: BTreeMap<(Traffic, City), usize> = BTreeMap::new();
    for o in data {
        *counts.entry((o.traffic, o.city)).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|((traffic, city), orders)| TrafficCityRow {
            traffic,
            city,
            orders,
        })
        .collect()
}

pub fn orders_by_week(data: &[CleanOrder]) -> Vec<WeeklyOrdersRow> {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for o in data {
        *counts.entry(week_of_year(o.order_date)).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(week, orders)| WeeklyOrdersRow {
            week: week_label(week),
            orders,
        })
        .collect()
}

pub fn orders_per_courier_by_week(data: &[CleanOrder]) -> Vec<WeeklyCourierLoadRow> {
    #[derive(Default)]
    struct Acc<'a> {
        orders: usize,
        couriers: HashSet<&'a str>,
    }
    let mut weeks: BTreeMap<u32, Acc> = BTreeMap::new();
    for o in data {
        let e = weeks.entry(week_of_year(o.order_date)).or_default();
        e.orders += 1;
        e.couriers.insert(o.courier_id.as_str());
    }
    let mut rows = Vec::new();
    for (week, acc) in weeks {
        let couriers = acc.couriers.len();
        // A week without couriers has no defined load.
        if couriers == 0 {
            continue;
        }
        rows.push(WeeklyCourierLoadRow {
            week: week_label(week),
            orders: acc.orders,
            couriers,
            orders_per_courier: format_number(acc.orders as f64 / couriers as f64, 2),
        });
    }
    rows
}

pub fn median_location_by_city_and_traffic(data: &[CleanOrder]) -> Vec<MapMarkerRow> {
    let mut groups: BTreeMap<(City, Traffic), (Vec<f64>, Vec<f64>)> =
        BTreeMap::new();
    for o in data {
        let e = groups.entry((o.city, o.traffic)).or_default();
        e.0.push(o.delivery_lat);
        e.1.push(o.delivery_lon);
    }
    groups
        .into_iter()
        .map(|((city, traffic), (lats, lons))| MapMarkerRow {
            city,
            traffic,
            latitude: format_number(median(lats), 6),
            longitude: format_number(median(lons), 6),
        })
        .collect()
}

/// Per city, each courier's mean delivery time, ranked per `order` and cut
/// to the ten best. City blocks are concatenated in the fixed category
/// order so Metropolitan always leads the table.
pub fn top_couriers_by_speed(data: &[CleanOrder], order: SpeedOrder) -> Vec<CourierSpeedRow> {
    let mut times: HashMap<(String, City), Vec<f64>> = HashMap::new();
    for o in data {
        times
            .entry((o.courier_id.clone(), o.city))
            .or_default()
            .push(o.time_taken_min as f64);
    }
    let means: Vec<(City, String, f64)> = times
        .into_iter()
        .map(|((courier, city), v)| (city, courier, average(&v)))
        .collect();

    let mut rows = Vec::new();
    for city in City::ALL {
        let mut block: Vec<&(City, String, f64)> =
            means.iter().filter(|(c, _, _)| *c == city).collect();
        block.sort_by(|a, b| {
            let by_time = match order {
                SpeedOrder::Fastest => a.2.partial_cmp(&b.2),
                SpeedOrder::Slowest => b.2.partial_cmp(&a.2),
            };
            by_time.unwrap_or(Ordering::Equal).then_with(|| a.1.cmp(&b.1))
        });
        rows.extend(block.into_iter().take(10).map(|(city, courier, mean)| {
            CourierSpeedRow {
                courier_id: courier.clone(),
                city: *city,
                mean_time_min: format_number(*mean, 2),
            }
        }));
    }
    rows
}

/// Mean and sample standard deviation of courier ratings, grouped by
/// whatever category `key` extracts (traffic density, weather condition).
pub fn rating_stats_by_category<F>(data: &[CleanOrder], key: F) -> Vec<RatingStatsRow>
where
    F: Fn(&CleanOrder) -> String,
{
    let mut groups: HashMap<String, Vec<f64>> = HashMap::new();
    for o in data {
        groups.entry(key(o)).or_default().push(o.courier_rating);
    }
    let mut rows: Vec<RatingStatsRow> = groups
        .into_iter()
        .map(|(category, ratings)| RatingStatsRow {
            category,
            mean_rating: format_number(average(&ratings), 2),
            std_rating: format_number(std_dev(&ratings), 2),
        })
        .collect();
    rows.sort_by(|a, b| a.category.cmp(&b.category));
    rows
}

pub fn avg_rating_by_courier(data: &[CleanOrder]) -> Vec<CourierRatingRow> {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for o in data {
        groups
            .entry(o.courier_id.as_str())
            .or_default()
            .push(o.courier_rating);
    }
    groups
        .into_iter()
        .map(|(courier, ratings)| CourierRatingRow {
            courier_id: courier.to_string(),
            mean_rating: format_number(average(&ratings), 2),
        })
        .collect()
}

/// Age and vehicle-condition extremes for the metric cards. An empty
/// snapshot has no extremes to report.
pub fn fleet_metrics(data: &[CleanOrder]) -> Option<FleetMetrics> {
    let first = data.first()?;
    let mut m = FleetMetrics {
        oldest_courier: first.courier_age,
        youngest_courier: first.courier_age,
        best_vehicle_condition: first.vehicle_condition,
        worst_vehicle_condition: first.vehicle_condition,
    };
    for o in data {
        m.oldest_courier = m.oldest_courier.max(o.courier_age);
        m.youngest_courier = m.youngest_courier.min(o.courier_age);
        m.best_vehicle_condition = m.best_vehicle_condition.max(o.vehicle_condition);
        m.worst_vehicle_condition = m.worst_vehicle_condition.min(o.vehicle_condition);
    }
    Some(m)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(
        date: &str,
        traffic: Traffic,
        city: City,
        courier: &str,
        time: i32,
        rating: f64,
    ) -> CleanOrder {
        CleanOrder {
            order_id: "0x1".to_string(),
            courier_id: courier.to_string(),
            courier_age: 30,
            courier_rating: rating,
            order_date: NaiveDate::parse_from_str(date, "%d-%m-%Y").unwrap(),
            restaurant_lat: 22.7,
            restaurant_lon: 75.8,
            delivery_lat: 22.8,
            delivery_lon: 75.9,
            weather: "conditions Sunny".to_string(),
            traffic,
            vehicle_condition: 1,
            order_type: "Snack".to_string(),
            vehicle_type: "motorcycle".to_string(),
            multiple_deliveries: 0,
            festival: "No".to_string(),
            city,
            time_taken_min: time,
        }
    }

    fn sample(traffic: Traffic) -> CleanOrder {
        order("01-03-2022", traffic, City::Urban, "C1", 25, 4.5)
    }

    #[test]
    fn daily_counts_are_ascending_by_date() {
        let data = vec![
            sample(Traffic::Low),
            order("11-02-2022", Traffic::Low, City::Urban, "C1", 20, 4.0),
            sample(Traffic::Jam),
        ];
        let rows = orders_by_date(&data);
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].order_date,
            NaiveDate::from_ymd_opt(2022, 2, 11).unwrap()
        );
        assert_eq!(rows[0].orders, 1);
        assert_eq!(rows[1].orders, 2);
    }

    #[test]
    fn traffic_share_matches_the_two_to_one_split() {
        let data = vec![
            sample(Traffic::Low),
            sample(Traffic::Low),
            sample(Traffic::Jam),
        ];
        let rows = share_by_traffic(&data);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].traffic, Traffic::Low);
        assert_eq!(rows[0].orders, 2);
        assert_eq!(rows[0].share_pct, "66.67");
        assert_eq!(rows[1].traffic, Traffic::Jam);
        assert_eq!(rows[1].share_pct, "33.33");
    }

    #[test]
    fn traffic_shares_sum_to_one_hundred() {
        let data = vec![
            sample(Traffic::Low),
            sample(Traffic::Low),
            sample(Traffic::Medium),
            sample(Traffic::High),
            sample(Traffic::High),
            sample(Traffic::Jam),
            sample(Traffic::Jam),
        ];
        let sum: f64 = share_by_traffic(&data)
            .iter()
            .map(|r| r.share_pct.replace(',', "").parse::<f64>().unwrap())
            .sum();
        // Each share is rounded to two decimals, so allow rounding slack.
        assert!((sum - 100.0).abs() < 0.05, "shares sum to {}", sum);
    }

    #[test]
    fn traffic_city_rows_cover_only_present_combinations() {
        let data = vec![
            order("01-03-2022", Traffic::Low, City::Urban, "C1", 20, 4.0),
            order("01-03-2022", Traffic::Low, City::Urban, "C2", 22, 4.1),
            order("01-03-2022", Traffic::Jam, City::Metropolitan, "C3", 40, 4.2),
        ];
        let rows = orders_by_traffic_and_city(&data);
        assert_eq!(rows.len(), 2);
        assert!(rows
            .iter()
            .any(|r| r.traffic == Traffic::Low && r.city == City::Urban && r.orders == 2));
        assert!(rows
            .iter()
            .any(|r| r.traffic == Traffic::Jam && r.city == City::Metropolitan && r.orders == 1));
    }

    #[test]
    fn week_zero_starts_on_january_first() {
        let data = vec![
            order("01-01-2022", Traffic::Low, City::Urban, "C1", 20, 4.0),
            order("07-01-2022", Traffic::Low, City::Urban, "C1", 20, 4.0),
            order("08-01-2022", Traffic::Low, City::Urban, "C1", 20, 4.0),
            order("11-02-2022", Traffic::Low, City::Urban, "C1", 20, 4.0),
        ];
        let rows = orders_by_week(&data);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].week, "00");
        assert_eq!(rows[0].orders, 2);
        assert_eq!(rows[1].week, "01");
        assert_eq!(rows[2].week, "05");
    }

    #[test]
    fn courier_load_divides_by_distinct_couriers() {
        let data = vec![
            order("01-03-2022", Traffic::Low, City::Urban, "C1", 20, 4.0),
            order("02-03-2022", Traffic::Low, City::Urban, "C1", 21, 4.0),
            order("03-03-2022", Traffic::Low, City::Urban, "C2", 22, 4.0),
        ];
        let rows = orders_per_courier_by_week(&data);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].orders, 3);
        assert_eq!(rows[0].couriers, 2);
        assert_eq!(rows[0].orders_per_courier, "1.50");
    }

    #[test]
    fn map_markers_use_elementwise_medians() {
        let mut a = order("01-03-2022", Traffic::Low, City::Urban, "C1", 20, 4.0);
        a.delivery_lat = 10.0;
        a.delivery_lon = 70.0;
        let mut b = a.clone();
        b.delivery_lat = 20.0;
        b.delivery_lon = 71.0;
        let mut c = a.clone();
        c.delivery_lat = 30.0;
        c.delivery_lon = 90.0;
        let rows = median_location_by_city_and_traffic(&[a, b, c]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].city, City::Urban);
        assert_eq!(rows[0].latitude, "20.000000");
        assert_eq!(rows[0].longitude, "71.000000");
    }

    #[test]
    fn speed_ranking_caps_each_city_at_ten() {
        let mut data = Vec::new();
        for i in 0..12 {
            data.push(order(
                "01-03-2022",
                Traffic::Low,
                City::Metropolitan,
                &format!("M{:02}", i),
                20 + i,
                4.0,
            ));
        }
        for i in 0..3 {
            data.push(order(
                "01-03-2022",
                Traffic::Low,
                City::Urban,
                &format!("U{:02}", i),
                30 + i,
                4.0,
            ));
        }
        let rows = top_couriers_by_speed(&data, SpeedOrder::Fastest);
        let metro: Vec<_> = rows.iter().filter(|r| r.city == City::Metropolitan).collect();
        let urban: Vec<_> = rows.iter().filter(|r| r.city == City::Urban).collect();
        assert_eq!(metro.len(), 10);
        assert_eq!(urban.len(), 3);
        // Metropolitan block leads, cities never interleave.
        assert!(rows[..10].iter().all(|r| r.city == City::Metropolitan));
        // Fastest first within the block.
        assert_eq!(metro[0].courier_id, "M00");
        assert_eq!(metro[0].mean_time_min, "20.00");
        let times: Vec<f64> = metro
            .iter()
            .map(|r| r.mean_time_min.parse::<f64>().unwrap())
            .collect();
        assert!(times.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn speed_ranking_reverses_for_slowest() {
        let data = vec![
            order("01-03-2022", Traffic::Low, City::Urban, "C1", 20, 4.0),
            order("01-03-2022", Traffic::Low, City::Urban, "C2", 40, 4.0),
            order("01-03-2022", Traffic::Low, City::Urban, "C2", 50, 4.0),
        ];
        let rows = top_couriers_by_speed(&data, SpeedOrder::Slowest);
        assert_eq!(rows[0].courier_id, "C2");
        assert_eq!(rows[0].mean_time_min, "45.00");
        assert_eq!(rows[1].courier_id, "C1");
    }

    #[test]
    fn rating_stats_group_by_chosen_category() {
        let data = vec![
            order("01-03-2022", Traffic::Low, City::Urban, "C1", 20, 4.0),
            order("01-03-2022", Traffic::Low, City::Urban, "C2", 21, 5.0),
            order("01-03-2022", Traffic::Jam, City::Urban, "C3", 22, 3.0),
        ];
        let rows = rating_stats_by_category(&data, |o| o.traffic.to_string());
        assert_eq!(rows.len(), 2);
        // Alphabetical by category name.
        assert_eq!(rows[0].category, "Jam");
        assert_eq!(rows[0].mean_rating, "3.00");
        // Single-element group reports zero spread, not NaN.
        assert_eq!(rows[0].std_rating, "0.00");
        assert_eq!(rows[1].category, "Low");
        assert_eq!(rows[1].mean_rating, "4.50");
        assert_eq!(rows[1].std_rating, "0.71");
    }

    #[test]
    fn courier_ratings_are_averaged_per_courier() {
        let data = vec![
            order("01-03-2022", Traffic::Low, City::Urban, "C2", 20, 4.0),
            order("02-03-2022", Traffic::Low, City::Urban, "C1", 20, 5.0),
            order("03-03-2022", Traffic::Low, City::Urban, "C2", 20, 5.0),
        ];
        let rows = avg_rating_by_courier(&data);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].courier_id, "C1");
        assert_eq!(rows[0].mean_rating, "5.00");
        assert_eq!(rows[1].courier_id, "C2");
        assert_eq!(rows[1].mean_rating, "4.50");
    }

    #[test]
    fn fleet_metrics_track_extremes() {
        let mut a = order("01-03-2022", Traffic::Low, City::Urban, "C1", 20, 4.0);
        a.courier_age = 22;
        a.vehicle_condition = 0;
        let mut b = a.clone();
        b.courier_age = 39;
        b.vehicle_condition = 2;
        let m = fleet_metrics(&[a, b]).unwrap();
        assert_eq!(
            m,
            FleetMetrics {
                oldest_courier: 39,
                youngest_courier: 22,
                best_vehicle_condition: 2,
                worst_vehicle_condition: 0,
            }
        );
    }

    #[test]
    fn empty_snapshot_yields_empty_tables() {
        let data: Vec<CleanOrder> = Vec::new();
        assert!(orders_by_date(&data).is_empty());
        assert!(share_by_traffic(&data).is_empty());
        assert!(orders_by_traffic_and_city(&data).is_empty());
        assert!(orders_by_week(&data).is_empty());
        assert!(orders_per_courier_by_week(&data).is_empty());
        assert!(median_location_by_city_and_traffic(&data).is_empty());
        assert!(top_couriers_by_speed(&data, SpeedOrder::Fastest).is_empty());
        assert!(rating_stats_by_category(&data, |o| o.weather.clone()).is_empty());
        assert!(avg_rating_by_courier(&data).is_empty());
        assert!(fleet_metrics(&data).is_none());
    }
}
