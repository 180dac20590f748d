use chrono::NaiveDate;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use tabled::Tabled;

/// One raw CSV row, every field as exported text. The validator decides
/// what survives and with which type.
#[derive(Debug, Deserialize)]
pub struct RawOrder {
    #[serde(rename = "ID")]
    pub order_id: Option<String>,
    #[serde(rename = "Delivery_person_ID")]
    pub courier_id: Option<String>,
    #[serde(rename = "Delivery_person_Age")]
    pub courier_age: Option<String>,
    #[serde(rename = "Delivery_person_Ratings")]
    pub courier_rating: Option<String>,
    #[serde(rename = "Restaurant_latitude")]
    pub restaurant_latitude: Option<String>,
    #[serde(rename = "Restaurant_longitude")]
    pub restaurant_longitude: Option<String>,
    #[serde(rename = "Delivery_location_latitude")]
    pub delivery_latitude: Option<String>,
    #[serde(rename = "Delivery_location_longitude")]
    pub delivery_longitude: Option<String>,
    #[serde(rename = "Order_Date")]
    pub order_date: Option<String>,
    #[serde(rename = "Weatherconditions")]
    pub weather: Option<String>,
    #[serde(rename = "Road_traffic_density")]
    pub traffic: Option<String>,
    #[serde(rename = "Vehicle_condition")]
    pub vehicle_condition: Option<String>,
    #[serde(rename = "Type_of_order")]
    pub order_type: Option<String>,
    #[serde(rename = "Type_of_vehicle")]
    pub vehicle_type: Option<String>,
    #[serde(rename = "multiple_deliveries")]
    pub multiple_deliveries: Option<String>,
    #[serde(rename = "Festival")]
    pub festival: Option<String>,
    #[serde(rename = "City")]
    pub city: Option<String>,
    #[serde(rename = "Time_taken(min)")]
    pub time_taken: Option<String>,
}

/// Road congestion level at order time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Traffic {
    Low,
    Medium,
    High,
    Jam,
}

impl Traffic {
    pub const ALL: [Traffic; 4] = [Traffic::Low, Traffic::Medium, Traffic::High, Traffic::Jam];

    pub fn as_str(self) -> &'static str {
        match self {
            Traffic::Low => "Low",
            Traffic::Medium => "Medium",
            Traffic::High => "High",
            Traffic::Jam => "Jam",
        }
    }
}

impl fmt::Display for Traffic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Traffic {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(Traffic::Low),
            "Medium" => Ok(Traffic::Medium),
            "High" => Ok(Traffic::High),
            "Jam" => Ok(Traffic::Jam),
            _ => Err(()),
        }
    }
}

/// Delivery-zone classification. The export spells the first category
/// "Metropolitian"; both spellings parse to the canonical form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum City {
    Metropolitan,
    Urban,
    SemiUrban,
}

impl City {
    pub const ALL: [City; 3] = [City::Metropolitan, City::Urban, City::SemiUrban];

    pub fn as_str(self) -> &'static str {
        match self {
            City::Metropolitan => "Metropolitan",
            City::Urban => "Urban",
            City::SemiUrban => "Semi-Urban",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for City {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Metropolitan" | "Metropolitian" => Ok(City::Metropolitan),
            "Urban" => Ok(City::Urban),
            "Semi-Urban" => Ok(City::SemiUrban),
            _ => Err(()),
        }
    }
}

/// One validated order. Text fields are trimmed, numbers are typed, and
/// traffic/city are known categories. `Tabled` backs the sample-row
/// inspection view.
#[derive(Debug, Clone, Tabled)]
pub struct CleanOrder {
    #[tabled(rename = "OrderID")]
    pub order_id: String,
    #[tabled(rename = "Courier")]
    pub courier_id: String,
    #[tabled(rename = "Age")]
    pub courier_age: i32,
    #[tabled(rename = "Rating")]
    pub courier_rating: f64,
    #[tabled(rename = "OrderDate")]
    pub order_date: NaiveDate,
    #[tabled(rename = "RestLat")]
    pub restaurant_lat: f64,
    #[tabled(rename = "RestLon")]
    pub restaurant_lon: f64,
    #[tabled(rename = "DelivLat")]
    pub delivery_lat: f64,
    #[tabled(rename = "DelivLon")]
    pub delivery_lon: f64,
    #[tabled(rename = "Weather")]
    pub weather: String,
    #[tabled(rename = "Traffic")]
    pub traffic: Traffic,
    #[tabled(rename = "VehCond")]
    pub vehicle_condition: i32,
    #[tabled(rename = "OrderType")]
    pub order_type: String,
    #[tabled(rename = "Vehicle")]
    pub vehicle_type: String,
    #[tabled(rename = "MultiDeliv")]
    pub multiple_deliveries: i32,
    #[tabled(rename = "Festival")]
    pub festival: String,
    #[tabled(rename = "City")]
    pub city: City,
    #[tabled(rename = "TimeMin")]
    pub time_taken_min: i32,
}

#[derive(Debug, Tabled, Clone)]
pub struct DailyOrdersRow {
    #[tabled(rename = "OrderDate")]
    pub order_date: NaiveDate,
    #[tabled(rename = "Orders")]
    pub orders: usize,
}

#[derive(Debug, Tabled, Clone)]
pub struct TrafficShareRow {
    #[tabled(rename = "Traffic")]
    pub traffic: Traffic,
    #[tabled(rename = "Orders")]
    pub orders: usize,
    #[tabled(rename = "SharePct")]
    pub share_pct: String,
}

#[derive(Debug, Tabled, Clone)]
pub struct TrafficCityRow {
    #[tabled(rename = "Traffic")]
    pub traffic: Traffic,
    #[tabled(rename = "City")]
    pub city: City,
    #[tabled(rename = "Orders")]
    pub orders: usize,
}

#[derive(Debug, Tabled, Clone)]
pub struct WeeklyOrdersRow {
    #[tabled(rename = "Week")]
    pub week: String,
    #[tabled(rename = "Orders")]
    pub orders: usize,
}

#[derive(Debug, Tabled, Clone)]
pub struct WeeklyCourierLoadRow {
    #[tabled(rename = "Week")]
    pub week: String,
    #[tabled(rename = "Orders")]
    pub orders: usize,
    #[tabled(rename = "Couriers")]
    pub couriers: usize,
    #[tabled(rename = "OrdersPerCourier")]
    pub orders_per_courier: String,
}

/// One map marker: the median delivery point of a (city, traffic) group.
#[derive(Debug, Tabled, Clone)]
pub struct MapMarkerRow {
    #[tabled(rename = "City")]
    pub city: City,
    #[tabled(rename = "Traffic")]
    pub traffic: Traffic,
    #[tabled(rename = "Latitude")]
    pub latitude: String,
    #[tabled(rename = "Longitude")]
    pub longitude: String,
}

#[derive(Debug, Tabled, Clone)]
pub struct CourierSpeedRow {
    #[tabled(rename = "Courier")]
    pub courier_id: String,
    #[tabled(rename = "City")]
    pub city: City,
    #[tabled(rename = "MeanTimeMin")]
    pub mean_time_min: String,
}

#[derive(Debug, Tabled, Clone)]
pub struct RatingStatsRow {
    #[tabled(rename = "Category")]
    pub category: String,
    #[tabled(rename = "MeanRating")]
    pub mean_rating: String,
    #[tabled(rename = "StdRating")]
    pub std_rating: String,
}

#[derive(Debug, Tabled, Clone)]
pub struct CourierRatingRow {
    #[tabled(rename = "Courier")]
    pub courier_id: String,
    #[tabled(rename = "MeanRating")]
    pub mean_rating: String,
}

/// Extremes shown as metric cards on the courier page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FleetMetrics {
    pub oldest_courier: i32,
    pub youngest_courier: i32,
    pub best_vehicle_condition: i32,
    pub worst_vehicle_condition: i32,
}
