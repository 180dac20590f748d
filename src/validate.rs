// Schema and row validation: one raw CSV row in, one typed order out, or a
// reason why the row cannot be used.
use crate::types::{City, CleanOrder, RawOrder, Traffic};
use crate::util::{parse_date_safe, parse_f64_safe, parse_i32_safe};
use thiserror::Error;

/// Sentinel the export writes into unobserved fields.
pub const MISSING: &str = "NaN";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("{0} is missing")]
    Missing(&'static str),
    #[error("{0} is not a valid number")]
    BadNumber(&'static str),
    #[error("Order_Date is not a day-month-year date")]
    BadDate,
    #[error("Time_taken(min) has no integer minute count")]
    BadTimeTaken,
    #[error("{field} holds unknown category {value:?}")]
    UnknownCategory {
        field: &'static str,
        value: String,
    },
}

/// Trimmed, non-sentinel text or a `Missing` rejection.
fn required_text(field: &'static str, value: Option<&str>) -> Result<String, RowError> {
    let v = value.unwrap_or("").trim();
    if v.is_empty() || v == MISSING {
        return Err(RowError::Missing(field));
    }
    Ok(v.to_string())
}

fn required_i32(field: &'static str, value: Option<&str>) -> Result<i32, RowError> {
    let v = required_text(field, value)?;
    parse_i32_safe(Some(&v)).ok_or(RowError::BadNumber(field))
}

fn required_f64(field: &'static str, value: Option<&str>) -> Result<f64, RowError> {
    let v = required_text(field, value)?;
    parse_f64_safe(Some(&v)).ok_or(RowError::BadNumber(field))
}

/// The time-taken field is free text ending in a minute count, e.g.
/// `(min) 24`. Only that final integer token is meaningful.
fn extract_minutes(value: Option<&str>) -> Result<i32, RowError> {
    let v = required_text("Time_taken(min)", value).map_err(|_| RowError::BadTimeTaken)?;
    let token = v.split_whitespace().last().ok_or(RowError::BadTimeTaken)?;
    token.parse::<i32>().map_err(|_| RowError::BadTimeTaken)
}

fn category<T: std::str::FromStr>(
    field: &'static str,
    value: Option<&str>,
) -> Result<T, RowError> {
    let v = required_text(field, value)?;
    v.parse::<T>().map_err(|_| RowError::UnknownCategory {
        field,
        value: v,
    })
}

/// Validate and coerce a single raw row.
///
/// The checks mirror the data model: the four sentinel-prone fields (age,
/// traffic, city, multiple deliveries) reject on the `NaN` marker, numeric
/// and date fields reject when unparseable, and the remaining text fields
/// are kept trimmed. A failure never aborts the load; the caller drops the
/// row and counts the reason.
pub fn validate_row(raw: &RawOrder) -> Result<CleanOrder, RowError> {
    let order_id = required_text("ID", raw.order_id.as_deref())?;
    let courier_id = required_text("Delivery_person_ID", raw.courier_id.as_deref())?;
    let courier_age = required_i32("Delivery_person_Age", raw.courier_age.as_deref())?;
    let courier_rating = required_f64("Delivery_person_Ratings", raw.courier_rating.as_deref())?;

    let order_date = parse_date_safe(raw.order_date.as_deref()).ok_or(RowError::BadDate)?;

    let restaurant_lat = required_f64("Restaurant_latitude", raw.restaurant_latitude.as_deref())?;
    let restaurant_lon = required_f64("Restaurant_longitude", raw.restaurant_longitude.as_deref())?;
    let delivery_lat = required_f64(
        "Delivery_location_latitude",
        raw.delivery_latitude.as_deref(),
    )?;
    let delivery_lon = required_f64(
        "Delivery_location_longitude",
        raw.delivery_longitude.as_deref(),
    )?;

    let multiple_deliveries = required_i32("multiple_deliveries", raw.multiple_deliveries.as_deref())?;
    let traffic: Traffic = category("Road_traffic_density", raw.traffic.as_deref())?;
    let city: City = category("City", raw.city.as_deref())?;
    let vehicle_condition = required_i32("Vehicle_condition", raw.vehicle_condition.as_deref())?;
    let time_taken_min = extract_minutes(raw.time_taken.as_deref())?;

    // Descriptive text columns are kept as-is apart from trimming; the
    // export never marks them with a bare sentinel.
    let weather = raw.weather.as_deref().unwrap_or("").trim().to_string();
    let order_type = raw.order_type.as_deref().unwrap_or("").trim().to_string();
    let vehicle_type = raw.vehicle_type.as_deref().unwrap_or("").trim().to_string();
    let festival = raw.festival.as_deref().unwrap_or("").trim().to_string();

    Ok(CleanOrder {
        order_id,
        courier_id,
        courier_age,
        courier_rating,
        order_date,
        restaurant_lat,
        restaurant_lon,
        delivery_lat,
        delivery_lon,
        weather,
        traffic,
        vehicle_condition,
        order_type,
        vehicle_type,
        multiple_deliveries,
        festival,
        city,
        time_taken_min,
    })
}
