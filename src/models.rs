// Entity types for the receptionist backend's REST contract.
// Field names follow the wire format; monetary amounts arrive either as JSON
// numbers or as strings ("50.00"), so they get a lenient deserializer.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

pub type EntityId = u64;

// Anything the entity cache can key by id.
pub trait Entity: Clone + Send + Sync + 'static {
    fn id(&self) -> EntityId;
}

fn decimal<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => text.trim().parse::<f64>().map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: EntityId,
    pub room_number: String,
    #[serde(rename = "room_type")]
    pub room_type_id: EntityId,
    pub is_available: bool,
}

impl Entity for Room {
    fn id(&self) -> EntityId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomType {
    pub id: EntityId,
    #[serde(rename = "type")]
    pub name: String,
    #[serde(deserialize_with = "decimal")]
    pub price: f64,
    pub bed_count: u32,
    pub capacity: u32,
}

impl Entity for RoomType {
    fn id(&self) -> EntityId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: EntityId,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
}

impl Entity for Customer {
    fn id(&self) -> EntityId {
        self.id
    }
}

// Payment lifecycle of a booking. The backend spells these in arbitrary
// case ("paid", "Paid"), so parsing is case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PaymentStatus {
    Initiated,
    Paid,
    Expired,
    Canceled,
    Refunded,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 5] = [
        PaymentStatus::Initiated,
        PaymentStatus::Paid,
        PaymentStatus::Expired,
        PaymentStatus::Canceled,
        PaymentStatus::Refunded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Initiated => "Initiated",
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Expired => "Expired",
            PaymentStatus::Canceled => "Canceled",
            PaymentStatus::Refunded => "Refunded",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "initiated" => Ok(PaymentStatus::Initiated),
            "paid" => Ok(PaymentStatus::Paid),
            "expired" => Ok(PaymentStatus::Expired),
            "canceled" => Ok(PaymentStatus::Canceled),
            "refunded" => Ok(PaymentStatus::Refunded),
            other => Err(format!("unknown payment status: {other}")),
        }
    }
}

impl Serialize for PaymentStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.as_str().to_ascii_lowercase())
    }
}

impl<'de> Deserialize<'de> for PaymentStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    // The legacy dashboard read `bookingid` in one place and `booking_id` in
    // another; the alias keeps both wire spellings mapping to one field.
    #[serde(alias = "booking_id", alias = "bookingid")]
    pub id: EntityId,
    #[serde(rename = "user", alias = "user_id")]
    pub customer_id: EntityId,
    #[serde(rename = "rooms", default)]
    pub room_ids: Vec<EntityId>,
    #[serde(rename = "coupons", default)]
    pub coupon_ids: Vec<EntityId>,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub num_adults: u32,
    pub num_children: u32,
    #[serde(deserialize_with = "decimal")]
    pub total: f64,
    pub payment_status: PaymentStatus,
}

impl Entity for Booking {
    fn id(&self) -> EntityId {
        self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CouponKind {
    #[serde(alias = "Percentage")]
    Percentage,
    #[serde(alias = "Fixed")]
    Fixed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    pub id: EntityId,
    #[serde(rename = "type")]
    pub kind: CouponKind,
    #[serde(deserialize_with = "decimal")]
    pub discount: f64,
}

impl Entity for Coupon {
    fn id(&self) -> EntityId {
        self.id
    }
}

// --- create / patch payloads ---------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct NewRoom {
    pub room_number: String,
    #[serde(rename = "room_type")]
    pub room_type_id: EntityId,
    pub is_available: bool,
}

// Minimal-diff update: only fields that differ from the last-known value are
// serialized, mirroring how the room edit form submits changes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RoomPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_number: Option<String>,
    #[serde(rename = "room_type", skip_serializing_if = "Option::is_none")]
    pub room_type_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
}

impl RoomPatch {
    pub fn diff(current: &Room, desired: &Room) -> Self {
        Self {
            room_number: (current.room_number != desired.room_number)
                .then(|| desired.room_number.clone()),
            room_type_id: (current.room_type_id != desired.room_type_id)
                .then_some(desired.room_type_id),
            is_available: (current.is_available != desired.is_available)
                .then_some(desired.is_available),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.room_number.is_none() && self.room_type_id.is_none() && self.is_available.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewRoomType {
    #[serde(rename = "type")]
    pub name: String,
    pub price: f64,
    pub bed_count: u32,
    pub capacity: u32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RoomTypePatch {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bed_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
}

impl RoomTypePatch {
    pub fn diff(current: &RoomType, desired: &RoomType) -> Self {
        Self {
            name: (current.name != desired.name).then(|| desired.name.clone()),
            price: (current.price != desired.price).then_some(desired.price),
            bed_count: (current.bed_count != desired.bed_count).then_some(desired.bed_count),
            capacity: (current.capacity != desired.capacity).then_some(desired.capacity),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.bed_count.is_none()
            && self.capacity.is_none()
    }
}

// Booking creation payload, shaped like the booking form submission.
#[derive(Debug, Clone, Serialize)]
pub struct NewBooking {
    pub user_id: EntityId,
    pub rooms: Vec<EntityId>,
    pub coupons: Vec<EntityId>,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub num_adults: u32,
    pub num_children: u32,
    pub payment_intent: String,
}

impl NewBooking {
    // Rejects payloads the server would refuse anyway, before any network I/O.
    pub fn validate(&self) -> Result<(), String> {
        if self.rooms.is_empty() {
            return Err("booking must include at least one room".to_string());
        }
        if self.check_out_date <= self.check_in_date {
            return Err("check-out date must be after check-in date".to_string());
        }
        if self.num_adults == 0 {
            return Err("booking must include at least one adult".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_deserializes_from_wire_shape() {
        let raw = r#"{
            "booking_id": 12,
            "user": 3,
            "rooms": [1, 2],
            "coupons": [],
            "check_in_date": "2024-01-01",
            "check_out_date": "2024-01-03",
            "num_adults": 2,
            "num_children": 1,
            "total": "150.50",
            "payment_status": "paid"
        }"#;

        let booking: Booking = serde_json::from_str(raw).unwrap();
        assert_eq!(booking.id, 12);
        assert_eq!(booking.customer_id, 3);
        assert_eq!(booking.room_ids, vec![1, 2]);
        assert_eq!(booking.total, 150.50);
        assert_eq!(booking.payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn booking_accepts_numeric_total_and_mixed_case_status() {
        let raw = r#"{
            "id": 7,
            "user_id": 9,
            "rooms": [4],
            "check_in_date": "2024-02-10",
            "check_out_date": "2024-02-12",
            "num_adults": 1,
            "num_children": 0,
            "total": 99.0,
            "payment_status": "Refunded"
        }"#;

        let booking: Booking = serde_json::from_str(raw).unwrap();
        assert_eq!(booking.total, 99.0);
        assert_eq!(booking.payment_status, PaymentStatus::Refunded);
        assert!(booking.coupon_ids.is_empty());
    }

    #[test]
    fn unknown_payment_status_is_an_error() {
        let result: Result<PaymentStatus, _> = serde_json::from_str(r#""pending""#);
        assert!(result.is_err());
    }

    #[test]
    fn room_type_price_accepts_string() {
        let raw = r#"{"id": 10, "type": "Deluxe", "price": "100.00", "bed_count": 2, "capacity": 4}"#;
        let room_type: RoomType = serde_json::from_str(raw).unwrap();
        assert_eq!(room_type.name, "Deluxe");
        assert_eq!(room_type.price, 100.0);
    }

    #[test]
    fn room_patch_contains_only_changed_fields() {
        let current = Room {
            id: 1,
            room_number: "101".to_string(),
            room_type_id: 10,
            is_available: true,
        };
        let mut desired = current.clone();
        desired.is_available = false;

        let patch = RoomPatch::diff(&current, &desired);
        assert!(patch.room_number.is_none());
        assert!(patch.room_type_id.is_none());
        assert_eq!(patch.is_available, Some(false));

        let body = serde_json::to_value(&patch).unwrap();
        let keys: Vec<&String> = body.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["is_available"]);
    }

    #[test]
    fn identical_rooms_produce_empty_patch() {
        let room = Room {
            id: 1,
            room_number: "101".to_string(),
            room_type_id: 10,
            is_available: true,
        };
        assert!(RoomPatch::diff(&room, &room).is_empty());
    }

    #[test]
    fn new_booking_validation() {
        let mut booking = NewBooking {
            user_id: 1,
            rooms: vec![5],
            coupons: vec![],
            full_name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: "555-0100".to_string(),
            check_in_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            check_out_date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            num_adults: 2,
            num_children: 0,
            payment_intent: "cash".to_string(),
        };
        assert!(booking.validate().is_ok());

        booking.rooms.clear();
        assert!(booking.validate().is_err());

        booking.rooms = vec![5];
        booking.check_out_date = booking.check_in_date;
        assert!(booking.validate().is_err());
    }
}
