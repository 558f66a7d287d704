// Per-resource in-memory entity cache. Content reflects only
// server-confirmed state: hydrate after a list fetch, upsert after a 2xx
// create/update, evict after a 2xx delete. There is no optimistic path.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;
use tracing::debug;

use crate::models::{Booking, Customer, Entity, EntityId, Room, RoomType};

#[derive(Debug, Default)]
struct CacheStats {
    hit_count: AtomicUsize,
    miss_count: AtomicUsize,
    hydrate_count: AtomicUsize,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStatsReport {
    pub items_count: usize,
    pub hit_count: usize,
    pub miss_count: usize,
    pub hydrate_count: usize,
}

#[derive(Debug, Default)]
pub struct EntityCache<T: Entity> {
    entries: RwLock<HashMap<EntityId, T>>,
    stats: CacheStats,
}

impl<T: Entity> EntityCache<T> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            stats: CacheStats::default(),
        }
    }

    // Full-replace from a fresh list fetch. The new map is built before the
    // write lock is taken, so readers never observe a partially filled
    // snapshot. Duplicate ids collapse to the last occurrence.
    pub fn hydrate(&self, entities: Vec<T>) {
        let fresh: HashMap<EntityId, T> = entities
            .into_iter()
            .map(|entity| (entity.id(), entity))
            .collect();
        let count = fresh.len();
        *self.entries.write() = fresh;
        self.stats.hydrate_count.fetch_add(1, Ordering::Relaxed);
        debug!(count, "cache hydrated");
    }

    pub fn upsert(&self, entity: T) {
        self.entries.write().insert(entity.id(), entity);
    }

    // Removing an absent id is a no-op, not an error.
    pub fn evict(&self, id: EntityId) -> bool {
        self.entries.write().remove(&id).is_some()
    }

    pub fn resolve(&self, id: EntityId) -> Option<T> {
        let found = self.entries.read().get(&id).cloned();
        match found {
            Some(entity) => {
                self.stats.hit_count.fetch_add(1, Ordering::Relaxed);
                Some(entity)
            }
            None => {
                self.stats.miss_count.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entries.read().contains_key(&id)
    }

    // Snapshot copy, stable for the duration of one render pass.
    pub fn all(&self) -> Vec<T> {
        self.entries.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn stats(&self) -> CacheStatsReport {
        CacheStatsReport {
            items_count: self.len(),
            hit_count: self.stats.hit_count.load(Ordering::Relaxed),
            miss_count: self.stats.miss_count.load(Ordering::Relaxed),
            hydrate_count: self.stats.hydrate_count.load(Ordering::Relaxed),
        }
    }
}

// One-hop join of a room against the room-type cache. A dangling type
// reference renders as a placeholder, never a crash.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomView {
    pub room: Room,
    pub room_type: Option<RoomType>,
}

impl RoomView {
    pub fn type_name(&self) -> &str {
        self.room_type
            .as_ref()
            .map(|t| t.name.as_str())
            .unwrap_or("Unknown")
    }

    pub fn nightly_price(&self) -> Option<f64> {
        self.room_type.as_ref().map(|t| t.price)
    }

    pub fn price_label(&self) -> String {
        match self.nightly_price() {
            Some(price) => format!("${price:.2}"),
            None => "N/A".to_string(),
        }
    }
}

pub fn room_view(
    rooms: &EntityCache<Room>,
    room_types: &EntityCache<RoomType>,
    id: EntityId,
) -> Option<RoomView> {
    let room = rooms.resolve(id)?;
    let room_type = room_types.resolve(room.room_type_id);
    Some(RoomView { room, room_type })
}

pub fn room_views(rooms: &EntityCache<Room>, room_types: &EntityCache<RoomType>) -> Vec<RoomView> {
    rooms
        .all()
        .into_iter()
        .map(|room| {
            let room_type = room_types.resolve(room.room_type_id);
            RoomView { room, room_type }
        })
        .collect()
}

// Booking joined to its customer, for the orders table.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingView {
    pub booking: Booking,
    pub customer: Option<Customer>,
}

impl BookingView {
    pub fn customer_name(&self) -> &str {
        self.customer
            .as_ref()
            .map(|c| {
                if c.full_name.is_empty() {
                    c.username.as_str()
                } else {
                    c.full_name.as_str()
                }
            })
            .unwrap_or("Unknown")
    }
}

pub fn booking_views(
    bookings: &EntityCache<Booking>,
    customers: &EntityCache<Customer>,
) -> Vec<BookingView> {
    bookings
        .all()
        .into_iter()
        .map(|booking| {
            let customer = customers.resolve(booking.customer_id);
            BookingView { booking, customer }
        })
        .collect()
}
