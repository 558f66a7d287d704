// Desk wires session, clients and caches into the fetch-then-cache flow
// every dashboard screen repeats. Caches are touched only after a confirmed
// server response; a failed delete leaves the prior state visible.

use std::sync::Arc;

use chrono::NaiveDate;
use futures::try_join;
use tracing::info;

use crate::aggregate::{self, AvailabilitySplit, MonthlyRevenue};
use crate::cache::{self, BookingView, EntityCache, RoomView};
use crate::client::{ApiError, ResourceClient, Transport};
use crate::models::{
    Booking, Coupon, Customer, EntityId, NewBooking, NewRoom, NewRoomType, Room, RoomPatch,
    RoomType, RoomTypePatch,
};
use crate::session::SessionStore;

pub struct Desk {
    session: Arc<SessionStore>,
    room_client: ResourceClient<Room>,
    room_type_client: ResourceClient<RoomType>,
    customer_client: ResourceClient<Customer>,
    booking_client: ResourceClient<Booking>,
    coupon_client: ResourceClient<Coupon>,
    pub rooms: EntityCache<Room>,
    pub room_types: EntityCache<RoomType>,
    pub customers: EntityCache<Customer>,
    pub bookings: EntityCache<Booking>,
    pub coupons: EntityCache<Coupon>,
}

impl Desk {
    pub fn new(transport: Arc<dyn Transport>, session: Arc<SessionStore>) -> Self {
        Self {
            session,
            room_client: ResourceClient::new(transport.clone()),
            room_type_client: ResourceClient::new(transport.clone()),
            customer_client: ResourceClient::new(transport.clone()),
            booking_client: ResourceClient::new(transport.clone()),
            coupon_client: ResourceClient::new(transport),
            rooms: EntityCache::new(),
            room_types: EntityCache::new(),
            customers: EntityCache::new(),
            bookings: EntityCache::new(),
            coupons: EntityCache::new(),
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn token(&self) -> Option<String> {
        self.session.token()
    }

    // --- list refreshes ----------------------------------------------------

    pub async fn refresh_rooms(&self) -> Result<Vec<Room>, ApiError> {
        let token = self.token();
        let rooms = self.room_client.list(token.as_deref()).await?;
        self.rooms.hydrate(rooms.clone());
        Ok(rooms)
    }

    pub async fn refresh_room_types(&self) -> Result<Vec<RoomType>, ApiError> {
        let token = self.token();
        let room_types = self.room_type_client.list(token.as_deref()).await?;
        self.room_types.hydrate(room_types.clone());
        Ok(room_types)
    }

    pub async fn refresh_customers(&self) -> Result<Vec<Customer>, ApiError> {
        let token = self.token();
        let customers = self.customer_client.list(token.as_deref()).await?;
        self.customers.hydrate(customers.clone());
        Ok(customers)
    }

    pub async fn refresh_bookings(&self) -> Result<Vec<Booking>, ApiError> {
        let token = self.token();
        let bookings = self.booking_client.list(token.as_deref()).await?;
        self.bookings.hydrate(bookings.clone());
        Ok(bookings)
    }

    pub async fn refresh_coupons(&self) -> Result<Vec<Coupon>, ApiError> {
        let token = self.token();
        let coupons = self.coupon_client.list(token.as_deref()).await?;
        self.coupons.hydrate(coupons.clone());
        Ok(coupons)
    }

    // Overview screen needs rooms, room types and bookings together. The
    // fetches run concurrently, and no cache is hydrated until every branch
    // has completed, so readers never see a partially joined dashboard.
    pub async fn load_overview(&self) -> Result<(), ApiError> {
        let token = self.token();
        let token = token.as_deref();
        let (rooms, room_types, bookings) = try_join!(
            self.room_client.list(token),
            self.room_type_client.list(token),
            self.booking_client.list(token),
        )?;

        self.rooms.hydrate(rooms);
        self.room_types.hydrate(room_types);
        self.bookings.hydrate(bookings);
        info!("overview caches hydrated");
        Ok(())
    }

    // Booking form needs the customer and coupon lists together.
    pub async fn load_booking_context(&self) -> Result<(), ApiError> {
        let token = self.token();
        let token = token.as_deref();
        let (customers, coupons) = try_join!(
            self.customer_client.list(token),
            self.coupon_client.list(token),
        )?;

        self.customers.hydrate(customers);
        self.coupons.hydrate(coupons);
        Ok(())
    }

    // --- room mutations ----------------------------------------------------

    pub async fn create_room(&self, payload: &NewRoom) -> Result<Room, ApiError> {
        let token = self.token();
        let created = self.room_client.create(payload, token.as_deref()).await?;
        self.rooms.upsert(created.clone());
        Ok(created)
    }

    pub async fn update_room(&self, id: EntityId, patch: &RoomPatch) -> Result<Room, ApiError> {
        if patch.is_empty() {
            return Err(ApiError::Invalid("no fields changed".to_string()));
        }
        let token = self.token();
        let updated = self.room_client.update(id, patch, token.as_deref()).await?;
        self.rooms.upsert(updated.clone());
        Ok(updated)
    }

    pub async fn delete_room(&self, id: EntityId) -> Result<(), ApiError> {
        let token = self.token();
        self.room_client.delete(id, token.as_deref()).await?;
        self.rooms.evict(id);
        Ok(())
    }

    // --- room-type mutations -------------------------------------------------

    pub async fn create_room_type(&self, payload: &NewRoomType) -> Result<RoomType, ApiError> {
        let token = self.token();
        let created = self
            .room_type_client
            .create(payload, token.as_deref())
            .await?;
        self.room_types.upsert(created.clone());
        Ok(created)
    }

    pub async fn update_room_type(
        &self,
        id: EntityId,
        patch: &RoomTypePatch,
    ) -> Result<RoomType, ApiError> {
        if patch.is_empty() {
            return Err(ApiError::Invalid("no fields changed".to_string()));
        }
        let token = self.token();
        let updated = self
            .room_type_client
            .update(id, patch, token.as_deref())
            .await?;
        self.room_types.upsert(updated.clone());
        Ok(updated)
    }

    // Rooms referencing the deleted type keep their id; joined views fall
    // back to the "Unknown" placeholder until the room list is refreshed.
    pub async fn delete_room_type(&self, id: EntityId) -> Result<(), ApiError> {
        let token = self.token();
        self.room_type_client.delete(id, token.as_deref()).await?;
        self.room_types.evict(id);
        Ok(())
    }

    // --- booking mutations ---------------------------------------------------

    pub async fn create_booking(&self, payload: &NewBooking) -> Result<Booking, ApiError> {
        payload.validate().map_err(ApiError::Invalid)?;
        let token = self.token();
        let created = self
            .booking_client
            .create(payload, token.as_deref())
            .await?;
        self.bookings.upsert(created.clone());
        Ok(created)
    }

    pub async fn delete_booking(&self, id: EntityId) -> Result<(), ApiError> {
        let token = self.token();
        self.booking_client.delete(id, token.as_deref()).await?;
        self.bookings.evict(id);
        Ok(())
    }

    // Transient availability query for the booking form; not cached, the
    // result is only valid for the requested date range.
    pub async fn available_rooms(
        &self,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<Vec<Room>, ApiError> {
        let token = self.token();
        self.booking_client
            .available_rooms(check_in, check_out, token.as_deref())
            .await
    }

    // Customers registered today, for the overview stat card. Not cached:
    // it is a server-side filtered subset, not the canonical customer list.
    pub async fn customers_today(&self) -> Result<Vec<Customer>, ApiError> {
        let token = self.token();
        self.customer_client.today(token.as_deref()).await
    }

    // Local tear-down on logout: the token and every cached snapshot belong
    // to the authenticated session, so they go together.
    pub fn end_session(&self) {
        self.session.clear();
        self.rooms.clear();
        self.room_types.clear();
        self.customers.clear();
        self.bookings.clear();
        self.coupons.clear();
        info!("session ended, caches cleared");
    }

    // --- cache-backed reads ----------------------------------------------------

    pub fn room_views(&self) -> Vec<RoomView> {
        cache::room_views(&self.rooms, &self.room_types)
    }

    pub fn booking_views(&self) -> Vec<BookingView> {
        cache::booking_views(&self.bookings, &self.customers)
    }

    pub fn total_revenue(&self) -> f64 {
        aggregate::total_revenue(&self.bookings.all())
    }

    pub fn revenue_by_month(&self) -> Vec<MonthlyRevenue> {
        aggregate::revenue_by_month(&self.bookings.all())
    }

    pub fn availability(&self) -> AvailabilitySplit {
        aggregate::availability_split(&self.rooms.all())
    }
}
