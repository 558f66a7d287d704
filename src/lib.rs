// Client-side data layer for the hotel front-desk dashboard: session token
// handling, typed REST resource clients, per-resource entity caches, and
// pure aggregation over cached bookings and rooms.

pub mod account;
pub mod aggregate;
pub mod cache;
pub mod client;
pub mod desk;
pub mod models;
pub mod session;

// Re-export key types for convenience
pub use account::{AccountClient, LoginResponse, Profile, ProfilePatch, UserInfo};
pub use aggregate::{
    availability_split, count_by_status, revenue_by_day, revenue_by_month, revenue_by_weekday,
    total_revenue, AvailabilitySplit, MonthlyRevenue,
};
pub use cache::{
    booking_views, room_view, room_views, BookingView, CacheStatsReport, EntityCache, RoomView,
};
pub use client::{
    ApiError, ApiRequest, ApiResponse, ClientError, HttpTransport, Method, Resource,
    ResourceClient, Transport,
};
pub use desk::Desk;
pub use models::{
    Booking, Coupon, CouponKind, Customer, Entity, EntityId, NewBooking, NewRoom, NewRoomType,
    PaymentStatus, Room, RoomPatch, RoomType, RoomTypePatch,
};
pub use session::SessionStore;
