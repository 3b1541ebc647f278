//! Storefront models for records, request payloads and responses

pub mod account;
pub mod image;
pub mod order;

// Re-export for convenience
pub use account::{
    Account, AccountKind, AccountSummary, LoginRequest, NewAccount, ProfileQuery, RegisterRequest,
};
pub use image::{Image, NewImage, UploadRequest};
pub use order::{
    CreateOrderRequest, LineItem, LineItemRequest, LineItemView, NewOrder, Order, OrderCustomer,
    OrderProduct, OrderView, PAYMENT_STATUS_PENDING,
};
