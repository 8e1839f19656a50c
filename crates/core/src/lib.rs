//! Showroom Core - Shared types and session cart logic.
//!
//! This crate provides the stateful pieces behind the Showroom sites:
//! - `storefront` - HTTP surface that keeps the cart in the visitor's session
//! - `integration-tests` - End-to-end tests against the storefront router
//!
//! # Architecture
//!
//! The core crate contains only types, traits and pure logic - no network,
//! no HTTP, no filesystem. Persistence goes through the [`SessionStorage`]
//! trait so the cart can be backed by anything that behaves like a
//! per-session key/value slot.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, emails and line items
//! - [`storage`] - Session-scoped key/value storage contract
//! - [`cart`] - The session cart store
//! - [`contact`] - Contact form validation
//! - [`catalog`] - Product catalog filtering and search

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod contact;
pub mod storage;
pub mod types;

pub use cart::{
    CART_STORAGE_KEY, CartBadge, CartStore, ParseRepeatAddError, PersistenceWarning, RepeatAdd,
};
pub use catalog::{Catalog, CatalogError, CategoryFilter, Product};
pub use contact::{AlertLevel, ContactError, ContactForm, ContactSubmission};
pub use storage::{DisabledStorage, MemoryStorage, SessionStorage, StorageError};
pub use types::*;
