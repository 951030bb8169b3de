//! Typed endpoint functions, one module per backend resource.
//!
//! All of them are inherent methods on [`crate::client::ApiClient`]. List
//! fetches return an empty collection when the request fails; mutating calls
//! return the error to the caller.

pub mod auth;
pub mod albums;
pub mod folders;
pub mod images;
pub mod services;
pub mod contacts;
pub mod statistics;
