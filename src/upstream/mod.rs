//! Client side of the link-shortening API
//!
//! `Endpoints` knows where things live, `Gateway` knows how to fetch them.

pub mod endpoints;
pub mod gateway;

pub use endpoints::Endpoints;
pub use gateway::{Gateway, HttpGateway};
