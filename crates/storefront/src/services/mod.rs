//! External service clients.

pub mod geocoder;

pub use geocoder::{GeocodeError, GeocoderClient, ResolvedAddress};
