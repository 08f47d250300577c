//! Device location sources.

use super::error::LocationError;
use crate::coord::Coordinate;
use crate::BoxFuture;

/// Source of the user's current position.
pub trait LocationProvider: Send + Sync {
    /// Obtain one location fix.
    fn current_location(&self) -> BoxFuture<'_, Result<Coordinate, LocationError>>;
}

/// Always reports the same position. Used by the CLI, where the location is
/// passed on the command line.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinate);

impl LocationProvider for FixedLocation {
    fn current_location(&self) -> BoxFuture<'_, Result<Coordinate, LocationError>> {
        let coord = self.0;
        Box::pin(async move { Ok(coord) })
    }
}

/// A platform with no geolocation support.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedLocation;

impl LocationProvider for UnsupportedLocation {
    fn current_location(&self) -> BoxFuture<'_, Result<Coordinate, LocationError>> {
        Box::pin(async { Err(LocationError::Unsupported) })
    }
}
