//! Seam for the platform's geolocation service.

use async_trait::async_trait;
use thiserror::Error;

use crate::model::Coordinates;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("location unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_location(&self) -> Result<Coordinates, LocationError>;
}

/// Location known up front, e.g. from the command line or the config file.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocation(pub Option<Coordinates>);

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_location(&self) -> Result<Coordinates, LocationError> {
        self.0.ok_or_else(|| LocationError::Unavailable("no coordinates configured".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_location_returns_configured_coordinates() {
        let provider = FixedLocation(Some(Coordinates::new(51.5, -0.12)));
        assert_eq!(provider.current_location().await, Ok(Coordinates::new(51.5, -0.12)));
    }

    #[tokio::test]
    async fn empty_fixed_location_is_unavailable() {
        let err = FixedLocation(None).current_location().await.unwrap_err();
        assert!(matches!(err, LocationError::Unavailable(_)));
    }
}
