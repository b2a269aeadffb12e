// Collection error type and its HTTP status mapping

use axum::http::StatusCode;

/// Failure while producing a metrics snapshot.
///
/// Per-file and per-container read failures are absorbed as metric omission;
/// only failures that leave no snapshot to serve surface here.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error("docker api error: {0}")]
    Docker(#[from] bollard::errors::Error),
}

impl CollectError {
    /// Status code for the error response. Docker server-side errors keep
    /// the daemon's status; everything else is a 500.
    pub fn status_code(&self) -> StatusCode {
        match self {
            CollectError::Docker(bollard::errors::Error::DockerResponseServerError {
                status_code,
                ..
            }) => StatusCode::from_u16(*status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            CollectError::Docker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daemon_status_passes_through() {
        let err = CollectError::Docker(bollard::errors::Error::DockerResponseServerError {
            status_code: 404,
            message: "no such container".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn transport_errors_map_to_internal_error() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = CollectError::Docker(bollard::errors::Error::IOError { err: io });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
