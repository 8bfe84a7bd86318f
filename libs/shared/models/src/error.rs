use thiserror::Error;

/// Failure of a call against the scheduling service.
///
/// `Validation`, `Conflict`, `NotFound` and `Service` carry whatever message
/// the server supplied (possibly empty). `Transport` and `Decode` are
/// service-class faults raised on our side and never carry a server message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulingError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Service error: {0}")]
    Service(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    Decode(String),
}

impl SchedulingError {
    /// Classify a non-success HTTP status and its server message.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            400 | 422 => SchedulingError::Validation(message),
            404 => SchedulingError::NotFound(message),
            409 => SchedulingError::Conflict(message),
            _ => SchedulingError::Service(message),
        }
    }

    pub fn server_message(&self) -> Option<&str> {
        let message = match self {
            SchedulingError::Validation(msg)
            | SchedulingError::Conflict(msg)
            | SchedulingError::NotFound(msg)
            | SchedulingError::Service(msg) => msg.as_str(),
            SchedulingError::Transport(_) | SchedulingError::Decode(_) => return None,
        };

        let trimmed = message.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }

    /// Text shown to the user: the server message when there is one.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string())
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, SchedulingError::Conflict(_))
    }

    pub fn is_service_fault(&self) -> bool {
        matches!(
            self,
            SchedulingError::Service(_) | SchedulingError::Transport(_) | SchedulingError::Decode(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_follows_taxonomy() {
        assert_eq!(SchedulingError::from_status(400, "x".into()), SchedulingError::Validation("x".into()));
        assert_eq!(SchedulingError::from_status(422, "x".into()), SchedulingError::Validation("x".into()));
        assert_eq!(SchedulingError::from_status(404, "x".into()), SchedulingError::NotFound("x".into()));
        assert_eq!(SchedulingError::from_status(409, "x".into()), SchedulingError::Conflict("x".into()));
        assert_eq!(SchedulingError::from_status(503, "x".into()), SchedulingError::Service("x".into()));
    }

    #[test]
    fn user_message_falls_back_without_server_text() {
        let err = SchedulingError::Conflict("Slot already taken".into());
        assert_eq!(err.user_message("Booking failed"), "Slot already taken");

        let err = SchedulingError::Service("   ".into());
        assert_eq!(err.user_message("Booking failed"), "Booking failed");

        let err = SchedulingError::Transport("connection refused".into());
        assert_eq!(err.user_message("Booking failed"), "Booking failed");
        assert!(err.is_service_fault());
    }
}
