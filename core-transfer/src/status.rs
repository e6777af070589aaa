//! Response Classification
//!
//! One canonical table maps a transport status to what the transfer
//! loop should do next. The same table serves the zero-length status
//! probe and the chunk PUT path; the provider's contract does not
//! distinguish them.

/// Outcome class of one resumable-upload response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// The resource now exists; the transfer is finished.
    Completed,
    /// The session is alive and expects more bytes.
    Resumable,
    /// The session is dead; resending the same bytes will not help.
    PermanentFailure,
}

/// Classify a resumable-upload response status.
///
/// 201 is the only terminal success: the provider answers it once the
/// full content is stored. 200 acknowledges an intermediate probe or
/// chunk and never means done. 308 is the documented "resume
/// incomplete" status, and the 5xx transients keep the session alive
/// for a later retry.
pub fn classify(status: u16) -> ResponseKind {
    match status {
        201 => ResponseKind::Completed,
        200 | 308 | 500 | 502 | 503 | 504 => ResponseKind::Resumable,
        _ => ResponseKind::PermanentFailure,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_is_completed() {
        assert_eq!(classify(201), ResponseKind::Completed);
    }

    #[test]
    fn test_intermediate_acks_are_resumable() {
        for status in [200, 308, 500, 502, 503, 504] {
            assert_eq!(classify(status), ResponseKind::Resumable, "status {status}");
        }
    }

    #[test]
    fn test_everything_else_is_permanent() {
        for status in [301, 400, 401, 403, 404, 410, 501, 505] {
            assert_eq!(
                classify(status),
                ResponseKind::PermanentFailure,
                "status {status}"
            );
        }
    }
}
