/// Ticket for one pending frame callback.
///
/// Only the most recently requested token is honored; cancelling or
/// requesting again invalidates every earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(u64);

impl FrameToken {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Single-slot frame request, in the style of a display-synced animation
/// callback. The platform invokes the session with the token it was given;
/// stale tokens are rejected so no tick fires after cancellation.
#[derive(Debug, Clone, Default)]
pub struct FrameScheduler {
    generation: u64,
    pending: Option<u64>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the next frame, superseding any pending request.
    pub fn request(&mut self) -> FrameToken {
        self.generation += 1;
        self.pending = Some(self.generation);
        FrameToken(self.generation)
    }

    /// Drop the pending request, if any.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Consume `token` if it is the pending request.
    pub fn claim(&mut self, token: FrameToken) -> bool {
        if self.pending == Some(token.0) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_consumes_the_pending_token() {
        let mut s = FrameScheduler::new();
        let t = s.request();
        assert!(s.is_pending());
        assert!(s.claim(t));
        assert!(!s.is_pending());
        assert!(!s.claim(t));
    }

    #[test]
    fn cancel_rejects_outstanding_token() {
        let mut s = FrameScheduler::new();
        let t = s.request();
        s.cancel();
        assert!(!s.claim(t));
    }

    #[test]
    fn newer_request_supersedes_older() {
        let mut s = FrameScheduler::new();
        let old = s.request();
        let new = s.request();
        assert_ne!(old, new);
        assert!(!s.claim(old));
        assert!(s.claim(new));
    }

    #[test]
    fn token_from_before_cancel_stays_dead_after_rerequest() {
        let mut s = FrameScheduler::new();
        let old = s.request();
        s.cancel();
        let fresh = s.request();
        assert!(!s.claim(old));
        assert!(s.claim(fresh));
    }
}
