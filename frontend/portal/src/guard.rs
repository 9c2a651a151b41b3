//! Single-in-flight request guard.
//!
//! Each component owns one [`InFlight`]. A request is admitted by
//! [`InFlight::try_begin`], which checks and sets the flag in the same
//! synchronous call, before any future is created. The completion must hand
//! back the matching [`RequestToken`]; anything else is a stale or duplicate
//! completion and leaves the guard untouched.

/// Identifies one admitted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

#[derive(Debug, Default)]
pub struct InFlight {
    current: Option<RequestToken>,
    issued: u64,
}

impl InFlight {
    /// Admit a new request, or `None` while another one is outstanding.
    pub fn try_begin(&mut self) -> Option<RequestToken> {
        if self.current.is_some() {
            return None;
        }
        self.issued += 1;
        let token = RequestToken(self.issued);
        self.current = Some(token);
        Some(token)
    }

    /// Clear the flag for `token`. Returns `false` if `token` is not the
    /// outstanding request, in which case its result must be dropped.
    pub fn settle(&mut self, token: RequestToken) -> bool {
        if self.current == Some(token) {
            self.current = None;
            true
        } else {
            false
        }
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_begin_is_rejected_while_outstanding() {
        let mut guard = InFlight::default();
        let token = guard.try_begin().unwrap();
        assert!(guard.is_active());
        assert!(guard.try_begin().is_none());

        assert!(guard.settle(token));
        assert!(!guard.is_active());
        assert!(guard.try_begin().is_some());
    }

    #[test]
    fn settle_clears_exactly_once() {
        let mut guard = InFlight::default();
        let token = guard.try_begin().unwrap();
        assert!(guard.settle(token));
        assert!(!guard.settle(token));
    }

    #[test]
    fn stale_token_does_not_clear_newer_request() {
        let mut guard = InFlight::default();
        let old = guard.try_begin().unwrap();
        guard.settle(old);
        let new = guard.try_begin().unwrap();

        assert_ne!(old, new);
        assert!(!guard.settle(old));
        assert!(guard.is_active());
    }
}
