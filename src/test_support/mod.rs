//! Test utilities and fakes for unit tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::test_support::{RecordingResolver, TreeFixture};
//!
//! let tree = TreeFixture::new().file("lib/a/Foo.java").build();
//! let resolver = RecordingResolver::new().with_exit_codes([1]);
//! // run the pipeline, then inspect resolver.requests()
//! ```

pub mod fixtures;

use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::Result;

use crate::ops::resolve::{DependencyResolver, ResolutionRequest, ResolveOutcome};

pub use fixtures::*;

/// A resolver that records every request instead of running anything.
///
/// Exit codes are handed out in order; once they run out every call
/// succeeds.
#[derive(Debug, Default)]
pub struct RecordingResolver {
    requests: Mutex<Vec<ResolutionRequest>>,
    exit_codes: Mutex<VecDeque<i32>>,
}

impl RecordingResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the exit codes of the next calls.
    pub fn with_exit_codes(self, codes: impl IntoIterator<Item = i32>) -> Self {
        if let Ok(mut queue) = self.exit_codes.lock() {
            queue.extend(codes);
        }
        self
    }

    /// Every request seen so far, in call order.
    pub fn requests(&self) -> Vec<ResolutionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl DependencyResolver for RecordingResolver {
    fn resolve(&self, request: &ResolutionRequest) -> Result<ResolveOutcome> {
        self.requests.lock().unwrap().push(request.clone());
        let code = self.exit_codes.lock().unwrap().pop_front().unwrap_or(0);
        Ok(ResolveOutcome::exited(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_resolver_scripts_exit_codes() {
        let resolver = RecordingResolver::new().with_exit_codes([3, 4]);
        let request = ResolutionRequest {
            content_roots: vec!["lib".to_string()],
            targets: vec![],
        };

        assert_eq!(resolver.resolve(&request).unwrap(), ResolveOutcome::exited(3));
        assert_eq!(resolver.resolve(&request).unwrap(), ResolveOutcome::exited(4));
        assert!(resolver.resolve(&request).unwrap().is_success());
        assert_eq!(resolver.requests().len(), 3);
    }
}
