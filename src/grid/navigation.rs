//! Seam to the page-navigation primitive that performs the actual request.

use thiserror::Error;

/// Why a navigation did not complete successfully.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("request rejected with status {0}")]
    Rejected(u16),

    #[error("navigation interrupted")]
    Interrupted,
}

pub type NavigationResult = Result<(), NavigationError>;

/// Completion handler; navigators call it exactly once.
pub type FinishCallback = Box<dyn FnOnce(NavigationResult) + Send + 'static>;

/// Visit options forwarded with every grid navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitOptions {
    pub preserve_state: bool,
    pub preserve_scroll: bool,
}

impl Default for VisitOptions {
    fn default() -> Self {
        Self {
            preserve_state: true,
            preserve_scroll: true,
        }
    }
}

/// Performs a request for `url` and reports completion through `on_finish`,
/// whether it succeeded or not. Implementations may complete synchronously.
#[cfg_attr(any(test, feature = "test-mocks"), mockall::automock)]
pub trait Navigator: Send + Sync + 'static {
    fn navigate(&self, url: &str, options: VisitOptions, on_finish: FinishCallback);
}
