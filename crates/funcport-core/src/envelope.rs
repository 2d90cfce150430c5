//! Success/failure envelope for remote calls.
//!
//! Every remote call resolves to an [`Envelope`] rather than an error: a
//! failed request is data, not control flow. Loaders inspect the envelope,
//! log failures with a category and operation name, and leave the matching
//! piece of view state unset so the UI renders a degraded-but-working view.

/// Category tag attached to every logged remote failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogCategory {
    /// Function editor screen (file list, content, keys, host status)
    FunctionEdit,
    /// Bindings/integrate screen
    FunctionIntegrate,
    /// Invocation telemetry screen
    FunctionMonitor,
    /// Invocation URL derivation
    InvokeUrl,
    /// Binding resource pickers
    BindingResource,
}

impl LogCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogCategory::FunctionEdit => "function-edit",
            LogCategory::FunctionIntegrate => "function-integrate",
            LogCategory::FunctionMonitor => "function-monitor",
            LogCategory::InvokeUrl => "function-invoke-url",
            LogCategory::BindingResource => "binding-resource",
        }
    }
}

/// Outcome of a single remote call: HTTP status plus either the decoded
/// value or the raw error text.
#[derive(Debug, Clone)]
pub struct Envelope<T> {
    /// HTTP status code (0 when the request never reached the server)
    pub status: u16,
    pub result: std::result::Result<T, String>,
}

impl<T> Envelope<T> {
    pub fn ok(status: u16, value: T) -> Self {
        Self {
            status,
            result: Ok(value),
        }
    }

    pub fn failed(status: u16, error: impl Into<String>) -> Self {
        Self {
            status,
            result: Err(error.into()),
        }
    }

    /// Transport-level failure: the request never produced a response.
    pub fn transport(error: impl Into<String>) -> Self {
        Self::failed(0, error)
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// The server rejected the call for lack of permissions.
    pub fn is_forbidden(&self) -> bool {
        self.status == 403
    }

    pub fn value(&self) -> Option<&T> {
        self.result.as_ref().ok()
    }

    pub fn error(&self) -> Option<&str> {
        self.result.as_ref().err().map(String::as_str)
    }

    /// Unwrap the value, logging the failure under `category`/`operation`
    /// and returning `None` when the call did not succeed.
    pub fn into_logged(self, category: LogCategory, operation: &str) -> Option<T> {
        match self.result {
            Ok(value) => Some(value),
            Err(error) => {
                tracing::error!(
                    category = category.as_str(),
                    "{} failed (status {}): {}",
                    operation,
                    self.status,
                    error
                );
                None
            }
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        Envelope {
            status: self.status,
            result: self.result.map(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_envelope() {
        let env = Envelope::ok(200, 42);
        assert!(env.is_success());
        assert!(!env.is_forbidden());
        assert_eq!(env.value(), Some(&42));
        assert_eq!(env.error(), None);
    }

    #[test]
    fn test_failed_envelope() {
        let env: Envelope<()> = Envelope::failed(500, "boom");
        assert!(!env.is_success());
        assert_eq!(env.error(), Some("boom"));
    }

    #[test]
    fn test_forbidden() {
        let env: Envelope<()> = Envelope::failed(403, "rbac");
        assert!(env.is_forbidden());
    }

    #[test]
    fn test_transport_has_no_status() {
        let env: Envelope<()> = Envelope::transport("connection refused");
        assert_eq!(env.status, 0);
        assert!(!env.is_success());
    }

    #[test]
    fn test_into_logged_success_returns_value() {
        let env = Envelope::ok(200, "data".to_string());
        assert_eq!(
            env.into_logged(LogCategory::FunctionEdit, "fetch_site"),
            Some("data".to_string())
        );
    }

    #[test]
    fn test_into_logged_failure_returns_none() {
        let env: Envelope<String> = Envelope::failed(404, "missing");
        assert_eq!(env.into_logged(LogCategory::FunctionEdit, "fetch_site"), None);
    }

    #[test]
    fn test_map_preserves_status() {
        let env = Envelope::ok(201, 2).map(|v| v * 10);
        assert_eq!(env.status, 201);
        assert_eq!(env.value(), Some(&20));
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(LogCategory::FunctionEdit.as_str(), "function-edit");
        assert_eq!(LogCategory::InvokeUrl.as_str(), "function-invoke-url");
    }
}
