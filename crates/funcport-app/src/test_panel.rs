//! Ad-hoc invocation test panel state.
//!
//! The form seeds from the function's persisted test data plus any `{param}`
//! placeholders in the invocation URL, validates user edits, and assembles
//! the payload persisted back onto the function when a run fires.

use funcport_core::invoke_url::path_param_seeds;
use funcport_core::validation::{is_reserved_header, is_valid_query};
use funcport_core::{HttpMethod, NameValuePair, TestData};

/// Input/output tab within the test panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TestTab {
    #[default]
    Input,
    Output,
}

/// Captured invocation response for the output tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseContent {
    pub code: u16,
    pub text: String,
}

/// State for the test sub-view.
#[derive(Debug, Clone, Default)]
pub struct TestPanelState {
    pub visible: bool,
    pub tab: TestTab,
    pub method: HttpMethod,
    pub queries: Vec<NameValuePair>,
    pub headers: Vec<NameValuePair>,
    pub body: String,
    /// Selected key label (`"master - Host"` style); empty = master key
    pub selected_key: String,
    /// Validation error shown in the footer
    pub status_message: Option<String>,
    pub editing_body: bool,
}

impl TestPanelState {
    /// Seed the form from persisted test data (fetched blob first, the
    /// resource's inline copy as fallback) and the invocation URL's path
    /// parameters.
    pub fn seed(
        &mut self,
        test_data: Option<&str>,
        inline_test_data: Option<&str>,
        invoke_url: &str,
        default_key: String,
    ) {
        let raw = test_data.or(inline_test_data).unwrap_or("");
        let data = TestData::parse(raw);
        self.method = data.method;
        self.queries = data.queries;
        self.headers = data.headers;
        self.body = data.body;
        self.selected_key = default_key;
        self.status_message = None;
        self.tab = TestTab::Input;

        for seed in path_param_seeds(invoke_url) {
            let exists = self
                .queries
                .iter()
                .any(|q| q.name.eq_ignore_ascii_case(&seed.name));
            if !exists {
                self.queries.push(seed);
            }
        }
    }

    /// Validate the form; returns the error message to display, if any.
    pub fn validate(&self) -> Option<String> {
        if self.queries.iter().any(|q| !is_valid_query(q)) {
            return Some("Enter valid query parameter names and values".to_string());
        }
        if self.headers.iter().any(|h| !is_valid_query(h)) {
            return Some("Enter valid header names and values".to_string());
        }
        if self.headers.iter().any(|h| is_reserved_header(&h.name)) {
            return Some("'x-functions-key' cannot be supplied as a request header".to_string());
        }
        None
    }

    /// The payload a run persists back onto the function.
    pub fn test_data(&self) -> TestData {
        TestData {
            method: self.method,
            queries: self.queries.clone(),
            headers: self.headers.clone(),
            body: self.body.clone(),
        }
    }

    /// A resolved response lands on the output tab.
    pub fn apply_response(&mut self) {
        self.tab = TestTab::Output;
    }

    pub fn toggle_tab(&mut self) {
        self.tab = match self.tab {
            TestTab::Input => TestTab::Output,
            TestTab::Output => TestTab::Input,
        };
    }

    pub fn cycle_method(&mut self) {
        let methods = HttpMethod::ALL;
        let current = methods
            .iter()
            .position(|m| *m == self.method)
            .unwrap_or(0);
        self.method = methods[(current + 1) % methods.len()];
    }

    /// Step the key selector through the available labels.
    pub fn cycle_key(&mut self, labels: &[String]) {
        if labels.is_empty() {
            return;
        }
        let next = match labels.iter().position(|l| *l == self.selected_key) {
            Some(current) => (current + 1) % labels.len(),
            None => 0,
        };
        self.selected_key = labels[next].clone();
    }

    pub fn close(&mut self) {
        self.visible = false;
        self.editing_body = false;
    }
}
