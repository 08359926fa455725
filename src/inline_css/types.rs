//! Type definitions for resource inlining

/// Resource type for error tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    Stylesheet,
    Import,
    Image,
    Font,
    Frame,
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceType::Stylesheet => write!(f, "Stylesheet"),
            ResourceType::Import => write!(f, "@import"),
            ResourceType::Image => write!(f, "Image"),
            ResourceType::Font => write!(f, "Font"),
            ResourceType::Frame => write!(f, "Frame"),
        }
    }
}

/// Error information for a resource that could not be inlined
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InliningError {
    pub url: String,
    pub resource_type: ResourceType,
    pub error: String,
}

impl InliningError {
    pub fn new(url: impl Into<String>, resource_type: ResourceType, error: impl ToString) -> Self {
        Self {
            url: url.into(),
            resource_type,
            error: error.to_string(),
        }
    }
}

/// Success and failure tally of one inlining pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InliningResult {
    pub successes: usize,
    pub failures: Vec<InliningError>,
}

impl InliningResult {
    /// Check if any failures occurred
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn record_success(&mut self) {
        self.successes += 1;
    }

    pub fn record_failure(&mut self, failure: InliningError) {
        self.failures.push(failure);
    }

    /// Fold another tally into this one
    pub fn merge(&mut self, other: InliningResult) {
        self.successes += other.successes;
        self.failures.extend(other.failures);
    }
}

/// Rewritten style text together with what happened to its references
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewrittenCss {
    pub text: String,
    pub result: InliningResult,
}
