/// A named detection with its confidence score (0.0 - 1.0)
#[derive(Debug, Clone, PartialEq)]
pub struct Scored {
    pub name: String,
    pub confidence: f32,
}

impl Scored {
    pub fn new<S: Into<String>>(name: S, confidence: f32) -> Self {
        Self {
            name: name.into(),
            confidence,
        }
    }
}

/// Result of one analysis call
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisResult {
    Labels(Vec<Scored>),
    Objects(Vec<Scored>),
    /// Text found in the image, if any
    Text(Option<String>),
    /// Free-text answer to the prompt
    Description(String),
    /// The client declined to call its provider because of its own throttle
    RateLimited,
    Empty,
    /// Several result kinds returned by a single call
    Composite(Vec<AnalysisResult>),
}

impl AnalysisResult {
    /// True when the result carries nothing worth printing
    pub fn is_empty(&self) -> bool {
        match self {
            AnalysisResult::Empty => true,
            AnalysisResult::Composite(parts) => parts.iter().all(AnalysisResult::is_empty),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composite_emptiness() {
        assert!(AnalysisResult::Empty.is_empty());
        assert!(AnalysisResult::Composite(vec![]).is_empty());
        assert!(AnalysisResult::Composite(vec![AnalysisResult::Empty]).is_empty());
        assert!(!AnalysisResult::Composite(vec![AnalysisResult::Labels(vec![])]).is_empty());
        assert!(!AnalysisResult::RateLimited.is_empty());
        assert!(!AnalysisResult::Text(None).is_empty());
        assert!(!AnalysisResult::Description("A parcel".to_string()).is_empty());
    }
}
