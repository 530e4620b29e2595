use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Which analysis to run over an extracted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisFlow {
    /// Project-book review: location, title, CD availability.
    Book,
    /// Cost analysis: location, type, materials/services, warnings.
    Cost,
}

impl AnalysisFlow {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisFlow::Book => "book",
            AnalysisFlow::Cost => "cost",
        }
    }

    /// Static rules shipped with each flow, placed ahead of any saved constraints.
    pub fn default_rules(&self) -> &'static str {
        match self {
            AnalysisFlow::Book => {
                "Answer in the language of the document; quote Arabic names as written.\n\
                 If an item is not mentioned, say so explicitly instead of guessing."
            }
            AnalysisFlow::Cost => {
                "List each material or service on its own line.\n\
                 Flag any quantity, specification or deadline that looks inconsistent.\n\
                 If an item is not mentioned, say so explicitly instead of guessing."
            }
        }
    }
}

impl fmt::Display for AnalysisFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisFlow {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "book" => Ok(AnalysisFlow::Book),
            "cost" => Ok(AnalysisFlow::Cost),
            other => Err(ConfigError::UnknownFlow(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_flow_names() {
        assert_eq!("book".parse::<AnalysisFlow>().unwrap(), AnalysisFlow::Book);
        assert_eq!(" COST ".parse::<AnalysisFlow>().unwrap(), AnalysisFlow::Cost);
        assert!("budget".parse::<AnalysisFlow>().is_err());
    }

    #[test]
    fn display_matches_parse() {
        for flow in [AnalysisFlow::Book, AnalysisFlow::Cost] {
            assert_eq!(flow.to_string().parse::<AnalysisFlow>().unwrap(), flow);
        }
    }
}
