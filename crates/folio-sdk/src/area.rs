use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SdkError;

/// One of the two document trees a repository holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Area {
    Workspace,
    WorkingTree,
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Area::Workspace => "workspace",
            Area::WorkingTree => "working",
        })
    }
}

impl FromStr for Area {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "workspace" | "ws" => Ok(Area::Workspace),
            "working" | "working-tree" | "wt" => Ok(Area::WorkingTree),
            other => Err(SdkError::Validation(format!("unknown area: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display() {
        assert_eq!("ws".parse::<Area>().unwrap(), Area::Workspace);
        assert_eq!("working-tree".parse::<Area>().unwrap(), Area::WorkingTree);
        assert_eq!(Area::WorkingTree.to_string(), "working");
        assert!("attic".parse::<Area>().is_err());
    }
}
