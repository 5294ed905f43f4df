//! Resource family tags.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// A group of related admin API operations exposed as one client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceFamily {
    Templates,
    Users,
    Jobs,
    Alerts,
    Attribution,
    Dashboard,
}

impl ResourceFamily {
    /// Every family, in teardown order.
    pub const ALL: [ResourceFamily; 6] = [
        ResourceFamily::Templates,
        ResourceFamily::Users,
        ResourceFamily::Jobs,
        ResourceFamily::Alerts,
        ResourceFamily::Attribution,
        ResourceFamily::Dashboard,
    ];

    /// Path suffix below the admin prefix.
    pub fn base_path(self) -> &'static str {
        match self {
            ResourceFamily::Templates => "/templates",
            ResourceFamily::Users => "/users",
            ResourceFamily::Jobs => "/jobs",
            ResourceFamily::Alerts => "/alerts",
            ResourceFamily::Attribution => "/attribution",
            ResourceFamily::Dashboard => "/dashboard",
        }
    }

    /// Lowercase name, as used in logs and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceFamily::Templates => "templates",
            ResourceFamily::Users => "users",
            ResourceFamily::Jobs => "jobs",
            ResourceFamily::Alerts => "alerts",
            ResourceFamily::Attribution => "attribution",
            ResourceFamily::Dashboard => "dashboard",
        }
    }
}

impl fmt::Display for ResourceFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceFamily {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceFamily::ALL
            .into_iter()
            .find(|family| family.as_str() == s)
            .ok_or_else(|| {
                InvalidInputError::Other {
                    message: format!("unknown resource family '{}'", s),
                }
                .into()
            })
    }
}
