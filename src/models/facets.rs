use crate::models::issue::{Channel, RegionType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PriorityFilter {
    #[default]
    All,
    Critical,
    High,
    Medium,
    Low,
    Solved,
    Unsolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    New,
    Analyzed,
    Catalyzed,
    Resolved,
}

/// The active filter selection. `None` means "all" for the optional facets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct FacetSelection {
    pub priority: PriorityFilter,
    pub region_type: Option<RegionType>,
    pub region_name: Option<String>,
    pub category: Option<String>,
    pub channel: Option<Channel>,
    pub status: StatusFilter,
}

impl FacetSelection {
    /// Region name depends on region type, so it resets with every change.
    pub fn set_region_type(&mut self, region_type: Option<RegionType>) {
        self.region_type = region_type;
        self.region_name = None;
    }

    pub fn without_status(&self) -> FacetSelection {
        FacetSelection {
            status: StatusFilter::All,
            ..self.clone()
        }
    }
}

/// Partial facet update coming from the front end. Absent fields stay as
/// they are; `Some(None)` clears an optional facet back to "all".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FacetUpdate {
    pub priority: Option<PriorityFilter>,
    #[serde(with = "nullable")]
    pub region_type: Option<Option<RegionType>>,
    #[serde(with = "nullable")]
    pub region_name: Option<Option<String>>,
    #[serde(with = "nullable")]
    pub category: Option<Option<String>>,
    #[serde(with = "nullable")]
    pub channel: Option<Option<Channel>>,
    pub status: Option<StatusFilter>,
}

impl FacetUpdate {
    pub fn apply_to(self, facets: &mut FacetSelection) {
        if let Some(priority) = self.priority {
            facets.priority = priority;
        }
        if let Some(region_type) = self.region_type {
            if region_type != facets.region_type {
                facets.set_region_type(region_type);
            }
        }
        if let Some(region_name) = self.region_name {
            facets.region_name = region_name;
        }
        if let Some(category) = self.category {
            facets.category = category.filter(|c| !c.trim().is_empty());
        }
        if let Some(channel) = self.channel {
            facets.channel = channel;
        }
        if let Some(status) = self.status {
            facets.status = status;
        }
    }
}

/// Distinguishes a missing key from an explicit `null`.
mod nullable {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}
