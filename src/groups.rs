//! Mapping cluster assignments back onto the original labels.
//!
//! Cluster `i` becomes a group named `"group {i+1}"`. Points labelled
//! [`NOISE`] go to one trailing [`UNCLUSTERED`] group, which exists only when
//! at least one point is noise. Every input label therefore appears in
//! exactly one group.

use crate::cluster::NOISE;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Name of the group collecting noise points.
pub const UNCLUSTERED: &str = "unclustered";

/// A named group of labels.
///
/// Serialized as `{"group": "group 1", "sentences": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Group name.
    #[serde(rename = "group")]
    pub name: String,
    /// Labels of the members, in input order.
    #[serde(rename = "sentences")]
    pub members: Vec<String>,
}

impl Group {
    fn named(name: String) -> Self {
        Self {
            name,
            members: Vec::new(),
        }
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True when the group has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Build one group per cluster index in `[0, n_clusters)`, plus the noise group.
///
/// Groups for clusters that received no points are kept (empty), so group
/// `i` always corresponds to cluster `i`.
pub fn assemble_groups<S: AsRef<str>>(
    assignments: &[usize],
    labels: &[S],
    n_clusters: usize,
) -> Result<Vec<Group>> {
    if assignments.len() != labels.len() {
        return Err(Error::LabelCountMismatch {
            points: assignments.len(),
            labels: labels.len(),
        });
    }

    let mut groups: Vec<Group> = (0..n_clusters)
        .map(|i| Group::named(format!("group {}", i + 1)))
        .collect();
    let mut noise = Group::named(UNCLUSTERED.to_string());

    for (&cluster, label) in assignments.iter().zip(labels) {
        let label = label.as_ref().to_string();
        if cluster == NOISE {
            noise.members.push(label);
        } else {
            groups
                .get_mut(cluster)
                .ok_or(Error::invalid("assignments", "cluster index out of range"))?
                .members
                .push(label);
        }
    }

    if !noise.is_empty() {
        groups.push(noise);
    }
    Ok(groups)
}

/// Pretty JSON for a list of groups.
pub fn groups_to_json(groups: &[Group]) -> Result<String> {
    serde_json::to_string_pretty(groups).map_err(|e| Error::Serialization(e.to_string()))
}
