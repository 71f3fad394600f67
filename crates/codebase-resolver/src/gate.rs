//! Security and execution-mode gating
//!
//! Decides, before anything is probed, whether a lookup may search local
//! locations and which locations apply.
//!
//! # Code units
//!
//! | Association        | Local search |
//! |--------------------|--------------|
//! | `Present(_)`       | yes          |
//! | `PresentUnbound`   | no           |
//! | `Absent`           | no           |
//!
//! Execution mode does not matter for code units.
//!
//! # Resources
//!
//! | Descriptor | Mode     | Search                                   |
//! |------------|----------|------------------------------------------|
//! | present    | any      | declared resources, then configured      |
//! | absent     | embedded | configured locations only                |
//! | absent     | hosted   | denied (`NullDescriptor`)                |

use crate::outcome::Denial;
use codebase_types::{ExecutionMode, LaunchDescriptor, Location, SecurityAssociation};

/// What a resource lookup may do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourcePlan {
    /// Probe these locations, in order
    Search(Vec<Location>),

    /// Refuse without probing
    Deny(Denial),
}

/// Check whether a code unit the delegate declined may be searched locally
#[inline]
#[must_use]
pub fn permits_local_code_units(association: &SecurityAssociation) -> bool {
    association.is_bound()
}

/// Locations a resource lookup searches, or why it may not
///
/// With a descriptor, its declared resources come first, followed by the
/// configured codebase locations; repeated locations are probed once at their
/// first position.
#[must_use]
pub fn plan_resource_search(
    descriptor: Option<&LaunchDescriptor>,
    mode: ExecutionMode,
    configured: &[Location],
) -> ResourcePlan {
    match descriptor {
        Some(descriptor) => {
            let mut locations: Vec<Location> =
                Vec::with_capacity(descriptor.resources().len() + configured.len());
            for location in descriptor.resources().iter().chain(configured) {
                if !locations.contains(location) {
                    locations.push(location.clone());
                }
            }
            ResourcePlan::Search(locations)
        }
        None if mode.permits_descriptorless_resources() => {
            ResourcePlan::Search(configured.to_vec())
        }
        None => ResourcePlan::Deny(Denial::NullDescriptor),
    }
}
