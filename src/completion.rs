//! Route completion.

use std::collections::HashSet;

use crate::config::StationSet;
use crate::event::ScanEvent;

/// Has the asset finished its route?
///
/// True iff every station of the route appears somewhere in the history
/// (in any order) and the most recent scan is at the final station. An asset
/// that touched every station but was last seen elsewhere is not complete.
pub fn is_complete(scans: &[ScanEvent], stations: &StationSet) -> bool {
    let Some(latest) = scans.last() else {
        return false;
    };
    if latest.station != stations.last() {
        return false;
    }

    let seen: HashSet<&str> = scans.iter().map(|s| s.station.as_str()).collect();
    stations.iter().all(|st| seen.contains(st))
}
