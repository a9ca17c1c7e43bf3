//! Station dwell segments from a scan log.

use crate::event::ScanEvent;
use crate::model::Segment;

/// Collapse a time-ordered scan log into station segments.
///
/// Consecutive scans at the same station form one run. A run starts at its
/// first scan and ends at the first scan of the next run, i.e. when the
/// asset was first seen elsewhere. The last run is open.
pub fn build_segments(scans: &[ScanEvent]) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();

    for scan in scans {
        if let Some(current) = segments.last_mut() {
            if current.station == scan.station {
                continue;
            }
            current.end = Some(scan.timestamp);
        }
        segments.push(open_segment(scan));
    }

    segments
}

fn open_segment(scan: &ScanEvent) -> Segment {
    Segment {
        station: scan.station.clone(),
        start: scan.timestamp,
        end: None,
    }
}
