use std::cmp::Ordering;

use crate::bio::util::rev_comp;
use crate::model::{Location, Strand};
use crate::types::{EdgeId, Residues};

// Cut the residues covered by a location out of the candidate sequence,
// extended by the offsets.  Upstream is towards lower coordinates on the
// forward strand and towards higher coordinates on the reverse strand.
// Without a location the candidate is returned whole.
pub fn residues_window(candidate: &str, maybe_location: Option<&Location>,
                       upstream_offset: i64, downstream_offset: i64) -> Residues {
    let location =
        match maybe_location {
            Some(location) => location,
            None => return candidate.to_owned(),
        };

    let (start, end) =
        match location.strand {
            Strand::Forward =>
                (location.start().saturating_sub(upstream_offset),
                 location.end().saturating_add(downstream_offset)),
            Strand::Reverse =>
                (location.start().saturating_sub(downstream_offset),
                 location.end().saturating_add(upstream_offset)),
        };

    let start = start.max(0) as usize;
    let end = end.max(0) as usize;

    let window: String =
        if start >= end {
            String::new()
        } else {
            candidate.chars().skip(start).take(end - start).collect()
        };

    match location.strand {
        Strand::Forward => window,
        Strand::Reverse => rev_comp(&window),
    }
}

fn cmp_rank(a: Option<i64>, b: Option<i64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// When a feature has more than one location use the lowest ranked, with
// unranked locations last.  Ties go to the earliest LOCATED_AT edge.
pub fn choose_location(locations: &[(EdgeId, Location)]) -> Option<&Location> {
    locations.iter()
        .min_by(|(a_edge, a_loc), (b_edge, b_loc)| {
            cmp_rank(a_loc.rank, b_loc.rank).then(a_edge.cmp(b_edge))
        })
        .map(|(_, location)| location)
}
