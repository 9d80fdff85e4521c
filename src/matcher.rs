use strsim::jaro_winkler;

use crate::error::MatchFailure;
use crate::listenbrainz::TrackDescriptor;
use crate::ytmusic::{CandidateKind, SearchCandidate};

pub const DEFAULT_MAX_CANDIDATES: usize = 5;

/// First-match selection over relevance-ranked search results.
#[derive(Debug, Clone, Copy)]
pub struct TrackMatcher {
    max_candidates: usize,
}

impl Default for TrackMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CANDIDATES)
    }
}

impl TrackMatcher {
    pub fn new(max_candidates: usize) -> Self {
        Self { max_candidates }
    }

    pub fn max_candidates(&self) -> usize {
        self.max_candidates
    }

    /// Returns the first of the leading `max_candidates` results that is a song
    /// with the target's title and artist (case-insensitive).
    pub fn matches(
        &self,
        target: &TrackDescriptor,
        candidates: &[SearchCandidate],
    ) -> Result<SearchCandidate, MatchFailure> {
        if candidates.is_empty() {
            return Err(MatchFailure::NotFound);
        }

        let scanned = &candidates[..candidates.len().min(self.max_candidates)];

        if let Some(found) = scanned.iter().find(|c| is_match(target, c)) {
            return Ok(found.clone());
        }

        Err(MatchFailure::Mismatch {
            scanned: scanned.len(),
            closest: closest_candidate(target, scanned),
        })
    }
}

pub fn is_match(target: &TrackDescriptor, candidate: &SearchCandidate) -> bool {
    candidate.kind == CandidateKind::Song
        && candidate.title.to_lowercase() == target.title.to_lowercase()
        && candidate.artist.to_lowercase() == target.artist.to_lowercase()
}

/// Closest scanned candidate by Jaro-Winkler similarity of "artist title".
/// Only used to explain a mismatch in the logs.
fn closest_candidate(
    target: &TrackDescriptor,
    candidates: &[SearchCandidate],
) -> Option<(String, f64)> {
    let wanted = format!("{} {}", target.artist, target.title).to_lowercase();

    candidates
        .iter()
        .map(|c| {
            let seen = format!("{} {}", c.artist, c.title).to_lowercase();
            (format!("{} - {}", c.artist, c.title), jaro_winkler(&wanted, &seen))
        })
        .max_by(|a, b| a.1.total_cmp(&b.1))
}
