//! Marker set tracking and the settle-then-overlap workflow.
//!
//! A [`MarkerBoard`] holds the current markers with a revision per marker
//! and a generation for the whole set. [`OverlapCoordinator::settle`]
//! fetches every pending marker concurrently, applies the results that are
//! still current, and only runs the overlap pass once all markers of an
//! unchanged generation have settled.

use std::sync::{Arc, Mutex, MutexGuard};

use futures_util::future::join_all;
use tracing::{debug, info, warn};

use super::overlap::{MarkerPolygon, OverlapEngine, OverlapReport};
use super::ports::IsochroneQuery;
use super::{Error, IsochroneFeature, IsochroneRequest, Marker, MarkerId};

/// Monotonic revision assigned to each marker change.
pub type Revision = u64;

/// Fetch state of a marker.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerState {
    /// No result for the current revision yet.
    Pending,
    /// The isochrone feature for the current revision.
    Resolved(IsochroneFeature),
    /// The fetch for the current revision failed.
    Failed(Error),
}

#[derive(Debug, Clone)]
struct TrackedMarker {
    marker: Marker,
    revision: Revision,
    state: MarkerState,
}

/// The current marker set.
#[derive(Debug, Default)]
pub struct MarkerBoard {
    markers: Vec<TrackedMarker>,
    generation: u64,
    next_revision: Revision,
}

impl MarkerBoard {
    /// An empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a marker, or replace the marker with the same id in place.
    ///
    /// The marker becomes pending under a fresh revision.
    pub fn upsert(&mut self, marker: Marker) -> Revision {
        self.next_revision += 1;
        self.generation += 1;
        let revision = self.next_revision;
        let tracked = TrackedMarker {
            marker,
            revision,
            state: MarkerState::Pending,
        };
        match self
            .markers
            .iter_mut()
            .find(|existing| existing.marker.id == tracked.marker.id)
        {
            Some(existing) => *existing = tracked,
            None => self.markers.push(tracked),
        }
        revision
    }

    /// Remove a marker. Returns `false` when the id is unknown.
    pub fn remove(&mut self, id: &MarkerId) -> bool {
        let before = self.markers.len();
        self.markers.retain(|tracked| &tracked.marker.id != id);
        let removed = self.markers.len() != before;
        if removed {
            self.generation += 1;
        }
        removed
    }

    /// Changes whenever a marker is added, replaced or removed.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of markers on the board.
    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// True when the board holds no markers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Markers still awaiting a result, with the revision to report back.
    #[must_use]
    pub fn pending(&self) -> Vec<(Marker, Revision)> {
        self.markers
            .iter()
            .filter(|tracked| matches!(tracked.state, MarkerState::Pending))
            .map(|tracked| (tracked.marker.clone(), tracked.revision))
            .collect()
    }

    /// Record a fetch result.
    ///
    /// Results for removed markers, or for an older revision of a marker,
    /// are discarded and `false` is returned.
    pub fn apply(
        &mut self,
        id: &MarkerId,
        revision: Revision,
        outcome: Result<IsochroneFeature, Error>,
    ) -> bool {
        let Some(tracked) = self
            .markers
            .iter_mut()
            .find(|tracked| &tracked.marker.id == id && tracked.revision == revision)
        else {
            debug!(marker = %id, revision, "discarding stale isochrone result");
            return false;
        };
        tracked.state = match outcome {
            Ok(feature) => MarkerState::Resolved(feature),
            Err(err) => MarkerState::Failed(err),
        };
        true
    }

    /// True once no marker is pending.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.markers
            .iter()
            .all(|tracked| !matches!(tracked.state, MarkerState::Pending))
    }

    /// Current state of every marker in board order.
    #[must_use]
    pub fn states(&self) -> Vec<(MarkerId, MarkerState)> {
        self.markers
            .iter()
            .map(|tracked| (tracked.marker.id.clone(), tracked.state.clone()))
            .collect()
    }

    /// Exterior rings of resolved markers in board order; failed markers are
    /// left out.
    #[must_use]
    pub fn overlap_inputs(&self) -> Vec<MarkerPolygon> {
        self.markers
            .iter()
            .filter_map(|tracked| match &tracked.state {
                MarkerState::Resolved(feature) => feature
                    .exterior()
                    .map(|ring| MarkerPolygon::from_ring(tracked.marker.id.clone(), ring)),
                MarkerState::Pending | MarkerState::Failed(_) => None,
            })
            .collect()
    }
}

/// A fully settled marker set and its overlaps.
#[derive(Debug, Clone, PartialEq)]
pub struct SettledBoard {
    /// Final state of every marker in board order.
    pub markers: Vec<(MarkerId, MarkerState)>,
    /// Overlaps between the resolved markers.
    pub report: OverlapReport,
}

/// Result of a settle pass.
#[derive(Debug, Clone, PartialEq)]
pub enum SettleOutcome {
    /// Every fetch settled against an unchanged board.
    Settled(SettledBoard),
    /// The board changed while fetches were outstanding; no overlaps were
    /// computed.
    Superseded,
}

/// Drives fetches for a board and runs the overlap pass.
#[derive(Clone)]
pub struct OverlapCoordinator {
    query: Arc<dyn IsochroneQuery>,
    engine: OverlapEngine,
}

impl OverlapCoordinator {
    /// Build a coordinator that resolves markers through `query`.
    pub fn new(query: Arc<dyn IsochroneQuery>) -> Self {
        Self {
            query,
            engine: OverlapEngine,
        }
    }

    /// Fetch every pending marker and, if the board is unchanged when all
    /// fetches settle, compute pairwise overlaps.
    ///
    /// The board lock is never held across an await point.
    pub async fn settle(&self, board: &Mutex<MarkerBoard>) -> Result<SettleOutcome, Error> {
        let (generation, pending) = {
            let board = lock(board)?;
            (board.generation(), board.pending())
        };

        let results = join_all(pending.into_iter().map(|(marker, revision)| async move {
            let outcome = self.fetch(&marker).await;
            (marker.id, revision, outcome)
        }))
        .await;

        let mut board = lock(board)?;
        for (id, revision, outcome) in results {
            board.apply(&id, revision, outcome);
        }
        if board.generation() != generation || !board.is_settled() {
            info!(
                started = generation,
                current = board.generation(),
                "marker set changed during settle; overlap pass superseded"
            );
            return Ok(SettleOutcome::Superseded);
        }

        let report = self.engine.pairwise_intersections(&board.overlap_inputs());
        Ok(SettleOutcome::Settled(SettledBoard {
            markers: board.states(),
            report,
        }))
    }

    async fn fetch(&self, marker: &Marker) -> Result<IsochroneFeature, Error> {
        let request = IsochroneRequest::new(
            marker.transport,
            vec![marker.location],
            vec![marker.range],
            Some(marker.id.to_string()),
        )?;
        let response = self.query.compute(&request).await.inspect_err(|err| {
            warn!(marker = %marker.id, error = %err, "isochrone fetch failed");
        })?;
        response
            .features
            .into_iter()
            .next()
            .ok_or_else(|| {
                Error::internal(format!("no isochrone returned for marker {}", marker.id))
            })
    }
}

fn lock(board: &Mutex<MarkerBoard>) -> Result<MutexGuard<'_, MarkerBoard>, Error> {
    board
        .lock()
        .map_err(|_| Error::internal("marker board lock poisoned"))
}

#[cfg(test)]
#[path = "marker_board_tests.rs"]
mod tests;
