//! Fluent builder for constructing an [`AssignmentEngine`].

use std::sync::Arc;

use ev_colony::{ProposalScorer, TotalRoadDistance};
use ev_core::{ColonyRng, EngineConfig};
use ev_spatial::{DijkstraRouter, RoadNetwork, Router};

use crate::{AssignResult, AssignmentEngine};

/// Fluent builder for [`AssignmentEngine<R, S>`].
///
/// # Optional inputs (have defaults)
///
/// | Method                 | Default                  |
/// |------------------------|--------------------------|
/// | `.network(n)`          | `RoadNetwork::empty()`   |
/// | `.shared_network(arc)` | (alternative to network) |
/// | `.router(r)`           | `DijkstraRouter`         |
/// | `.scorer(s)`           | `TotalRoadDistance`      |
///
/// With an empty network every road distance is unreachable and the engine
/// falls back to straight-line distances.
///
/// # Example
///
/// ```rust,ignore
/// let mut engine = EngineBuilder::new(EngineConfig::default())
///     .network(network)
///     .scorer(ContentionPenalized::new(50.0))
///     .build()?;
/// let mut store = engine.initialize_pheromones(&vehicles, &stations);
/// let outcome = engine.run_round(&vehicles, &stations, &mut store)?;
/// ```
pub struct EngineBuilder<R: Router = DijkstraRouter, S: ProposalScorer = TotalRoadDistance> {
    config:  EngineConfig,
    network: Option<Arc<RoadNetwork>>,
    router:  R,
    scorer:  S,
}

impl EngineBuilder {
    pub fn new(config: EngineConfig) -> Self {
        Self { config, network: None, router: DijkstraRouter, scorer: TotalRoadDistance }
    }
}

impl<R: Router, S: ProposalScorer> EngineBuilder<R, S> {
    /// Road network used for all distance queries.
    pub fn network(mut self, network: RoadNetwork) -> Self {
        self.network = Some(Arc::new(network));
        self
    }

    /// Share one read-only network between several engines.
    pub fn shared_network(mut self, network: Arc<RoadNetwork>) -> Self {
        self.network = Some(network);
        self
    }

    pub fn router<R2: Router>(self, router: R2) -> EngineBuilder<R2, S> {
        EngineBuilder { config: self.config, network: self.network, router, scorer: self.scorer }
    }

    /// Fitness rule used to pick among the colony's proposals.
    pub fn scorer<S2: ProposalScorer>(self, scorer: S2) -> EngineBuilder<R, S2> {
        EngineBuilder { config: self.config, network: self.network, router: self.router, scorer }
    }

    /// Validate the configuration and return a ready engine.
    pub fn build(self) -> AssignResult<AssignmentEngine<R, S>> {
        self.config.validate()?;
        Ok(AssignmentEngine {
            rng:     ColonyRng::new(self.config.seed),
            network: self.network.unwrap_or_else(|| Arc::new(RoadNetwork::empty())),
            config:  self.config,
            router:  self.router,
            scorer:  self.scorer,
            round:   0,
        })
    }
}
