//! Trip planning service: search worker pool plus real-time graph updates

use std::sync::Arc;

use ferroute_core::prelude::*;
use log::info;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::config::{RouterConfig, UpdaterType};

pub struct Router {
    manager: GraphUpdaterManager,
    finder: ComparingGraphPathFinder,
    pool: ThreadPool,
    config: RouterConfig,
}

impl Router {
    /// Takes ownership of a built graph and starts the graph writer
    pub fn new(graph: Graph, config: RouterConfig) -> Result<Self, Error> {
        let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("search-{i}"));
        if let Some(threads) = config.search_threads {
            builder = builder.num_threads(threads);
        }
        let pool = builder
            .build()
            .map_err(|e| Error::Config(format!("could not start search pool: {e}")))?;

        info!(
            "Router started on {} vertices and {} edges with {} search threads",
            graph.vertex_count(),
            graph.edge_count(),
            pool.current_num_threads()
        );
        let manager = GraphUpdaterManager::new(graph)?;
        let finder = ComparingGraphPathFinder::new(manager.handle());
        Ok(Self {
            manager,
            finder,
            pool,
            config,
        })
    }

    /// Request between two locations, starting from the configured defaults
    pub fn request(
        &self,
        from: impl Into<Location>,
        to: impl Into<Location>,
        modes: TraverseModeSet,
    ) -> RoutingRequest {
        RoutingRequest {
            from: Some(from.into()),
            to: Some(to.into()),
            modes,
            ..self.config.routing_defaults.clone()
        }
    }

    /// Plans one trip on a search worker
    pub fn plan(&self, request: &RoutingRequest) -> Result<Vec<GraphPath>, Error> {
        self.pool.install(|| self.finder.find_paths(request))
    }

    /// Plans many trips in parallel, results in request order
    pub fn plan_many(&self, requests: &[RoutingRequest]) -> Vec<Result<Vec<GraphPath>, Error>> {
        self.pool.install(|| {
            requests
                .par_iter()
                .map(|request| self.finder.find_paths(request))
                .collect()
        })
    }

    pub fn add_car_park_updater<S: CarParkDataSource>(
        &mut self,
        config_ref: &str,
        source: S,
    ) -> Result<(), Error> {
        let config = self.config.updater(config_ref, UpdaterType::CarPark)?;
        let updater = CarParkUpdater::new(config_ref, config.polling_period(), source);
        self.manager.add_updater(updater)
    }

    pub fn add_bike_rental_updater<S: BikeRentalDataSource>(
        &mut self,
        config_ref: &str,
        source: S,
    ) -> Result<(), Error> {
        let config = self.config.updater(config_ref, UpdaterType::BikeRental)?;
        let updater = config.network_types.iter().fold(
            BikeRentalUpdater::new(config_ref, config.polling_period(), source),
            |updater, network| {
                updater.with_network_type(
                    network.network.clone(),
                    RentalType::parse_or_default(&network.rental_type),
                )
            },
        );
        self.manager.add_updater(updater)
    }

    pub fn add_roadworks_updater<S: RoadworksDataSource>(
        &mut self,
        config_ref: &str,
        source: S,
    ) -> Result<(), Error> {
        let config = self.config.updater(config_ref, UpdaterType::Roadworks)?;
        let updater = RoadworksUpdater::new(config_ref, config.polling_period(), source);
        self.manager.add_updater(updater)
    }

    /// Latest published graph
    pub fn graph(&self) -> Arc<Graph> {
        self.manager.handle().snapshot()
    }

    /// Queues a graph change behind the pending updates
    pub fn execute(&self, unit: impl GraphWriterRunnable + 'static) -> Result<(), Error> {
        self.manager.execute(unit)
    }

    /// Stops the updaters and the graph writer.
    ///
    /// Searches keep working on the last published graph.
    pub fn shutdown(&mut self) -> Result<(), Error> {
        self.manager.stop()
    }
}
