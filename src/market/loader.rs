//! Load notification and the loader that keeps a [`FinancialGraph`] populated.

use futures::future::join_all;
use log::{debug, error, info, warn};
use tokio::sync::watch;

use super::edge::CurrencyEdge;
use super::factory::EdgeFactory;
use super::vertex::CurrencyVertex;
use super::FinancialGraph;
use crate::error::{ArbError, Result};
use crate::graph::Edge;

/// A completion that may be signalled exactly once.
///
/// Any number of tasks can [`LoadSignal::wait`] for it. Firing it a second
/// time is a bug in the caller and is reported as [`ArbError::LoadedTwice`].
#[derive(Debug)]
pub struct LoadSignal {
    /// Name used in logs and errors
    name: String,
    /// Holds `true` once fired
    sender: watch::Sender<bool>,
}

impl LoadSignal {
    /// Creates an unfired signal.
    pub fn new(name: impl Into<String>) -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            name: name.into(),
            sender,
        }
    }

    /// Name used in logs and errors.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the signal has fired.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        *self.sender.borrow()
    }

    /// Fires the signal, waking every waiter.
    ///
    /// # Errors
    ///
    /// [`ArbError::LoadedTwice`] if the signal already fired.
    pub fn fire(&self) -> Result<()> {
        let fired = self.sender.send_if_modified(|loaded| {
            if *loaded {
                false
            } else {
                *loaded = true;
                true
            }
        });
        if fired {
            info!("{} loaded", self.name);
            Ok(())
        } else {
            error!("{} signalled loaded twice", self.name);
            Err(ArbError::LoadedTwice(self.name.clone()))
        }
    }

    /// Resolves once the signal has fired.
    pub async fn wait(&self) {
        let mut receiver = self.sender.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait
        let _ = receiver.wait_for(|loaded| *loaded).await;
    }
}

/// Builds and refreshes a [`FinancialGraph`] from a set of edge factories.
pub struct GraphLoader {
    /// Producers of the graph's edges
    factories: Vec<Box<dyn EdgeFactory>>,
    /// The graph being maintained
    graph: FinancialGraph,
    /// Fires the first time every edge is online
    loaded: LoadSignal,
}

impl GraphLoader {
    /// Creates a loader for a graph over `vertices` with one edge per factory.
    pub fn new(vertices: Vec<CurrencyVertex>, factories: Vec<Box<dyn EdgeFactory>>) -> Self {
        Self {
            factories,
            graph: FinancialGraph::new(vertices, Vec::new()),
            loaded: LoadSignal::new("financial graph"),
        }
    }

    /// Asks every factory for a fresh edge and upserts the results.
    ///
    /// Factories run concurrently. After each upsert the graph is checked again, and the
    /// load signal fires the first time every factory's edge is present and online.
    ///
    /// # Errors
    ///
    /// [`ArbError::LoadedTwice`] if the load signal was fired elsewhere.
    pub async fn refresh(&mut self) -> Result<&FinancialGraph> {
        let edges = join_all(self.factories.iter().map(|factory| factory.get_edge())).await;
        for edge in edges {
            if !edge.is_online() {
                warn!("edge {} is offline", edge.id());
            }
            self.graph.upsert_edge(edge);
            if !self.loaded.is_loaded() && self.is_fully_online() {
                self.loaded.fire()?;
            }
        }
        debug!(
            "graph refreshed: {} vertices, {} edges, {} offline",
            self.graph.vertices().len(),
            self.graph.edges().len(),
            self.offline_edges().count()
        );
        Ok(&self.graph)
    }

    /// Whether every factory has an online edge in the graph.
    fn is_fully_online(&self) -> bool {
        self.graph.edges().len() == self.factories.len()
            && self.graph.edges().iter().all(CurrencyEdge::is_online)
    }

    /// The current graph.
    #[must_use]
    pub const fn graph(&self) -> &FinancialGraph {
        &self.graph
    }

    /// Edges currently without a rate.
    pub fn offline_edges(&self) -> impl Iterator<Item = &CurrencyEdge> {
        self.graph.edges().iter().filter(|edge| !edge.is_online())
    }

    /// Fires the first time every edge is online.
    #[must_use]
    pub const fn loaded(&self) -> &LoadSignal {
        &self.loaded
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::market::Fees;
    use crate::test_helpers::*;

    #[tokio::test]
    async fn test_signal_fires_once() {
        let signal = LoadSignal::new("feed");
        assert!(!signal.is_loaded());
        signal.fire().unwrap();
        assert!(signal.is_loaded());
        assert_eq!(
            signal.fire().err().unwrap(),
            ArbError::LoadedTwice("feed".to_string())
        );
    }

    #[tokio::test]
    async fn test_wait_resolves_after_fire() {
        let signal = Arc::new(LoadSignal::new("feed"));
        let waiter = {
            let signal = Arc::clone(&signal);
            tokio::spawn(async move { signal.wait().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());

        signal.fire().unwrap();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
        // Waiting on a fired signal returns at once
        signal.wait().await;
    }

    /// Serves a fixed edge, online or not depending on a switch.
    struct SwitchFactory {
        edge: CurrencyEdge,
        online: Arc<AtomicBool>,
    }

    #[async_trait]
    impl EdgeFactory for SwitchFactory {
        fn edge_id(&self) -> &str {
            self.edge.id()
        }

        async fn get_edge(&self) -> CurrencyEdge {
            if self.online.load(Ordering::SeqCst) {
                self.edge.clone()
            } else {
                self.edge.offline()
            }
        }
    }

    #[tokio::test]
    async fn test_loader_fires_when_every_edge_is_online() {
        let usd = vertex("GDAX", "USD", 10_000);
        let eth = vertex("GDAX", "ETH", 10_000);
        let online = Arc::new(AtomicBool::new(false));
        let factories: Vec<Box<dyn EdgeFactory>> = vec![
            Box::new(SwitchFactory {
                edge: currency_edge("sell", &usd, &eth, Some(20_000), Fees::default(), 0),
                online: Arc::new(AtomicBool::new(true)),
            }),
            Box::new(SwitchFactory {
                edge: currency_edge("buy", &eth, &usd, Some(5_000), Fees::default(), 0),
                online: Arc::clone(&online),
            }),
        ];
        let mut loader = GraphLoader::new(vec![usd, eth], factories);

        let graph = loader.refresh().await.unwrap();
        assert_eq!(graph.edges().len(), 2);
        assert!(!loader.loaded().is_loaded());
        assert_eq!(loader.offline_edges().count(), 1);

        online.store(true, Ordering::SeqCst);
        loader.refresh().await.unwrap();
        assert!(loader.loaded().is_loaded());
        assert_eq!(loader.offline_edges().count(), 0);

        // Refreshing again replaces edges in place and does not fire twice
        loader.refresh().await.unwrap();
        assert_eq!(loader.graph().edges().len(), 2);
    }
}
