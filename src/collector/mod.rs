// Collector module: taxonomy resolution, price collection and the run that ties them together.

pub mod orchestrator;
pub mod prices;
pub mod taxonomy;

#[cfg(test)]
pub mod testing;

pub use orchestrator::CollectionOrchestrator;
