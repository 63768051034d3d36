pub mod hipermaxi_fetcher;
pub mod traits;

pub use hipermaxi_fetcher::HipermaxiClient;
pub use traits::UpstreamClient;
