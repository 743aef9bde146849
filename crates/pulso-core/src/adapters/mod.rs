mod yahoo;

pub use yahoo::{YahooAdapter, YahooAuthManager, YahooSettings};
