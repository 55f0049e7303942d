pub mod orient_client;

pub use orient_client::OrientClient;
