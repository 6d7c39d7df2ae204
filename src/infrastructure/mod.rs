pub mod catalog_client;
pub mod config_store;
pub mod firestore_client;
pub mod http;
pub mod identity_client;
