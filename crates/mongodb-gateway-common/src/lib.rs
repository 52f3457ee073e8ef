pub mod health;
pub mod interface_types;
pub mod mongodb;
pub mod mongodb_connection;
pub mod query;
pub mod sanitize;
pub mod state;
pub mod url_params;
