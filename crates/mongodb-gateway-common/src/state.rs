use configuration::Configuration;
use mongodb::{Client, Database};

use crate::interface_types::GatewayError;
use crate::mongodb_connection::get_mongodb_client;

#[derive(Clone, Debug)]
pub struct ConnectorState {
    client: Client,

    /// Name of the database to connect to
    database: String,
}

impl ConnectorState {
    pub fn database(&self) -> Database {
        self.client.database(&self.database)
    }
}

pub fn try_init_state(configuration: &Configuration) -> Result<ConnectorState, GatewayError> {
    let client = get_mongodb_client(configuration)?;
    Ok(ConnectorState {
        client,
        database: configuration.database.clone(),
    })
}
