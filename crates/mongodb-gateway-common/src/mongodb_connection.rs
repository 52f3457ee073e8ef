use configuration::Configuration;
use mongodb::{
    options::{ClientOptions, Credential, DriverInfo, ServerAddress},
    Client,
};

use crate::interface_types::GatewayError;

const DRIVER_NAME: &str = "mongodb-gateway";

/// Builds a client from the configured host, port, and optional credentials. The client connects
/// lazily; the first query or ping establishes the connection.
pub fn get_mongodb_client(configuration: &Configuration) -> Result<Client, GatewayError> {
    let mut options = ClientOptions::builder()
        .hosts(vec![ServerAddress::Tcp {
            host: configuration.mongo_host.clone(),
            port: Some(configuration.mongo_port),
        }])
        .build();

    if let Some(username) = &configuration.mongo_user {
        options.credential = Some(
            Credential::builder()
                .username(username.clone())
                .password(configuration.mongo_password.clone())
                .build(),
        );
    }

    // Helps MongoDB to collect statistics on gateway use
    options.driver_info = Some(DriverInfo::builder().name(DRIVER_NAME).build());

    let client = Client::with_options(options)?;
    Ok(client)
}
