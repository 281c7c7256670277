//! Database connection management

use crate::config::DatabaseConfig;
use std::fmt;
use tokio::task::JoinHandle;
use tokio_postgres::{Client, NoTls};
use tracing::{debug, error};

/// Backend name used in connection diagnostics
pub const STORE_NAME: &str = "PostgreSQL";

/// An open database session
///
/// Holds the client together with the background task that drives its
/// socket. Dropping the client ends the driver task and closes the session.
pub struct Connection {
    client: Client,
    driver: JoinHandle<()>,
}

impl Connection {
    /// Open a single session described by `config`, authenticating with `password`
    ///
    /// # Errors
    ///
    /// Returns the client library error if the server cannot be reached or
    /// rejects the handshake
    pub async fn open(
        config: &DatabaseConfig,
        password: &str,
    ) -> Result<Self, tokio_postgres::Error> {
        debug!(
            "Opening connection: host={}:{}, user={}, dbname={}",
            config.host, config.port, config.user, config.dbname
        );

        let (client, connection) = tokio_postgres::Config::new()
            .host(&config.host)
            .port(config.port)
            .user(&config.user)
            .password(password)
            .dbname(&config.dbname)
            .connect(NoTls)
            .await?;

        let driver = tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("{} connection closed with error: {}", STORE_NAME, e);
            }
        });

        Ok(Self { client, driver })
    }

    /// Get the client for issuing statements
    #[must_use]
    pub const fn client(&self) -> &Client {
        &self.client
    }

    /// Whether the server side of the session has gone away
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.client.is_closed()
    }

    /// Take ownership of the client, leaving the driver task running
    #[must_use]
    pub fn into_client(self) -> Client {
        self.client
    }

    /// Whether the background socket task has exited
    #[must_use]
    pub fn driver_finished(&self) -> bool {
        self.driver.is_finished()
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("closed", &self.client.is_closed())
            .field("driver_finished", &self.driver.is_finished())
            .finish()
    }
}
