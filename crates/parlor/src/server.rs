//! `Server` builder and accept loop.
//!
//! This is the entry point for running a Parlor server. It ties the
//! transport, the codec, the connection actors, and the hub together.

use parlor_protocol::JsonCodec;
use parlor_room::{spawn_hub, HubHandle, DEFAULT_CHANNEL_CAPACITY};
use parlor_transport::{Transport, WebSocketTransport};

use crate::player::handle_connection;
use crate::ServerError;

/// Builder for configuring and starting a Parlor server.
///
/// # Example
///
/// ```rust,no_run
/// use parlor::ServerBuilder;
///
/// # async fn run() -> Result<(), parlor::ServerError> {
/// let server = ServerBuilder::new()
///     .bind("0.0.0.0:8080")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct ServerBuilder {
    bind_addr: String,
    channel_capacity: usize,
}

impl ServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the capacity of every room and player channel. Bounded
    /// channels are what give the room its handoff semantics; raising
    /// this only buys slack for bursty clients.
    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    /// Binds the transport and starts the hub.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport`.
    pub async fn build(self) -> Result<Server, ServerError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;
        let hub = spawn_hub(self.channel_capacity);
        Ok(Server {
            transport,
            hub,
            channel_capacity: self.channel_capacity,
        })
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Parlor server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct Server {
    transport: WebSocketTransport,
    hub: HubHandle,
    channel_capacity: usize,
}

impl Server {
    /// Creates a new builder.
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> Result<std::net::SocketAddr, ServerError> {
        Ok(self.transport.local_addr()?)
    }

    /// Runs the server accept loop.
    ///
    /// Accepts incoming connections and spawns a connection actor for
    /// each one. Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), ServerError> {
        tracing::info!("parlor server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let hub = self.hub.clone();
                    let capacity = self.channel_capacity;
                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_connection(conn, hub, JsonCodec, capacity).await
                        {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
