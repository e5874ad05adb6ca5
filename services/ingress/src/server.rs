//! HTTP ingress server

use crate::config::ServerConfig;
use crate::error::Result;
use crate::factory::MessageFactory;
use crate::routes;
use mailbox_runtime::Runtime;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// Serves the ingress routes in front of a runtime
pub struct IngressServer {
    config: ServerConfig,
    runtime: Arc<dyn Runtime>,
    factory: MessageFactory,
}

impl IngressServer {
    pub fn new(config: ServerConfig, runtime: Arc<dyn Runtime>, factory: MessageFactory) -> Self {
        Self {
            config,
            runtime,
            factory,
        }
    }

    /// Bind the listener.
    ///
    /// Returns the bound address (useful with port 0) and the server future,
    /// which completes after `shutdown` resolves.
    pub fn bind(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(SocketAddr, impl Future<Output = ()> + 'static)> {
        let addr = self.config.socket_addr()?;
        let routes = routes::routes(self.runtime, self.factory);

        let (bound, server) = warp::serve(routes).try_bind_with_graceful_shutdown(addr, shutdown)?;
        info!(address = %bound, "HTTP ingress listening");
        Ok((bound, server))
    }

    /// Bind and serve until `shutdown` resolves
    pub async fn run(self, shutdown: impl Future<Output = ()> + Send + 'static) -> Result<()> {
        let (_, server) = self.bind(shutdown)?;
        server.await;
        info!("HTTP ingress stopped");
        Ok(())
    }
}
