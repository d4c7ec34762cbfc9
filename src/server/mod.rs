pub mod api;

use log::info;
use std::error::Error;
use std::net::SocketAddr;

use crate::cli::Args;

use self::api::AppState;

pub struct Server {
    addr: String,
    state: AppState,
    args: Args,
}

impl Server {
    pub fn new(addr: String, state: AppState, args: Args) -> Self {
        Self { addr, state, args }
    }

    /// Serves the chat gateway until the process is stopped.
    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let addr = self.addr.parse::<SocketAddr>()?;
        let app = api::build_router(self.state.clone());

        if self.args.enable_tls
            && self.args.tls_cert_path.is_some()
            && self.args.tls_key_path.is_some()
        {
            let cert_path = self.args.tls_cert_path.as_ref().unwrap();
            let key_path = self.args.tls_key_path.as_ref().unwrap();

            let tls_config =
                axum_server::tls_rustls::RustlsConfig::from_pem_file(cert_path, key_path).await?;

            info!("Starting HTTPS chat gateway on: https://{}", addr);
            axum_server::bind_rustls(addr, tls_config)
                .serve(app.into_make_service())
                .await?;
        } else {
            info!("Starting HTTP chat gateway on: http://{}", addr);
            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app.into_make_service()).await?;
        }

        Ok(())
    }
}
