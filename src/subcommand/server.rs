use {
  self::{
    api::*,
    error::ApiError,
    response::{ApiResponse, DashboardResponse, HoldingResponse, StakedResponse},
  },
  super::*,
  axum::{
    extract::{Extension, Path},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
  },
  axum_server::Handle,
  tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
  },
  utoipa::OpenApi,
};

mod api;
mod error;
mod response;

type SharedDashboard = Arc<Dashboard<EsploraClient>>;

#[derive(OpenApi)]
#[openapi(
  paths(api::dashboard, api::fetch, api::stake, api::stake_output),
  components(schemas(
    api::Holding,
    api::DashboardInfo,
    api::StakedHoldings,
    DashboardResponse,
    HoldingResponse,
    StakedResponse,
    ApiError
  )),
  tags((name = "dashboard", description = "Inscription staking dashboard"))
)]
struct ApiDoc;

#[derive(Debug, Parser)]
pub(crate) struct Server {
  #[arg(
    long,
    default_value = "0.0.0.0",
    help = "Listen on <ADDRESS> for incoming requests."
  )]
  address: String,
  #[arg(
    long,
    help = "Listen on <HTTP_PORT> for incoming HTTP requests. [default: 80]."
  )]
  http_port: Option<u16>,
}

impl Server {
  pub(crate) fn run(self, options: Options, handle: Handle) -> SubcommandResult {
    Runtime::new()?.block_on(async {
      let dashboard = Arc::new(open_dashboard(&options)?);

      let router = Self::router(dashboard);

      self
        .spawn(router, handle, self.http_port.unwrap_or(80))?
        .await??;

      Ok::<(), Error>(())
    })?;

    Ok(None)
  }

  fn router(dashboard: SharedDashboard) -> Router {
    let api_v1_router = Router::new()
      .route("/dashboard", get(api::dashboard))
      .route("/fetch/:address", post(api::fetch))
      .route("/stake/:id", post(api::stake))
      .route("/stake/:txid/:id", post(api::stake_output));

    Router::new()
      .route("/status", get(Self::status))
      .route("/api-docs/openapi.json", get(Self::openapi))
      .nest("/api/v1", api_v1_router)
      .layer(Extension(dashboard))
      .layer(
        CorsLayer::new()
          .allow_methods([Method::GET, Method::POST])
          .allow_origin(Any),
      )
      .layer(CompressionLayer::new())
  }

  fn spawn(
    &self,
    router: Router,
    handle: Handle,
    port: u16,
  ) -> Result<task::JoinHandle<io::Result<()>>> {
    let addr = (self.address.as_str(), port)
      .to_socket_addrs()?
      .next()
      .ok_or_else(|| anyhow!("failed to get socket addrs"))?;

    if !integration_test() {
      eprintln!("Listening on http://{addr}");
    }
    log::info!("server: listening on http://{addr}");

    Ok(tokio::spawn(async move {
      axum_server::Server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    }))
  }

  async fn status() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
  }

  async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parse_server_args(args: &str) -> Server {
    match Arguments::try_parse_from(args.split_whitespace()) {
      Ok(arguments) => match arguments.subcommand {
        Subcommand::Server(server) => server,
        subcommand => panic!("unexpected subcommand: {subcommand:?}"),
      },
      Err(err) => panic!("error parsing arguments: {err}"),
    }
  }

  #[test]
  fn http_port_defaults_to_80() {
    let server = parse_server_args("ord-stake server");
    assert_eq!(server.address, "0.0.0.0");
    assert_eq!(server.http_port, None);
  }

  #[test]
  fn http_port_and_address() {
    let server = parse_server_args("ord-stake server --address 127.0.0.1 --http-port 8080");
    assert_eq!(server.address, "127.0.0.1");
    assert_eq!(server.http_port, Some(8080));
  }

  #[test]
  fn openapi_lists_dashboard_paths() {
    let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
    let paths = doc["paths"].as_object().unwrap();
    for path in [
      "/api/v1/dashboard",
      "/api/v1/fetch/{address}",
      "/api/v1/stake/{id}",
      "/api/v1/stake/{txid}/{id}",
    ] {
      assert!(paths.contains_key(path), "missing {path}");
    }
  }
}
