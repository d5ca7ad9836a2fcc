use {super::*, utoipa::ToSchema};

pub(crate) type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
  /// Output index within the transaction.
  pub id: u32,
  /// Hex encoded output script.
  pub content: Option<String>,
  /// Block time in unix seconds, null while unconfirmed.
  pub timestamp: Option<u64>,
  /// Transaction id.
  pub transaction_id: Option<String>,
}

impl From<&HoldingRecord> for Holding {
  fn from(holding: &HoldingRecord) -> Self {
    Self {
      id: holding.id(),
      content: holding.content().map(str::to_string),
      timestamp: holding.timestamp(),
      transaction_id: holding.transaction_id().map(str::to_string),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardInfo {
  /// Address of the last fetch.
  pub address: String,
  pub available: Vec<Holding>,
  pub staked: Vec<Holding>,
  /// Whether a fetch is in progress.
  pub loading: bool,
  /// Message of the last failed fetch.
  pub error: Option<String>,
}

impl From<DashboardSnapshot> for DashboardInfo {
  fn from(snapshot: DashboardSnapshot) -> Self {
    Self {
      address: snapshot.address,
      available: snapshot.available.iter().map(Holding::from).collect(),
      staked: snapshot.staked.iter().map(Holding::from).collect(),
      loading: snapshot.loading,
      error: snapshot.error,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StakedHoldings {
  /// Every holding moved to the staked list, in ledger order.
  pub holdings: Vec<Holding>,
}

fn parse_id(id: &str) -> Result<u32, ApiError> {
  id.parse()
    .map_err(|_| ApiError::bad_request(format!("invalid output index: {id}")))
}

// /dashboard
#[utoipa::path(
  get,
  path = "/api/v1/dashboard",
  tag = "dashboard",
  operation_id = "get the dashboard state",
  responses(
    (status = 200, description = "Available and staked holdings.", body = DashboardResponse),
  )
)]
pub(crate) async fn dashboard(
  Extension(dashboard): Extension<SharedDashboard>,
) -> ApiResult<DashboardInfo> {
  log::debug!("rpc: get dashboard");

  Ok(Json(ApiResponse::ok(dashboard.snapshot().into())))
}

// /fetch/:address
#[utoipa::path(
  post,
  path = "/api/v1/fetch/{address}",
  tag = "dashboard",
  operation_id = "fetch the holdings of an address",
  params(
    ("address" = String, Path, description = "Address")
  ),
  responses(
    (status = 200, description = "Dashboard after the fetch. A failed fetch is reported in `error`.", body = DashboardResponse),
    (status = 409, description = "Another fetch is in progress.", body = ApiError, example = json!(&ApiError::conflict("a fetch is already in progress"))),
  )
)]
pub(crate) async fn fetch(
  Extension(dashboard): Extension<SharedDashboard>,
  Path(address): Path<String>,
) -> ApiResult<DashboardInfo> {
  log::debug!("rpc: fetch {address}");

  match dashboard.refresh(&address).await {
    Ok(_) | Err(DashboardError::Fetch(_)) => {
      Ok(Json(ApiResponse::ok(dashboard.snapshot().into())))
    }
    Err(err @ DashboardError::Busy) => Err(ApiError::conflict(err)),
  }
}

// /stake/:id
#[utoipa::path(
  post,
  path = "/api/v1/stake/{id}",
  tag = "dashboard",
  operation_id = "stake the available holdings with an output index",
  params(
    ("id" = u32, Path, description = "Output index")
  ),
  responses(
    (status = 200, description = "Every available holding with this output index, now staked.", body = StakedResponse),
    (status = 400, description = "Bad query.", body = ApiError, example = json!(&ApiError::bad_request("invalid output index: x"))),
    (status = 404, description = "Holding not available.", body = ApiError, example = json!(&ApiError::not_found("holding 9 not found"))),
  )
)]
pub(crate) async fn stake(
  Extension(dashboard): Extension<SharedDashboard>,
  Path(id): Path<String>,
) -> ApiResult<StakedHoldings> {
  log::debug!("rpc: stake {id}");

  let holdings = dashboard.stake(parse_id(&id)?)?;

  Ok(Json(ApiResponse::ok(StakedHoldings {
    holdings: holdings.iter().map(Holding::from).collect(),
  })))
}

// /stake/:txid/:id
#[utoipa::path(
  post,
  path = "/api/v1/stake/{txid}/{id}",
  tag = "dashboard",
  operation_id = "stake an available holding by transaction id and output index",
  params(
    ("txid" = String, Path, description = "Transaction id"),
    ("id" = u32, Path, description = "Output index")
  ),
  responses(
    (status = 200, description = "The staked holding.", body = HoldingResponse),
    (status = 400, description = "Bad query.", body = ApiError, example = json!(&ApiError::bad_request("invalid output index: x"))),
    (status = 404, description = "Holding not available.", body = ApiError, example = json!(&ApiError::not_found("holding t1:9 not found"))),
  )
)]
pub(crate) async fn stake_output(
  Extension(dashboard): Extension<SharedDashboard>,
  Path((txid, id)): Path<(String, String)>,
) -> ApiResult<Holding> {
  log::debug!("rpc: stake {txid}:{id}");

  let holding = dashboard.stake_output(&txid, parse_id(&id)?)?;

  Ok(Json(ApiResponse::ok((&holding).into())))
}
