use crate::config::ServerConfig;
use crate::encoder::decode_data_url;
use crate::photos;
use crate::structs::{DisplayMode, ModeRequest, PHOTOBOOTH_WIFI, ShareQr, ShareQuery};
use crate::traits::QrEncoder;
use axum::{
    Router,
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Json, Response},
    routing::get,
};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::services::ServeDir;

// 返回给前端的错误文案，与现有的 Web UI 保持一致
const WIFI_QR_ERROR_PREFIX: &str = "Fehler beim Generieren des WLAN QR-Codes: ";
const QR_ERROR: &str = "QR-Code-Fehler";
const INVALID_MODE_ERROR: &str = "Ungültiger Modus";
const FILE_ERROR: &str = "Dateifehler";
const NO_PHOTO_ERROR: &str = "Kein Foto vorhanden";
const NOT_FOUND_ERROR: &str = "Nicht gefunden";

/// Web 服务器状态
pub struct AppState {
    pub encoder: Arc<dyn QrEncoder>,
    // 照片墙展示模式，唯一跨请求共享的可变状态
    mode: RwLock<DisplayMode>,
    pub photos_dir: PathBuf,
    // 请求缺少 Host 头时用于拼接分享链接
    pub public_host: String,
}

impl AppState {
    pub fn new(
        encoder: Arc<dyn QrEncoder>,
        initial_mode: DisplayMode,
        photos_dir: PathBuf,
        public_host: String,
    ) -> Self {
        Self {
            encoder,
            mode: RwLock::new(initial_mode),
            photos_dir,
            public_host,
        }
    }

    pub fn from_config(config: &ServerConfig, encoder: Arc<dyn QrEncoder>) -> Self {
        Self::new(
            encoder,
            config.default_mode,
            config.photos_dir.clone(),
            config.public_host.clone(),
        )
    }

    pub async fn mode(&self) -> DisplayMode {
        *self.mode.read().await
    }
}

/// Builds the router with every API route plus static photo serving.
/// Hosts that only need the routes can mount the returned `Router` themselves.
pub fn build_router(state: Arc<AppState>) -> Router {
    let photos = ServeDir::new(&state.photos_dir);

    Router::new()
        .route("/api/wifi-qr", get(api_wifi_qr))
        .route("/api/qrcode", get(api_share_qr))
        .route("/api/qrcode/last", get(api_share_qr_last))
        .route("/api/mode", get(api_get_mode).post(api_set_mode))
        .route("/api/photos", get(api_photos))
        .route("/api/photos/last", get(api_photos_last))
        .route("/api/photos/{id}", get(api_photo))
        .nest_service("/photos", photos)
        .with_state(state)
}

/// 启动 Web 服务器，直到监听出错才返回
pub async fn run_server(config: &ServerConfig, encoder: Arc<dyn QrEncoder>) -> crate::Result<()> {
    let app_state = Arc::new(AppState::from_config(config, encoder));
    let app = build_router(app_state);

    tracing::info!("🌐 Web server listening on {}", config.bind_addr);
    tracing::info!("📁 Serving photos from {}", config.photos_dir.display());

    let listener = TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// 生成入网二维码的 PNG 字节
pub async fn render_wifi_qr(encoder: &dyn QrEncoder) -> crate::Result<Vec<u8>> {
    let payload = PHOTOBOOTH_WIFI.qr_payload();
    let data_url = encoder.to_data_url(&payload).await?;
    decode_data_url(&data_url)
}

// --- Route Handlers ---

/// 返回拍照亭热点的入网二维码 (image/png)
async fn api_wifi_qr(State(state): State<Arc<AppState>>) -> Response {
    tracing::info!("GET /api/wifi-qr called");

    match render_wifi_qr(state.encoder.as_ref()).await {
        Ok(png) => (StatusCode::OK, [(header::CONTENT_TYPE, "image/png")], png).into_response(),
        Err(e) => {
            tracing::error!("Error generating WiFi QR code: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "message": format!("{}{}", WIFI_QR_ERROR_PREFIX, e),
                })),
            )
                .into_response()
        }
    }
}

async fn api_get_mode(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mode = state.mode().await;
    (StatusCode::OK, Json(json!({ "mode": mode })))
}

async fn api_set_mode(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let Some(mode) = ModeRequest::parse_mode(&body) else {
        tracing::warn!(
            body = %String::from_utf8_lossy(&body),
            "Rejected invalid display mode"
        );
        return error_response(StatusCode::BAD_REQUEST, INVALID_MODE_ERROR);
    };

    *state.mode.write().await = mode;
    tracing::info!(%mode, "Display mode changed");
    (StatusCode::OK, Json(json!({ "success": true, "mode": mode }))).into_response()
}

/// 分享二维码：默认指向照片墙，`mode=single&photo=<name>` 时指向单张照片
async fn api_share_qr(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<ShareQuery>,
) -> Response {
    let host = request_host(&headers, &state.public_host);
    let url = share_url(host, &query);
    tracing::debug!(%url, "Handling /api/qrcode");
    share_qr_response(state.encoder.as_ref(), url, None).await
}

async fn api_share_qr_last(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let last = match photos::last_photo(&state.photos_dir).await {
        Ok(Some(name)) => name,
        Ok(None) => return error_response(StatusCode::NOT_FOUND, NO_PHOTO_ERROR),
        Err(e) => {
            tracing::error!("Failed to read photo directory: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, FILE_ERROR);
        }
    };

    let host = request_host(&headers, &state.public_host);
    let url = format!("http://{}/photos/{}", host, last);
    share_qr_response(state.encoder.as_ref(), url, Some(last)).await
}

async fn api_photos(State(state): State<Arc<AppState>>) -> Response {
    match photos::list_photos(&state.photos_dir).await {
        Ok(photos) => (StatusCode::OK, Json(json!({ "photos": photos }))).into_response(),
        Err(e) => {
            tracing::error!("Failed to read photo directory: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, FILE_ERROR)
        }
    }
}

async fn api_photos_last(State(state): State<Arc<AppState>>) -> Response {
    match photos::last_photo(&state.photos_dir).await {
        Ok(Some(filename)) => {
            (StatusCode::OK, Json(json!({ "filename": filename }))).into_response()
        }
        Ok(None) => error_response(StatusCode::NOT_FOUND, NO_PHOTO_ERROR),
        Err(e) => {
            tracing::error!("Failed to read photo directory: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, FILE_ERROR)
        }
    }
}

/// 按文件名返回单张照片
async fn api_photo(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    match photos::read_photo(&state.photos_dir, &id).await {
        Ok(Some(data)) => {
            let mime = mime_guess::from_path(&id).first_or_octet_stream().to_string();
            (StatusCode::OK, [(header::CONTENT_TYPE, mime)], data).into_response()
        }
        Ok(None) => {
            tracing::debug!(%id, "Photo not found");
            error_response(StatusCode::NOT_FOUND, NOT_FOUND_ERROR)
        }
        Err(e) => {
            tracing::error!(%id, "Failed to read photo: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, FILE_ERROR)
        }
    }
}

// --- Helpers ---

async fn share_qr_response(
    encoder: &dyn QrEncoder,
    url: String,
    filename: Option<String>,
) -> Response {
    match encoder.to_data_url(&url).await {
        Ok(qr) => (StatusCode::OK, Json(ShareQr { qr, url, filename })).into_response(),
        Err(e) => {
            tracing::error!(%url, "Failed to generate share QR code: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, QR_ERROR)
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn request_host<'a>(headers: &'a HeaderMap, fallback: &'a str) -> &'a str {
    headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .filter(|h| !h.is_empty())
        .unwrap_or(fallback)
}

fn share_url(host: &str, query: &ShareQuery) -> String {
    match (query.mode.as_deref(), query.photo.as_deref()) {
        (Some("single"), Some(photo)) => format!("http://{}/photos/{}", host, photo),
        _ => format!("http://{}/gallery", host),
    }
}
