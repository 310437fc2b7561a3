use serde::{Deserialize, Serialize};
use std::fmt;

/// WiFi-QR 中支持的加密方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityType {
    Wpa,
    Wep,
    /// 开放网络，二维码中写作 `nopass`
    Open,
}

impl SecurityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SecurityType::Wpa => "WPA",
            SecurityType::Wep => "WEP",
            SecurityType::Open => "nopass",
        }
    }
}

/// 一条 WiFi 凭据，用于生成手机可扫码入网的二维码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WifiCredentials {
    pub security: SecurityType,
    pub ssid: &'static str,
    pub password: &'static str,
    pub hidden: bool,
}

/// 拍照亭自己的热点，写死在程序里
pub const PHOTOBOOTH_WIFI: WifiCredentials = WifiCredentials {
    security: SecurityType::Wpa,
    ssid: "Photobooth 5",
    password: "Photobooth",
    hidden: false,
};

impl WifiCredentials {
    /// Serializes the record into the `WIFI:T:..;S:..;P:..;H:..;;` text that
    /// phone cameras understand.
    pub fn qr_payload(&self) -> String {
        format!(
            "WIFI:T:{};S:{};P:{};H:{};;",
            self.security.as_str(),
            escape_field(self.ssid),
            escape_field(self.password),
            self.hidden
        )
    }
}

// `\ ; , : "` 在 WiFi-QR 格式里是保留字符
fn escape_field(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | ';' | ',' | ':' | '"') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// 照片墙的展示模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Gallery,
    Single,
}

impl DisplayMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "gallery" => Some(DisplayMode::Gallery),
            "single" => Some(DisplayMode::Single),
            _ => None,
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayMode::Gallery => f.write_str("gallery"),
            DisplayMode::Single => f.write_str("single"),
        }
    }
}

/// POST /api/mode 的请求体
///
/// 请求体按原始字节自行解析：缺少 Content-Type、空 body、`mode` 不是字符串
/// 都要落到同一个 400 分支，而不是 axum `Json` 提取器的纯文本拒绝。
#[derive(Debug, Clone, Deserialize)]
pub struct ModeRequest {
    #[serde(default)]
    pub mode: Option<serde_json::Value>,
}

impl ModeRequest {
    /// Parses a raw request body, returning the requested mode only when the
    /// body is a JSON object whose `mode` is `"gallery"` or `"single"`.
    pub fn parse_mode(body: &[u8]) -> Option<DisplayMode> {
        let request: ModeRequest = serde_json::from_slice(body).ok()?;
        request
            .mode
            .as_ref()
            .and_then(serde_json::Value::as_str)
            .and_then(DisplayMode::parse)
    }
}

/// GET /api/qrcode 的查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShareQuery {
    pub mode: Option<String>,
    pub photo: Option<String>,
}

/// 分享二维码的响应体
#[derive(Debug, Clone, Serialize)]
pub struct ShareQr {
    pub qr: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}
