use async_trait::async_trait;

/// 二维码编码能力。
///
/// `Send + Sync` 约束是必须的，因为它将被用于 Axum 的共享状态 (State) 中。
#[async_trait]
pub trait QrEncoder: Send + Sync {
    /// Encodes `text` as a QR code and returns it as a PNG data URL,
    /// e.g. `data:image/png;base64,iVBORw0KGgo...`.
    async fn to_data_url(&self, text: &str) -> crate::Result<String>;
}
