use crate::traits::QrEncoder;
use crate::{Error, Result};
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use std::io::Cursor;

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// 基于 `qrcode` + `image` 的 PNG 二维码编码器
#[derive(Debug, Clone)]
pub struct PngQrEncoder {
    ec_level: EcLevel,
    module_px: u32,
}

impl Default for PngQrEncoder {
    fn default() -> Self {
        Self {
            ec_level: EcLevel::M,
            module_px: 4,
        }
    }
}

impl PngQrEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders `text` into raw PNG bytes.
    pub fn render_png(&self, text: &str) -> Result<Vec<u8>> {
        let code = QrCode::with_error_correction_level(text.as_bytes(), self.ec_level)?;
        let image = code
            .render::<Luma<u8>>()
            .module_dimensions(self.module_px, self.module_px)
            .build();

        let mut png_bytes = Vec::new();
        DynamicImage::ImageLuma8(image)
            .write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)?;
        Ok(png_bytes)
    }
}

#[async_trait]
impl QrEncoder for PngQrEncoder {
    async fn to_data_url(&self, text: &str) -> Result<String> {
        let png = self.render_png(text)?;
        tracing::debug!(bytes = png.len(), "Rendered QR code");
        Ok(format!("{}{}", PNG_DATA_URL_PREFIX, STANDARD.encode(png)))
    }
}

/// 取出 data URL 中逗号之后的 base64 部分并解码
pub fn decode_data_url(data_url: &str) -> Result<Vec<u8>> {
    let (_, payload) = data_url
        .split_once(',')
        .ok_or_else(|| Error::DataUrl("missing ',' separator".to_string()))?;
    Ok(STANDARD.decode(payload)?)
}
