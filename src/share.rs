//! Share links and QR codes.
//!
//! A form is shared through its public URL, optionally rendered as a QR code
//! either for the terminal or as an SVG image.

use qrcode::render::{svg, unicode};
use qrcode::types::QrError;
use qrcode::QrCode;
use tracing::{debug, error};

/// Foreground colour of SVG codes.
const SVG_DARK: &str = "#1f2937";
/// Background colour of SVG codes.
const SVG_LIGHT: &str = "#ffffff";

/// How a QR code is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QrFormat {
    /// Unicode half blocks, two modules per character cell
    Terminal,
    /// Standalone SVG document
    Svg,
}

/// Rendering options for QR codes.
#[derive(Debug, Clone)]
pub struct QrOptions {
    /// Minimum SVG width and height in pixels.
    pub svg_size: u32,
    /// Surround the code with the standard quiet zone.
    pub quiet_zone: bool,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            svg_size: 256,
            quiet_zone: true,
        }
    }
}

impl From<&crate::config::ShareConfig> for QrOptions {
    fn from(config: &crate::config::ShareConfig) -> Self {
        Self {
            svg_size: config.svg_size,
            quiet_zone: config.quiet_zone,
        }
    }
}

/// Public URL at which a form can be answered.
pub fn share_url(base_url: &str, form_id: &str) -> String {
    format!("{}/form/{}", base_url.trim_end_matches('/'), form_id)
}

/// Render `data` as a QR code.
pub fn render_qr(data: &str, format: QrFormat, options: &QrOptions) -> Result<String, QrError> {
    let code = QrCode::new(data.as_bytes())?;

    let rendered = match format {
        QrFormat::Terminal => code
            .render::<unicode::Dense1x2>()
            .dark_color(unicode::Dense1x2::Light)
            .light_color(unicode::Dense1x2::Dark)
            .quiet_zone(options.quiet_zone)
            .build(),
        QrFormat::Svg => code
            .render::<svg::Color<'_>>()
            .min_dimensions(options.svg_size, options.svg_size)
            .dark_color(svg::Color(SVG_DARK))
            .light_color(svg::Color(SVG_LIGHT))
            .quiet_zone(options.quiet_zone)
            .build(),
    };

    Ok(rendered)
}

/// Encode a URL as a QR code off the async runtime.
///
/// Failures are logged and yield an empty string, so callers simply show
/// no code.
pub async fn encode_qr(url: &str, format: QrFormat, options: &QrOptions) -> String {
    let url = url.to_string();
    let options = options.clone();

    match tokio::task::spawn_blocking(move || render_qr(&url, format, &options)).await {
        Ok(Ok(rendered)) => {
            debug!("Encoded QR code ({:?}, {} bytes)", format, rendered.len());
            rendered
        }
        Ok(Err(e)) => {
            error!("Error generating QR code: {}", e);
            String::new()
        }
        Err(e) => {
            error!("QR encoding task failed: {}", e);
            String::new()
        }
    }
}
