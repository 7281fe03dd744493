//! Together AI 互換 (/v1/images/generations) 画像生成プロバイダ
//!
//! endpoint は設定で差し替え可能。レスポンスは `data[0].b64_json` の base64 を復元して返す。

use crate::domain::{Credential, GeneratedImage, Prompt, Settings};
use crate::ports::outbound::{ImageGenerator, ImageGeneratorFactory};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use common::error::Error;
use serde_json::{json, Value};
use std::time::Duration;

/// Together AI 互換プロバイダ
pub struct TogetherImageGenerator {
    credential: Credential,
    endpoint: String,
    model: String,
    width: u32,
    height: u32,
    steps: u32,
    timeout: Duration,
}

impl TogetherImageGenerator {
    /// 資格情報と設定からプロバイダを作成
    pub fn new(credential: Credential, settings: &Settings) -> Self {
        Self {
            credential,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            width: settings.width,
            height: settings.height,
            steps: settings.steps,
            timeout: Duration::from_secs(settings.timeout_secs),
        }
    }

    /// リクエストボディ
    pub fn make_request_payload(&self, prompt: &Prompt) -> Value {
        json!({
            "model": self.model,
            "prompt": prompt.as_ref(),
            "width": self.width,
            "height": self.height,
            "steps": self.steps,
            "n": 1,
            "response_format": "b64_json"
        })
    }

    /// POST して成功時のレスポンス本文を返す。非 2xx・ネットワークエラーは Transport
    fn make_http_request(&self, payload: &Value) -> Result<String, Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| Error::transport(format!("Failed to build HTTP client: {}", e)))?;

        let response = client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("Authorization", self.credential.bearer())
            .body(payload.to_string())
            .send()
            .map_err(|e| Error::transport(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let response_text = response
            .text()
            .map_err(|e| Error::transport(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(Error::transport(error_message(status.as_u16(), &response_text)));
        }
        Ok(response_text)
    }
}

/// 非 2xx レスポンスのメッセージ。`error.message` があればそれを使う
fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(|s| s.to_string()))
        .map(|m| format!("HTTP {}: {}", status, m))
        .unwrap_or_else(|| format!("HTTP {}: {}", status, body))
}

/// 成功レスポンスから 1 枚目の画像を取り出して復元する
///
/// `data[0].b64_json` が無い・文字列でない・空のときは MissingImageData。
pub fn parse_response(response_json: &str) -> Result<GeneratedImage, Error> {
    let v: Value = serde_json::from_str(response_json).map_err(|e| {
        Error::missing_image_data(format!("response is not valid JSON: {}", e))
    })?;

    let encoded = v
        .get("data")
        .and_then(Value::as_array)
        .and_then(|items| items.first())
        .and_then(|item| item.get("b64_json"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::missing_image_data("response has no data[0].b64_json"))?;

    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| Error::decode(format!("invalid base64 image payload: {}", e)))?;
    GeneratedImage::new(bytes)
}

impl ImageGenerator for TogetherImageGenerator {
    fn name(&self) -> &str {
        "together"
    }

    fn generate(&self, prompt: &Prompt) -> Result<GeneratedImage, Error> {
        let payload = self.make_request_payload(prompt);
        let body = self.make_http_request(&payload)?;
        parse_response(&body)
    }
}

/// 標準の ImageGeneratorFactory
#[derive(Debug, Clone, Default)]
pub struct TogetherImageGeneratorFactory;

impl ImageGeneratorFactory for TogetherImageGeneratorFactory {
    fn create(
        &self,
        credential: Credential,
        settings: &Settings,
    ) -> Result<Box<dyn ImageGenerator>, Error> {
        Ok(Box::new(TogetherImageGenerator::new(credential, settings)))
    }
}
