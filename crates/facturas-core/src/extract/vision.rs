//! Vision-model extraction over an OpenAI-compatible chat API.

use std::path::Path;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ExtractError;
use crate::models::config::ApiConfig;
use crate::models::record::SnapshotEntry;

use super::Extractor;

/// The prompt that instructs the model to extract structured invoice
/// fields and answer with JSON only.
const EXTRACTION_PROMPT: &str = "Por favor, procesa la imagen de la factura y extrae la siguiente información para generar un JSON estructurado:\n\n\
File_Name: El nombre del archivo de la imagen.\n\
Date: La fecha de la factura.\n\
Business_Name: El nombre del negocio.\n\
Business_Type: El tipo de negocio (e.g., Farmacia, Supermercado, Restaurante).\n\
Concepto_de_la_Compra: El concepto general de la compra (e.g., Artículos de farmacia, Combustible).\n\
Nombre_del_Local: El nombre del local.\n\
Numero_de_Factura: El número de la factura.\n\
Monto: El monto total de la factura.\n\
Descuento: El monto del descuento (si aplica).\n\
IVA_Total: El monto total del IVA.\n\
Categoria_de_Compra: La categoría de la compra (e.g., Farmacia, Supermercado).\n\
Lista_de_Productos_Comprados: Una lista detallada de los productos comprados, incluyendo:\n\
Producto: El nombre del producto.\n\
Precio_Total: El precio total del producto.\n\n\
Asegúrate de extraer toda la información de manera precisa y de validar los campos cuando sea posible. \
Solo escribe el JSON sin ningún texto adicional.";

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Extraction adapter backed by an OpenAI-compatible vision model.
pub struct VisionExtractor {
    client: Client,
    base_url: String,
    model: String,
    max_tokens: u32,
    api_key: String,
}

impl VisionExtractor {
    /// Build an extractor from the API config. The key comes from the
    /// `OPENAI_API_KEY` environment variable.
    pub fn from_config(config: &ApiConfig) -> Result<Self, ExtractError> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| ExtractError::MissingApiKey)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            api_key,
        })
    }
}

impl Extractor for VisionExtractor {
    async fn extract(&self, image: &Path) -> Result<SnapshotEntry, ExtractError> {
        let bytes = std::fs::read(image).map_err(|source| ExtractError::Image {
            path: image.to_path_buf(),
            source,
        })?;
        let encoded = STANDARD.encode(&bytes);
        debug!(path = %image.display(), bytes = bytes.len(), "Encoded image for extraction");

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::Text {
                        text: EXTRACTION_PROMPT.to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: format!("data:image/jpeg;base64,{encoded}"),
                        },
                    },
                ],
            }],
            max_tokens: self.max_tokens,
        };

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let chat: ChatResponse = response.json().await?;
        let content = chat
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or(ExtractError::EmptyResponse)?;

        parse_model_content(content)
    }
}

/// Unwrap the textual response envelope and parse the JSON payload.
///
/// The model is instructed to answer with bare JSON but sometimes
/// wraps it in markdown fences; anything beyond that fails loudly.
/// The payload may be a single object or an array of invoices.
fn parse_model_content(content: &str) -> Result<SnapshotEntry, ExtractError> {
    let json_str = content
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();
    serde_json::from_str(json_str)
        .map_err(|e| ExtractError::MalformedResponse(format!("{e}; content: {json_str}")))
}
