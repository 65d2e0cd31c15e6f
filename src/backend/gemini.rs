//! Remote few-shot prompting backend for the Gemini generative API.
//!
//! Classification is delegated to a remote generative-text service: the
//! utterance is embedded into a fixed few-shot prompt and the free-text reply
//! is scanned for `Category:` and `Confidence:` marker lines. The wire
//! contract is natural language in both directions, so parsing is defensive:
//! every malformed field has a documented substitute and no transport or
//! parse failure ever reaches the caller of `classify`.

use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::backend::{ClassificationResult, ClassifierBackend};
use crate::error::{DestekError, Result};
use crate::intent::Intent;

/// Model used when the configuration does not name one.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Environment variable consulted for the API credential.
pub const AUTH_ENV_VAR: &str = "GEMINI_API_KEY";

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Minimum delay between consecutive remote calls, to respect service rate
/// limits during batch evaluation.
const PACING_DELAY: Duration = Duration::from_millis(100);

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Confidence substituted when the reply's confidence token is not a float.
const UNPARSABLE_CONFIDENCE: f64 = 0.7;

/// Confidence assigned when the reply names a label outside the intent set.
const UNKNOWN_LABEL_CONFIDENCE: f64 = 0.3;

/// Configuration for [`GeminiBackend`].
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Model identifier appended to the API path.
    pub model: String,
    /// API key; falls back to [`AUTH_ENV_VAR`] when `None`.
    pub api_key: Option<String>,
    /// Minimum spacing between consecutive requests.
    pub pacing_delay: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            pacing_delay: PACING_DELAY,
        }
    }
}

/// Transport abstraction: one prompt in, one raw text reply out.
///
/// Tests inject canned replies through this trait; production uses
/// [`HttpTransport`].
pub trait GeminiTransport: Send + Sync {
    fn complete(&self, prompt: &str) -> Result<String>;
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

/// Blocking HTTP transport with a bounded request timeout.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(model: &str, api_key: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DestekError::backend(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{API_BASE}/{model}:generateContent?key={api_key}"),
        })
    }
}

impl GeminiTransport for HttpTransport {
    fn complete(&self, prompt: &str) -> Result<String> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .map_err(|e| DestekError::backend(format!("request failed: {e}")))?
            .error_for_status()
            .map_err(|e| DestekError::backend(format!("service returned error status: {e}")))?;

        let parsed: GenerateResponse = response
            .json()
            .map_err(|e| DestekError::backend(format!("malformed response body: {e}")))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or_else(|| DestekError::backend("empty completion"))
    }
}

/// Few-shot classification backend over a remote generative model.
pub struct GeminiBackend {
    config: GeminiConfig,
    transport: Box<dyn GeminiTransport>,
    last_call: Mutex<Option<Instant>>,
}

impl GeminiBackend {
    /// Construct with the default HTTP transport.
    ///
    /// Fails with a configuration error when no API key is supplied and
    /// [`AUTH_ENV_VAR`] is unset. The failure is deliberate: silently running
    /// without the remote backend would skew any comparison built on it.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let api_key = match &config.api_key {
            Some(key) => key.clone(),
            None => std::env::var(AUTH_ENV_VAR)
                .map_err(|_| DestekError::config(format!("missing {AUTH_ENV_VAR}")))?,
        };
        let transport = Box::new(HttpTransport::new(&config.model, &api_key)?);
        Ok(Self::with_transport(config, transport))
    }

    /// Construct with a custom transport.
    pub fn with_transport(config: GeminiConfig, transport: Box<dyn GeminiTransport>) -> Self {
        Self {
            config,
            transport,
            last_call: Mutex::new(None),
        }
    }

    /// Sleep until at least the configured pacing delay has passed since the
    /// previous request, then stamp the clock.
    fn pace(&self) {
        let mut last_call = self.last_call.lock();
        if let Some(previous) = *last_call {
            let elapsed = previous.elapsed();
            if elapsed < self.config.pacing_delay {
                std::thread::sleep(self.config.pacing_delay - elapsed);
            }
        }
        *last_call = Some(Instant::now());
    }

    /// Build the fixed few-shot prompt embedding the utterance.
    fn build_prompt(text: &str) -> String {
        format!(
            r#"Sen uzman bir e-ticaret müşteri hizmetleri chatbot'usun. Aşağıdaki örneklere bakarak, kullanıcı mesajını doğru kategoriye ayır:

ÖRNEKLER:
"Merhaba" → greeting
"İyi günler" → greeting
"Selam" → greeting

"Bu ürünün fiyatı nedir?" → product_inquiry
"Ürün arıyorum" → product_inquiry
"Stokta var mı?" → product_inquiry

"Siparişim nerede?" → order_status
"Kargo takip numarası" → order_status
"Ne zaman gelecek?" → order_status

"Sepete ekle" → cart_operations
"Sepetimi göster" → cart_operations
"Sepet toplamı" → cart_operations

"Ödeme yapamıyorum" → payment_issues
"Kredi kartım çalışmıyor" → payment_issues
"Taksit seçenekleri" → payment_issues

"İade etmek istiyorum" → return_refund
"Para iadesi" → return_refund
"Ürün değişimi" → return_refund

"Kargo ne kadar sürer?" → shipping_info
"Teslimat saatleri" → shipping_info
"Ücretsiz kargo" → shipping_info

"Hoşçakal" → goodbye
"Görüşürüz" → goodbye
"Teşekkürler" → goodbye

"Şikayetim var" → complaint
"Memnun değilim" → complaint
"Sorun yaşıyorum" → complaint

ŞİMDİ BU METNİ SINIFLANDIR:
Kullanıcı Mesajı: "{text}"

CEVAP FORMATI (TAM OLARAK ŞU ŞEKİLDE):
Category: [kategori_adı]
Confidence: [0.0-1.0 arası sayı]

ÖRNEK CEVAP:
Category: product_inquiry
Confidence: 0.95
"#
        )
    }

    /// Parse a free-text reply into a classification result.
    ///
    /// The reply is scanned line by line for `Category:` and `Confidence:`
    /// markers. Defaults: no category line leaves the greeting fallback in
    /// place; an unparsable confidence token becomes 0.7; a category outside
    /// the intent set is rejected as `(greeting, 0.3)`.
    fn parse_reply(reply: &str) -> ClassificationResult {
        let mut label = String::from("greeting");
        let mut confidence = 0.5;

        for line in reply.lines() {
            if let Some((_, rest)) = line.split_once("Category:") {
                label = rest.trim().to_lowercase();
            } else if let Some((_, rest)) = line.split_once("Confidence:") {
                confidence = rest.trim().parse().unwrap_or(UNPARSABLE_CONFIDENCE);
            }
        }

        match Intent::parse(&label) {
            Some(intent) => ClassificationResult::new(intent, confidence),
            None => ClassificationResult::new(Intent::Greeting, UNKNOWN_LABEL_CONFIDENCE),
        }
    }
}

impl ClassifierBackend for GeminiBackend {
    fn classify(&self, text: &str) -> Result<ClassificationResult> {
        self.pace();

        let prompt = Self::build_prompt(text);
        match self.transport.complete(&prompt) {
            Ok(reply) => Ok(Self::parse_reply(&reply)),
            Err(err) => {
                log::warn!("gemini request failed, returning fallback: {err}");
                Ok(ClassificationResult::fallback())
            }
        }
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn hedge_threshold(&self) -> f64 {
        0.6
    }
}
