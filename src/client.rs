use futures::Stream;
use futures::StreamExt;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Proxy, Response};
use std::pin::Pin;
use std::time::{Duration, Instant};
use url::Url;

use crate::config::Configuration;
use crate::error::{Error, Result};
use crate::observability::{
    CLIENT_API_ERRORS, CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS,
    STREAM_DURATION, STREAM_TTFB,
};
use crate::render::Renderer;
use crate::sse::decode_stream;
use crate::types::ChatRequest;

const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

/// Text fragments of a reply, in order.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Client for an OpenAI-compatible chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct ChatClient {
    api_key: String,
    client: ReqwestClient,
    endpoint: Url,
    system_prompt: String,
    timeout: Duration,
}

/// What [`ChatClient::send`] observed while streaming a reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplySummary {
    /// Number of fragments handed to the renderer.
    pub fragments: usize,
    /// Total length of the reply text in bytes.
    pub text_bytes: usize,
    /// Time from sending the request to the first fragment.
    pub time_to_first_fragment: Option<Duration>,
    /// Time from sending the request to the end of the reply.
    pub elapsed: Duration,
}

impl ChatClient {
    /// Create a new client for `config`.
    ///
    /// The endpoint is `{base_url}/chat/completions`.  Requests time out after
    /// `request_timeout` seconds and go through `proxy_url` when one is set.
    pub fn new(config: &Configuration) -> Result<Self> {
        let endpoint = format!("{}{CHAT_COMPLETIONS_PATH}", config.base_url);
        let endpoint = Url::parse(&endpoint).map_err(|e| {
            Error::url(format!("Invalid base_url {:?}: {e}", config.base_url), Some(e))
        })?;

        let timeout = config.timeout();
        let mut builder = ReqwestClient::builder().timeout(timeout);
        if let Some(proxy_url) = &config.proxy_url {
            let parsed = Url::parse(proxy_url).map_err(|e| {
                Error::url(format!("Invalid proxy_url {proxy_url:?}: {e}"), Some(e))
            })?;
            let proxy = Proxy::all(parsed).map_err(|e| {
                Error::http_client(format!("Invalid proxy_url: {e}"), Some(Box::new(e)))
            })?;
            builder = builder.proxy(proxy);
        }
        let client = builder.build().map_err(|e| {
            Error::http_client(
                format!("Failed to build HTTP client: {e}"),
                Some(Box::new(e)),
            )
        })?;

        Ok(Self {
            api_key: config.api_key.clone(),
            client,
            endpoint,
            system_prompt: config.system_prompt.clone(),
            timeout,
        })
    }

    /// The URL requests are sent to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Builds the request for `prompt`, prefixed by the configured system prompt.
    pub fn request(&self, model: &str, prompt: &str) -> ChatRequest {
        ChatRequest::new(model, &self.system_prompt, prompt)
    }

    /// Create and return default headers for API requests.
    fn default_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("text/event-stream"),
        );
        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|e| {
                Error::http_client(
                    format!("api_key cannot be sent as a header: {e}"),
                    Some(Box::new(e)),
                )
            })?;
        authorization.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, authorization);
        Ok(headers)
    }

    /// Convert a failed HTTP exchange into our Error type.
    fn request_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::timeout(
                format!("Request timed out: {e}"),
                Some(self.timeout.as_secs()),
            )
        } else if e.is_connect() {
            Error::connection(format!("Connection error: {e}"), Some(Box::new(e)))
        } else {
            Error::http_client(format!("Error making request: {e}"), Some(Box::new(e)))
        }
    }

    /// Turn a non-success response into [`Error::Api`] carrying the body.
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => format!("<failed to read error response: {e}>"),
        };
        Error::api(status_code, body)
    }

    /// Send a request and get the reply as a stream of text fragments.
    ///
    /// The request always asks for a streamed reply.  The response body stays
    /// open until the returned stream is dropped.
    pub async fn stream(
        &self,
        request: &ChatRequest,
    ) -> Result<FragmentStream> {
        let mut request = request.clone();
        request.stream = true;

        CLIENT_REQUESTS.click();
        let response = self
            .client
            .post(self.endpoint.clone())
            .headers(self.default_headers()?)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                CLIENT_REQUEST_ERRORS.click();
                self.request_error(e)
            })?;

        if !response.status().is_success() {
            CLIENT_API_ERRORS.click();
            return Err(Self::process_error_response(response).await);
        }

        Ok(Box::pin(decode_stream(response.bytes_stream())))
    }

    /// Send `prompt` to `model` and render the reply as it streams in.
    ///
    /// Every fragment goes to `renderer` as soon as it is decoded.  Once the
    /// reply has started, [`Renderer::finish_response`] is called exactly once,
    /// including when the stream fails part-way; that failure is returned
    /// afterwards and the text already rendered stays rendered.
    pub async fn send(
        &self,
        model: &str,
        prompt: &str,
        renderer: &mut dyn Renderer,
    ) -> Result<ReplySummary> {
        let request = self.request(model, prompt);
        let started = Instant::now();
        let mut stream = self.stream(&request).await?;
        CLIENT_REQUEST_DURATION.add(started.elapsed().as_secs_f64());

        let mut summary = ReplySummary::default();
        let mut outcome = Ok(());
        while let Some(fragment) = stream.next().await {
            match fragment {
                Ok(text) => {
                    if summary.time_to_first_fragment.is_none() {
                        let ttfb = started.elapsed();
                        STREAM_TTFB.add(ttfb.as_secs_f64());
                        summary.time_to_first_fragment = Some(ttfb);
                    }
                    renderer.print_text(&text);
                    summary.fragments += 1;
                    summary.text_bytes += text.len();
                }
                Err(err) => {
                    outcome = Err(err);
                    break;
                }
            }
        }
        renderer.finish_response();

        summary.elapsed = started.elapsed();
        STREAM_DURATION.add(summary.elapsed.as_secs_f64());
        outcome.map(|()| summary)
    }
}
