//! The removal engine that runs inside the worker process.

use std::ffi::OsString;

use anyhow::Result;
use clap::{Args, ValueEnum};

pub const DEFAULT_MODEL_URL: &str = "https://huggingface.co/imgly/isnet-general-onnx";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum Provider {
    #[default]
    Auto,
    Cpu,
    Cuda,
    Coreml,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Auto => "auto",
            Provider::Cpu => "cpu",
            Provider::Cuda => "cuda",
            Provider::Coreml => "coreml",
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Model repository to download (once) and run
    #[arg(long = "model", value_name = "URL", default_value = DEFAULT_MODEL_URL, global = true)]
    pub model_url: String,

    /// Inference execution provider
    #[arg(long, value_enum, default_value_t = Provider::Auto, global = true)]
    pub provider: Provider,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            model_url: DEFAULT_MODEL_URL.to_string(),
            provider: Provider::default(),
        }
    }
}

impl EngineOptions {
    /// Flags that reproduce these options on a child's command line.
    pub fn to_args(&self) -> Vec<OsString> {
        vec![
            "--model".into(),
            self.model_url.clone().into(),
            "--provider".into(),
            self.provider.as_str().into(),
        ]
    }
}

#[cfg(feature = "imgly")]
pub fn remove_background(options: &EngineOptions, image: &[u8]) -> Result<Vec<u8>> {
    use anyhow::Context;
    use imgly_bgremove::{
        remove_background_from_bytes, validate_model_url, ExecutionProvider, ModelDownloader,
        ModelSource, ModelSpec, OutputFormat, RemovalConfig,
    };
    use tracing::info;

    // Reject a malformed URL before any runtime or network work.
    validate_model_url(&options.model_url)
        .with_context(|| format!("Invalid model URL {}", options.model_url))?;

    let execution_provider = match options.provider {
        Provider::Auto => ExecutionProvider::Auto,
        Provider::Cpu => ExecutionProvider::Cpu,
        Provider::Cuda => ExecutionProvider::Cuda,
        Provider::Coreml => ExecutionProvider::CoreMl,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Unable to start async runtime")?;

    runtime.block_on(async {
        // Returns straight away when the model is already cached.
        let downloader = ModelDownloader::new()?;
        let model_id = downloader
            .download_model(&options.model_url, false)
            .await
            .with_context(|| format!("Unable to fetch model {}", options.model_url))?;
        info!(model = %model_id, provider = %execution_provider, "running background removal");

        let config = RemovalConfig::builder()
            .execution_provider(execution_provider)
            .output_format(OutputFormat::Png)
            .model_spec(ModelSpec {
                source: ModelSource::Downloaded(model_id),
                variant: None,
            })
            .build()?;
        let result = remove_background_from_bytes(image, &config).await?;
        Ok::<_, anyhow::Error>(result.to_bytes(OutputFormat::Png, 100)?)
    })
}

#[cfg(not(feature = "imgly"))]
pub fn remove_background(options: &EngineOptions, image: &[u8]) -> Result<Vec<u8>> {
    let _ = (options, image);
    Err(anyhow::anyhow!(
        "This build has no background removal engine (enable the `imgly` feature)"
    ))
}
