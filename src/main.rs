//! vox-polish - enhance transcribed text from the command line

use std::io::Read;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vox_polish::config::keys;
use vox_polish::context::{ClipboardSource, NoContext};
use vox_polish::prompts::templates::predefined_prompts;
use vox_polish::{
    EnhancementEngine, EventBus, JsonFileSettings, MemorySettings, PromptStore, ProviderCatalog,
    ProviderKind, ProviderSession, SettingsStore,
};

#[derive(Parser, Debug)]
#[command(name = "vox-polish")]
#[command(about = "Enhance transcribed text through a local or cloud inference provider")]
struct Args {
    /// Text to enhance; read from stdin when omitted
    text: Option<String>,

    /// Provider to use: ollama, openai
    #[arg(long, default_value = "ollama")]
    provider: ProviderKind,

    /// Base-URL override for the provider
    #[arg(long)]
    base_url: Option<String>,

    /// Model override for the provider
    #[arg(long)]
    model: Option<String>,

    /// API key for providers that need one
    #[arg(long)]
    api_key: Option<String>,

    /// Title of the prompt to activate (defaults to the shipped default)
    #[arg(long)]
    prompt: Option<String>,

    /// Settings file to persist selections into; volatile when omitted
    #[arg(long)]
    settings: Option<std::path::PathBuf>,

    /// Probe provider connectivity and exit
    #[arg(long)]
    check: bool,

    /// List the provider's available models and exit
    #[arg(long)]
    list_models: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let settings: Arc<dyn SettingsStore> = match &args.settings {
        Some(path) => Arc::new(JsonFileSettings::open(path)?),
        None => Arc::new(MemorySettings::new()),
    };

    if let Some(base_url) = &args.base_url {
        settings.set(&keys::base_url(args.provider.as_str()), base_url);
    }

    let events = EventBus::new();
    let catalog = ProviderCatalog::with_defaults(reqwest::Client::new());
    let session = Arc::new(ProviderSession::new(catalog, settings.clone(), events.clone()));
    session.select_provider(args.provider);

    if let Some(key) = &args.api_key {
        if !session.save_api_key(key).await {
            return Err(anyhow!("API key verification failed for {}", args.provider));
        }
    }
    if let Some(model) = &args.model {
        session.select_model(model);
    }

    if args.check {
        let connected = session.check_connection().await;
        println!(
            "{}: {}",
            args.provider.display_name(),
            if connected { "connected" } else { "unreachable" }
        );
        return Ok(());
    }

    if args.list_models {
        session.refresh(args.provider).await;
        for model in session.available_models() {
            println!("{}", model);
        }
        return Ok(());
    }

    let prompts = Arc::new(PromptStore::new(settings.clone(), events.clone()));
    prompts.reconcile_predefined(&predefined_prompts());

    if let Some(title) = &args.prompt {
        let wanted = prompts
            .all_prompts()
            .into_iter()
            .find(|p| p.title.eq_ignore_ascii_case(title))
            .ok_or_else(|| anyhow!("no prompt titled '{}'", title))?;
        prompts.set_active(wanted.id);
    } else if prompts.active_prompt().is_none() {
        prompts.set_active(vox_polish::prompts::DEFAULT_PROMPT_ID);
    }

    let text = match args.text {
        Some(text) => text,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer.trim_end().to_string()
        }
    };

    #[cfg(feature = "clipboard")]
    let clipboard: Arc<dyn ClipboardSource> = Arc::new(vox_polish::context::SystemClipboard);
    #[cfg(not(feature = "clipboard"))]
    let clipboard: Arc<dyn ClipboardSource> = Arc::new(NoContext);

    let engine = EnhancementEngine::new(
        session,
        prompts,
        settings,
        events,
        Arc::new(NoContext),
        clipboard,
    );

    let (enhanced, elapsed) = engine.enhance(&text).await?;
    info!("Enhanced in {}ms", elapsed.as_millis());
    println!("{}", enhanced);

    Ok(())
}
