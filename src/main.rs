use std::sync::Arc;

use geo_chat::attachment::RawFile;
use geo_chat::auth::{AuthProvider, LocalAuthProvider, RegisterRequest, SignInRequest};
use geo_chat::notification::TracingSink;
use geo_chat::{AppState, ChatPage, ChatSeed, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEMO_EMAIL: &str = "demo@geochat.local";
const DEMO_PASSWORD: &str = "geochat-demo";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,geo_chat=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    let seed = match config.seed_path.as_deref() {
        Some(path) => ChatSeed::load(path)?,
        None => ChatSeed::demo(),
    };

    let auth = Arc::new(LocalAuthProvider::from_config(&config));
    auth.register(RegisterRequest {
        username: Some("demo".to_string()),
        full_name: Some("Demo User".to_string()),
        email: DEMO_EMAIL.to_string(),
        password: DEMO_PASSWORD.to_string(),
    })?;

    let state = AppState::new(config, auth.clone(), Arc::new(TracingSink));
    let mut page = ChatPage::mount(state, seed).await?;
    tracing::info!("View before sign-in: {:?}", page.view());

    auth.sign_in(SignInRequest::new(DEMO_EMAIL, DEMO_PASSWORD))
        .await?;
    tracing::info!("View after sign-in: {:?}", page.view());
    if let Some(greeting) = page.greeting() {
        tracing::info!("{}", greeting);
    }

    let first = page
        .conversations()
        .first()
        .map(|c| c.id.clone())
        .ok_or_else(|| anyhow::anyhow!("seed has no conversations"))?;
    page.select_conversation(&first);

    for message in page.thread() {
        tracing::info!(
            "[{}] {} {}",
            message.timestamp,
            message.text,
            message.status_mark().unwrap_or("")
        );
    }

    page.attach(vec![
        RawFile::new("photo.png", "image/png", 2 * 1024 * 1024),
        RawFile::new("movie.mkv", "video/x-matroska", 50 * 1024 * 1024),
    ]);
    page.set_draft_text("Here is the photo from yesterday");
    if let Some(message) = page.send() {
        for attachment in &message.attachments {
            tracing::info!(
                "Sent {} as {:?}",
                attachment.name,
                geo_chat::attachment::preview(attachment)
            );
        }
    }

    page.logout().await?;
    tracing::info!("View after logout: {:?}", page.view());

    Ok(())
}
