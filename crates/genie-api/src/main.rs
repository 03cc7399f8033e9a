use genie_core::Config;

// Use mimalloc as the global allocator for lower fragmentation under
// concurrent multipart uploads, especially on musl-based container images.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    let (_state, router) = genie_api::setup::initialize_app(config.clone()).await?;

    genie_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
