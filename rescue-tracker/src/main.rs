use rescue_tracker::config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    rescue_tracker::init_logging();

    let config = Config::from_env();
    rescue_tracker::run(config).await
}
