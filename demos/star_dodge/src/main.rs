use anyhow::Result;
use arcade2d::Engine;
use star_dodge::{DodgeConfig, StarDodge, SCREEN_HEIGHT, SCREEN_WIDTH, SEED_ENV, WINDOW_TITLE};

fn main() {
    // RUST_LOG overrides; keep the graphics stack quiet by default.
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info,wgpu_core=warn,wgpu_hal=warn,naga=warn"),
    )
    .init();

    if let Err(err) = run() {
        log::error!("{err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = DodgeConfig::from_env()?;
    let seed = config.seed_or_random();
    log::info!("random seed {seed} (set {SEED_ENV} to replay)");

    let game = StarDodge::new(&config, fastrand::Rng::with_seed(seed));

    Engine::new()
        .with_title(WINDOW_TITLE)
        .with_size(SCREEN_WIDTH, SCREEN_HEIGHT)
        .with_vsync(true)
        .run(game)
}
