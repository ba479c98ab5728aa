use clap::Parser;

mod app;
mod args;
mod config;

use app::App;
use args::ArgsInteractive;
use config::Config;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = <ArgsInteractive as Parser>::parse();

    let config = match &args.config {
        Some(path) => Config::load(path),
        None => Ok(Config::default()),
    };

    let mut config = match config {
        Ok(c) => c,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(-1);
        }
    };

    config.apply_args(&args);

    let app = match App::new(&config) {
        Ok(app) => app,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(-1);
        }
    };

    app.run();
}
