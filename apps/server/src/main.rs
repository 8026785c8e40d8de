use anyhow::Context;
use mcq::kernel::config::load_api_config;
use mcq_logger::{ConsoleFormat, Logger, parse_level};
use mcq_server::{Server, load_env_file};

const ENV_FILE: &str = ".env";

#[mcq_runtime::main(server)]
async fn main() -> anyhow::Result<()> {
    load_env_file(ENV_FILE)?;

    let cfg =
        mcq_logger::bootstrap(load_api_config).context("Critical: Configuration is malformed")?;

    let logger = Logger::builder()
        .name(env!("CARGO_PKG_NAME"))
        .level(parse_level(&cfg.log.level)?)
        .console_format(cfg.log.format.parse::<ConsoleFormat>()?);
    let _log = match &cfg.log.directory {
        Some(directory) => logger.path(directory).init()?,
        None => logger.init()?,
    };

    Server::builder().config(cfg).build().await?.run().await
}
