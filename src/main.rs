use anyhow::Result;
use warmup::Config;

fn main() -> Result<()> {
    env_logger::init();
    let config = Config::load();
    warmup::repl::start(&config)
}
