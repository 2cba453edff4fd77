use anyhow::Result;
use exam_generator::app::App;
use exam_generator::config::Config;
use exam_generator::utils::logging;

/// 配置文件路径
const CONFIG_PATH: &str = "exam_generator.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load(CONFIG_PATH)?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    App::initialize(config).run().await?;

    Ok(())
}
