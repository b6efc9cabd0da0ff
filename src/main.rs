use anyhow::Result;
use pdf_text_batch::utils::logging;
use pdf_text_batch::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 位置参数：输入目录、输出目录、OCR 语言
    let args: Vec<String> = std::env::args().skip(1).collect();

    // 加载配置
    let config = Config::load(&args)?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    let _report = App::initialize(config).run().await?;

    Ok(())
}
