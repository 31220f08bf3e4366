use anyhow::{Context, Result};
use clap::Parser;
use rumeter::codec;
use rumeter::translate::TranslationDriver;
use rumeter::variable::{self, VariableContext};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// 待翻译的测试计划文件，可以给多个
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// 输出目录，每个线程组写一个 .act 文件
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// TOML 变量文件，预置解释器绑定
    #[arg(long)]
    pub vars: Option<PathBuf>,

    /// 变量文件里的环境名
    #[arg(long, default_value = "default")]
    pub env: String,
}

pub fn run(cli: Cli) -> Result<()> {
    let seed = match &cli.vars {
        Some(path) => variable::load_environment(path, &cli.env)
            .with_context(|| format!("loading variables from {}", path.display()))?,
        None => VariableContext::new(),
    };
    std::fs::create_dir_all(&cli.output)?;

    let driver = TranslationDriver::with_seed(seed);
    for input in &cli.inputs {
        let plan = driver.translate_file(input)?;
        for (group, list) in plan.groups() {
            let file = cli.output.join(format!("{}.act", sanitize(group)));
            codec::write_action_list_file(&file, list)
                .with_context(|| format!("writing {}", file.display()))?;
            info!("wrote {} ({} actions)", file.display(), list.actions.len());
        }
    }
    Ok(())
}

/// 组名里的路径分隔符不能进文件名
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect()
}
