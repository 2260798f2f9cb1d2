use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, CommandFactory, Parser, Subcommand, error::ErrorKind};
use log::{error, warn};

use model_examples::config::{DEFAULT_LABELS_PATH, DEFAULT_MODEL_PATH, DEFAULT_SCORE_THRESHOLD};
use model_examples::{FasterRcnnDetector, Labels, load_model, print_report, run_detection_task, tensors};

#[derive(Debug, Parser)]
#[command(version, about = "Faster R-CNN 目标检测与张量示例")]
struct Cli {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// 使用Faster R-CNN检测图像中的目标并输出结果表
    Fastrcnn(FastRcnnArgs),
    /// 创建不同阶数的张量
    Tensors,
    /// LeNet MNIST 训练示例
    Lenet,
    /// VGG11 Fashion-MNIST 训练示例
    Vgg,
    /// 线性回归训练示例
    Linear,
    /// 逻辑回归 MNIST 训练示例
    Logistic,
}

#[derive(Debug, Args)]
struct FastRcnnArgs {
    /// 输入JPEG图像路径
    image: PathBuf,
    /// 绘制检测框后的输出图像路径
    output: PathBuf,
    /// ONNX模型路径
    #[arg(long, default_value = DEFAULT_MODEL_PATH)]
    model: PathBuf,
    /// 标签文件路径，每行一个标签
    #[arg(long, default_value = DEFAULT_LABELS_PATH)]
    labels: PathBuf,
    /// 置信度阈值，只保留严格大于该值的检测
    #[arg(long, default_value_t = DEFAULT_SCORE_THRESHOLD)]
    threshold: f32,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = match parse_cli(std::env::args_os()) {
        Ok(Some(cli)) => cli,
        Ok(None) => {
            println!("Invalid mode name!");
            return;
        }
        Err(e) => e.exit(),
    };

    if let Err(e) = run(cli.mode) {
        error!("{e:#}");
        std::process::exit(1);
    }
}

/// 解析命令行；第一个参数不是已知模式时返回 `Ok(None)`
fn parse_cli<I, T>(args: I) -> Result<Option<Cli>, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    match Cli::try_parse_from(args.clone()) {
        Ok(cli) => Ok(Some(cli)),
        Err(e) if e.kind() == ErrorKind::InvalidSubcommand => Ok(None),
        Err(e) if e.kind() == ErrorKind::UnknownArgument && !names_mode(args.get(1)) => Ok(None),
        Err(e) => Err(e),
    }
}

fn names_mode(arg: Option<&OsString>) -> bool {
    let Some(arg) = arg.and_then(|a| a.to_str()) else {
        return false;
    };
    Cli::command().get_subcommands().any(|mode| mode.get_name() == arg)
}

fn run(mode: Mode) -> anyhow::Result<()> {
    match mode {
        Mode::Fastrcnn(args) => fastrcnn(args),
        Mode::Tensors => Ok(tensors::run()?),
        Mode::Lenet => training_unavailable("lenet"),
        Mode::Vgg => training_unavailable("vgg"),
        Mode::Linear => training_unavailable("linear"),
        Mode::Logistic => training_unavailable("logistic"),
    }
}

fn fastrcnn(args: FastRcnnArgs) -> anyhow::Result<()> {
    let labels = Labels::from_path(&args.labels).context("加载标签文件失败")?;
    let model = load_model(&args.model)
        .with_context(|| format!("加载模型 {:?} 失败", args.model))?;

    let mut detector = FasterRcnnDetector::new(model).with_score_threshold(args.threshold);
    let table = run_detection_task(&mut detector, &args.image, &args.output)
        .with_context(|| format!("检测 {:?} 失败", args.image))?;

    print_report(&table, &labels)?;
    Ok(())
}

fn training_unavailable(mode: &str) -> anyhow::Result<()> {
    warn!("{mode} 是训练示例，需要框架的训练运行时");
    println!("Mode {mode} is a training example and is not available in this build.");
    Ok(())
}
