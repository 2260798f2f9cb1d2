use std::path::Path;

use log::info;
use ort::session::{Session, builder::GraphOptimizationLevel};

use crate::config::MODEL_INTRA_THREADS;
use crate::error::Result;

/// 加载Faster R-CNN模型
///
/// 加载ONNX格式的检测模型，并应用优化配置。
///
/// # 参数
/// * `model_path` - 模型文件路径
///
/// # 返回值
/// 返回加载的Session对象
///
/// # 错误处理
/// 如果模型加载失败会返回 `ExampleError::Model`
pub fn load_model(model_path: impl AsRef<Path>) -> Result<Session> {
    let model_path = model_path.as_ref();
    let model = build_session(model_path)?;
    info!("已加载模型 {:?}", model_path);
    Ok(model)
}

fn build_session(model_path: &Path) -> ort::Result<Session> {
    let model = Session::builder()?
        .with_optimization_level(GraphOptimizationLevel::Level3)?
        .with_intra_threads(MODEL_INTRA_THREADS)?
        .commit_from_file(model_path)?;
    Ok(model)
}
