use std::path::PathBuf;

use thiserror::Error;

/// 示例程序的统一错误类型
#[derive(Debug, Error)]
pub enum ExampleError {
    /// 结果表中不存在请求的行或字段
    #[error("未找到: {0}")]
    NotFound(String),
    /// 类别ID超出标签表范围
    #[error("类别ID {class_id} 超出标签表范围 (1..={len})")]
    IndexOutOfRange { class_id: i64, len: usize },
    /// 模型输出与声明的检测数量或形状不一致
    #[error("输入数据格式错误: {0}")]
    Malformed(String),
    #[error("访问 {path:?} 失败: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 写出检测报告失败
    #[error("输出检测报告失败: {0}")]
    Report(#[source] std::io::Error),
    #[error("图像处理失败: {0}")]
    Image(#[from] image::ImageError),
    #[error("模型运行失败: {0}")]
    Model(#[from] ort::Error),
    #[error("数组形状错误: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

pub type Result<T> = std::result::Result<T, ExampleError>;

impl ExampleError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}
