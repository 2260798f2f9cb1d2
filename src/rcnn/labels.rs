use std::fs;
use std::path::Path;

use log::debug;

use crate::error::{ExampleError, Result};

/// 有序的类别标签表
///
/// 类别ID从1开始编号：ID为1对应第一行标签。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Labels {
    names: Vec<String>,
}

impl Labels {
    /// 从文本文件加载标签，每行一个
    ///
    /// # 参数
    /// * `path` - 标签文件路径
    ///
    /// # 错误处理
    /// 文件无法读取时返回 `ExampleError::Io`
    ///
    /// # 示例
    ///
    /// ```no_run
    /// use model_examples::Labels;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let labels = Labels::from_path("coco-labels-2017.txt")?;
    /// println!("{}", labels.get(1).unwrap_or("unknown"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ExampleError::io(path, e))?;
        let labels = Self::from_lines(content.lines());
        debug!("从 {:?} 加载了 {} 个标签", path, labels.len());
        Ok(labels)
    }

    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// 按1开始的类别ID查找标签
    pub fn get(&self, class_id: i64) -> Option<&str> {
        let index = usize::try_from(class_id.checked_sub(1)?).ok()?;
        self.names.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.names
    }
}
