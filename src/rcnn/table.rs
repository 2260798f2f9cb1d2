//! 检测结果表
//!
//! 把模型按锚点排列的扁平输出转换为按行索引组织的结构化记录。
//! 行索引就是锚点在原始输出中的位置，过滤后不会重新编号。

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use log::trace;

use crate::error::{ExampleError, Result};
use crate::rcnn::infer::RawOutputs;
use crate::rcnn::labels::Labels;

/// 结果表中每一行的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    DetectionClass,
    DetectionScore,
    Ymin,
    Xmin,
    Ymax,
    Xmax,
}

impl Field {
    /// 按报告顺序排列的全部字段
    pub const ALL: [Field; 6] = [
        Field::DetectionClass,
        Field::DetectionScore,
        Field::Ymin,
        Field::Xmin,
        Field::Ymax,
        Field::Xmax,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::DetectionClass => "detection_class",
            Field::DetectionScore => "detection_score",
            Field::Ymin => "ymin",
            Field::Xmin => "xmin",
            Field::Ymax => "ymax",
            Field::Xmax => "xmax",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = ExampleError;

    fn from_str(s: &str) -> Result<Self> {
        Field::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| ExampleError::NotFound(format!("字段 {s:?}")))
    }
}

/// 一条被接受的检测结果
///
/// 坐标是相对于图像尺寸的比例值 (0.0 - 1.0)，顺序与模型输出一致。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionRow {
    /// 类别ID，模型以浮点数输出，从1开始
    pub class_id: f32,
    /// 置信度
    pub score: f32,
    pub ymin: f32,
    pub xmin: f32,
    pub ymax: f32,
    pub xmax: f32,
}

impl DetectionRow {
    fn from_anchor(class_id: f32, score: f32, bbox: [f32; 4]) -> Self {
        let [ymin, xmin, ymax, xmax] = bbox;
        Self { class_id, score, ymin, xmin, ymax, xmax }
    }

    /// 读取指定字段的值
    pub fn get(&self, field: Field) -> f32 {
        match field {
            Field::DetectionClass => self.class_id,
            Field::DetectionScore => self.score,
            Field::Ymin => self.ymin,
            Field::Xmin => self.xmin,
            Field::Ymax => self.ymax,
            Field::Xmax => self.xmax,
        }
    }

    /// 四舍五入后的整数类别ID，非有限值返回None
    pub fn class_index(&self) -> Option<i64> {
        self.class_id.is_finite().then(|| self.class_id.round() as i64)
    }
}

/// 检测结果表
///
/// 以原始锚点索引为键的有序映射，构建后只读。
/// 表中每一行的置信度都严格大于构建时使用的阈值。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectionTable {
    rows: BTreeMap<usize, DetectionRow>,
}

impl DetectionTable {
    /// 从按锚点排列的输出构建结果表
    ///
    /// 依次扫描 `0..num_detections` 的锚点，只保留置信度严格大于
    /// `score_threshold` 的锚点。数组可以比 `num_detections` 长（模型会
    /// 填充到固定容量），多余部分被忽略。
    ///
    /// # 参数
    /// * `num_detections` - 模型声明的检测数量
    /// * `classes` - 每个锚点的类别ID
    /// * `scores` - 每个锚点的置信度
    /// * `boxes` - 每个锚点的边界框 `[ymin, xmin, ymax, xmax]`
    /// * `score_threshold` - 置信度阈值
    ///
    /// # 错误处理
    /// 任一数组短于 `num_detections` 时返回 `ExampleError::Malformed`
    ///
    /// # 示例
    ///
    /// ```
    /// use model_examples::DetectionTable;
    ///
    /// let table = DetectionTable::build(
    ///     3,
    ///     &[1.0, 2.0, 3.0],
    ///     &[0.9, 0.2, 0.5],
    ///     &[[0.0, 0.0, 1.0, 1.0], [0.0, 0.0, 1.0, 1.0], [0.1, 0.1, 0.9, 0.9]],
    ///     0.3,
    /// ).unwrap();
    /// assert_eq!(table.row_indices().collect::<Vec<_>>(), vec![0, 2]);
    /// ```
    pub fn build(
        num_detections: usize,
        classes: &[f32],
        scores: &[f32],
        boxes: &[[f32; 4]],
        score_threshold: f32,
    ) -> Result<Self> {
        for (name, len) in [
            ("detection_classes", classes.len()),
            ("detection_scores", scores.len()),
            ("detection_boxes", boxes.len()),
        ] {
            if len < num_detections {
                return Err(ExampleError::Malformed(format!(
                    "{name} 只有 {len} 项，少于声明的 {num_detections} 个检测"
                )));
            }
        }

        let mut rows = BTreeMap::new();
        for n in 0..num_detections {
            let score = scores[n];
            if score > score_threshold {
                rows.insert(n, DetectionRow::from_anchor(classes[n], score, boxes[n]));
            } else {
                trace!("丢弃锚点 {n}: 置信度 {score} 未超过阈值 {score_threshold}");
            }
        }

        Ok(Self { rows })
    }

    /// 从一次推理的原始输出构建结果表
    ///
    /// `num_detections` 必须是有限的非负数，小数部分被截断。
    pub fn from_outputs(outputs: &RawOutputs, score_threshold: f32) -> Result<Self> {
        let count = detection_count(outputs.num_detections)?;

        if outputs.boxes.ncols() != 4 {
            return Err(ExampleError::Malformed(format!(
                "detection_boxes 每行应有 4 个坐标，实际为 {}",
                outputs.boxes.ncols()
            )));
        }
        let boxes: Vec<[f32; 4]> = outputs
            .boxes
            .rows()
            .into_iter()
            .map(|row| [row[0], row[1], row[2], row[3]])
            .collect();
        let classes: Vec<f32> = outputs.classes.iter().copied().collect();
        let scores: Vec<f32> = outputs.scores.iter().copied().collect();

        Self::build(count, &classes, &scores, &boxes, score_threshold)
    }

    /// 按升序返回所有被接受的行索引
    pub fn row_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows.keys().copied()
    }

    /// 根据行索引获取一行
    pub fn get(&self, row: usize) -> Option<&DetectionRow> {
        self.rows.get(&row)
    }

    /// 读取某一行的指定字段
    ///
    /// 行不存在时返回 `ExampleError::NotFound`
    pub fn field_at(&self, row: usize, field: Field) -> Result<f32> {
        self.row(row).map(|r| r.get(field))
    }

    /// 按字段名读取某一行的值
    ///
    /// 行或字段名不存在时返回 `ExampleError::NotFound`
    pub fn field_by_name(&self, row: usize, name: &str) -> Result<f32> {
        let field = name.parse::<Field>()?;
        self.field_at(row, field)
    }

    /// 把某一行的类别ID解析为标签
    ///
    /// 类别ID从1开始：ID为1对应标签表的第一项。
    ///
    /// # 错误处理
    /// * 行不存在 - `ExampleError::NotFound`
    /// * 类别ID不在 `1..=labels.len()` 内 - `ExampleError::IndexOutOfRange`
    pub fn label_for<'a>(&self, row: usize, labels: &'a Labels) -> Result<&'a str> {
        let detection = self.row(row)?;
        let class_id = detection.class_index().unwrap_or(i64::MIN);
        labels.get(class_id).ok_or(ExampleError::IndexOutOfRange {
            class_id,
            len: labels.len(),
        })
    }

    /// 按行索引顺序遍历 `(行索引, 行)`
    pub fn iter(&self) -> impl Iterator<Item = (usize, &DetectionRow)> + '_ {
        self.rows.iter().map(|(&row, detection)| (row, detection))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn row(&self, row: usize) -> Result<&DetectionRow> {
        self.rows
            .get(&row)
            .ok_or_else(|| ExampleError::NotFound(format!("行 {row}")))
    }
}

fn detection_count(num_detections: f32) -> Result<usize> {
    if !num_detections.is_finite() || num_detections < 0.0 {
        return Err(ExampleError::Malformed(format!(
            "num_detections 无效: {num_detections}"
        )));
    }
    Ok(num_detections as usize)
}
