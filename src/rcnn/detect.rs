use std::path::Path;
use std::time::Instant;

use image::DynamicImage;
use log::{debug, info};
use ort::session::Session;

use crate::config::DEFAULT_SCORE_THRESHOLD;
use crate::error::Result;
use crate::rcnn::draw::{draw_detections, save_jpeg};
use crate::rcnn::image::{image_to_tensor, load_image};
use crate::rcnn::infer::{RawOutputs, run_inference};
use crate::rcnn::table::DetectionTable;

/// Faster R-CNN 目标检测器
///
/// 封装了图像转换、模型推理和结果表构建。非极大值抑制已经在模型内部完成。
///
/// # 示例
///
/// ```no_run
/// use model_examples::{FasterRcnnDetector, load_image, load_model};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let model = load_model("models/faster_rcnn.onnx")?;
/// let image = load_image("image.jpg")?;
/// let mut detector = FasterRcnnDetector::new(model).with_score_threshold(0.5);
/// let table = detector.detect(&image)?;
/// println!("检测到 {} 个目标", table.len());
/// # Ok(())
/// # }
/// ```
pub struct FasterRcnnDetector {
    /// ONNX模型会话
    model: Session,
    /// 置信度阈值，不超过此值的检测结果将被过滤
    score_threshold: f32,
}

impl FasterRcnnDetector {
    pub fn new(model: Session) -> Self {
        Self {
            model,
            score_threshold: DEFAULT_SCORE_THRESHOLD,
        }
    }

    /// 设置置信度阈值
    pub fn with_score_threshold(mut self, threshold: f32) -> Self {
        self.score_threshold = threshold;
        self
    }

    pub fn score_threshold(&self) -> f32 {
        self.score_threshold
    }

    /// 对一张图像执行推理，返回原始输出
    pub fn infer(&mut self, img: &DynamicImage) -> Result<RawOutputs> {
        let input = image_to_tensor(img);

        let start_time = Instant::now();
        let outputs = run_inference(&mut self.model, &input)?;
        debug!("模型推理耗时: {:?}", start_time.elapsed());

        Ok(outputs)
    }

    /// 完整的检测流程：从图像到检测结果表
    pub fn detect(&mut self, img: &DynamicImage) -> Result<DetectionTable> {
        let outputs = self.infer(img)?;
        DetectionTable::from_outputs(&outputs, self.score_threshold)
    }
}

/// 执行一次检测任务
///
/// 读取图像、运行检测，并在模型报告至少一个检测时把绘制了检测框的图像
/// 保存为JPEG。
///
/// # 参数
/// * `detector` - 检测器
/// * `image_path` - 输入图像路径
/// * `output_path` - 输出图像路径
///
/// # 返回值
/// 返回检测结果表
pub fn run_detection_task(
    detector: &mut FasterRcnnDetector,
    image_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
) -> Result<DetectionTable> {
    let image = load_image(image_path.as_ref())?;
    debug!("原始图像尺寸: {}x{}", image.width(), image.height());

    let outputs = detector.infer(&image)?;
    annotate_detections(&image, &outputs, detector.score_threshold(), output_path)
}

/// 由原始输出构建结果表，模型报告了检测时保存绘制了检测框的图像
pub(crate) fn annotate_detections(
    image: &DynamicImage,
    outputs: &RawOutputs,
    score_threshold: f32,
    output_path: impl AsRef<Path>,
) -> Result<DetectionTable> {
    let table = DetectionTable::from_outputs(outputs, score_threshold)?;
    info!(
        "模型报告 {} 个检测，{} 个超过阈值 {}",
        outputs.num_detections,
        table.len(),
        score_threshold
    );

    // 检测数量被截断为整数，不足1个时不输出图像
    if outputs.num_detections >= 1.0 {
        let result_image = draw_detections(image, &table);
        save_jpeg(&result_image, output_path)?;
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, array};

    fn outputs(num_detections: f32, scores: ndarray::Array1<f32>) -> RawOutputs {
        let n = scores.len();
        RawOutputs {
            num_detections,
            classes: ndarray::Array1::ones(n),
            scores,
            boxes: Array2::from_shape_fn((n, 4), |(_, c)| if c < 2 { 0.25 } else { 0.75 }),
        }
    }

    #[test]
    fn no_detections_writes_no_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        let image = DynamicImage::new_rgb8(32, 16);

        let table = annotate_detections(&image, &outputs(0.0, array![0.9, 0.8]), 0.3, &path).unwrap();
        assert!(table.is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn fractional_count_below_one_writes_no_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        let image = DynamicImage::new_rgb8(32, 16);

        let table = annotate_detections(&image, &outputs(0.9, array![0.9]), 0.3, &path).unwrap();
        assert!(table.is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn detections_below_threshold_still_write_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        let image = DynamicImage::new_rgb8(32, 16);

        let table =
            annotate_detections(&image, &outputs(2.0, array![0.3, 0.1]), 0.3, &path).unwrap();
        assert!(table.is_empty());
        assert!(path.exists());
    }

    #[test]
    fn accepted_detections_write_image_of_same_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        let image = DynamicImage::new_rgb8(64, 48);

        let table =
            annotate_detections(&image, &outputs(2.0, array![0.9, 0.2]), 0.3, &path).unwrap();
        assert_eq!(table.row_indices().collect::<Vec<_>>(), vec![0]);

        let written = image::open(&path).unwrap();
        assert_eq!((written.width(), written.height()), (64, 48));
    }
}
