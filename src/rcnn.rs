//! Rcnn模块 - Faster R-CNN 目标检测示例
//!
//! 该模块把一次检测拆成几个小步骤：
//! - 模型加载 (model)
//! - 图像读取与张量转换 (image)
//! - 模型推理 (infer)
//! - 结果表构建 (table)
//! - 标签解析 (labels)
//! - 检测框绘制 (draw)
//! - 文本报告输出 (report)
//!
//! # 工作流程
//!
//! 1. 使用load_model加载ONNX模型
//! 2. 使用Labels::from_path加载标签文件
//! 3. 创建FasterRcnnDetector并调用run_detection_task
//! 4. 使用print_report输出检测结果
//!
//! # 示例
//!
//! ```no_run
//! use model_examples::{load_model, run_detection_task, print_report, FasterRcnnDetector, Labels};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let model = load_model("models/faster_rcnn.onnx")?;
//! let labels = Labels::from_path("coco-labels-2017.txt")?;
//!
//! let mut detector = FasterRcnnDetector::new(model).with_score_threshold(0.3);
//! let table = run_detection_task(&mut detector, "image.jpg", "image_out.jpg")?;
//! print_report(&table, &labels)?;
//! # Ok(())
//! # }
//! ```

pub mod detect;
pub mod draw;
pub mod image;
pub mod infer;
pub mod labels;
pub mod model;
pub mod report;
pub mod table;

pub use detect::{FasterRcnnDetector, run_detection_task};
pub use draw::{draw_detections, save_jpeg};
pub use self::image::{image_to_tensor, load_image};
pub use infer::{RawOutputs, run_inference};
pub use labels::Labels;
pub use model::load_model;
pub use report::{print_report, write_report};
pub use table::{DetectionRow, DetectionTable, Field};
