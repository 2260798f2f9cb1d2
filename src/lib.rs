pub mod config;
pub mod error;
pub mod rcnn;
pub mod tensors;

// 重新导出rcnn模块中的常用类型和函数
pub use error::{ExampleError, Result};
pub use rcnn::{DetectionRow, DetectionTable, FasterRcnnDetector, Field, Labels, RawOutputs};
pub use rcnn::{draw_detections, image_to_tensor, load_image, save_jpeg};
pub use rcnn::{load_model, print_report, run_detection_task, run_inference, write_report};
