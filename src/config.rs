// 检测结果过滤配置
pub const DEFAULT_SCORE_THRESHOLD: f32 = 0.3;

// 模型签名中的输入输出张量名称
pub const INPUT_TENSOR: &str = "input_tensor";
pub const NUM_DETECTIONS: &str = "num_detections";
pub const DETECTION_BOXES: &str = "detection_boxes";
pub const DETECTION_SCORES: &str = "detection_scores";
pub const DETECTION_CLASSES: &str = "detection_classes";

// 默认路径
pub const DEFAULT_MODEL_PATH: &str = "models/faster_rcnn_inception_resnet_v2_1024x1024.onnx";
pub const DEFAULT_LABELS_PATH: &str = "coco-labels-2017.txt";

// 绘制与输出
pub const BOX_COLORS: [[f32; 3]; 3] = [[0.9, 0.3, 0.3], [0.3, 0.3, 0.9], [0.3, 0.9, 0.3]];
pub const BOX_STROKE_WIDTH: f32 = 2.0;
pub const JPEG_QUALITY: u8 = 100;
pub const MODEL_INTRA_THREADS: usize = 4;
